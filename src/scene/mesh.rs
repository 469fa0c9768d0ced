//! CPU-side geometry of the imported meshes.

use glamx::{Vec2, Vec3};

/// Joint indices of a skinned vertex, into the skin's joint list.
pub type Joints = [u16; 4];

/// Joint weights of a skinned vertex.
pub type Weights = [f32; 4];

/// A named group of primitives sharing a node.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<MeshPrimitive>,
}

/// A triangle list with its vertex attributes.
///
/// Every attribute vector has one entry per position, except `joints` and
/// `weights` which are either empty or full.
#[derive(Clone, Debug)]
pub struct MeshPrimitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub joints: Vec<Joints>,
    pub weights: Vec<Weights>,
    pub indices: Vec<[u32; 3]>,
    /// Index into [`Model::materials`](crate::scene::Model::materials).
    pub material: Option<usize>,
}

impl MeshPrimitive {
    /// Creates a primitive, filling in what the source did not provide.
    ///
    /// # Arguments
    /// * `positions` - Vertex positions
    /// * `indices` - Flat triangle list; a trailing incomplete triangle is dropped.
    ///   When `None`, consecutive vertices form the triangles.
    /// * `normals` - Vertex normals, computed from the faces when `None`
    /// * `uvs` - Texture coordinates, zero when `None`
    pub fn new(
        positions: Vec<Vec3>,
        indices: Option<Vec<u32>>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
    ) -> Self {
        let flat = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let indices: Vec<[u32; 3]> = flat
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .filter(|t| t.iter().all(|&i| (i as usize) < positions.len()))
            .collect();

        let normals = match normals {
            Some(ns) if ns.len() == positions.len() => ns,
            _ => compute_normals(&positions, &indices),
        };

        let uvs = match uvs {
            Some(us) if us.len() == positions.len() => us,
            _ => vec![Vec2::ZERO; positions.len()],
        };

        Self {
            positions,
            normals,
            uvs,
            joints: Vec::new(),
            weights: Vec::new(),
            indices,
            material: None,
        }
    }

    /// Attaches skinning attributes. They are dropped if their length does not
    /// match the vertex count.
    pub fn with_skin_attributes(mut self, joints: Vec<Joints>, weights: Vec<Weights>) -> Self {
        if joints.len() == self.positions.len() && weights.len() == self.positions.len() {
            self.joints = joints;
            self.weights = weights;
        } else if !joints.is_empty() || !weights.is_empty() {
            log::warn!(
                "Ignoring skin attributes: {} joints and {} weights for {} vertices.",
                joints.len(),
                weights.len(),
                self.positions.len()
            );
        }
        self
    }

    pub fn with_material(mut self, material: Option<usize>) -> Self {
        self.material = material;
        self
    }

    /// Whether every vertex carries joints and weights.
    #[inline]
    pub fn is_skinned(&self) -> bool {
        !self.joints.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Computes smooth normals by averaging the normals of the faces around each vertex.
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; coordinates.len()];

    // Accumulate normals ...
    for f in faces {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let normal = edge1.cross(edge2).normalize_or_zero();

        for &i in f {
            normals[i as usize] += normal;
        }
    }

    // ... and normalize. Isolated vertices keep a zero normal.
    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn normals_of_a_flat_quad_face_the_viewer() {
        let normals = compute_normals(&quad(), &[[0, 1, 2], [0, 2, 3]]);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1.0e-6);
        }
    }

    #[test]
    fn missing_indices_are_generated() {
        let p = MeshPrimitive::new(quad(), None, None, None);
        // Four vertices make one full triangle, the last vertex is left over.
        assert_eq!(p.indices, vec![[0, 1, 2]]);
        assert_eq!(p.uvs.len(), 4);
        assert_eq!(p.normals[3], Vec3::ZERO);
    }

    #[test]
    fn out_of_range_triangles_are_dropped() {
        let p = MeshPrimitive::new(quad(), Some(vec![0, 1, 2, 0, 2, 9]), None, None);
        assert_eq!(p.triangle_count(), 1);
    }

    #[test]
    fn mismatched_skin_attributes_are_ignored() {
        let p = MeshPrimitive::new(quad(), Some(vec![0, 1, 2]), None, None)
            .with_skin_attributes(vec![[0; 4]; 2], vec![[1.0, 0.0, 0.0, 0.0]; 2]);
        assert!(!p.is_skinned());

        let p = MeshPrimitive::new(quad(), Some(vec![0, 1, 2]), None, None)
            .with_skin_attributes(vec![[0; 4]; 4], vec![[1.0, 0.0, 0.0, 0.0]; 4]);
        assert!(p.is_skinned());
    }
}

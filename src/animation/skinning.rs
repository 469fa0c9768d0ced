//! Linear blend skinning, computed on the CPU.

use glamx::{Mat3, Mat4, Vec3};

use crate::scene::{MeshPrimitive, Skin};

/// The skinning matrix of every joint: its world matrix times its inverse bind matrix.
///
/// `world` holds the world matrix of every node of the model, as returned by
/// [`Model::world_matrices`](crate::scene::Model::world_matrices). Joints
/// referencing a missing node use the inverse bind matrix alone.
pub fn joint_matrices(world: &[Mat4], skin: &Skin) -> Vec<Mat4> {
    skin.joints
        .iter()
        .zip(&skin.inverse_bind_matrices)
        .map(|(&joint, inverse_bind)| {
            world.get(joint).copied().unwrap_or(Mat4::IDENTITY) * *inverse_bind
        })
        .collect()
}

/// Computes the world-space positions and normals of `primitive`.
///
/// Skinned vertices blend the `joints` matrices with their weights, normalized
/// when they do not sum to one. Vertices of an unskinned primitive, or whose
/// weights are all zero, are transformed by `fallback`, the world matrix of the
/// node holding the mesh.
pub fn skin_primitive(
    primitive: &MeshPrimitive,
    joints: &[Mat4],
    fallback: Mat4,
    out_positions: &mut Vec<Vec3>,
    out_normals: &mut Vec<Vec3>,
) {
    out_positions.clear();
    out_normals.clear();
    out_positions.reserve(primitive.vertex_count());
    out_normals.reserve(primitive.vertex_count());

    for (i, (&position, &normal)) in primitive
        .positions
        .iter()
        .zip(&primitive.normals)
        .enumerate()
    {
        let matrix = if primitive.is_skinned() {
            blend(&primitive.joints[i], &primitive.weights[i], joints).unwrap_or(fallback)
        } else {
            fallback
        };

        out_positions.push(matrix.transform_point3(position));
        out_normals.push((Mat3::from_mat4(matrix) * normal).normalize_or_zero());
    }
}

fn blend(indices: &[u16; 4], weights: &[f32; 4], joints: &[Mat4]) -> Option<Mat4> {
    let mut total = 0.0;
    let mut matrix = Mat4::ZERO;

    for (&j, &w) in indices.iter().zip(weights) {
        if w <= 0.0 {
            continue;
        }
        if let Some(joint) = joints.get(j as usize) {
            matrix += *joint * w;
            total += w;
        }
    }

    (total > 0.0).then(|| matrix * (1.0 / total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glamx::Quat;

    fn triangle() -> MeshPrimitive {
        MeshPrimitive::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            Some(vec![0, 1, 2]),
            None,
            None,
        )
    }

    #[test]
    fn joint_matrix_cancels_the_bind_pose() {
        let bind = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let skin = Skin::new(None, vec![0], vec![bind.inverse()]);
        let m = joint_matrices(&[bind], &skin);
        assert!(m[0].abs_diff_eq(Mat4::IDENTITY, 1.0e-6));
    }

    #[test]
    fn missing_inverse_bind_matrices_default_to_identity() {
        let skin = Skin::new(None, vec![0, 1], vec![]);
        let world = [Mat4::from_translation(Vec3::X), Mat4::IDENTITY];
        assert_eq!(joint_matrices(&world, &skin), world.to_vec());
    }

    #[test]
    fn weights_are_normalized() {
        let primitive = triangle().with_skin_attributes(
            vec![[0, 1, 0, 0]; 3],
            vec![[2.0, 2.0, 0.0, 0.0]; 3],
        );
        let joints = [
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        ];

        let (mut positions, mut normals) = (vec![], vec![]);
        skin_primitive(&primitive, &joints, Mat4::IDENTITY, &mut positions, &mut normals);

        assert!((positions[0] - Vec3::new(1.0, 1.0, 0.0)).length() < 1.0e-5);
        assert!((positions[1] - Vec3::new(2.0, 1.0, 0.0)).length() < 1.0e-5);
    }

    #[test]
    fn unskinned_vertices_use_the_node_matrix() {
        let node = Mat4::from_scale_rotation_translation(
            Vec3::splat(10.0),
            Quat::IDENTITY,
            Vec3::new(0.0, -6.0, 0.0),
        );
        let (mut positions, mut normals) = (vec![], vec![]);
        skin_primitive(&triangle(), &[], node, &mut positions, &mut normals);

        assert!((positions[2] - Vec3::new(0.0, 4.0, 0.0)).length() < 1.0e-5);
        for n in &normals {
            assert!((*n - Vec3::Z).length() < 1.0e-5);
        }
    }

    #[test]
    fn zero_weights_fall_back_to_the_node_matrix() {
        let primitive =
            triangle().with_skin_attributes(vec![[0; 4]; 3], vec![[0.0; 4]; 3]);
        let joints = [Mat4::from_translation(Vec3::splat(100.0))];
        let fallback = Mat4::from_translation(Vec3::Z);

        let (mut positions, mut normals) = (vec![], vec![]);
        skin_primitive(&primitive, &joints, fallback, &mut positions, &mut normals);
        assert!((positions[0] - Vec3::Z).length() < 1.0e-6);
    }

    #[test]
    fn rotated_normals_stay_unit() {
        let primitive =
            triangle().with_skin_attributes(vec![[0; 4]; 3], vec![[1.0, 0.0, 0.0, 0.0]; 3]);
        let joints = [Mat4::from_scale_rotation_translation(
            Vec3::splat(3.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::ZERO,
        )];

        let (mut positions, mut normals) = (vec![], vec![]);
        skin_primitive(&primitive, &joints, Mat4::IDENTITY, &mut positions, &mut normals);
        for n in &normals {
            assert!((n.length() - 1.0).abs() < 1.0e-5);
            assert!((*n - Vec3::NEG_Y).length() < 1.0e-5);
        }
    }
}

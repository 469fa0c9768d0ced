use glamx::{Mat4, Vec3};

use crate::animation::AnimationClip;
use crate::scene::{ImageData, Material, Mesh, Node, NodeIndex, Skin, Transform};

/// An imported asset: node hierarchy, geometry, materials and animations.
///
/// The whole hierarchy is placed in the world by an extra root transform
/// (see [`Model::set_scale`] and [`Model::set_position`]).
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub nodes: Vec<Node>,
    /// Parentless nodes of the displayed scene.
    pub roots: Vec<NodeIndex>,
    pub meshes: Vec<Mesh>,
    pub skins: Vec<Skin>,
    pub materials: Vec<Material>,
    pub images: Vec<ImageData>,
    pub clips: Vec<AnimationClip>,
    pub(crate) placement: Transform,
}

impl Model {
    /// Scale applied on top of the whole hierarchy.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.placement.scale = scale;
    }

    /// Translation applied on top of the whole hierarchy.
    pub fn set_position(&mut self, position: Vec3) {
        self.placement.translation = position;
    }

    /// The transform placing the hierarchy in the world.
    #[inline]
    pub fn placement(&self) -> &Transform {
        &self.placement
    }

    /// Puts every node back to its rest transform.
    pub fn reset_pose(&mut self) {
        for node in &mut self.nodes {
            node.pose = node.rest;
        }
    }

    /// The world matrix of every node, from the current poses.
    ///
    /// Nodes unreachable from [`Model::roots`] keep the identity.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::IDENTITY; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let placement = self.placement.to_mat4();
        let mut stack: Vec<(NodeIndex, Mat4)> =
            self.roots.iter().rev().map(|&r| (r, placement)).collect();

        while let Some((id, parent)) = stack.pop() {
            if id >= self.nodes.len() || visited[id] {
                continue;
            }
            visited[id] = true;

            let node = &self.nodes[id];
            let matrix = parent * node.pose.to_mat4();
            world[id] = matrix;
            stack.extend(node.children.iter().rev().map(|&c| (c, matrix)));
        }

        world
    }

    /// Looks a clip up by exact name.
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    /// Nodes that reference a mesh, with their mesh index.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (NodeIndex, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.mesh.map(|m| (i, m)))
    }

    /// Whether at least one primitive has a triangle to draw.
    pub fn is_renderable(&self) -> bool {
        self.mesh_nodes().any(|(_, m)| {
            self.meshes
                .get(m)
                .is_some_and(|mesh| mesh.primitives.iter().any(|p| p.triangle_count() > 0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glamx::Quat;

    /// root -> child, child offset by 1 along x.
    fn two_nodes() -> Model {
        let mut root = Node::new(Some("root".into()), Transform::IDENTITY);
        let mut child = Node::new(
            Some("child".into()),
            Transform::from_translation(Vec3::X),
        );
        root.children.push(1);
        child.parent = Some(0);

        Model {
            nodes: vec![root, child],
            roots: vec![0],
            ..Default::default()
        }
    }

    #[test]
    fn world_matrices_compose_parents_first() {
        let mut model = two_nodes();
        model.nodes[0].pose.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);

        let world = model.world_matrices();
        let p = world[1].transform_point3(Vec3::ZERO);
        assert!((p - Vec3::Y).length() < 1.0e-5);
    }

    #[test]
    fn placement_wraps_the_hierarchy() {
        let mut model = two_nodes();
        model.set_scale(Vec3::splat(10.0));
        model.set_position(Vec3::new(0.0, -6.0, 0.0));

        let p = model.world_matrices()[1].transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(10.0, -6.0, 0.0)).length() < 1.0e-4);
    }

    #[test]
    fn reset_pose_restores_rest() {
        let mut model = two_nodes();
        model.nodes[1].pose.translation = Vec3::new(5.0, 5.0, 5.0);
        model.reset_pose();
        assert_eq!(model.nodes[1].pose, model.nodes[1].rest);
    }

    #[test]
    fn cycles_do_not_hang() {
        let mut model = two_nodes();
        model.nodes[1].children.push(0);
        assert_eq!(model.world_matrices().len(), 2);
    }

    #[test]
    fn model_without_meshes_is_not_renderable() {
        assert!(!two_nodes().is_renderable());
    }
}

use crate::scene::Transform;

/// Index of a node inside [`Model::nodes`](crate::scene::Model::nodes).
pub type NodeIndex = usize;

/// A node of the imported hierarchy.
///
/// `rest` is the transform stored in the asset; `pose` is what animation
/// writes every frame and what the renderer reads.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub rest: Transform,
    pub pose: Transform,
    /// Index into [`Model::meshes`](crate::scene::Model::meshes).
    pub mesh: Option<usize>,
    /// Index into [`Model::skins`](crate::scene::Model::skins).
    pub skin: Option<usize>,
}

impl Node {
    /// A node at rest with the given local transform and no attachments.
    pub fn new(name: Option<String>, rest: Transform) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            rest,
            pose: rest,
            mesh: None,
            skin: None,
        }
    }
}

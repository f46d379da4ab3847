//! # Scene Graph
//!
//! An arena-backed tree of transformable nodes. Nodes are only ever created as
//! children of an existing node, so the graph cannot contain cycles, and each
//! node has exactly one parent (except the root).

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};

use super::{light::Light, mesh::MeshInstance};

/// Handle to a node inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Local translation, Euler rotation (applied X, then Y, then Z) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Radians about each axis.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: impl Into<Vector3<f32>>) -> Self {
        Self {
            translation: translation.into(),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: impl Into<Vector3<f32>>) -> Self {
        self.rotation = rotation.into();
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Vector3<f32>>) -> Self {
        self.scale = scale.into();
        self
    }

    /// `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// What a node contributes to the rendered frame.
pub enum NodeKind {
    Group,
    Mesh(MeshInstance),
    Light(Light),
    /// Marks where the viewer is; its transform follows the orbit camera.
    Camera,
}

pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates a graph holding only an empty root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "scene".to_string(),
                transform: Transform::default(),
                kind: NodeKind::Group,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node under `parent` and returns its handle.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            transform,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        self.add_child(parent, name, transform, NodeKind::Group)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node with the given name, in creation order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.name == name).map(NodeId)
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vector3<f32>) {
        self.nodes[id.0].transform.translation = translation;
    }

    /// Composes local transforms from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Visits every node depth-first from the root, passing its world matrix.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &Node, &Matrix4<f32>),
    {
        let mut stack = vec![(NodeId::ROOT, Matrix4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.transform.matrix();
            visit(id, node, &world);
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    /// Every node with its handle, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use cgmath::{InnerSpace, Vector4, Zero};

    use super::*;

    fn transform_point(matrix: Matrix4<f32>, point: [f32; 3]) -> Vector3<f32> {
        let p = matrix * Vector4::new(point[0], point[1], point[2], 1.0);
        Vector3::new(p.x, p.y, p.z)
    }

    fn assert_close(actual: Vector3<f32>, expected: [f32; 3]) {
        assert!(
            (actual - Vector3::from(expected)).magnitude2() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_children_are_recorded_in_order() {
        let mut graph = SceneGraph::new();
        let house = graph.add_group(NodeId::ROOT, "house", Transform::default());
        let graves = graph.add_group(NodeId::ROOT, "graves", Transform::default());

        assert_eq!(graph.node(NodeId::ROOT).children(), &[house, graves]);
        assert_eq!(graph.node(house).parent(), Some(NodeId::ROOT));
        assert_eq!(graph.child_count(house), 0);
        assert_eq!(graph.find("graves"), Some(graves));
        assert_eq!(graph.find("ghost"), None);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_group(
            NodeId::ROOT,
            "parent",
            Transform::from_translation([0.0, 0.0, -1.0])
                .with_rotation([0.0, FRAC_PI_2, 0.0])
                .with_scale([0.5, 0.5, 0.5]),
        );
        let child = graph.add_group(parent, "child", Transform::from_translation([2.0, 0.0, 0.0]));

        // (2,0,0) scaled to (1,0,0), turned a quarter about Y to (0,0,-1), then shifted
        assert_close(transform_point(graph.world_matrix(child), [0.0; 3]), [0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_traverse_visits_depth_first_with_world_matrices() {
        let mut graph = SceneGraph::new();
        let a = graph.add_group(NodeId::ROOT, "a", Transform::from_translation([1.0, 0.0, 0.0]));
        let b = graph.add_group(a, "b", Transform::from_translation([0.0, 1.0, 0.0]));
        let c = graph.add_group(NodeId::ROOT, "c", Transform::default());

        let mut visited = Vec::new();
        graph.traverse(|id, _, world| visited.push((id, transform_point(*world, [0.0; 3]))));

        let order: Vec<NodeId> = visited.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![NodeId::ROOT, a, b, c]);
        assert_close(visited[2].1, [1.0, 1.0, 0.0]);
        assert_eq!(visited[3].1, Vector3::zero());
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let transform = Transform::default().with_rotation([FRAC_PI_2, 0.0, FRAC_PI_2]);
        // Rz first takes +x to +y, then Rx takes +y to +z
        assert_close(transform_point(transform.matrix(), [1.0, 0.0, 0.0]), [0.0, 0.0, 1.0]);
    }
}

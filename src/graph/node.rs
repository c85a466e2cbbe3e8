use crate::graph::op::{IoKind, NodeOp};

/// A unique identifier for a node within a `Graph`.
///
/// Ids are assigned monotonically in creation order, starting at 0, and are
/// permanent: nodes are never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The data associated with a single node in the computation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData<T> {
    /// The operation recorded by this node.
    pub op: NodeOp,
    /// Whether the node is a program input, output, or intermediate.
    pub io: IoKind,
    /// The numeric result recorded for this node.
    pub value: T,
    /// The `NodeId`s of the nodes this operation consumes, in operand order.
    pub deps: Vec<NodeId>,
    /// Optional diagnostic label; no semantic effect.
    pub name: Option<String>,
}

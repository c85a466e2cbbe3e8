use std::cell::{Ref, RefCell};
use std::fmt;

use log::trace;

use crate::graph::node::{NodeData, NodeId};
use crate::graph::op::{IoKind, NodeOp};
use crate::passive::Passive;

/// Owns all the nodes of a computation graph.
///
/// The `Graph` uses interior mutability (`RefCell`) so that nodes can be
/// appended through a shared reference: many recording values hold an `Rc`
/// handle to the same graph and append to it as a side effect of arithmetic.
///
/// The graph is append-only for its whole lifetime. Nodes are never removed
/// and never reordered, so a [`NodeId`] is a permanent handle. Dependency
/// edges always point at nodes that already existed when the referencing
/// node was appended, which makes the node list a topologically sorted DAG
/// by construction.
///
/// No thread safety is claimed; the graph is a single-writer structure.
#[derive(Debug)]
pub struct Graph<T> {
    nodes: RefCell<Vec<NodeData<T>>>,
}

impl<T: Passive> Graph<T> {
    /// Creates a new, empty computation graph.
    pub fn new() -> Self {
        Graph {
            nodes: RefCell::new(Vec::new()),
        }
    }

    /// Appends a new node and returns its id.
    ///
    /// This is the sole growth point of the graph; every recorded operation
    /// funnels through it.
    ///
    /// # Panics
    ///
    /// Panics if any id in `deps` does not refer to an existing node, or if
    /// the number of dependencies does not match the kind. Both indicate a
    /// broken graph invariant in the calling code, not bad user input.
    pub fn add_node(&self, op: NodeOp, value: T, deps: &[NodeId]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        assert!(
            op.arity_ok(deps.len()),
            "a {op} node cannot take {} dependencies",
            deps.len()
        );
        for dep in deps {
            assert!(
                dep.0 < nodes.len(),
                "dependency node_{} does not exist (graph has {} nodes)",
                dep.0,
                nodes.len()
            );
        }
        let id = NodeId(nodes.len());
        trace!("append node_{} ({op}, {value}) deps: {deps:?}", id.0);
        nodes.push(NodeData {
            op,
            io: IoKind::Intermediate,
            value,
            deps: deps.to_vec(),
            name: None,
        });
        id
    }

    /// Marks an existing node as a program input.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the graph.
    pub fn mark_input(&self, id: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        assert!(
            id.0 < nodes.len(),
            "cannot mark node_{} as input (graph has {} nodes)",
            id.0,
            nodes.len()
        );
        nodes[id.0].io = IoKind::Input;
    }

    /// Marks an existing node as a program output.
    ///
    /// This is a pure annotation; the node may still be consumed by later
    /// operations.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the graph.
    pub fn mark_output(&self, id: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        assert!(
            id.0 < nodes.len(),
            "cannot mark node_{} as output (graph has {} nodes)",
            id.0,
            nodes.len()
        );
        nodes[id.0].io = IoKind::Output;
    }

    /// Attaches a diagnostic label to an existing node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the graph.
    pub fn set_name(&self, id: NodeId, name: impl Into<String>) {
        let mut nodes = self.nodes.borrow_mut();
        assert!(
            id.0 < nodes.len(),
            "cannot name node_{} (graph has {} nodes)",
            id.0,
            nodes.len()
        );
        nodes[id.0].name = Some(name.into());
    }

    /// Returns the number of nodes with the given kind.
    pub fn count_op(&self, op: NodeOp) -> usize {
        self.nodes.borrow().iter().filter(|n| n.op == op).count()
    }

    /// Returns the number of nodes whose kind is any of `ops`.
    pub fn count_ops(&self, ops: &[NodeOp]) -> usize {
        ops.iter().map(|op| self.count_op(*op)).sum()
    }

    /// Returns the total number of true operation nodes, ignoring the
    /// structural kinds `Literal` and `Var`.
    pub fn op_count(&self) -> usize {
        self.nodes.borrow().iter().filter(|n| n.op.is_op()).count()
    }

    /// Returns a read-only view of all nodes, in creation order.
    ///
    /// The returned guard borrows the graph; drop it before recording
    /// further operations.
    pub fn nodes(&self) -> Ref<'_, [NodeData<T>]> {
        Ref::map(self.nodes.borrow(), |nodes| nodes.as_slice())
    }

    /// Returns a read-only view of a single node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the graph.
    pub fn node(&self, id: NodeId) -> Ref<'_, NodeData<T>> {
        let nodes = self.nodes.borrow();
        assert!(
            id.0 < nodes.len(),
            "node_{} is not in the graph (graph has {} nodes)",
            id.0,
            nodes.len()
        );
        Ref::map(nodes, |nodes| &nodes[id.0])
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }
}

impl<T: Passive> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostic dump: one node per line, in creation order.
impl<T: Passive> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, node) in self.nodes.borrow().iter().enumerate() {
            write!(f, "node_{id} ({}, {})", node.op, node.value)?;
            if node.io != IoKind::Intermediate {
                write!(f, " {}", node.io)?;
            }
            if let Some(name) = &node.name {
                write!(f, " \"{name}\"")?;
            }
            if !node.deps.is_empty() {
                write!(f, " <-")?;
                for dep in &node.deps {
                    write!(f, " node_{}", dep.0)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//! Computation graph storage: the node kind taxonomy, node data, and the
//! append-only [`Graph`] that owns them.

pub mod graph;
pub mod node;
pub mod op;

pub use graph::Graph;
pub use node::{NodeData, NodeId};
pub use op::{IoKind, NodeOp};

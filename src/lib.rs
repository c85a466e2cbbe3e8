//! Tracegraph: arithmetic-tracing scalar values.
//!
//! `tracegraph` provides [`Record`], a numeric wrapper that behaves like the
//! scalar it wraps while appending every operation it participates in to a
//! shared, append-only computation [`Graph`]. The finished graph can be
//! queried (operation counts by kind), rendered to Graphviz DOT, or
//! translated into a standalone, re-executable Python script.
//!
//! # Architecture
//!
//! - **graph**: the node kind taxonomy and the append-only graph storage
//! - **record**: the recording value type and its operators
//! - **passive**: traits describing the underlying scalar types
//! - **export**: read-only consumers (DOT, Python)
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use tracegraph::prelude::*;
//!
//! let graph = Rc::new(Graph::new());
//! let mut x = Record::new(1.0);
//! let mut y = Record::new(2.0);
//! register_inputs([&mut x, &mut y], &graph);
//!
//! let z = &x * &y + &x;
//! z.mark_output();
//!
//! assert_eq!(*z.value(), 3.0);
//! assert_eq!(graph.count_op(NodeOp::Mul), 1);
//! assert_eq!(graph.count_op(NodeOp::Add), 1);
//! assert!(graph.to_dot().starts_with("digraph {"));
//! ```

// ============================================================================
// Core Modules
// ============================================================================

pub mod export;
pub mod graph;
pub mod passive;
pub mod record;

// ============================================================================
// Re-exports
// ============================================================================

pub use export::{DotOptions, ExportError, ToDot};
pub use graph::{Graph, IoKind, NodeData, NodeId, NodeOp};
pub use record::Record;

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module with commonly used types and traits.
pub mod prelude {
    pub use crate::export::{python_source, save_python, DotOptions, ToDot};
    pub use crate::graph::{Graph, IoKind, NodeId, NodeOp};
    pub use crate::passive::{FloatPassive, Passive, SignedPassive};
    pub use crate::record::{mark_outputs, register_all, register_inputs, Record};
}

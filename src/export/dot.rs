//! Graphviz DOT rendering of a computation graph.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;

use crate::export::ExportError;
use crate::graph::{Graph, NodeData, NodeOp};
use crate::passive::Passive;

/// Toggles controlling the DOT rendering.
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Every literal gets its own node. With `false`, literals with the
    /// same rendered value are merged into one node.
    pub unique_literals: bool,
    /// Label literal nodes with just their value.
    pub number_only_literals: bool,
    /// Include the node id in every label.
    pub print_node_id: bool,
    /// Show `+` and `*` instead of `ADD` and `MUL`.
    pub use_op_symbols: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            unique_literals: true,
            number_only_literals: false,
            print_node_id: false,
            use_op_symbols: false,
        }
    }
}

/// Types that can be rendered as a Graphviz DOT graph.
pub trait ToDot {
    /// Returns the DOT representation as a string.
    fn to_dot(&self) -> String;
}

impl<T: Passive> ToDot for Graph<T> {
    fn to_dot(&self) -> String {
        self.to_dot_with(&DotOptions::default())
    }
}

impl<T: Passive> Graph<T> {
    /// Renders the graph in Graphviz DOT format: one node statement per
    /// node and one edge statement per dependency.
    pub fn to_dot_with(&self, options: &DotOptions) -> String {
        let nodes = self.nodes();

        // With merged literals, every duplicate literal maps to the first
        // node with the same rendered value.
        let mut alias: Vec<usize> = (0..nodes.len()).collect();
        if !options.unique_literals {
            let mut representatives: HashMap<String, usize> = HashMap::new();
            for (id, node) in nodes.iter().enumerate() {
                if node.op == NodeOp::Literal {
                    alias[id] = *representatives.entry(node.value.to_string()).or_insert(id);
                }
            }
        }

        let mut dot = String::from("digraph {\n");
        for (id, node) in nodes.iter().enumerate() {
            if alias[id] != id {
                continue;
            }
            let label = node_label(id, node, options);
            let _ = writeln!(dot, "  node_{id} [label=\"{label}\"];");
        }
        for (id, node) in nodes.iter().enumerate() {
            for dep in &node.deps {
                let _ = writeln!(dot, "  node_{} -> node_{id};", alias[dep.0]);
            }
        }
        dot.push_str("}\n");

        debug!("--- rendered DOT ---\n{dot}--------------------");
        dot
    }

    /// Writes the DOT rendering to `path`.
    pub fn save_dot(
        &self,
        path: impl AsRef<Path>,
        options: &DotOptions,
    ) -> Result<(), ExportError> {
        let path = path.as_ref();
        fs::write(path, self.to_dot_with(options)).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn node_label<T: Passive>(id: usize, node: &NodeData<T>, options: &DotOptions) -> String {
    if node.op == NodeOp::Literal && options.number_only_literals {
        return node.value.to_string();
    }

    let op = if options.use_op_symbols {
        match node.op {
            NodeOp::Add => "+".to_string(),
            NodeOp::Mul => "*".to_string(),
            _ => node.op.to_string(),
        }
    } else {
        node.op.to_string()
    };

    let mut label = String::new();
    if let Some(name) = &node.name {
        let _ = write!(label, "{name} ");
    } else if options.print_node_id {
        let _ = write!(label, "node_{id} ");
    }
    let _ = write!(label, "({op}, {})", node.value);
    label
}

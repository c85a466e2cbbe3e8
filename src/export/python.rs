//! Re-executable Python rendering of a computation graph.
//!
//! The generated module defines one function `f(<inputs>)` whose body is a
//! flattened sequence of assignments, one per non-input node in creation
//! order, and a `main()` that calls `f` with the recorded input values and
//! prints the result next to the recorded output values for verification.
//! The rendering is a direct transliteration of the node list: no
//! optimization, no dead-code elimination.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;

use crate::export::ExportError;
use crate::graph::{Graph, IoKind, NodeData, NodeOp};
use crate::passive::Passive;

const INDENT: &str = "    ";

/// Renders the graph as a standalone Python module.
pub fn python_source<T: Passive>(graph: &Graph<T>) -> String {
    let nodes = graph.nodes();

    let inputs: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.io == IoKind::Input)
        .map(|(id, _)| id)
        .collect();
    let outputs = output_ids(&nodes);

    let mut src = String::from("import math\n\n\n");

    let params: Vec<String> = inputs.iter().map(|id| format!("v{id}")).collect();
    let _ = writeln!(src, "def f({}):", params.join(", "));
    for (id, node) in nodes.iter().enumerate() {
        if node.io == IoKind::Input {
            continue;
        }
        let _ = writeln!(src, "{INDENT}v{id} = {}", expression(node));
    }
    let returns: Vec<String> = outputs.iter().map(|id| format!("v{id}")).collect();
    let _ = writeln!(src, "\n{INDENT}return {}", tuple(&returns));

    let args: Vec<String> = inputs.iter().map(|&id| nodes[id].value.to_string()).collect();
    let recorded: Vec<String> = outputs
        .iter()
        .map(|&id| nodes[id].value.to_string())
        .collect();
    src.push_str("\n\ndef main():\n");
    let _ = writeln!(src, "{INDENT}computed = f({})", args.join(", "));
    let _ = writeln!(src, "{INDENT}recorded = {}", tuple(&recorded));
    let _ = writeln!(src, "{INDENT}print(f\"{{computed = }}\")");
    let _ = writeln!(src, "{INDENT}print(f\"{{recorded = }}\")");
    src.push_str("\n\nif __name__ == \"__main__\":\n");
    let _ = writeln!(src, "{INDENT}main()");

    debug!("--- rendered Python ---\n{src}-----------------------");
    src
}

/// Writes the Python rendering to `path`.
pub fn save_python<T: Passive>(graph: &Graph<T>, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    fs::write(path, python_source(graph)).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The nodes returned by `f`: those explicitly marked as outputs, or, when
/// none are marked, the nodes never consumed as a dependency.
fn output_ids<T>(nodes: &[NodeData<T>]) -> Vec<usize> {
    let marked: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.io == IoKind::Output)
        .map(|(id, _)| id)
        .collect();
    if !marked.is_empty() {
        return marked;
    }

    let mut consumed = vec![false; nodes.len()];
    for node in nodes {
        for dep in &node.deps {
            consumed[dep.0] = true;
        }
    }
    nodes
        .iter()
        .enumerate()
        .filter(|(id, node)| !consumed[*id] && node.io != IoKind::Input)
        .map(|(id, _)| id)
        .collect()
}

/// Always a tuple, so `computed` and `recorded` compare structurally even
/// with a single output.
fn tuple(items: &[String]) -> String {
    if items.is_empty() {
        "()".to_string()
    } else {
        format!("({},)", items.join(", "))
    }
}

fn expression<T: Passive>(node: &NodeData<T>) -> String {
    let dep = |i: usize| format!("v{}", node.deps[i].0);
    match node.op {
        NodeOp::Literal => node.value.to_string(),
        // A source variable replays its recorded value; an alias forwards
        // its dependency.
        NodeOp::Var if node.deps.is_empty() => node.value.to_string(),
        NodeOp::Var => dep(0),
        NodeOp::Add => format!("{} + {}", dep(0), dep(1)),
        NodeOp::Mul => format!("{} * {}", dep(0), dep(1)),
        NodeOp::Recip => format!("1 / {}", dep(0)),
        NodeOp::Neg => format!("-{}", dep(0)),
        NodeOp::Sqrt => format!("math.sqrt({})", dep(0)),
        NodeOp::Sin => format!("math.sin({})", dep(0)),
        NodeOp::Cos => format!("math.cos({})", dep(0)),
    }
}

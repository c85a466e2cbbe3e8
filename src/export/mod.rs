//! Read-only graph consumers: Graphviz DOT rendering and re-executable
//! Python rendering.
//!
//! Exporters consume only the graph's query surface ([`crate::Graph::nodes`])
//! and never mutate it. The core never performs I/O; only the `save_*`
//! helpers in this module touch the filesystem, and they report failures as
//! a recoverable [`ExportError`] instead of panicking.

use std::io;
use std::path::PathBuf;

pub mod dot;
pub mod python;

pub use dot::{DotOptions, ToDot};
pub use python::{python_source, save_python};

/// Errors that can occur while writing an exported graph to disk.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The output file could not be written.
    #[error("could not write `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

//! Volatile in-memory filesystem.
//!
//! Paths are resolved to normalized absolute form first, then walked
//! segment by segment from the root. Nodes are either directories holding
//! named children or files holding text.

mod path;
mod tree;

pub use path::{AbsolutePath, resolve};
pub use tree::{
    DEFAULT_DIRECTORIES, FilesystemNode, FilesystemTree, FsError, NotADirectorySnafu,
    NotFoundSnafu, validate_name,
};

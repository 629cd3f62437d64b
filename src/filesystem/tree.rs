use std::collections::BTreeMap;

use snafu::{OptionExt, Snafu, ensure};
use tracing::{debug, warn};

use super::AbsolutePath;

/// Directories created under `/` for a fresh session.
pub const DEFAULT_DIRECTORIES: [&str; 3] = ["home", "var", "tmp"];

/// A single entry of the in-memory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesystemNode {
    File {
        content: String,
    },
    Directory {
        children: BTreeMap<String, FilesystemNode>,
    },
}

impl FilesystemNode {
    pub fn empty_directory() -> Self {
        FilesystemNode::Directory {
            children: BTreeMap::new(),
        }
    }

    pub fn file(content: impl Into<String>) -> Self {
        FilesystemNode::File {
            content: content.into(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FilesystemNode::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FilesystemNode::File { .. })
    }

    /// Looks up a direct child. Files have no children.
    pub fn child(&self, name: &str) -> Option<&FilesystemNode> {
        match self {
            FilesystemNode::Directory { children } => children.get(name),
            FilesystemNode::File { .. } => None,
        }
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut FilesystemNode> {
        match self {
            FilesystemNode::Directory { children } => children.get_mut(name),
            FilesystemNode::File { .. } => None,
        }
    }
}

/// Rejects names that cannot be a single directory entry.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    ensure!(
        !name.is_empty() && !name.contains('/') && name != "." && name != "..",
        InvalidNameSnafu { name }
    );
    Ok(())
}

/// The whole volatile filesystem, rooted at a directory that always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemTree {
    root: FilesystemNode,
}

impl Default for FilesystemTree {
    fn default() -> Self {
        let children = DEFAULT_DIRECTORIES
            .iter()
            .map(|name| (name.to_string(), FilesystemNode::empty_directory()))
            .collect();
        FilesystemTree {
            root: FilesystemNode::Directory { children },
        }
    }
}

impl FilesystemTree {
    /// A tree holding nothing but the root directory.
    pub fn empty() -> Self {
        FilesystemTree {
            root: FilesystemNode::empty_directory(),
        }
    }

    pub fn root(&self) -> &FilesystemNode {
        &self.root
    }

    /// Walks from the root. Descending through a file yields `None`.
    pub fn node(&self, path: &AbsolutePath) -> Option<&FilesystemNode> {
        path.segments()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    fn node_mut(&mut self, path: &AbsolutePath) -> Option<&mut FilesystemNode> {
        path.segments()
            .try_fold(&mut self.root, |node, segment| node.child_mut(segment))
    }

    pub fn exists(&self, path: &AbsolutePath) -> bool {
        self.node(path).is_some()
    }

    pub fn is_directory(&self, path: &AbsolutePath) -> bool {
        self.node(path).is_some_and(FilesystemNode::is_directory)
    }

    /// The directory containing `path`. The root has no parent, and an
    /// unreachable parent is reported as `None` rather than papered over.
    pub fn parent(&self, path: &AbsolutePath) -> Option<&FilesystemNode> {
        let parent_path = path.parent()?;
        let parent = self.node(&parent_path).filter(|node| node.is_directory());
        if parent.is_none() {
            warn!("Parent directory {} of {} is unreachable", parent_path, path);
        }
        parent
    }

    /// Children of the directory at `path`, in name order.
    pub fn directory(
        &self,
        path: &AbsolutePath,
    ) -> Result<&BTreeMap<String, FilesystemNode>, FsError> {
        match self.node(path).context(NotFoundSnafu { path: path.clone() })? {
            FilesystemNode::Directory { children } => Ok(children),
            FilesystemNode::File { .. } => NotADirectorySnafu { path: path.clone() }.fail(),
        }
    }

    fn directory_mut(
        &mut self,
        path: &AbsolutePath,
    ) -> Result<&mut BTreeMap<String, FilesystemNode>, FsError> {
        match self
            .node_mut(path)
            .context(NotFoundSnafu { path: path.clone() })?
        {
            FilesystemNode::Directory { children } => Ok(children),
            FilesystemNode::File { .. } => NotADirectorySnafu { path: path.clone() }.fail(),
        }
    }

    /// Creates an empty directory `name` inside the directory `parent`.
    pub fn make_directory(&mut self, parent: &AbsolutePath, name: &str) -> Result<(), FsError> {
        validate_name(name)?;
        let children = self.directory_mut(parent)?;
        ensure!(!children.contains_key(name), AlreadyExistsSnafu { name });

        children.insert(name.to_string(), FilesystemNode::empty_directory());
        debug!("Created directory {}", parent.join(name));
        Ok(())
    }

    /// Creates an empty file `name` inside the directory `parent`.
    ///
    /// An existing entry of either kind is left alone. Returns whether a
    /// file was created.
    pub fn make_file(&mut self, parent: &AbsolutePath, name: &str) -> Result<bool, FsError> {
        validate_name(name)?;
        let children = self.directory_mut(parent)?;
        if let Some(existing) = children.get(name) {
            debug!(
                "Entry {} already exists (directory: {}), leaving it untouched",
                parent.join(name),
                existing.is_directory()
            );
            return Ok(false);
        }

        children.insert(name.to_string(), FilesystemNode::file(""));
        debug!("Created file {}", parent.join(name));
        Ok(true)
    }

    pub fn read_file(&self, path: &AbsolutePath) -> Result<&str, FsError> {
        match self.node(path).context(NotFoundSnafu { path: path.clone() })? {
            FilesystemNode::File { content } => Ok(content),
            FilesystemNode::Directory { .. } => IsDirectorySnafu { path: path.clone() }.fail(),
        }
    }

    /// Sets the content of the file at `path`, creating the file when its
    /// parent directory exists. Intermediate directories are never created.
    pub fn write_file(&mut self, path: &AbsolutePath, content: &str) -> Result<(), FsError> {
        let parent = path.parent().context(IsDirectorySnafu { path: path.clone() })?;
        let name = path
            .segments()
            .last()
            .context(IsDirectorySnafu { path: path.clone() })?
            .to_string();
        validate_name(&name)?;

        let children = self.directory_mut(&parent)?;
        match children.get_mut(&name) {
            Some(FilesystemNode::File { content: existing }) => {
                *existing = content.to_string();
            }
            Some(FilesystemNode::Directory { .. }) => {
                return IsDirectorySnafu { path: path.clone() }.fail();
            }
            None => {
                children.insert(name, FilesystemNode::file(content));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum FsError {
    #[snafu(display("Invalid entry name '{name}'"))]
    InvalidName { name: String },
    #[snafu(display("An entry named '{name}' already exists"))]
    AlreadyExists { name: String },
    #[snafu(display("{path}: no such file or directory"))]
    NotFound { path: AbsolutePath },
    #[snafu(display("{path}: not a directory"))]
    NotADirectory { path: AbsolutePath },
    #[snafu(display("{path}: is a directory"))]
    IsDirectory { path: AbsolutePath },
}

use std::collections::BTreeMap;

use snafu::ensure;
use tracing::debug;

use crate::filesystem::{
    AbsolutePath, FilesystemNode, FilesystemTree, FsError, NotADirectorySnafu, NotFoundSnafu,
};

/// One shell session: a filesystem tree and the working directory cursor.
///
/// Path arguments are resolved against the cursor before they reach the
/// tree. Only [`Session::change_directory`] moves the cursor.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tree: FilesystemTree,
    cwd: AbsolutePath,
}

impl Session {
    pub fn new(tree: FilesystemTree) -> Self {
        Session {
            tree,
            cwd: AbsolutePath::root(),
        }
    }

    pub fn cwd(&self) -> &AbsolutePath {
        &self.cwd
    }

    pub fn tree(&self) -> &FilesystemTree {
        &self.tree
    }

    pub fn resolve(&self, path: Option<&str>) -> AbsolutePath {
        self.cwd.resolve(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.tree.exists(&self.resolve(Some(path)))
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.tree.is_directory(&self.resolve(Some(path)))
    }

    pub fn node(&self, path: &str) -> Option<&FilesystemNode> {
        self.tree.node(&self.resolve(Some(path)))
    }

    pub fn parent(&self, path: &str) -> Option<&FilesystemNode> {
        self.tree.parent(&self.resolve(Some(path)))
    }

    /// Moves the cursor. No path, or any path resolving to the root,
    /// goes to `/`.
    pub fn change_directory(&mut self, path: Option<&str>) -> Result<(), FsError> {
        let Some(path) = path else {
            self.cwd = AbsolutePath::root();
            return Ok(());
        };

        let resolved = self.resolve(Some(path));
        if !resolved.is_root() {
            ensure!(
                self.tree.exists(&resolved),
                NotFoundSnafu {
                    path: resolved.clone()
                }
            );
            ensure!(
                self.tree.is_directory(&resolved),
                NotADirectorySnafu {
                    path: resolved.clone()
                }
            );
        }

        debug!("Changing directory from {} to {}", self.cwd, resolved);
        self.cwd = resolved;
        Ok(())
    }

    pub fn current_directory(&self) -> Result<&BTreeMap<String, FilesystemNode>, FsError> {
        self.tree.directory(&self.cwd)
    }

    pub fn make_directory(&mut self, name: &str) -> Result<(), FsError> {
        self.tree.make_directory(&self.cwd, name)
    }

    pub fn make_file(&mut self, name: &str) -> Result<bool, FsError> {
        self.tree.make_file(&self.cwd, name)
    }

    pub fn read_file(&self, path: &str) -> Result<&str, FsError> {
        self.tree.read_file(&self.resolve(Some(path)))
    }
}

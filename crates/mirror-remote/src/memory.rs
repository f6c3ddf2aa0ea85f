//! In-process remote filesystem
//!
//! Behaves like the SFTP backend: uploads need an existing parent
//! directory, removing a missing file reports [`RemoveOutcome::NotFound`],
//! and directories are only created on request. State is shared between
//! the connector and every session it opens so callers can inspect the
//! result after a session has been dropped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use mirror_fs::NormalizedPath;

use crate::{
    Error, Result,
    provider::{Connector, RemoteEntry, RemoteFs, RemoveOutcome},
};

/// A mutating operation performed on a [`MemoryRemote`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    Mkdir(String),
    Upload(String),
    Remove(String),
}

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<NormalizedPath, Node>,
    ops: Vec<RemoteOp>,
    connects: usize,
    disconnects: usize,
}

impl State {
    fn entry(&self, path: &NormalizedPath) -> RemoteEntry {
        match self.nodes.get(path) {
            None => RemoteEntry::Missing,
            Some(Node::Dir) => RemoteEntry::Directory,
            Some(Node::File(_)) => RemoteEntry::Other,
        }
    }
}

/// Opens [`MemoryRemote`] sessions over one shared tree.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    working_dir: NormalizedPath,
    state: Rc<RefCell<State>>,
}

impl MemoryConnector {
    /// Create an empty remote whose working directory (and its ancestors)
    /// already exist.
    pub fn new(working_dir: impl Into<NormalizedPath>) -> Self {
        let working_dir = working_dir.into();
        let mut state = State::default();
        for dir in working_dir.ancestors_inclusive() {
            state.nodes.insert(dir, Node::Dir);
        }
        state.nodes.insert(NormalizedPath::new("/"), Node::Dir);
        Self {
            working_dir,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Seed a file without recording an operation. Parents are created.
    pub fn put_file(&self, path: &str, content: &[u8]) {
        let path = NormalizedPath::new(path);
        let mut state = self.state.borrow_mut();
        if let Some(parent) = path.parent() {
            for dir in parent.ancestors_inclusive() {
                state.nodes.entry(dir).or_insert(Node::Dir);
            }
        }
        state.nodes.insert(path, Node::File(content.to_vec()));
    }

    /// Seed a directory without recording an operation.
    pub fn put_dir(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        for dir in NormalizedPath::new(path).ancestors_inclusive() {
            state.nodes.entry(dir).or_insert(Node::Dir);
        }
    }

    /// Contents of the file at `path`, if it is a file.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.state.borrow().nodes.get(&NormalizedPath::new(path)) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(
            self.state.borrow().nodes.get(&NormalizedPath::new(path)),
            Some(Node::Dir)
        )
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state
            .borrow()
            .nodes
            .contains_key(&NormalizedPath::new(path))
    }

    /// Every mutating operation so far, in order.
    pub fn ops(&self) -> Vec<RemoteOp> {
        self.state.borrow().ops.clone()
    }

    /// Number of sessions opened.
    pub fn connects(&self) -> usize {
        self.state.borrow().connects
    }

    /// Number of sessions released.
    pub fn disconnects(&self) -> usize {
        self.state.borrow().disconnects
    }
}

impl Connector for MemoryConnector {
    type Remote = MemoryRemote;

    fn connect(&self) -> Result<MemoryRemote> {
        self.state.borrow_mut().connects += 1;
        Ok(MemoryRemote {
            working_dir: self.working_dir.clone(),
            state: Rc::clone(&self.state),
        })
    }
}

/// A session on a [`MemoryConnector`]'s tree.
#[derive(Debug)]
pub struct MemoryRemote {
    working_dir: NormalizedPath,
    state: Rc<RefCell<State>>,
}

impl RemoteFs for MemoryRemote {
    fn working_dir(&self) -> &NormalizedPath {
        &self.working_dir
    }

    fn stat(&mut self, path: &NormalizedPath) -> Result<RemoteEntry> {
        Ok(self.state.borrow().entry(path))
    }

    fn create_dir_all(&mut self, path: &NormalizedPath) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for ancestor in path.ancestors_inclusive() {
            match state.entry(&ancestor) {
                RemoteEntry::Directory => {}
                RemoteEntry::Other => {
                    return Err(Error::NotADirectory {
                        path: ancestor.to_string(),
                    });
                }
                RemoteEntry::Missing => {
                    state.ops.push(RemoteOp::Mkdir(ancestor.to_string()));
                    state.nodes.insert(ancestor, Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn upload(&mut self, local: &NormalizedPath, remote: &NormalizedPath) -> Result<u64> {
        let native = local.to_native();
        let content = std::fs::read(&native).map_err(|e| Error::io(&native, e))?;

        let mut state = self.state.borrow_mut();
        if let Some(parent) = remote.parent()
            && state.entry(&parent) != RemoteEntry::Directory
        {
            return Err(Error::MissingDirectory {
                path: parent.to_string(),
            });
        }
        if state.entry(remote) == RemoteEntry::Directory {
            return Err(Error::NotAFile {
                path: remote.to_string(),
            });
        }

        let bytes = content.len() as u64;
        state.ops.push(RemoteOp::Upload(remote.to_string()));
        state.nodes.insert(remote.clone(), Node::File(content));
        Ok(bytes)
    }

    fn remove_file(&mut self, path: &NormalizedPath) -> Result<RemoveOutcome> {
        let mut state = self.state.borrow_mut();
        match state.entry(path) {
            RemoteEntry::Missing => Ok(RemoveOutcome::NotFound),
            RemoteEntry::Directory => Err(Error::NotAFile {
                path: path.to_string(),
            }),
            RemoteEntry::Other => {
                state.nodes.remove(path);
                state.ops.push(RemoteOp::Remove(path.to_string()));
                Ok(RemoveOutcome::Removed)
            }
        }
    }
}

impl Drop for MemoryRemote {
    fn drop(&mut self) {
        self.state.borrow_mut().disconnects += 1;
    }
}

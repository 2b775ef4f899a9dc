use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Default)]
struct MockTree {
    entries: HashMap<PathBuf, FileType>,
    // Insertion order, so read_dir is deterministic like a real directory listing.
    order: Vec<PathBuf>,
}

impl MockTree {
    fn insert(&mut self, path: PathBuf, file_type: FileType) {
        if self.entries.insert(path.clone(), file_type).is_none() {
            self.order.push(path);
        }
    }

    fn ensure_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if !self.entries.contains_key(&current) {
                self.insert(current.clone(), FileType::Directory);
            }
        }
    }
}

/// In-memory file system for discovery tests
pub struct MockFileSystem {
    tree: RwLock<MockTree>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let fs = Self {
            tree: RwLock::new(MockTree::default()),
            root,
        };
        let root = fs.root.clone();
        fs.tree.write().unwrap().ensure_parents(&root);
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut tree = self.tree.write().unwrap();

        if let Some(parent) = path.parent() {
            tree.ensure_parents(parent);
        }
        tree.insert(path, FileType::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.tree.write().unwrap().ensure_parents(&path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.tree.read().unwrap().entries.get(&path) == Some(&FileType::Directory)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let tree = self.tree.read().unwrap();

        match tree.entries.get(&path) {
            None => return Err(anyhow!("Directory not found: {:?}", path)),
            Some(FileType::Directory) => {}
            Some(_) => return Err(anyhow!("Not a directory: {:?}", path)),
        }

        let entries = tree
            .order
            .iter()
            .filter(|candidate| candidate.parent() == Some(path.as_path()))
            .map(|candidate| DirEntry {
                path: candidate.clone(),
                name: candidate
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
                file_type: tree.entries[candidate],
            })
            .collect();

        Ok(entries)
    }
}

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(NonZeroUsize);

#[derive(Debug, Default)]
pub struct Source {
    files: Vec<SourceFile>,
}

#[derive(Debug)]
pub struct SourceFile {
    id: SourceId,
    path: PathBuf,
    text: String,
}

impl Source {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn load_from_string(&mut self, path: PathBuf, text: String) -> SourceId {
        let id = SourceId(NonZeroUsize::MIN.saturating_add(self.files.len()));
        self.files.push(SourceFile { id, path, text });

        id
    }

    pub fn load(&mut self, path: PathBuf) -> io::Result<SourceId> {
        let text = fs::read_to_string(&path)?;

        Ok(self.load_from_string(path, text))
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.files.get(usize::from(id.0) - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }
}

impl SourceFile {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ModelGenError, ModelGenResult};

/// Destination for generated files
pub trait OutputSink {
    /// Store `content` under `file_name`
    fn write(&mut self, file_name: &str, content: &str) -> ModelGenResult<()>;
}

/// Writes files into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    created: bool,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            created: false,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn ensure_directory(&mut self) -> std::io::Result<()> {
        if !self.created {
            fs::create_dir_all(&self.directory)?;
            self.created = true;
        }
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, file_name: &str, content: &str) -> ModelGenResult<()> {
        // File names come from validated identifiers; refuse anything that
        // could leave the output directory.
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(ModelGenError::write(file_name, "invalid file name"));
        }

        self.ensure_directory()
            .map_err(|e| ModelGenError::write(self.directory.display().to_string(), e.to_string()))?;

        let path = self.directory.join(file_name);
        fs::write(&path, content).map_err(|e| ModelGenError::write(file_name, e.to_string()))?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }
}

/// Keeps generated files in memory; rejects a second write to the same name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn into_files(self) -> BTreeMap<String, String> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, file_name: &str, content: &str) -> ModelGenResult<()> {
        if self.files.contains_key(file_name) {
            return Err(ModelGenError::write(file_name, "duplicate file name"));
        }
        self.files.insert(file_name.to_string(), content.to_string());
        Ok(())
    }
}

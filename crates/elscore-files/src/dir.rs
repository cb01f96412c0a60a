use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use elscore_core::{Linking, ParseOptions, ScoreError, ScoreResult, SystemSource};

/// Read and parse a linking file. The linking is named after the full path.
pub fn read_linking(path: &Path, options: ParseOptions) -> ScoreResult<Linking> {
    let bytes = std::fs::read(path).map_err(|source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| ScoreError::InvalidEncoding {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })?;
    Linking::parse(path.display().to_string(), &text, options)
}

/// A directory holding one system output per regular file.
pub struct SystemDir {
    dir: PathBuf,
    options: ParseOptions,
}

impl SystemDir {
    pub fn open(dir: &Path, options: ParseOptions) -> ScoreResult<Self> {
        let meta = std::fs::metadata(dir).map_err(|source| ScoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ScoreError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            options,
        })
    }

    /// Full path of the system output called `name`.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl SystemSource for SystemDir {
    /// Visible regular files only, in `read_dir` order (no sorting).
    fn system_names(&self) -> ScoreResult<Vec<String>> {
        let io_err = |source: std::io::Error| ScoreError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() {
                warn!(path = %path.display(), "skipping non-file entry in system output directory");
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                debug!(path = %path.display(), "skipping hidden file in system output directory");
                continue;
            }
            names.push(name);
        }

        debug!(dir = %self.dir.display(), count = names.len(), "listed system outputs");
        Ok(names)
    }

    fn load_system(&self, name: &str) -> ScoreResult<Linking> {
        let path = self.path_of(name);
        if !path.is_file() {
            return Err(ScoreError::UnknownSystem(name.to_string()));
        }
        Ok(read_linking(&path, self.options)?.with_name(name))
    }
}

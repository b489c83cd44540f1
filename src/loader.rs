//! Extension script loading
//!
//! Scripts passed with `--load` are handed to the documentation pipeline
//! before the source tree is parsed. Each script is loaded at most once per
//! resolved path; asking for it again reports that it was already loaded.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Extension appended when resolving a feature name
pub const SCRIPT_EXTENSION: &str = "rb";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot load such file -- {0}")]
    NotFound(String),

    #[error("failed to read script {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A script that has been loaded, with its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedScript {
    pub path: PathBuf,
    pub source: String,
}

/// Loads scripts by feature name
pub trait ScriptLoader {
    /// Loads `feature`, returning `Ok(false)` if it resolves to a script that
    /// was already loaded.
    fn require(&mut self, feature: &str) -> Result<bool, LoadError>;

    /// Scripts loaded so far, in load order
    fn loaded(&self) -> &[LoadedScript];
}

/// Loader that resolves features against a search path on disk
#[derive(Debug, Clone)]
pub struct FileLoader {
    load_path: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
    scripts: Vec<LoadedScript>,
}

impl FileLoader {
    pub fn new(load_path: Vec<PathBuf>) -> Self {
        Self {
            load_path,
            seen: HashSet::new(),
            scripts: Vec::new(),
        }
    }

    /// Finds the file a feature refers to, as a canonical path.
    ///
    /// Absolute features and features starting with `./` or `../` are taken
    /// relative to the working directory; anything else is searched for in
    /// the load path. `<feature>.rb` is tried before `<feature>` itself.
    pub fn resolve(&self, feature: &str) -> Result<PathBuf, LoadError> {
        let path = Path::new(feature);
        let explicit = path.is_absolute()
            || matches!(
                path.components().next(),
                Some(Component::CurDir | Component::ParentDir)
            );

        let bases: Vec<PathBuf> = if explicit {
            vec![path.to_path_buf()]
        } else {
            self.load_path.iter().map(|dir| dir.join(path)).collect()
        };

        bases
            .iter()
            .flat_map(|base| [with_script_extension(base), base.clone()])
            .find(|candidate| candidate.is_file())
            .and_then(|candidate| candidate.canonicalize().ok())
            .ok_or_else(|| LoadError::NotFound(feature.to_string()))
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(vec![PathBuf::from(".")])
    }
}

impl ScriptLoader for FileLoader {
    fn require(&mut self, feature: &str) -> Result<bool, LoadError> {
        let path = self.resolve(feature)?;
        if self.seen.contains(&path) {
            tracing::debug!("Script {} is already loaded", path.display());
            return Ok(false);
        }

        let source = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded script {}", path.display());

        self.seen.insert(path.clone());
        self.scripts.push(LoadedScript { path, source });
        Ok(true)
    }

    fn loaded(&self) -> &[LoadedScript] {
        &self.scripts
    }
}

fn with_script_extension(base: &Path) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(SCRIPT_EXTENSION);
    PathBuf::from(name)
}

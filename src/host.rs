//! The host side of the loader: where images live, whether a request is
//! valid, and when a cached result is stale. The directory is always passed
//! in explicitly; nothing here reads the process working directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::Feather;

/// File extensions offered for selection.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Directory the host picks images from, plus the feather ceiling it enforces.
#[derive(Debug, Clone)]
pub struct InputDirectory {
    root: PathBuf,    // searched non-recursively
    max_feather: u32, // upper bound checked by `validate`
}

impl InputDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), max_feather: crate::config::DEFAULT_MAX_FEATHER }
    }

    pub fn from_config(config: &Config) -> Self {
        Self { root: config.input_dir.clone(), max_feather: config.max_feather }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted names of the image files directly inside the directory.
    pub fn list_images(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if !path.is_file() {
                    return None;
                }
                let ext = path.extension()?.to_str()?.to_ascii_lowercase();
                if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                    return None;
                }
                Some(path.file_name()?.to_str()?.to_owned())
            })
            .collect();
        names.sort();
        log::debug!("Found {} image(s) in {}", names.len(), self.root.display());
        Ok(names)
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Checks run before the loader: the file exists and the feather is in range.
    pub fn validate(&self, name: &str, feather: Feather) -> Result<()> {
        if !self.resolve(name).is_file() {
            return Err(Error::InvalidImage(name.to_owned()));
        }
        if feather.0 > self.max_feather {
            return Err(Error::FeatherOutOfRange { value: feather.0, max: self.max_feather });
        }
        Ok(())
    }

    /// Cache key for one request. Changes whenever the file name, the file's
    /// modification time, the feather or the raw payload text changes.
    pub fn change_key(&self, name: &str, feather: Feather, payload: &str) -> Result<String> {
        let path = self.resolve(name);
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(&path, e))?;
        let mtime = epoch_seconds(modified);
        Ok(format!("{name}_{mtime}_{}_{payload}", feather.0))
    }
}

// Signed seconds relative to the Unix epoch; earlier times come out negative.
fn epoch_seconds(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

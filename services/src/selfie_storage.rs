//! Local-disk selfie storage.
//!
//! The pipeline treats the returned file name as an opaque reference; only
//! the serving endpoint resolves it back to a path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use util::config;

/// Content types accepted for selfie uploads.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

#[derive(Debug, Clone)]
pub struct SelfieStorage {
    root: PathBuf,
}

impl SelfieStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config() -> Self {
        Self::new(config::selfie_storage_root())
    }

    /// Writes the bytes and returns the stored file name.
    ///
    /// `key_hint` becomes the stem of the file name; a timestamp suffix keeps
    /// names unique across retried submissions.
    pub fn store(&self, bytes: &[u8], content_type: &str, key_hint: &str) -> io::Result<String> {
        fs::create_dir_all(&self.root)?;

        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let sanitized: String = key_hint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let filename = format!("{sanitized}_{stamp}.{}", extension_for(content_type));

        fs::write(self.root.join(&filename), bytes)?;
        Ok(filename)
    }

    /// Resolves a stored file name back to a path, refusing anything that
    /// could escape the storage root.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        let path = self.root.join(filename);
        path.is_file().then_some(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

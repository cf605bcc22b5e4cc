//! Durable storage for language documents.

use std::collections::HashMap;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Mutex,
    PoisonError,
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::document::LanguageDocument;

/// Placeholder replaced by the language identifier in file name patterns.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not well-formed XML: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    fn malformed(path: &Path, message: impl ToString) -> Self {
        Self::Malformed { path: path.to_path_buf(), message: message.to_string() }
    }
}

/// Storage operations the fallback writer and the lookup store rely on.
///
/// `save` writes the whole document; there are no partial updates.
pub trait DocumentStorage: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and its parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;

    fn load(&self, path: &Path) -> Result<LanguageDocument, StorageError>;

    fn save(&self, document: &LanguageDocument, path: &Path) -> Result<(), StorageError>;
}

/// Maps a language to its file: `{folder}/{pattern with language substituted}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    folder: PathBuf,
    file_name_pattern: String,
}

impl DocumentLayout {
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, file_name_pattern: impl Into<String>) -> Self {
        Self { folder: folder.into(), file_name_pattern: file_name_pattern.into() }
    }

    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use fallback_translator::storage::DocumentLayout;
    ///
    /// let layout = DocumentLayout::new("/site/lang", "{language}_website.xml");
    /// assert_eq!(layout.path_for("en"), Path::new("/site/lang/en_website.xml"));
    /// ```
    #[must_use]
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.folder.join(self.file_name_pattern.replace(LANGUAGE_PLACEHOLDER, language))
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

/// File system storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStorage;

impl FileStorage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Clears the read-only attribute so translator checkouts do not block saves.
    ///
    /// Only Windows refuses to replace a read-only file; elsewhere replacing
    /// depends on the folder and the file is left untouched.
    #[cfg(windows)]
    fn make_writable(path: &Path) -> Result<(), StorageError> {
        let Ok(metadata) = std::fs::metadata(path) else {
            return Ok(());
        };

        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            tracing::debug!(path = %path.display(), "Clearing read-only attribute");
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            std::fs::set_permissions(path, permissions).map_err(|e| StorageError::io(path, e))?;
        }
        Ok(())
    }

    /// Gives the replacement the mode of the file it replaces, or the usual
    /// `rw-r--r--` for a new file (temporary files start owner-only).
    #[cfg(unix)]
    fn copy_mode(path: &Path, temp: &NamedTempFile) -> Result<(), StorageError> {
        use std::os::unix::fs::PermissionsExt;

        let permissions = std::fs::metadata(path)
            .map_or_else(|_| std::fs::Permissions::from_mode(0o644), |m| m.permissions());
        temp.as_file().set_permissions(permissions).map_err(|e| StorageError::io(temp.path(), e))
    }
}

impl DocumentStorage for FileStorage {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        std::fs::create_dir_all(path).map_err(|e| StorageError::io(path, e))
    }

    fn load(&self, path: &Path) -> Result<LanguageDocument, StorageError> {
        let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        LanguageDocument::parse(&content).map_err(|e| StorageError::malformed(path, e))
    }

    /// Writes to a uniquely named temporary file next to `path` and renames it
    /// over `path`, so a concurrent reader sees either the old or the new
    /// document. The temporary file is removed if anything fails.
    fn save(&self, document: &LanguageDocument, path: &Path) -> Result<(), StorageError> {
        let xml = document.to_xml().map_err(|e| StorageError::malformed(path, e))?;

        let folder =
            path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let mut temp = NamedTempFile::new_in(folder).map_err(|e| StorageError::io(folder, e))?;
        temp.write_all(xml.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| StorageError::io(temp.path(), e))?;

        #[cfg(unix)]
        Self::copy_mode(path, &temp)?;
        #[cfg(windows)]
        Self::make_writable(path)?;

        temp.persist(path).map_err(|e| StorageError::io(path, e.error))?;
        Ok(())
    }
}

/// In-memory storage keyed by path.
///
/// Keeps serialized XML so every load goes through the same codec as files do.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Files and save counter.
    state: Mutex<MemoryState>,
}

/// Contents of a [`MemoryStorage`].
#[derive(Debug, Default)]
struct MemoryState {
    /// Path -> XML text.
    files: HashMap<PathBuf, String>,
    /// Created directories.
    directories: Vec<PathBuf>,
    /// Number of successful `save` calls.
    saves: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file with raw XML (it is not validated until loaded).
    pub fn insert(&self, path: impl Into<PathBuf>, xml: impl Into<String>) {
        self.state().files.insert(path.into(), xml.into());
    }

    /// Raw XML stored at `path`.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.state().files.get(path).cloned()
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    #[must_use]
    pub fn has_directory(&self, path: &Path) -> bool {
        self.state().directories.iter().any(|d| d == path)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStorage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.state().files.contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let mut state = self.state();
        if !state.directories.iter().any(|d| d == path) {
            state.directories.push(path.to_path_buf());
        }
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LanguageDocument, StorageError> {
        let xml = self.contents(path).ok_or_else(|| {
            StorageError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;
        LanguageDocument::parse(&xml).map_err(|e| StorageError::malformed(path, e))
    }

    fn save(&self, document: &LanguageDocument, path: &Path) -> Result<(), StorageError> {
        let xml = document.to_xml().map_err(|e| StorageError::malformed(path, e))?;
        let mut state = self.state();
        state.files.insert(path.to_path_buf(), xml);
        state.saves += 1;
        Ok(())
    }
}

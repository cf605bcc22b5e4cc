//! Read side: looking up stored translations.

use std::sync::Arc;

use crate::key::TranslationKey;
use crate::language::parent_language;
use crate::storage::{
    DocumentLayout,
    DocumentStorage,
    StorageError,
};

/// Source of existing translations.
pub trait TranslationStore: Send + Sync {
    /// Stored text for `key` under `language`; `Ok(None)` on a miss.
    fn lookup(&self, language: &str, key: &TranslationKey) -> Result<Option<String>, StorageError>;
}

/// Reads translations from language files.
///
/// Each lookup loads the file afresh; nothing is cached between calls and a
/// missing file is a miss, never created.
#[derive(Debug)]
pub struct XmlTranslationStore<S> {
    storage: Arc<S>,
    layout: DocumentLayout,
    /// Retry `sv-SE` misses under `sv`.
    parent_language_lookup: bool,
}

impl<S: DocumentStorage> XmlTranslationStore<S> {
    #[must_use]
    pub const fn new(
        storage: Arc<S>,
        layout: DocumentLayout,
        parent_language_lookup: bool,
    ) -> Self {
        Self { storage, layout, parent_language_lookup }
    }

    fn lookup_exact(
        &self,
        language: &str,
        key: &TranslationKey,
    ) -> Result<Option<String>, StorageError> {
        let path = self.layout.path_for(language);
        if !self.storage.exists(&path) {
            tracing::trace!(language, path = %path.display(), "No language file");
            return Ok(None);
        }

        let document = self.storage.load(&path)?;
        Ok(document.lookup(key).map(str::to_string))
    }
}

impl<S: DocumentStorage> TranslationStore for XmlTranslationStore<S> {
    fn lookup(&self, language: &str, key: &TranslationKey) -> Result<Option<String>, StorageError> {
        if let Some(text) = self.lookup_exact(language, key)? {
            return Ok(Some(text));
        }

        if self.parent_language_lookup
            && let Some(parent) = parent_language(language)
        {
            tracing::trace!(language, parent, key = %key, "Trying parent language");
            return self.lookup(parent, key);
        }

        Ok(None)
    }
}

//! Text resolution with reference-language fallback.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use crate::config::{
    ConfigError,
    TranslatorSettings,
};
use crate::error::TranslatorError;
use crate::fallback::FallbackWriter;
use crate::format::format_positional;
use crate::key::TranslationKey;
use crate::language::validate_language;
use crate::storage::{
    DocumentStorage,
    FileStorage,
};
use crate::store::{
    TranslationStore,
    XmlTranslationStore,
};

/// Supplies the language of the current request.
pub trait ActiveLanguage {
    fn current_language(&self) -> String;
}

/// An active language fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage(pub String);

impl FixedLanguage {
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self(language.into())
    }
}

impl ActiveLanguage for FixedLanguage {
    fn current_language(&self) -> String {
        self.0.clone()
    }
}

impl<F: Fn() -> String> ActiveLanguage for F {
    fn current_language(&self) -> String {
        self()
    }
}

/// Resolves display text by key.
pub trait Translator {
    /// Resolves `key` in the context's current language.
    ///
    /// # Errors
    /// See [`Translator::text_in`].
    fn text(
        &self,
        context: &dyn ActiveLanguage,
        key: &str,
        fallback: Option<&str>,
        args: &[&dyn Display],
    ) -> Result<String, TranslatorError> {
        self.text_in(&context.current_language(), key, fallback, args)
    }

    /// Resolves `key` in `language`.
    ///
    /// A missing translation is never an error: the fallback (or `[/key]`) is
    /// returned and recorded in the reference-language file.
    ///
    /// # Errors
    /// - `InvalidArgument`: empty or malformed `language` / `key`
    /// - `InvalidDocument`: the reference-language file is not a language file
    fn text_in(
        &self,
        language: &str,
        key: &str,
        fallback: Option<&str>,
        args: &[&dyn Display],
    ) -> Result<String, TranslatorError>;
}

/// [`Translator`] backed by XML language files.
#[derive(Debug)]
pub struct FallbackTranslator<S, T = XmlTranslationStore<S>> {
    store: T,
    /// `None` when fallback persistence is turned off.
    writer: Option<FallbackWriter<S>>,
    reference_language: String,
}

impl FallbackTranslator<FileStorage> {
    /// Builds a file-backed translator; `site_root` anchors `translationsFolder`.
    ///
    /// # Errors
    /// Invalid settings.
    pub fn from_settings(
        site_root: &Path,
        settings: &TranslatorSettings,
    ) -> Result<Self, ConfigError> {
        Self::with_storage(Arc::new(FileStorage::new()), site_root, settings)
    }
}

impl<S: DocumentStorage> FallbackTranslator<S> {
    /// Builds a translator over any storage, sharing it between lookups and
    /// fallback writes.
    ///
    /// # Errors
    /// Invalid settings.
    pub fn with_storage(
        storage: Arc<S>,
        site_root: &Path,
        settings: &TranslatorSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let layout = settings.layout(site_root);
        let store = XmlTranslationStore::new(
            Arc::clone(&storage),
            layout.clone(),
            settings.parent_language_lookup,
        );
        let writer = settings
            .persist_fallbacks
            .then(|| FallbackWriter::new(storage, layout, settings.fill_policy));

        Ok(Self::new(store, writer, settings.reference_language.clone()))
    }
}

impl<S: DocumentStorage, T: TranslationStore> FallbackTranslator<S, T> {
    #[must_use]
    pub const fn new(
        store: T,
        writer: Option<FallbackWriter<S>>,
        reference_language: String,
    ) -> Self {
        Self { store, writer, reference_language }
    }

    #[must_use]
    pub fn reference_language(&self) -> &str {
        &self.reference_language
    }

    fn resolve(
        &self,
        language: &str,
        key: &TranslationKey,
        fallback: Option<&str>,
        args: &[&dyn Display],
    ) -> Result<String, TranslatorError> {
        let stored = match self.store.lookup(language, key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(language, key = %key, "Lookup failed, treating as missing: {e}");
                None
            }
        };

        let text = match stored {
            Some(text) => text,
            None if language.eq_ignore_ascii_case(&self.reference_language) => {
                let text = fallback.map_or_else(|| format!("[{key}]"), str::to_string);
                self.persist_fallback(&self.reference_language, key, &text)?;
                text
            }
            None => {
                tracing::debug!(
                    language,
                    key = %key,
                    reference = %self.reference_language,
                    "Missing translation, using reference language"
                );
                return self.resolve(&self.reference_language, key, fallback, args);
            }
        };

        if args.is_empty() {
            return Ok(text);
        }

        Ok(format_positional(&text, args).unwrap_or_else(|e| {
            tracing::warn!(language, key = %key, "Cannot format translation: {e}");
            missing_format_args_message(&text, language)
        }))
    }

    /// Records a miss; storage failures are logged and retried on the next miss.
    fn persist_fallback(
        &self,
        language: &str,
        key: &TranslationKey,
        text: &str,
    ) -> Result<(), TranslatorError> {
        let Some(writer) = &self.writer else {
            return Ok(());
        };

        match writer.ensure_fallback(language, key, text) {
            Ok(_) => Ok(()),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(language, key = %key, "Fallback translation not saved: {e}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl<S: DocumentStorage, T: TranslationStore> Translator for FallbackTranslator<S, T> {
    fn text_in(
        &self,
        language: &str,
        key: &str,
        fallback: Option<&str>,
        args: &[&dyn Display],
    ) -> Result<String, TranslatorError> {
        validate_language(language)?;
        let key = TranslationKey::parse(key)?;

        self.resolve(language, &key, fallback, args)
    }
}

/// Text shown when format arguments do not fit the translation.
#[must_use]
pub fn missing_format_args_message(text: &str, language: &str) -> String {
    format!("[Missing format args for '{text}' text in '{language}' language]")
}

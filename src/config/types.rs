use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::fallback::FillPolicy;
use crate::language::validate_language;
use crate::storage::{
    DocumentLayout,
    LANGUAGE_PLACEHOLDER,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fileNamePattern")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TranslatorSettings {
    /// Folder holding the language files, relative to the site root.
    pub translations_folder: String,

    /// File name per language; `{language}` is replaced by the identifier.
    pub file_name_pattern: String,

    /// Language every miss funnels into, and the only one ever written.
    pub reference_language: String,

    /// Record misses in the reference-language file.
    ///
    /// Turn off for read-only deployments; resolution is otherwise unchanged.
    pub persist_fallbacks: bool,

    pub fill_policy: FillPolicy,

    /// Retry a miss for `sv-SE` under `sv` before using the reference language.
    pub parent_language_lookup: bool,
}

impl TranslatorSettings {
    /// # Errors
    /// - Required field is empty
    /// - File name pattern without `{language}` or with a path separator
    /// - Invalid reference language
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translations_folder.trim().is_empty() {
            errors.push(ValidationError::new(
                "translationsFolder",
                "The folder cannot be empty. Example: \"lang\"",
            ));
        }

        if self.file_name_pattern.is_empty() {
            errors.push(ValidationError::new(
                "fileNamePattern",
                "The pattern cannot be empty. Example: \"{language}_website.xml\"",
            ));
        } else if !self.file_name_pattern.contains(LANGUAGE_PLACEHOLDER) {
            errors.push(ValidationError::new(
                "fileNamePattern",
                format!(
                    "The pattern '{}' must contain the {LANGUAGE_PLACEHOLDER} placeholder",
                    self.file_name_pattern
                ),
            ));
        } else if self.file_name_pattern.contains(['/', '\\']) {
            errors.push(ValidationError::new(
                "fileNamePattern",
                format!(
                    "The pattern '{}' must be a file name, not a path. Use translationsFolder for the folder",
                    self.file_name_pattern
                ),
            ));
        }

        if let Err(e) = validate_language(&self.reference_language) {
            errors.push(ValidationError::new("referenceLanguage", e.to_string()));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Physical file layout for a site rooted at `site_root`.
    #[must_use]
    pub fn layout(&self, site_root: &Path) -> DocumentLayout {
        DocumentLayout::new(
            site_root.join(&self.translations_folder),
            self.file_name_pattern.clone(),
        )
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            translations_folder: "lang".to_string(),
            file_name_pattern: "{language}_website.xml".to_string(),
            reference_language: "en".to_string(),
            persist_fallbacks: true,
            fill_policy: FillPolicy::default(),
            parent_language_lookup: true,
        }
    }
}

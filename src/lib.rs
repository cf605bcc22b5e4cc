//! fallback-translator
//!
//! キーで UI テキストを解決し、見つからない翻訳を参照言語の XML 言語ファイルへ
//! プレースホルダーとして記録するトランスレーター。
//!
//! ```no_run
//! use std::path::Path;
//!
//! use fallback_translator::{
//!     FallbackTranslator,
//!     Translator,
//!     TranslatorSettings,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let translator =
//!     FallbackTranslator::from_settings(Path::new("/srv/site"), &TranslatorSettings::default())?;
//! let text = translator.text_in("sv-SE", "Errors/Required", Some("{0} is required"), &[&"Name"])?;
//! assert!(!text.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod fallback;
pub mod format;
pub mod key;
pub mod language;
pub mod storage;
pub mod store;
pub mod translator;

/// テスト用ユーティリティ
#[cfg(test)]
mod test_utils;

pub use config::{
    ConfigError,
    ConfigManager,
    TranslatorSettings,
};
pub use error::TranslatorError;
pub use fallback::{
    FallbackOutcome,
    FallbackWriter,
    FillPolicy,
};
pub use key::TranslationKey;
pub use storage::{
    DocumentStorage,
    FileStorage,
    MemoryStorage,
};
pub use store::{
    TranslationStore,
    XmlTranslationStore,
};
pub use translator::{
    ActiveLanguage,
    FallbackTranslator,
    FixedLanguage,
    Translator,
};

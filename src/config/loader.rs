//! 設定ファイルの探索と読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    TranslatorSettings,
};

/// サイトルート直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".fallback-translator.json";

/// サイトルートの設定ファイルのパス（存在する場合のみ）
pub(super) fn find_config_file(site_root: &Path) -> Option<PathBuf> {
    let config_path = site_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        Some(config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
        None
    }
}

/// 設定ファイルを読み込む
///
/// 未知のフィールドはタイプミスとみなしてエラーにする。
///
/// # Errors
/// - `Read`: ファイルを読めない
/// - `Parse`: JSON として不正、または未知のフィールドがある
pub(super) fn read_settings(config_path: &Path) -> Result<TranslatorSettings, ConfigError> {
    tracing::debug!(path = %config_path.display(), "Loading configuration");

    let content = std::fs::read_to_string(config_path)
        .map_err(|source| ConfigError::Read { path: config_path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: config_path.to_path_buf(), source })
}

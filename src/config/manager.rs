//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    TranslatorSettings,
    loader,
};
use crate::storage::FileStorage;
use crate::translator::FallbackTranslator;

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TranslatorSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslatorSettings::default(), site_root: None }
    }

    /// サイトルートの設定ファイルを読み込む
    ///
    /// 設定ファイルがなければデフォルト設定を使う。
    ///
    /// # Arguments
    /// * `site_root` - サイトのルートパス
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for site: {:?}", site_root);

        let config_path = site_root.as_deref().and_then(loader::find_config_file);
        let settings =
            config_path.as_deref().map(loader::read_settings).transpose()?.unwrap_or_default();

        self.apply(settings, site_root)
    }

    /// サイトルートの外に置いた設定ファイルを読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー（ファイルが必須）
    /// - JSON パースエラー
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn load_settings_from_file(
        &mut self,
        site_root: PathBuf,
        config_path: &Path,
    ) -> Result<(), ConfigError> {
        let settings = loader::read_settings(config_path)?;
        self.apply(settings, Some(site_root))
    }

    /// バリデーション後に設定とサイトルートを保存する
    fn apply(
        &mut self,
        settings: TranslatorSettings,
        site_root: Option<PathBuf>,
    ) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.site_root = site_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &TranslatorSettings {
        &self.current_settings
    }

    /// サイトルートを取得
    #[must_use]
    pub const fn site_root(&self) -> Option<&PathBuf> {
        self.site_root.as_ref()
    }

    /// 現在の設定でファイルベースのトランスレーターを作成
    ///
    /// サイトルートが未設定の場合はカレントディレクトリを基準にする
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn translator(&self) -> Result<FallbackTranslator<FileStorage>, ConfigError> {
        let site_root = self.site_root.as_deref().unwrap_or_else(|| Path::new(""));
        FallbackTranslator::from_settings(site_root, &self.current_settings)
    }
}

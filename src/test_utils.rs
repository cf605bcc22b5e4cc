//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::document::Element;
use crate::key::TranslationKey;

/// テスト用のキーを作成する
///
/// # Arguments
/// * `raw` - スラッシュ区切りのキー（例: "Errors/Required"）
pub(crate) fn key(raw: &str) -> TranslationKey {
    TranslationKey::parse(raw).unwrap()
}

/// 子要素の名前をドキュメント順に返す
pub(crate) fn child_names(element: &Element) -> Vec<String> {
    element.elements().map(|e| e.name.clone()).collect()
}

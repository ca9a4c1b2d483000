//! site-i18n
//!
//! 静的サイト向けの言語切り替え: 言語辞書の読み込み、ドット区切りキーの解決、
//! ドキュメントへの翻訳反映、選択言語の永続化

pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod resolver;
pub mod source;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use resolver::{
    LoadOutcome,
    TranslationReport,
    TranslationResolver,
};

//! 言語リソースの読み込み・保存で発生するエラー

use thiserror::Error;

/// 言語辞書の取得またはパースに失敗した
///
/// `TranslationResolver` の境界で捕捉・ログ出力され、呼び出し元へは伝播しない。
#[derive(Error, Debug)]
pub enum LoadError {
    /// 言語ファイルの読み込みに失敗
    #[error("Failed to read language file '{path}': {source}")]
    Io {
        /// 読み込もうとしたパス
        path: String,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },

    /// JSON として解釈できない
    #[error("Failed to parse language file for '{code}': {source}")]
    Parse {
        /// 言語コード
        code: String,
        /// 元のパースエラー
        #[source]
        source: serde_json::Error,
    },

    /// ルートがオブジェクトではない
    #[error("Language file for '{code}' must be a JSON object")]
    NotAnObject {
        /// 言語コード
        code: String,
    },

    /// 言語リソースが存在しない
    #[error("No language resource for '{0}'")]
    NotFound(String),

    /// パスとして使えない言語コード
    #[error("Invalid language code '{0}'")]
    InvalidCode(String),
}

/// 言語設定の永続化に失敗した
#[derive(Error, Debug)]
pub enum StoreError {
    /// ストアファイルの読み書きに失敗
    #[error("Failed to access preference store: {0}")]
    Io(#[from] std::io::Error),

    /// ストアファイルの内容が不正
    #[error("Failed to parse preference store: {0}")]
    Parse(#[from] serde_json::Error),
}

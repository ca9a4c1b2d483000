//! 言語リソースの取得

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use futures::future::BoxFuture;

use crate::dictionary::LanguageDictionary;
use crate::error::LoadError;

/// 言語コードで指定される読み取り専用の辞書リソース
///
/// 1 回の言語切り替えにつき 1 回だけ `fetch` される。タイムアウトやリトライは行わない。
pub trait LanguageSource: Send + Sync {
    /// 指定言語の辞書を取得してパースする
    fn fetch<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<LanguageDictionary, LoadError>>;
}

/// パスに埋め込めない言語コードを弾く
///
/// # Errors
/// 空文字、パス区切り文字、`..` を含む場合
pub fn validate_language_code(code: &str) -> Result<(), LoadError> {
    if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
        return Err(LoadError::InvalidCode(code.to_string()));
    }
    Ok(())
}

/// `<root>/<pattern>` 形式のディレクトリから言語ファイルを読み込む
///
/// `pattern` 内の `{lang}` が言語コードに置換される（例: `i18n/{lang}.json`）。
#[derive(Debug, Clone)]
pub struct FileSource {
    /// 言語ファイルのディレクトリ
    root: PathBuf,
    /// ファイル名パターン
    pattern: String,
}

impl FileSource {
    /// 新しい `FileSource` を作成
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self { root: root.into(), pattern: pattern.into() }
    }

    /// 言語ファイルのディレクトリ
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 言語コードに対応するファイルパス
    #[must_use]
    pub fn path_for(&self, code: &str) -> PathBuf {
        self.root.join(self.pattern.replace("{lang}", code))
    }

    /// ファイルを読み込んで辞書を作成
    async fn load(&self, code: &str) -> Result<LanguageDictionary, LoadError> {
        validate_language_code(code)?;

        let path = self.path_for(code);
        tracing::debug!(path = %path.display(), "Reading language file");

        let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
            LoadError::Io { path: path.to_string_lossy().to_string(), source }
        })?;

        LanguageDictionary::parse(code, &content)
    }
}

impl LanguageSource for FileSource {
    fn fetch<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<LanguageDictionary, LoadError>> {
        Box::pin(self.load(code))
    }
}

/// メモリ上に保持した JSON テキストから辞書を返す
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    /// 言語コード → JSON テキスト
    documents: HashMap<String, String>,
}

impl MemorySource {
    /// 空の `MemorySource` を作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 言語を追加する
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>, json: impl Into<String>) -> Self {
        self.documents.insert(code.into(), json.into());
        self
    }
}

impl LanguageSource for MemorySource {
    fn fetch<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<LanguageDictionary, LoadError>> {
        let result = self
            .documents
            .get(code)
            .ok_or_else(|| LoadError::NotFound(code.to_string()))
            .and_then(|text| LanguageDictionary::parse(code, text));
        Box::pin(futures::future::ready(result))
    }
}

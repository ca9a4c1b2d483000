//! Translation Resolver
//!
//! 言語辞書の読み込み、キーパスの解決、ドキュメントへの反映、
//! 言語スイッチャーの表示更新、選択言語の永続化を行う。

use std::sync::Arc;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::SiteSettings;
use crate::dictionary::LanguageDictionary;
use crate::document::{
    Document,
    NodeId,
};
use crate::source::LanguageSource;
use crate::store::PreferenceStore;

/// アクティブ言語と読み込み済み辞書の組
#[derive(Debug, Clone)]
pub struct ResolverContext {
    /// アクティブ言語
    pub language: String,
    /// 現在の辞書（空の場合あり）
    pub dictionary: Arc<LanguageDictionary>,
}

impl ResolverContext {
    /// 空の辞書で作成
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: language.into(), dictionary: Arc::new(LanguageDictionary::empty()) }
    }
}

/// `load_language` の結果
///
/// 呼び出し元への通知用ではなく、ログ・テストでの観測用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 辞書を反映した
    Applied,
    /// より新しいリクエストに追い越されたため破棄した
    Stale,
    /// 取得またはパースに失敗した
    Failed,
}

/// `translate` の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationReport {
    /// 書き換えた要素数
    pub applied: usize,
    /// 表示可能な値に解決できなかったキー（ドキュメント順）
    pub missing: Vec<String>,
}

/// 1 つのドキュメントに紐づく翻訳リゾルバー
///
/// # ロック順序
///
/// 両方のロックを取得する場合は `context` → `document` の順に取得する。
pub struct TranslationResolver<S, P, D> {
    /// サイト設定
    settings: SiteSettings,
    /// 言語リソース
    source: S,
    /// 選択言語の保存先
    store: P,
    /// アクティブ言語と辞書
    context: Mutex<ResolverContext>,
    /// 翻訳対象ドキュメント
    document: Mutex<D>,
    /// 最後に発行した読み込みリクエストの世代
    generation: AtomicU64,
    /// 直近の `translate` の結果
    last_report: Mutex<TranslationReport>,
}

impl<S, P, D> TranslationResolver<S, P, D>
where
    S: LanguageSource,
    P: PreferenceStore,
    D: Document,
{
    /// 新しいリゾルバーを作成
    ///
    /// アクティブ言語は保存済みの言語（なければデフォルト言語）で始まる。
    /// 起動時の読み込みに失敗してもこの値が残る。
    pub fn new(settings: SiteSettings, source: S, store: P, document: D) -> Self {
        let language = store
            .get(&settings.storage_key)
            .unwrap_or_else(|| settings.default_language.clone());
        let context = ResolverContext::new(language);
        Self {
            settings,
            source,
            store,
            context: Mutex::new(context),
            document: Mutex::new(document),
            generation: AtomicU64::new(0),
            last_report: Mutex::new(TranslationReport::default()),
        }
    }

    /// 保存済みの言語（なければデフォルト言語）を読み込み、スイッチャーを更新する
    pub async fn initialize(&self) -> LoadOutcome {
        let language = self
            .store
            .get(&self.settings.storage_key)
            .unwrap_or_else(|| self.settings.default_language.clone());
        tracing::debug!(language = %language, "Initializing translations");

        let outcome = self.load_language(&language).await;
        self.update_switcher_indicator().await;
        outcome
    }

    /// 言語辞書を読み込んで反映する
    ///
    /// 失敗時はエラーをログに出力し、アクティブ言語と辞書は呼び出し前のまま残す。
    /// 完了前に新しい読み込みが発行された場合、この結果は破棄される。
    pub async fn load_language(&self, code: &str) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let dictionary = match self.source.fetch(code).await {
            Ok(dictionary) => dictionary,
            Err(e) => {
                tracing::error!(language = code, error = %e, "Error loading language file");
                return LoadOutcome::Failed;
            }
        };

        {
            let mut context = self.context.lock().await;
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation {
                tracing::debug!(
                    language = code,
                    generation,
                    latest,
                    "Discarding language overtaken by a newer request"
                );
                return LoadOutcome::Stale;
            }

            context.dictionary = Arc::new(dictionary);
            context.language = code.to_string();

            if let Err(e) = self.store.set(&self.settings.storage_key, code) {
                tracing::warn!(language = code, error = %e, "Failed to persist language");
            }
        }

        tracing::info!(language = code, "Language switched");
        self.translate().await;
        self.update_switcher_indicator().await;
        LoadOutcome::Applied
    }

    /// 言語を切り替える
    ///
    /// 同じ言語でも再取得・再適用する。結果は返さない。
    pub async fn switch_language(&self, code: &str) {
        self.load_language(code).await;
    }

    /// スイッチャーのクリックを処理する
    ///
    /// 言語属性を持たない要素は無視する。
    pub async fn handle_switcher_click(&self, node: NodeId) {
        let code = {
            let document = self.document.lock().await;
            document.attribute(node, &self.settings.language_attribute).map(str::to_string)
        };

        match code {
            Some(code) => self.switch_language(&code).await,
            None => tracing::debug!(?node, "Switcher control has no language attribute"),
        }
    }

    /// 現在の辞書でキーパスを解決する
    pub async fn resolve(&self, path: &str) -> Option<Value> {
        let context = self.context.lock().await;
        context.dictionary.resolve(path, &self.settings.key_separator).cloned()
    }

    /// キー属性を持つ全要素を現在の辞書で書き換える
    ///
    /// プレースホルダー対象タグはプレースホルダーに、それ以外は表示テキストに書き込む。
    /// 解決できないキーの要素はそのまま残す。
    pub async fn translate(&self) -> TranslationReport {
        let dictionary = Arc::clone(&self.context.lock().await.dictionary);
        let mut document = self.document.lock().await;
        let settings = &self.settings;

        let mut report = TranslationReport::default();
        for node in document.select_by_attribute(&settings.key_attribute) {
            let Some(key) = document.attribute(node, &settings.key_attribute).map(str::to_string)
            else {
                continue;
            };

            let Some(text) = dictionary.text(&key, &settings.key_separator) else {
                report.missing.push(key);
                continue;
            };

            let is_placeholder =
                document.tag_name(node).is_some_and(|tag| settings.is_placeholder_tag(tag));
            if is_placeholder {
                document.set_placeholder(node, &text);
            } else {
                document.set_content(node, &text);
            }
            report.applied += 1;
        }

        if !report.missing.is_empty() {
            tracing::debug!(missing = ?report.missing, "Untranslated keys left unchanged");
        }
        drop(document);
        self.last_report.lock().await.clone_from(&report);
        report
    }

    /// 直近の `translate` の結果（まだ一度も実行していなければ空）
    pub async fn last_report(&self) -> TranslationReport {
        self.last_report.lock().await.clone()
    }

    /// アクティブ言語に一致するスイッチャーだけをアクティブにする
    ///
    /// アクティブにした要素数を返す。
    pub async fn update_switcher_indicator(&self) -> usize {
        let language = self.context.lock().await.language.clone();
        let mut document = self.document.lock().await;
        let settings = &self.settings;

        let mut active_count = 0;
        for node in document.select_by_class(&settings.switcher_class) {
            let is_active =
                document.attribute(node, &settings.language_attribute) == Some(language.as_str());
            document.set_class(node, &settings.active_class, is_active);
            if is_active {
                active_count += 1;
            }
        }
        active_count
    }

    /// アクティブ言語
    pub async fn current_language(&self) -> String {
        self.context.lock().await.language.clone()
    }

    /// アクティブ言語と辞書のスナップショット
    pub async fn context(&self) -> ResolverContext {
        self.context.lock().await.clone()
    }

    /// ドキュメントを参照する
    pub async fn with_document<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let document = self.document.lock().await;
        f(&document)
    }

    /// サイト設定
    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// リゾルバーを破棄してドキュメントを取り出す
    pub fn into_document(self) -> D {
        self.document.into_inner()
    }
}

impl<S, P, D> std::fmt::Debug for TranslationResolver<S, P, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationResolver")
            .field("settings", &self.settings)
            .field("source", &"<LanguageSource>")
            .field("store", &"<PreferenceStore>")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

//! Entry point: translates a page snapshot with the site's language files.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use site_i18n::TranslationResolver;
use site_i18n::config::{
    ConfigError,
    ConfigManager,
};
use site_i18n::document::MemoryDocument;
use site_i18n::source::{
    FileSource,
    LanguageSource,
};
use site_i18n::store::FileStore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default preference store file, relative to the site root.
const STATE_FILE_NAME: &str = ".site-i18n-state.json";

/// CLI の実行エラー
#[derive(Error, Debug)]
enum CliError {
    /// 設定の読み込み・検証に失敗
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// ページスナップショットを読めない
    #[error("Failed to read page '{path}': {source}")]
    Page {
        /// ページのパス
        path: PathBuf,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },

    /// スナップショットの JSON が不正
    #[error("Invalid page snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// `--list-keys` の言語ファイルを読めない
    #[error(transparent)]
    Load(#[from] site_i18n::error::LoadError),

    /// 標準出力への書き込みに失敗
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Translate a page snapshot with the site's language files
#[derive(Parser, Debug)]
#[command(name = "site-i18n", version, about)]
struct Args {
    /// Site root holding `.site-i18n.json` and the language directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Preference store file (defaults to `<root>/.site-i18n-state.json`)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print every key of LANG's language file instead of translating a page
    #[arg(long, value_name = "LANG", conflicts_with_all = ["page", "language"])]
    list_keys: Option<String>,

    /// Page snapshot (JSON element list)
    #[arg(required_unless_present = "list_keys")]
    page: Option<PathBuf>,

    /// Language to switch to after initialization
    language: Option<String>,
}

/// Installs the global subscriber; logs go to stderr unless a log file is given.
fn init_tracing(log_file: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return None;
    };

    let directory = path.parent().map_or_else(|| PathBuf::from("."), PathBuf::from);
    let file_name = path.file_name().map_or_else(|| "site-i18n.log".into(), ToOwned::to_owned);
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Some(guard)
}

/// 言語ファイルの全キーを `key<TAB>value` 形式でソートして出力する
async fn list_keys(source: &FileSource, separator: &str, language: &str) -> Result<(), CliError> {
    let dictionary = source.fetch(language).await?;
    let mut entries: Vec<_> = dictionary.flatten(separator).into_iter().collect();
    entries.sort();

    let mut stdout = std::io::stdout().lock();
    for (key, value) in entries {
        writeln!(stdout, "{key}\t{value}")?;
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(args.root.clone())?;
    let settings = config_manager.get_settings().clone();

    let source = FileSource::new(config_manager.resource_dir(), settings.file_pattern.clone());

    let Some(page) = args.page else {
        let language = args.list_keys.as_deref().unwrap_or(&settings.default_language);
        return list_keys(&source, &settings.key_separator, language).await;
    };

    let store_path = args.store.unwrap_or_else(|| {
        args.root.as_ref().map_or_else(|| PathBuf::from(STATE_FILE_NAME), |r| r.join(STATE_FILE_NAME))
    });
    let store = FileStore::new(store_path);

    let content = tokio::fs::read_to_string(&page)
        .await
        .map_err(|source| CliError::Page { path: page.clone(), source })?;
    let document: MemoryDocument = serde_json::from_str(&content)?;

    let resolver = TranslationResolver::new(settings, source, store, document);
    resolver.initialize().await;
    if let Some(language) = &args.language {
        resolver.switch_language(language).await;
    }

    let report = resolver.last_report().await;
    tracing::info!(
        language = %resolver.current_language().await,
        applied = report.applied,
        missing = report.missing.len(),
        "Page translated"
    );

    let document = resolver.into_document();
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &document)?;
    writeln!(stdout)?;
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();
    let _guard = init_tracing(args.log_file.as_ref());

    match run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

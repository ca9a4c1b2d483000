//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::io::Write;
use std::sync::{
    Arc,
    Mutex,
};

use tracing_subscriber::fmt::MakeWriter;

use crate::document::{
    Element,
    MemoryDocument,
};
use crate::source::MemorySource;

/// en / fr / es の辞書を持つソース
pub(crate) fn site_source() -> MemorySource {
    MemorySource::new()
        .with_language(
            "en",
            r#"{"nav": {"home": "Home"}, "form": {"name": "Name", "message": "Your message"}}"#,
        )
        .with_language(
            "fr",
            r#"{"nav": {"home": "Accueil"}, "form": {"name": "Nom", "message": "Votre message"}}"#,
        )
        .with_language(
            "es",
            r#"{"nav": {"home": "Inicio"}, "form": {"name": "Nombre", "message": "Su mensaje"}}"#,
        )
}

/// 翻訳対象要素とスイッチャーを含むページ
///
/// | index | 要素 |
/// |-------|------|
/// | 0 | `<a data-i18n="nav.home">` |
/// | 1 | `<p data-i18n="nav.missing">Original</p>` |
/// | 2 | `<input data-i18n="form.name">` |
/// | 3 | `<textarea data-i18n="form.message">` |
/// | 4 | `<button class="lang-btn" data-lang="en">` |
/// | 5 | `<button class="lang-btn" data-lang="fr">` |
pub(crate) fn site_document() -> MemoryDocument {
    MemoryDocument::new(vec![
        Element::new("a").with_attribute("data-i18n", "nav.home").with_content("nav.home"),
        Element::new("p").with_attribute("data-i18n", "nav.missing").with_content("Original"),
        Element::new("input").with_attribute("data-i18n", "form.name"),
        Element::new("TEXTAREA").with_attribute("data-i18n", "form.message"),
        Element::new("button").with_class("lang-btn").with_attribute("data-lang", "en"),
        Element::new("button").with_class("lang-btn").with_attribute("data-lang", "fr"),
    ])
}

/// ログ出力をメモリに溜める
#[derive(Clone, Default)]
pub(crate) struct LogCapture {
    /// 出力されたバイト列
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// キャプチャ先に書き込む subscriber
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish()
    }

    /// これまでの出力
    pub(crate) fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// `LogCapture` 用のライター
pub(crate) struct CaptureWriter(
    /// `LogCapture` と共有するバッファ
    Arc<Mutex<Vec<u8>>>,
);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buffer))
    }
}

//! 選択言語の永続化（ブラウザの localStorage 相当）

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    Mutex,
};

use crate::error::StoreError;

/// 単純なキー・バリューストア
///
/// 読み書きは同期的に行う。スキーマバージョンや有効期限は持たない。
pub trait PreferenceStore: Send + Sync {
    /// キーに対応する値を取得
    fn get(&self, key: &str) -> Option<String>;

    /// キーに値を保存
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// プロセス内のストア
///
/// `clone` したハンドルは同じマップを共有する（新しいセッションの再現に使う）。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// 保存済みの値
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// 空のストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON オブジェクトファイルに保存するストア
///
/// ファイルが存在しない・読めない場合は値なしとして扱う。
#[derive(Debug, Clone)]
pub struct FileStore {
    /// ストアファイルのパス
    path: PathBuf,
}

impl FileStore {
    /// 新しい `FileStore` を作成
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ストアファイルのパス
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイル全体を読み込む
    fn read_entries(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!("Ignoring unreadable preference store {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // 壊れたファイルは上書きする
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

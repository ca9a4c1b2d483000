//! Language dictionary definitions

use std::collections::HashMap;

use serde_json::Value;

use crate::error::LoadError;

/// 1 言語分の翻訳ツリー
///
/// 読み込み後は不変。言語切り替え時には丸ごと差し替える。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDictionary {
    /// ルートの JSON 値（通常はオブジェクト）
    root: Value,
}

impl Default for LanguageDictionary {
    fn default() -> Self {
        Self::empty()
    }
}

impl LanguageDictionary {
    /// 空の辞書（起動直後の状態）
    #[must_use]
    pub fn empty() -> Self {
        Self { root: Value::Object(serde_json::Map::new()) }
    }

    /// パース済みの JSON から辞書を作成
    ///
    /// # Errors
    /// ルートがオブジェクトでない場合
    pub fn from_value(code: &str, root: Value) -> Result<Self, LoadError> {
        if root.is_object() {
            Ok(Self { root })
        } else {
            Err(LoadError::NotAnObject { code: code.to_string() })
        }
    }

    /// JSON テキストから辞書を作成
    ///
    /// # Errors
    /// - JSON パースエラー
    /// - ルートがオブジェクトでない
    pub fn parse(code: &str, text: &str) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(text)
            .map_err(|source| LoadError::Parse { code: code.to_string(), source })?;
        Self::from_value(code, root)
    }

    /// 辞書が空かどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.as_object().is_none_or(serde_json::Map::is_empty)
    }

    /// ドット区切りのキーパスを辿って値を取得する
    ///
    /// オブジェクトはキーで、配列は 10 進インデックスで辿る。
    /// 途中のセグメントが存在しない・辿れない場合は `None`。
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use site_i18n::dictionary::LanguageDictionary;
    ///
    /// let dict = LanguageDictionary::from_value("fr", json!({
    ///     "nav": { "home": "Accueil" }
    /// })).unwrap();
    ///
    /// assert_eq!(dict.resolve("nav.home", "."), Some(&json!("Accueil")));
    /// assert_eq!(dict.resolve("nav.missing", "."), None);
    /// ```
    #[must_use]
    pub fn resolve(&self, path: &str, separator: &str) -> Option<&Value> {
        if path.is_empty() || separator.is_empty() {
            return None;
        }

        path.split(separator).try_fold(&self.root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// キーパスを表示用テキストに解決する
    ///
    /// 空文字列・`0`・`false`・`null`・オブジェクト・配列は書き込み対象にしない。
    #[must_use]
    pub fn text(&self, path: &str, separator: &str) -> Option<String> {
        self.resolve(path, separator).and_then(display_text)
    }

    /// 全リーフをフルキー → 値のマップに展開する
    #[must_use]
    pub fn flatten(&self, separator: &str) -> HashMap<String, String> {
        let mut result = HashMap::new();
        flatten_value(&self.root, separator, None, &mut result);
        result
    }
}

/// リーフ値を表示用テキストに変換
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn flatten_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

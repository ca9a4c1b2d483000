//! 翻訳対象となるドキュメント（DOM）の抽象

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

/// ドキュメント内の要素を指すハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(
    /// ドキュメント内の位置
    pub usize,
);

/// `TranslationResolver` が読み書きする DOM の最小インターフェース
///
/// ブラウザ DOM・静的 HTML・テスト用のメモリ表現などを差し替えられるようにする。
pub trait Document: Send {
    /// 指定属性を持つ要素をドキュメント順に返す
    fn select_by_attribute(&self, name: &str) -> Vec<NodeId>;

    /// 指定クラスを持つ要素をドキュメント順に返す
    fn select_by_class(&self, class: &str) -> Vec<NodeId>;

    /// 要素のタグ名
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// 要素の属性値
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// 表示テキスト（innerHTML 相当）を書き換える
    fn set_content(&mut self, node: NodeId, content: &str);

    /// プレースホルダーを書き換える
    fn set_placeholder(&mut self, node: NodeId, text: &str);

    /// クラスの付け外し
    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool);
}

/// メモリ上の要素
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    /// タグ名
    pub tag: String,
    /// 属性名 → 値
    pub attributes: BTreeMap<String, String>,
    /// クラス（付与順）
    pub classes: Vec<String>,
    /// 表示テキスト
    pub content: String,
    /// プレースホルダー（未設定なら出力しない）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Element {
    /// タグ名を指定して要素を作成
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    /// 属性を追加する
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// クラスを追加する
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// 表示テキストを設定する
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// クラスを持っているか
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// フラットな要素リストによるドキュメント
///
/// JSON スナップショットとして読み書きできる（CLI の入出力形式）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryDocument {
    /// ドキュメント順の要素
    pub elements: Vec<Element>,
}

impl MemoryDocument {
    /// 要素リストから作成
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// 要素を追加してハンドルを返す
    pub fn push(&mut self, element: Element) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    /// ハンドルから要素を取得
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    /// ハンドルから要素を可変で取得
    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0)
    }

    /// 条件に合う要素のハンドル
    fn select(&self, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| predicate(element))
            .map(|(index, _)| NodeId(index))
            .collect()
    }
}

impl Document for MemoryDocument {
    fn select_by_attribute(&self, name: &str) -> Vec<NodeId> {
        self.select(|element| element.attributes.contains_key(name))
    }

    fn select_by_class(&self, class: &str) -> Vec<NodeId> {
        self.select(|element| element.has_class(class))
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|element| element.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|element| element.attributes.get(name)).map(String::as_str)
    }

    fn set_content(&mut self, node: NodeId, content: &str) {
        if let Some(element) = self.get_mut(node) {
            element.content = content.to_string();
        }
    }

    fn set_placeholder(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.get_mut(node) {
            element.placeholder = Some(text.to_string());
        }
    }

    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        let Some(element) = self.get_mut(node) else {
            return;
        };

        if enabled {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        } else {
            element.classes.retain(|c| c != class);
        }
    }
}

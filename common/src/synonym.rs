//! 色同義語テーブル
//!
//! ショップごとに揺れる色表記（「青」「ネイビー」「ディープブルー」等）を
//! 色ファミリー単位で突き合わせるためのテーブル。
//! 組み込みプリセット + JSONによる上書きに対応する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 色ファミリーの同義語テーブル
///
/// キーが正規名（ファミリー名）、値がそのファミリーに属する表記の一覧。
/// プロセス起動時に一度構築し、以後は読み取り専用で共有する。
/// BTreeMapなのでファミリーの照合順は決定的。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorSynonyms {
    #[serde(flatten)]
    families: BTreeMap<String, Vec<String>>,
}

impl ColorSynonyms {
    /// 空のテーブル
    pub fn new() -> Self {
        Self::default()
    }

    /// スマートフォン系の組み込みテーブル
    pub fn builtin() -> Self {
        let mut families = BTreeMap::new();

        fn entry(families: &mut BTreeMap<String, Vec<String>>, canon: &str, syns: &[&str]) {
            families.insert(
                canon.to_string(),
                syns.iter().map(|s| s.to_string()).collect(),
            );
        }

        entry(&mut families, "black", &[
            "ブラック", "黒", "スペースブラック", "space black", "ジェットブラック", "jet black",
            "オブシディアン", "obsidian",
        ]);
        entry(&mut families, "blue", &[
            "ブルー", "青", "紺", "ネイビー", "navy",
            "deep blue", "ディープブルー", "sky blue", "スカイブルー",
            "midnight", "ミッドナイト", "シエラブルー", "sierra blue",
        ]);
        entry(&mut families, "gold", &[
            "ゴールド", "金", "シャンパンゴールド", "champagne gold",
        ]);
        entry(&mut families, "gray", &[
            "グレー", "グレイ", "灰色", "スペースグレイ", "スペースグレー",
            "space gray", "space grey", "グラファイト", "graphite",
        ]);
        entry(&mut families, "green", &[
            "グリーン", "緑", "アルパイングリーン", "alpine green", "ミントグリーン", "mint green",
        ]);
        entry(&mut families, "orange", &["オレンジ", "橙"]);
        entry(&mut families, "pink", &["ピンク", "桃", "ローズゴールド", "rose gold"]);
        entry(&mut families, "purple", &[
            "パープル", "紫", "ディープパープル", "deep purple", "ラベンダー", "lavender",
        ]);
        entry(&mut families, "red", &[
            "レッド", "赤", "プロダクトレッド", "product red", "(product)red",
        ]);
        entry(&mut families, "silver", &["シルバー", "銀"]);
        entry(&mut families, "white", &[
            "ホワイト", "白", "スターライト", "starlight", "パールホワイト", "pearl white",
        ]);
        entry(&mut families, "yellow", &["イエロー", "黄色", "黄"]);

        Self { families }
    }

    /// JSON文字列から読み込み
    ///
    /// 形式: `{"blue": ["ブルー", "ネイビー"], ...}`
    pub fn from_json(json: &str) -> Result<Self> {
        let families: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| Error::Synonym(format!("同義語JSONのパースエラー: {}", e)))?;
        Ok(Self { families })
    }

    /// テーブルをマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &ColorSynonyms) {
        for (canon, syns) in &other.families {
            self.families.insert(canon.clone(), syns.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// 正規化済みラベルが属するファミリーの正規名を返す
    ///
    /// 完全一致を優先し、次に包含（ラベル⊇表記 または 表記⊇ラベル）で探す。
    /// 最初に当たったファミリーを採用する（決定的なタイブレーク）。
    pub fn family_of(&self, normalized_label: &str) -> Option<&str> {
        if normalized_label.is_empty() {
            return None;
        }

        // 完全一致
        for (canon, syns) in &self.families {
            if canon == normalized_label || syns.iter().any(|s| s.to_lowercase() == normalized_label) {
                return Some(canon);
            }
        }

        // 包含
        for (canon, syns) in &self.families {
            let mut words = vec![canon.clone()];
            words.extend(syns.iter().map(|s| s.to_lowercase()));
            for w in &words {
                if w.chars().count() < 2 || normalized_label.chars().count() < 2 {
                    continue;
                }
                if normalized_label.contains(w.as_str()) || w.contains(normalized_label) {
                    return Some(canon);
                }
            }
        }

        None
    }

    /// ファミリーに属する全表記（正規名を含む）を小文字化して返す
    pub fn family_words(&self, canon: &str) -> Vec<String> {
        let mut words = vec![canon.to_lowercase()];
        if let Some(syns) = self.families.get(canon) {
            words.extend(syns.iter().map(|s| s.to_lowercase()));
        }
        words
    }
}

//! 色カタログ照合
//!
//! フリーテキストのラベルがカタログの色エントリを指しているかを判定する。
//! 独立した照合戦略を厳しい順に試し、最初に成功したものを採用する
//! （曖昧なラベルの決定的なタイブレーク）。純粋な述語で副作用なし。

use crate::synonym::ColorSynonyms;

/// 照合に使った戦略（診断・テスト用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// 正規化後の完全一致
    NormalizedExact,
    /// 整形ラベルが生表記の部分文字列
    CleanedSubstring,
    /// 正規化ラベルが生表記（小文字化）の部分文字列
    LowercaseSubstring,
    /// 同義語テーブル経由のファミリー一致
    SynonymFamily,
    /// 双方向の包含
    Containment,
    /// 空白・ハイフン除去後の双方向包含
    SpacelessContainment,
}

/// 「〜系」「〜っぽい」等の修飾サフィックス
const DESCRIPTIVE_SUFFIXES: &[&str] = &[
    "色系", "系", "っぽい", "風", "-ish", "-colored", "-coloured",
];

/// ラベルを正規化する
///
/// 全角空白の統一、連続空白の圧縮、小文字化、修飾サフィックスの除去。
pub fn normalize_label(label: &str) -> String {
    let spaced = label.replace('　', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut normalized = collapsed.to_lowercase();

    for suffix in DESCRIPTIVE_SUFFIXES {
        if let Some(stripped) = normalized.strip_suffix(suffix) {
            normalized = stripped.trim_end().to_string();
            break;
        }
    }

    normalized
}

/// 修飾サフィックスだけ除去した整形ラベル（大小文字は保持）
fn clean_label(label: &str) -> String {
    let mut cleaned = label.trim().to_string();
    for suffix in DESCRIPTIVE_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim_end().to_string();
            break;
        }
    }
    cleaned
}

/// 内部の空白・ハイフン・中黒を除去する
///
/// 「スペース グレイ」「space-gray」のような表記揺れを吸収する。
/// カタカナ長音「ー」は色名の一部なので残す。
fn strip_spacing(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '　' | '\t' | '-' | '‐' | '－' | '・'))
        .collect()
}

/// ラベルがカタログの色エントリと一致するか
///
/// `color_raw` はショップ側の生表記、`color_key` はその正規化キー
/// （`normalize_label` 済み）。成功した戦略を返す。
pub fn match_strategy(
    label: &str,
    color_raw: &str,
    color_key: &str,
    synonyms: &ColorSynonyms,
) -> Option<MatchStrategy> {
    let normalized = normalize_label(label);
    if normalized.is_empty() || color_key.is_empty() {
        return None;
    }

    // (a) 正規化後の完全一致
    if normalized == color_key {
        return Some(MatchStrategy::NormalizedExact);
    }

    // (b) 整形ラベルが生表記にそのまま含まれる
    let cleaned = clean_label(label);
    if !cleaned.is_empty() && color_raw.contains(&cleaned) {
        return Some(MatchStrategy::CleanedSubstring);
    }

    // (c) 正規化ラベルが生表記（小文字化）に含まれる
    if color_raw.to_lowercase().contains(&normalized) {
        return Some(MatchStrategy::LowercaseSubstring);
    }

    // (d) 同義語ファミリー経由
    if let Some(family) = synonyms.family_of(&normalized) {
        let lowered_raw = color_raw.to_lowercase();
        for word in synonyms.family_words(family) {
            if color_key == word
                || lowered_raw.contains(&word)
                || (word.chars().count() >= 2 && word.contains(color_key))
            {
                return Some(MatchStrategy::SynonymFamily);
            }
        }
    }

    // (e) 双方向の包含
    if normalized.contains(color_key) || color_key.contains(&normalized) {
        return Some(MatchStrategy::Containment);
    }

    // (f) 空白・ハイフン除去後の双方向包含
    let label_tight = strip_spacing(&normalized);
    let key_tight = strip_spacing(color_key);
    if !label_tight.is_empty()
        && !key_tight.is_empty()
        && (label_tight.contains(&key_tight) || key_tight.contains(&label_tight))
    {
        return Some(MatchStrategy::SpacelessContainment);
    }

    None
}

/// ラベルがカタログの色エントリと一致するか（述語版）
pub fn matches(label: &str, color_raw: &str, color_key: &str, synonyms: &ColorSynonyms) -> bool {
    match_strategy(label, color_raw, color_key, synonyms).is_some()
}

//! 適応的ラベル分割
//!
//! 複数の色名を不統一な区切りで連結したラベル
//! （例:「シルバー・ゴールド,グラファイト」）を、厳しい順の
//! 分割戦略で展開する。カタログの全色が埋まる戦略が見つかった
//! 時点で即座に確定する（それ以上緩い戦略は試さない。緩い分割が
//! 無関係な状態注記まで巻き込むのを防ぐため）。
//!
//! 戦略の並び順は契約の一部。並べ替えるとどの区切りが
//! 受理されるかが静かに変わる。

use crate::matcher;
use crate::synonym::ColorSynonyms;
use crate::types::{MissingColor, VariantCatalog};
use regex::Regex;
use std::collections::BTreeSet;

/// 分割戦略（名前と区切り文字集合）
#[derive(Debug, Clone, Copy)]
pub struct SplitStrategy {
    pub name: &'static str,
    pub separators: &'static [char],
}

/// 厳しい順の戦略リスト
pub const STRATEGIES: &[SplitStrategy] = &[
    SplitStrategy {
        name: "basic",
        separators: &['/', '・', ',', '、'],
    },
    SplitStrategy {
        name: "semicolon",
        separators: &['/', '・', ',', '、', ';'],
    },
    SplitStrategy {
        name: "ampersand",
        separators: &['/', '・', ',', '、', ';', '&'],
    },
    SplitStrategy {
        name: "pipe",
        separators: &['/', '・', ',', '、', ';', '&', '|'],
    },
    SplitStrategy {
        name: "aggressive",
        separators: &['/', '・', ',', '、', ';', '&', '|', ' ', '\t'],
    },
];

/// 分割の結果
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// 採用した戦略名
    pub strategy: &'static str,
    /// 分割後のラベル
    pub labels: Vec<String>,
    /// 一致したカタログ色の数（重複なし）
    pub matched_color_count: usize,
    /// カタログの全色が埋まったか
    pub is_full_match: bool,
    /// 埋まらなかったカタログ色の診断
    pub missing_colors: Vec<MissingColor>,
}

lazy_static::lazy_static! {
    // 色名の近くにある価格らしきテキスト
    static ref PRICE_NEAR_RE: Regex = Regex::new(r"[+\-▲¥] *\d").unwrap();
}

/// ラベルが複合の可能性があるか（分割を試す価値があるか）
pub fn looks_composite(label: &str) -> bool {
    let aggressive = STRATEGIES[STRATEGIES.len() - 1].separators;
    label.chars().any(|c| aggressive.contains(&c))
}

/// 色名の直後（おおよそ50文字以内）に価格らしきテキストがあるか
fn price_like_near(fragment: &str, color: &str) -> bool {
    let hay = fragment.to_lowercase();
    let needle = color.to_lowercase();
    match hay.find(&needle) {
        Some(pos) => {
            let after = &hay[pos + needle.len()..];
            let window: String = after.chars().take(50).collect();
            PRICE_NEAR_RE.is_match(&window)
        }
        None => false,
    }
}

/// 1戦略でラベルを分割し、一致したカタログ色のキー集合を返す
fn try_strategy(
    strategy: &SplitStrategy,
    label: &str,
    catalog: &VariantCatalog,
    synonyms: &ColorSynonyms,
) -> (Vec<String>, BTreeSet<String>) {
    let parts: Vec<String> = label
        .split(|c: char| strategy.separators.contains(&c))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let mut matched = BTreeSet::new();
    for (key, entry) in catalog.iter() {
        if parts
            .iter()
            .any(|p| matcher::matches(p, &entry.color, key, synonyms))
        {
            matched.insert(key.to_string());
        }
    }

    (parts, matched)
}

/// 複合ラベルを分割する
///
/// `fragment` は診断用の元テキスト（抽出漏れ疑いの判定に使う）。
/// 全色が埋まる戦略が見つかればそこで打ち切り。見つからなければ
/// 最多一致の戦略を採用し、埋まらなかった色を診断に載せる。
pub fn split_composite(
    label: &str,
    fragment: &str,
    catalog: &VariantCatalog,
    synonyms: &ColorSynonyms,
) -> SplitOutcome {
    let mut best: Option<(&'static str, Vec<String>, BTreeSet<String>)> = None;

    for strategy in STRATEGIES {
        let (parts, matched) = try_strategy(strategy, label, catalog, synonyms);

        // 全色が埋まったら即確定
        if !catalog.is_empty() && matched.len() == catalog.len() {
            return SplitOutcome {
                strategy: strategy.name,
                labels: parts,
                matched_color_count: matched.len(),
                is_full_match: true,
                missing_colors: Vec::new(),
            };
        }

        let better = match &best {
            Some((_, _, best_matched)) => matched.len() > best_matched.len(),
            None => true,
        };
        if better {
            best = Some((strategy.name, parts, matched));
        }
    }

    let (strategy, labels, matched) = best.unwrap_or(("basic", vec![label.to_string()], BTreeSet::new()));

    let missing_colors = catalog
        .iter()
        .filter(|(key, _)| !matched.contains(*key))
        .map(|(_, entry)| MissingColor {
            color: entry.color.clone(),
            likely_missed: price_like_near(fragment, &entry.color),
        })
        .collect();

    SplitOutcome {
        strategy,
        labels,
        matched_color_count: matched.len(),
        is_full_match: false,
        missing_colors,
    }
}

//! 境界ルール分類
//!
//! トークン列を差分（delta_specs）と絶対価格（abs_specs）の
//! 2つに振り分ける。手順:
//! 1. フラグメント全体から「全色±N」の一括変動を検出（トークンとは独立）
//! 2. ラベルごとに重複排除（ヒント優先度が最大のものを残す。同点は先勝ち）
//! 3. ヒント→バケットの既定対応で振り分け
//! 4. 金額の大きさによる境界ルールで再分類（適用時は診断に記録）
//!
//! 閾値（delta_ceiling / abs_floor）は設定値であり、ロジックに
//! 埋め込まない。

use crate::matcher::normalize_label;
use crate::types::{BoundaryOverride, EngineConfig, FormatHint, MatchToken};
use regex::Regex;
use std::collections::HashMap;

/// 分類の結果
#[derive(Debug, Clone, Default)]
pub struct ClassifyOutcome {
    pub delta_specs: Vec<(String, i64)>,
    pub abs_specs: Vec<(String, i64)>,
    pub all_color_delta: Option<i64>,
    pub overrides: Vec<BoundaryOverride>,
}

lazy_static::lazy_static! {
    // 「全色±N」の一括変動
    static ref ALL_COLOR_RE: Regex = Regex::new(
        r"(?i)(?:全色|全カラー|各色|オールカラー|all ?colou?rs?) *:? *(?P<sign>[+\-▲△])? *(?P<digits>\d[\d,]*) *(?:円|yen)? *(?P<word>引き|引|アップ|up)?"
    ).unwrap();
    // 「全色変動なし」
    static ref ALL_NO_CHANGE_RE: Regex = Regex::new(
        r"(?i)(?:全色|全カラー|各色|オールカラー|all ?colou?rs?) *:? *(?:変動なし|変わらず|据え置き|価格変更なし|no ?change|none)"
    ).unwrap();
}

/// フラグメント全体から一括変動を検出する
///
/// 符号がなく「引き」等の語もない場合はプラスの変動として扱う。
pub fn detect_all_color_delta(fragment: &str) -> Option<i64> {
    if ALL_NO_CHANGE_RE.is_match(fragment) {
        return Some(0);
    }

    let cap = ALL_COLOR_RE.captures(fragment)?;
    let magnitude: i64 = cap
        .name("digits")?
        .as_str()
        .replace(',', "")
        .parse()
        .ok()?;

    let negative = match cap.name("sign").map(|m| m.as_str()) {
        Some("-") | Some("▲") | Some("△") => true,
        Some(_) => false,
        None => matches!(cap.name("word").map(|m| m.as_str()), Some("引き") | Some("引")),
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// ラベルごとに重複排除する
///
/// ヒント優先度が最大のトークンを残す。同点は先に出現した方。
/// 戻り値は初出順。
fn dedup_by_label(tokens: &[MatchToken]) -> Vec<MatchToken> {
    let mut order: Vec<String> = Vec::new();
    let mut kept: HashMap<String, MatchToken> = HashMap::new();

    for token in tokens {
        let key = normalize_label(&token.label);
        let keep = match kept.get(&key) {
            // 同点は先に出現した方を残す
            Some(existing) => token.hint.priority() > existing.hint.priority(),
            None => {
                order.push(key.clone());
                true
            }
        };
        if keep {
            kept.insert(key, token.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|key| kept.remove(&key))
        .collect()
}

/// トークン列を差分と絶対価格に振り分ける
pub fn classify(
    tokens: &[MatchToken],
    fragment: &str,
    config: &EngineConfig,
) -> ClassifyOutcome {
    let mut outcome = ClassifyOutcome {
        all_color_delta: detect_all_color_delta(fragment),
        ..Default::default()
    };

    for token in dedup_by_label(tokens) {
        match token.hint {
            // 既定で差分になるヒント
            FormatHint::None | FormatHint::Signed | FormatHint::SeparatorMinus => {
                let magnitude = token.amount.abs();
                if token.hint == FormatHint::Signed && magnitude > config.abs_floor {
                    // 境界ルール: 符号付きでもこの大きさは買取価格全体の誤検出
                    outcome.overrides.push(BoundaryOverride {
                        label: token.label.clone(),
                        hint: token.hint,
                        amount: token.amount,
                        reason: format!(
                            "符号付きだが絶対値が閾値超のため絶対価格へ再分類（|{}| > {}）",
                            token.amount, config.abs_floor
                        ),
                    });
                    outcome.abs_specs.push((token.label, magnitude));
                } else {
                    outcome.delta_specs.push((token.label, token.amount));
                }
            }
            // 既定で絶対価格になるヒント
            FormatHint::AfterCurrencyMark | FormatHint::ColonPrefixed | FormatHint::PlainDigits => {
                if token.hint == FormatHint::PlainDigits && token.amount < config.delta_ceiling {
                    // 境界ルール: 小さい裸数字は価格全体ではなく差分の可能性が高い
                    outcome.overrides.push(BoundaryOverride {
                        label: token.label.clone(),
                        hint: token.hint,
                        amount: token.amount,
                        reason: format!(
                            "裸数字が閾値未満のため差分へ再分類（{} < {}）",
                            token.amount, config.delta_ceiling
                        ),
                    });
                    outcome.delta_specs.push((token.label, token.amount));
                } else {
                    outcome.abs_specs.push((token.label, token.amount));
                }
            }
        }
    }

    outcome
}

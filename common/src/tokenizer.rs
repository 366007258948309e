//! トークナイザ / フォーマット分類
//!
//! 前処理済みのテキストフラグメントを走査して `MatchToken` を出す。
//! 候補ごとに固定順で3つの形状を試す:
//! 1. ラベル + 変動なしマーカー → 金額0, ヒントNone
//! 2. ラベル + 通貨記号 + 数字 → AfterCurrencyMark
//! 3. ラベル + コロン? + 符号? + 数字 + 通貨語? → Signed / ColonPrefixed / PlainDigits
//!
//! 加えて「ラベル + 括弧」（括弧内に別色の調整が続く形）を
//! 金額0のトークンとして拾う。

use crate::types::{FormatHint, MatchToken};
use regex::Regex;

/// ラベルとして許容する最大文字数
const MAX_LABEL_CHARS: usize = 30;

/// 「全色」扱いの語（トークンとしては出さない。検出は分類器が行う）
pub const ALL_COLOR_WORDS: &[&str] = &[
    "全色", "全カラー", "各色", "オールカラー", "all colors", "all color", "allcolors",
];

/// 色名ではありえない語の停止リスト（保証・送料・状態などの定型句）
const STOPLIST: &[&str] = &[
    "保証", "送料", "付属品", "未開封", "開封済", "箱なし", "箱無", "赤ロム",
    "利用制限", "残債", "ジャンク", "画面割れ", "液晶", "バッテリー", "simロック",
    "店頭", "郵送", "減額", "査定", "キャンペーン",
    "warranty", "shipping", "unopened", "opened", "cracked", "battery", "unlocked",
];

/// 除外マーカー（この字で始まるラベルは対象外の注記）
const EXCLUSION_GLYPHS: &[char] = &['×', '✕', '✖', '☓', '※'];

/// 全角の数字・記号を半角へ寄せる
///
/// 以降の正規表現をASCII側の字種だけで書けるようにする。
/// カタカナ・漢字はそのまま。
pub fn canonicalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '　' => ' ',
            '，' => ',',
            '：' => ':',
            '；' => ';',
            '＋' => '+',
            '－' | '−' | '‐' | '–' | '—' => '-',
            '￥' => '¥',
            '（' => '(',
            '）' => ')',
            '／' => '/',
            '＆' => '&',
            '｜' => '|',
            _ => c,
        })
        .collect()
}

lazy_static::lazy_static! {
    // ラベル部: 数字・符号・コロン・通貨記号・括弧を含まない並び（区切り文字や空白は含みうる）
    // 変動なしマーカー
    static ref NO_CHANGE_RE: Regex = Regex::new(
        r"(?i)(?P<label>[^\d+\-▲△:¥\\()]+?) *:? *(?:変動なし|変わらず|据え置き|価格変更なし|値動きなし|\bno ?change|\bnone|\bn\.?c\.?)(?:\b|$)"
    ).unwrap();
    // 絶対価格形状: 通貨記号が数字の直前
    static ref ABS_RE: Regex = Regex::new(
        r"(?P<label>[^\d+\-▲△:¥\\()]+?) *[¥\\] *(?P<digits>\d[\d,]*)"
    ).unwrap();
    // 差分/裸数字形状
    static ref DELTA_RE: Regex = Regex::new(
        r"(?P<label>[^\d+\-▲△:¥\\()]+?)(?:(?P<colon>:) *)?(?P<sign>[+\-▲△])? *(?P<digits>\d[\d,]*) *(?P<unit>円|yen)?"
    ).unwrap();
    // 括弧前の裸ラベル（括弧内に別色の調整が続く形）
    static ref BARE_PAREN_RE: Regex = Regex::new(
        r"(?P<label>[^\d+\-▲△:¥\\()]+?) *\("
    ).unwrap();
}

/// ラベルが色名として妥当か
fn is_plausible_label(label: &str) -> bool {
    if label.is_empty() {
        return false;
    }
    if label.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if label.starts_with(EXCLUSION_GLYPHS) {
        return false;
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        return false;
    }

    let lowered = label.to_lowercase();
    // 「全色」は一括変動として別扱い
    if ALL_COLOR_WORDS.iter().any(|w| lowered == *w) {
        return false;
    }
    if STOPLIST.iter().any(|w| lowered.contains(w)) {
        return false;
    }

    true
}

/// 捕捉したラベルの端から区切り文字・空白を落とす
fn trim_label(raw: &str) -> &str {
    raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '/' | '・' | ',' | '、' | ';' | '&' | '|' | '=' | '"' | '\'' | '【' | '】' | '[' | ']' | '「' | '」')
    })
}

/// 数字列を金額へ
fn parse_amount(digits: &str) -> Option<i64> {
    digits.replace(',', "").parse::<i64>().ok()
}

/// 消費済みの範囲を `)` で塗りつぶす
///
/// `)` はラベル文字クラスに入らないので、後続パスのラベルが
/// 既出のマッチをまたいで伸びることがなくなる。1バイト文字で
/// 埋めるためバイトオフセットは変わらない。
fn mask_span(text: &mut String, start: usize, end: usize) {
    text.replace_range(start..end, &")".repeat(end - start));
}

/// フラグメントを走査してトークン列を出す
///
/// 入力は `canonicalize` 済みであること。形状ごとのパスを固定順で
/// 回し、採用したマッチは塗りつぶしてから次のパスへ進む。
/// 戻り値は出現位置順。
pub fn tokenize(fragment: &str) -> Vec<MatchToken> {
    let mut text = fragment.to_string();
    let mut tokens = Vec::new();

    // (1) 変動なしマーカー
    let mut spans = Vec::new();
    for cap in NO_CHANGE_RE.captures_iter(&text) {
        let whole = cap.get(0).unwrap();
        let label = trim_label(cap.name("label").unwrap().as_str());
        if !is_plausible_label(label) {
            continue;
        }
        spans.push((whole.start(), whole.end()));
        tokens.push(MatchToken {
            label: label.to_string(),
            amount: 0,
            hint: FormatHint::None,
            position: whole.start(),
        });
    }
    for (start, end) in spans {
        mask_span(&mut text, start, end);
    }

    // (2) 通貨記号 + 数字（絶対価格形状）
    let mut spans = Vec::new();
    for cap in ABS_RE.captures_iter(&text) {
        let whole = cap.get(0).unwrap();
        let label = trim_label(cap.name("label").unwrap().as_str());
        if !is_plausible_label(label) {
            continue;
        }
        let amount = match parse_amount(cap.name("digits").unwrap().as_str()) {
            Some(v) => v,
            None => continue,
        };
        spans.push((whole.start(), whole.end()));
        tokens.push(MatchToken {
            label: label.to_string(),
            amount,
            hint: FormatHint::AfterCurrencyMark,
            position: whole.start(),
        });
    }
    for (start, end) in spans {
        mask_span(&mut text, start, end);
    }

    // (3) コロン? + 符号? + 数字 + 通貨語?
    let mut spans = Vec::new();
    for cap in DELTA_RE.captures_iter(&text) {
        let whole = cap.get(0).unwrap();
        let label_raw = cap.name("label").unwrap().as_str();
        let label = trim_label(label_raw);
        if !is_plausible_label(label) {
            continue;
        }
        let digits = cap.name("digits").unwrap().as_str();
        let magnitude = match parse_amount(digits) {
            Some(v) => v,
            None => continue,
        };

        let has_colon = cap.name("colon").is_some();
        let sign = cap.name("sign").and_then(|m| m.as_str().chars().next());

        let (hint, amount) = match sign {
            Some(s) => {
                let negative = matches!(s, '-' | '▲' | '△');
                let amount = if negative { -magnitude } else { magnitude };
                // ラベル直結のマイナスは符号か区切りか曖昧
                let glued = !has_colon
                    && s == '-'
                    && !label_raw.ends_with(|c: char| c.is_whitespace());
                if glued {
                    (FormatHint::SeparatorMinus, amount)
                } else {
                    (FormatHint::Signed, amount)
                }
            }
            None if has_colon => (FormatHint::ColonPrefixed, magnitude),
            None => (FormatHint::PlainDigits, magnitude),
        };

        spans.push((whole.start(), whole.end()));
        tokens.push(MatchToken {
            label: label.to_string(),
            amount,
            hint,
            position: whole.start(),
        });
    }
    for (start, end) in spans {
        mask_span(&mut text, start, end);
    }

    // (4) 括弧前の裸ラベル → 金額0
    for cap in BARE_PAREN_RE.captures_iter(&text) {
        let whole = cap.get(0).unwrap();
        let label = trim_label(cap.name("label").unwrap().as_str());
        if !is_plausible_label(label) {
            continue;
        }
        tokens.push(MatchToken {
            label: label.to_string(),
            amount: 0,
            hint: FormatHint::None,
            position: whole.start(),
        });
    }

    tokens.sort_by_key(|t| t.position);
    tokens
}

//! 価格抽出エンジンの型定義
//!
//! エンジン全体で共有される型:
//! - VariantCatalog: 1つの（機種, 容量）グループに属する色バリアントの一覧
//! - MatchToken / FormatHint: トークナイザの出力
//! - PriceDecomposition: 分類器の出力（リゾルバの入力）
//! - ResolvedPriceRecord / PriceSource: 最終出力
//! - EngineConfig / Diagnostics: 設定と診断情報

use crate::matcher::normalize_label;
use serde::{Deserialize, Serialize};

/// 金額の表記形状（フォーマットヒント）
///
/// 「金額がどう書かれていたか」の分類。差分か絶対価格かの
/// 意図推定に使う。同一ラベルに複数トークンが競合したときは
/// `priority` の大きい方が勝つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatHint {
    /// 装飾なし（変動なしマーカーや括弧前の裸ラベル）
    None,
    /// ラベル直結のマイナス（「ブルー-2000」。符号か区切りか曖昧）
    SeparatorMinus,
    /// 明示的な符号付き（+2000 / -3000 / ▲500）
    Signed,
    /// 裸の数字のみ
    PlainDigits,
    /// コロン導入（「シルバー：2000」）
    ColonPrefixed,
    /// 通貨記号直後（「¥98000」）
    AfterCurrencyMark,
}

impl FormatHint {
    /// 競合時の優先度（大きいほど強い）
    ///
    /// AfterCurrencyMark > ColonPrefixed > PlainDigits > Signed > SeparatorMinus > None
    pub fn priority(self) -> u8 {
        match self {
            FormatHint::AfterCurrencyMark => 5,
            FormatHint::ColonPrefixed => 4,
            FormatHint::PlainDigits => 3,
            FormatHint::Signed => 2,
            FormatHint::SeparatorMinus => 1,
            FormatHint::None => 0,
        }
    }
}

/// トークナイザが出力する（ラベル, 金額, ヒント）の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchToken {
    /// 原文のままのラベル（色名候補）
    pub label: String,
    /// 金額（円）。符号付きヒントでは負になりうる
    pub amount: i64,
    /// 表記形状
    pub hint: FormatHint,
    /// フラグメント内の出現位置（バイトオフセット）
    pub position: usize,
}

/// カタログの1エントリ（具体的な色バリアント）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub variant_id: i64,
    /// ショップ側の生の色表記
    pub color: String,
}

/// 1つの（機種, 容量）グループの色カタログ
///
/// 呼び出し側が構築してエンジンに渡す。挿入順がそのまま
/// リゾルバの出力順になる。抽出中は不変。
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    entries: Vec<(String, CatalogEntry)>,
}

impl VariantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 色バリアントを追加する。キーは正規化した色名
    pub fn insert(&mut self, variant_id: i64, color: &str) {
        let key = normalize_label(color);
        self.entries.push((
            key,
            CatalogEntry {
                variant_id,
                color: color.trim().to_string(),
            },
        ));
    }

    /// (正規化キー, エントリ) を挿入順に返す
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 1行分の抽出結果を分解したもの（リゾルバの入力）
///
/// `delta_specs` / `abs_specs` のラベルは原文のフリーテキストのまま。
/// バリアントIDへの解決はリゾルバが行う。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceDecomposition {
    /// 見出し価格（基準価格）
    pub base_price: Option<i64>,
    /// 「全色±N」の一括変動（検出された場合）
    pub all_color_delta: Option<i64>,
    /// 色ごとの差分（ラベル, 符号付き金額）
    pub delta_specs: Vec<(String, i64)>,
    /// 色ごとの絶対価格（ラベル, 金額）
    pub abs_specs: Vec<(String, i64)>,
    /// 抽出経路（"token" / "adaptive_split" / "none"）
    pub extraction_method: String,
    /// 前処理後の入力テキスト
    pub source_text: String,
}

/// 価格の由来
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// 色ごとの絶対価格の上書き
    ExplicitAbs,
    /// 基準価格 + 色ごとの差分
    DeltaFromBase,
    /// 基準価格 + 全色一括の差分
    AllColorDelta,
    /// 基準価格そのまま（個別の情報なし）
    BaseOnly,
    /// 「全色変動なし」の明示
    NoChange,
}

/// カタログの1色に対する最終価格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPriceRecord {
    pub variant_id: i64,
    /// カタログ側の色表記
    pub color: String,
    /// 絶対価格（円）
    pub price: i64,
    pub source: PriceSource,
}

/// エンジン設定
///
/// 閾値はロジックに埋め込まず、呼び出しごとに不変の設定として渡す。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// 裸数字をこの値未満なら差分とみなす
    pub delta_ceiling: i64,
    /// 符号付きでも絶対値がこの値超なら絶対価格とみなす
    pub abs_floor: i64,
    /// 個別情報のない色に基準価格のままの行を出すか
    pub emit_default_rows: bool,
    /// 0円以下になった行を捨てるか
    pub skip_non_positive: bool,
    /// 複合ラベルの適応分割を有効にするか
    pub enable_adaptive_split: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delta_ceiling: 20_000,
            abs_floor: 100_000,
            emit_default_rows: true,
            skip_non_positive: true,
            enable_adaptive_split: true,
        }
    }
}

/// 分割時に取りこぼした可能性のあるカタログ色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingColor {
    pub color: String,
    /// 色名の直後に価格らしきテキストがあった（抽出漏れの疑い）
    pub likely_missed: bool,
}

/// 境界ルールによる再分類の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryOverride {
    pub label: String,
    pub hint: FormatHint,
    pub amount: i64,
    pub reason: String,
}

/// 呼び出し側へ返す診断情報
///
/// エンジンは内部でログを出さず、観測可能な事実をここに集める。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// カタログのどの色にも解決できなかったラベル
    pub unknown_labels: Vec<String>,
    /// 分割で取りこぼした可能性のある色
    pub missing_colors: Vec<MissingColor>,
    /// 適用された境界ルール
    pub boundary_overrides: Vec<BoundaryOverride>,
}

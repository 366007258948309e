//! 価格リゾルバ
//!
//! `PriceDecomposition` からカタログの各色の最終価格を決める。
//! 色ごとの優先順位（高い順）:
//! 1. 色ごとの絶対価格（abs_specs）
//! 2. 色ごとの差分（delta_specs。変動なし = 差分0もここ）
//! 3. 全色一括の差分
//! 4. 基準価格そのまま（emit_default_rows 有効時）
//! 5. 何も出さない
//!
//! 同じ入力には常に同じ出力（冪等）。出力順はカタログの挿入順。

use crate::matcher;
use crate::synonym::ColorSynonyms;
use crate::types::{
    EngineConfig, PriceDecomposition, PriceSource, ResolvedPriceRecord, VariantCatalog,
};

/// リゾルバの出力
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    pub records: Vec<ResolvedPriceRecord>,
    /// どのカタログ色にも解決できなかったラベル
    pub unknown_labels: Vec<String>,
}

/// ラベル一覧から対象色に一致する最初の金額を探す
fn find_spec_amount(
    specs: &[(String, i64)],
    color_raw: &str,
    color_key: &str,
    synonyms: &ColorSynonyms,
) -> Option<i64> {
    specs
        .iter()
        .find(|(label, _)| matcher::matches(label, color_raw, color_key, synonyms))
        .map(|(_, amount)| *amount)
}

/// 分解結果をカタログの各色の絶対価格へ解決する
pub fn resolve(
    decomposition: &PriceDecomposition,
    catalog: &VariantCatalog,
    config: &EngineConfig,
    synonyms: &ColorSynonyms,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    for (key, entry) in catalog.iter() {
        let resolved = resolve_color(decomposition, &entry.color, key, config, synonyms);
        if let Some((price, source)) = resolved {
            if config.skip_non_positive && price <= 0 {
                continue;
            }
            outcome.records.push(ResolvedPriceRecord {
                variant_id: entry.variant_id,
                color: entry.color.clone(),
                price,
                source,
            });
        }
    }

    // カタログに解決できなかったラベルを診断へ
    let all_labels = decomposition
        .abs_specs
        .iter()
        .chain(decomposition.delta_specs.iter())
        .map(|(label, _)| label);
    for label in all_labels {
        let matched = catalog
            .iter()
            .any(|(key, entry)| matcher::matches(label, &entry.color, key, synonyms));
        if !matched && !outcome.unknown_labels.contains(label) {
            outcome.unknown_labels.push(label.clone());
        }
    }

    outcome
}

/// 1色分の優先順位を適用する
fn resolve_color(
    decomposition: &PriceDecomposition,
    color_raw: &str,
    color_key: &str,
    config: &EngineConfig,
    synonyms: &ColorSynonyms,
) -> Option<(i64, PriceSource)> {
    // (1) 色ごとの絶対価格が常に勝つ
    if let Some(amount) =
        find_spec_amount(&decomposition.abs_specs, color_raw, color_key, synonyms)
    {
        return Some((amount, PriceSource::ExplicitAbs));
    }

    // (2) 色ごとの差分（変動なし = 差分0もここ）
    if let Some(delta) =
        find_spec_amount(&decomposition.delta_specs, color_raw, color_key, synonyms)
    {
        let base = decomposition.base_price?;
        return Some((base + delta, PriceSource::DeltaFromBase));
    }

    // (3) 全色一括の差分
    if let Some(delta) = decomposition.all_color_delta {
        let base = decomposition.base_price?;
        let source = if delta == 0 {
            PriceSource::NoChange
        } else {
            PriceSource::AllColorDelta
        };
        return Some((base + delta, source));
    }

    // (4) 基準価格そのまま
    if config.emit_default_rows {
        if let Some(base) = decomposition.base_price {
            return Some((base, PriceSource::BaseOnly));
        }
    }

    // (5) 何も出さない
    None
}

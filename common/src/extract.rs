//! 抽出パイプライン
//!
//! 生テキスト → トークナイズ → 複合ラベル展開 → 境界ルール分類 →
//! 価格解決、を1回の呼び出しにまとめる。エンジンは純粋で、
//! ネットワークもストレージも触らない。行単位で並列に呼んでも安全。
//!
//! ショップごとの定型文の除去は注入された前処理フックが行う。
//! エンジン本体はショップを知らない。

use crate::classifier;
use crate::resolver;
use crate::splitter;
use crate::synonym::ColorSynonyms;
use crate::tokenizer;
use crate::types::{
    Diagnostics, EngineConfig, MatchToken, PriceDecomposition, ResolvedPriceRecord, VariantCatalog,
};

/// 抽出の結果一式
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// カタログ各色の最終価格
    pub records: Vec<ResolvedPriceRecord>,
    /// リゾルバに渡した分解結果（呼び出し側の検証用）
    pub decomposition: PriceDecomposition,
    /// 診断情報
    pub diagnostics: Diagnostics,
}

/// 複数フラグメントから価格を抽出する
///
/// `preprocess` はショップ固有の定型文除去フック。
pub fn extract(
    fragments: &[String],
    base_price: Option<i64>,
    catalog: &VariantCatalog,
    config: &EngineConfig,
    synonyms: &ColorSynonyms,
    preprocess: &dyn Fn(&str) -> String,
) -> Extraction {
    let joined = fragments
        .iter()
        .map(|f| preprocess(f))
        .collect::<Vec<_>>()
        .join("\n");
    let canonical = tokenizer::canonicalize(&joined);

    let tokens = tokenizer::tokenize(&canonical);
    let mut diagnostics = Diagnostics::default();
    let mut extraction_method = if tokens.is_empty() { "none" } else { "token" };

    // 複合ラベルの展開
    let mut expanded: Vec<MatchToken> = Vec::new();
    for token in tokens {
        if config.enable_adaptive_split && splitter::looks_composite(&token.label) {
            let outcome = splitter::split_composite(&token.label, &canonical, catalog, synonyms);
            // 2色以上に割れたときだけ展開を採用する
            if outcome.matched_color_count >= 2 {
                extraction_method = "adaptive_split";
                if !outcome.is_full_match {
                    diagnostics.missing_colors.extend(outcome.missing_colors);
                }
                for label in outcome.labels {
                    expanded.push(MatchToken {
                        label,
                        amount: token.amount,
                        hint: token.hint,
                        position: token.position,
                    });
                }
                continue;
            }
        }
        expanded.push(token);
    }

    let classified = classifier::classify(&expanded, &canonical, config);
    diagnostics.boundary_overrides = classified.overrides;

    // トークンはないが一括変動だけ取れた場合
    if expanded.is_empty() && classified.all_color_delta.is_some() {
        extraction_method = "all_color";
    }

    let decomposition = PriceDecomposition {
        base_price,
        all_color_delta: classified.all_color_delta,
        delta_specs: classified.delta_specs,
        abs_specs: classified.abs_specs,
        extraction_method: extraction_method.to_string(),
        source_text: joined,
    };

    let resolved = resolver::resolve(&decomposition, catalog, config, synonyms);
    diagnostics.unknown_labels = resolved.unknown_labels;

    Extraction {
        records: resolved.records,
        decomposition,
        diagnostics,
    }
}

/// 単一フラグメント版
pub fn extract_one(
    fragment: &str,
    base_price: Option<i64>,
    catalog: &VariantCatalog,
    config: &EngineConfig,
    synonyms: &ColorSynonyms,
    preprocess: &dyn Fn(&str) -> String,
) -> Extraction {
    extract(
        &[fragment.to_string()],
        base_price,
        catalog,
        config,
        synonyms,
        preprocess,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceSource;

    fn catalog(colors: &[(i64, &str)]) -> VariantCatalog {
        let mut c = VariantCatalog::new();
        for (id, color) in colors {
            c.insert(*id, color);
        }
        c
    }

    fn run(fragment: &str, base_price: Option<i64>, catalog: &VariantCatalog) -> Extraction {
        extract_one(
            fragment,
            base_price,
            catalog,
            &EngineConfig::default(),
            &ColorSynonyms::builtin(),
            &|s| s.to_string(),
        )
    }

    #[test]
    fn test_delta_and_no_change() {
        let catalog = catalog(&[(1, "Blue"), (2, "Silver"), (3, "Black")]);
        let result = run("Blue -2000 / Silver none", Some(100_000), &catalog);

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[0].price, 98_000);
        assert_eq!(result.records[0].source, PriceSource::DeltaFromBase);
        assert_eq!(result.records[1].price, 100_000);
        assert_eq!(result.records[1].source, PriceSource::DeltaFromBase);
        assert_eq!(result.records[2].price, 100_000);
        assert_eq!(result.records[2].source, PriceSource::BaseOnly);
    }

    #[test]
    fn test_all_color_delta() {
        let catalog = catalog(&[(1, "Red"), (2, "Green")]);
        let result = run("all colors -5000", Some(200_000), &catalog);

        assert_eq!(result.records.len(), 2);
        for record in &result.records {
            assert_eq!(record.price, 195_000);
            assert_eq!(record.source, PriceSource::AllColorDelta);
        }
    }

    #[test]
    fn test_absolute_override_far_from_base() {
        let catalog = catalog(&[(1, "Orange"), (2, "Black")]);
        let result = run("Orange¥230500", Some(50_000), &catalog);

        assert_eq!(result.records[0].price, 230_500);
        assert_eq!(result.records[0].source, PriceSource::ExplicitAbs);
        assert_eq!(result.records[1].price, 50_000);
        assert_eq!(result.records[1].source, PriceSource::BaseOnly);
    }

    #[test]
    fn test_paren_group_with_zero_delta_head() {
        let catalog = catalog(&[(1, "Silver"), (2, "Orange")]);
        let result = run("Silver(Orange-2500)", Some(100_000), &catalog);

        assert_eq!(result.records[0].price, 100_000);
        assert_eq!(result.records[0].source, PriceSource::DeltaFromBase);
        assert_eq!(result.records[1].price, 97_500);
        assert_eq!(result.records[1].source, PriceSource::DeltaFromBase);
    }

    #[test]
    fn test_composite_label_expansion() {
        let catalog = catalog(&[(1, "シルバー"), (2, "ゴールド"), (3, "ブルー")]);
        let result = run("シルバー/ゴールド -5000 ブルー変動なし", Some(80_000), &catalog);

        assert_eq!(result.decomposition.extraction_method, "adaptive_split");
        assert_eq!(result.records[0].price, 75_000);
        assert_eq!(result.records[1].price, 75_000);
        assert_eq!(result.records[2].price, 80_000);
        assert_eq!(result.records[2].source, PriceSource::DeltaFromBase);
    }

    #[test]
    fn test_unparseable_fragment_gives_base_only() {
        let catalog = catalog(&[(1, "ブルー")]);
        let result = run("本日も営業しております", Some(70_000), &catalog);

        assert_eq!(result.decomposition.extraction_method, "none");
        assert!(result.decomposition.delta_specs.is_empty());
        assert_eq!(result.records[0].price, 70_000);
        assert_eq!(result.records[0].source, PriceSource::BaseOnly);
    }

    #[test]
    fn test_unparseable_without_base_gives_nothing() {
        let catalog = catalog(&[(1, "ブルー")]);
        let result = run("本日も営業しております", None, &catalog);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_multiple_fragments_joined() {
        let catalog = catalog(&[(1, "ブルー"), (2, "レッド")]);
        let result = extract(
            &["ブルー -2000".to_string(), "レッド +1000".to_string()],
            Some(100_000),
            &catalog,
            &EngineConfig::default(),
            &ColorSynonyms::builtin(),
            &|s| s.to_string(),
        );

        assert_eq!(result.records[0].price, 98_000);
        assert_eq!(result.records[1].price, 101_000);
    }

    #[test]
    fn test_preprocess_hook_applied() {
        let catalog = catalog(&[(1, "ブルー")]);
        let strip_banner = |s: &str| s.replace("【価格改定】", "");
        let result = extract_one(
            "【価格改定】ブルー -2000",
            Some(100_000),
            &catalog,
            &EngineConfig::default(),
            &ColorSynonyms::builtin(),
            &strip_banner,
        );

        assert_eq!(result.records[0].price, 98_000);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let catalog = catalog(&[(1, "Blue"), (2, "Silver")]);
        let first = run("Blue -2000 / Silver none", Some(100_000), &catalog);
        let second = run("Blue -2000 / Silver none", Some(100_000), &catalog);

        assert_eq!(first.records, second.records);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_boundary_override_surfaces_in_diagnostics() {
        let catalog = catalog(&[(1, "ブルー")]);
        let result = run("ブルー 15000", Some(100_000), &catalog);

        assert_eq!(result.diagnostics.boundary_overrides.len(), 1);
        // 15000は裸数字の境界ルールで差分扱い
        assert_eq!(result.records[0].price, 115_000);
        assert_eq!(result.records[0].source, PriceSource::DeltaFromBase);
    }
}

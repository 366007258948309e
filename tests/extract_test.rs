//! 抽出エンジンのエンドツーエンドテスト
//!
//! 公開APIだけを使い、代表的なショップ表記のシナリオを検証する。

use kaitori_price_common::{
    extract_one, ColorSynonyms, EngineConfig, FormatHint, PriceSource, VariantCatalog,
};

fn catalog(colors: &[(i64, &str)]) -> VariantCatalog {
    let mut c = VariantCatalog::new();
    for (id, color) in colors {
        c.insert(*id, color);
    }
    c
}

fn run(fragment: &str, base_price: Option<i64>, catalog: &VariantCatalog) -> kaitori_price_common::Extraction {
    extract_one(
        fragment,
        base_price,
        catalog,
        &EngineConfig::default(),
        &ColorSynonyms::builtin(),
        &|s| s.to_string(),
    )
}

/// シナリオ: 符号付き差分 + 変動なし + 既定行
#[test]
fn test_scenario_delta_and_no_change() {
    let catalog = catalog(&[(1, "Blue"), (2, "Silver"), (3, "Black")]);
    let result = run("Blue -2000 / Silver none", Some(100_000), &catalog);

    assert_eq!(result.records.len(), 3);

    let blue = &result.records[0];
    assert_eq!((blue.variant_id, blue.price, blue.source), (1, 98_000, PriceSource::DeltaFromBase));

    // 変動なしは差分0として扱う
    let silver = &result.records[1];
    assert_eq!((silver.price, silver.source), (100_000, PriceSource::DeltaFromBase));

    // 個別情報のない色は基準価格のまま
    let black = &result.records[2];
    assert_eq!((black.price, black.source), (100_000, PriceSource::BaseOnly));
}

/// シナリオ: 全色一括の変動
#[test]
fn test_scenario_all_colors() {
    let catalog = catalog(&[(1, "Red"), (2, "Green")]);
    let result = run("all colors -5000", Some(200_000), &catalog);

    assert_eq!(result.records.len(), 2);
    for record in &result.records {
        assert_eq!(record.price, 195_000);
        assert_eq!(record.source, PriceSource::AllColorDelta);
    }
}

/// シナリオ: 基準価格から大きく離れた絶対価格の上書き
#[test]
fn test_scenario_absolute_override() {
    let catalog = catalog(&[(1, "Orange"), (2, "Black")]);
    let result = run("Orange¥230500", Some(50_000), &catalog);

    let orange = &result.records[0];
    assert_eq!((orange.price, orange.source), (230_500, PriceSource::ExplicitAbs));

    let black = &result.records[1];
    assert_eq!((black.price, black.source), (50_000, PriceSource::BaseOnly));
}

/// シナリオ: 括弧グループ（先頭ラベルは差分0、括弧内は明示差分）
#[test]
fn test_scenario_paren_group() {
    let catalog = catalog(&[(1, "Silver"), (2, "Orange")]);
    // 全色変動があっても括弧内の明示差分が勝つ
    let result = run("全色-1000 Silver(Orange-2500)", Some(100_000), &catalog);

    let silver = &result.records[0];
    assert_eq!((silver.price, silver.source), (100_000, PriceSource::DeltaFromBase));

    let orange = &result.records[1];
    assert_eq!((orange.price, orange.source), (97_500, PriceSource::DeltaFromBase));
}

/// 境界ルール: 裸数字15000は差分、25000は絶対価格
#[test]
fn test_boundary_plain_digits() {
    let catalog = catalog(&[(1, "ブルー")]);

    let result = run("ブルー 15000", Some(100_000), &catalog);
    assert_eq!(result.records[0].price, 115_000);
    assert_eq!(result.records[0].source, PriceSource::DeltaFromBase);
    assert_eq!(result.diagnostics.boundary_overrides.len(), 1);
    assert_eq!(result.diagnostics.boundary_overrides[0].hint, FormatHint::PlainDigits);

    let result = run("ブルー 25000", Some(100_000), &catalog);
    assert_eq!(result.records[0].price, 25_000);
    assert_eq!(result.records[0].source, PriceSource::ExplicitAbs);
    assert!(result.diagnostics.boundary_overrides.is_empty());
}

/// 境界ルール: 符号付きでも大きすぎる数字は絶対価格
#[test]
fn test_boundary_signed_large_magnitude() {
    let catalog = catalog(&[(1, "ブルー")]);
    let result = run("ブルー -120000", Some(100_000), &catalog);

    assert_eq!(result.records[0].price, 120_000);
    assert_eq!(result.records[0].source, PriceSource::ExplicitAbs);
    assert_eq!(result.diagnostics.boundary_overrides.len(), 1);
    assert_eq!(result.diagnostics.boundary_overrides[0].hint, FormatHint::Signed);
}

/// 日本語表記の混在フラグメント
#[test]
fn test_japanese_fragment() {
    let catalog = catalog(&[(1, "ブルー"), (2, "シルバー"), (3, "ゴールド")]);
    let result = run(
        "ブルー▲2000／シルバー変動なし／ゴールド：98000",
        Some(100_000),
        &catalog,
    );

    assert_eq!(result.records[0].price, 98_000);
    assert_eq!(result.records[0].source, PriceSource::DeltaFromBase);
    assert_eq!(result.records[1].price, 100_000);
    // コロン導入の98000は絶対価格
    assert_eq!(result.records[2].price, 98_000);
    assert_eq!(result.records[2].source, PriceSource::ExplicitAbs);
}

/// 同義語経由の解決（「青」→カタログ「ブルー」）
#[test]
fn test_synonym_resolution() {
    let catalog = catalog(&[(1, "ブルー"), (2, "ホワイト")]);
    let result = run("青 -3000 / スターライト +500", Some(90_000), &catalog);

    assert_eq!(result.records[0].price, 87_000);
    assert_eq!(result.records[1].price, 90_500);
    assert!(result.diagnostics.unknown_labels.is_empty());
}

/// カタログにない色は診断に載る（エラーにはならない）
#[test]
fn test_unknown_label_is_diagnostic_not_error() {
    let catalog = catalog(&[(1, "ブルー")]);
    let result = run("ブルー -2000 / チタンブロンズ -500", Some(100_000), &catalog);

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].price, 98_000);
    assert_eq!(
        result.diagnostics.unknown_labels,
        vec!["チタンブロンズ".to_string()]
    );
}

/// 解析不能フラグメントは空の分解結果になる（クラッシュしない）
#[test]
fn test_unparseable_fragment() {
    let catalog = catalog(&[(1, "ブルー")]);

    let result = run("セール開催中！お見逃しなく", Some(100_000), &catalog);
    assert_eq!(result.decomposition.extraction_method, "none");
    assert_eq!(result.records[0].source, PriceSource::BaseOnly);

    // 基準価格もなければ何も出ない
    let result = run("セール開催中！お見逃しなく", None, &catalog);
    assert!(result.records.is_empty());
}

/// 複合ラベルの展開（1つの金額を複数色で共有）
#[test]
fn test_composite_label_shares_amount() {
    let catalog = catalog(&[(1, "シルバー"), (2, "ゴールド"), (3, "ブルー")]);
    let result = run("シルバー・ゴールド -5000", Some(80_000), &catalog);

    assert_eq!(result.decomposition.extraction_method, "adaptive_split");
    assert_eq!(result.records[0].price, 75_000);
    assert_eq!(result.records[1].price, 75_000);
    assert_eq!(result.records[2].price, 80_000);
    assert_eq!(result.records[2].source, PriceSource::BaseOnly);
}

/// 適応分割を無効にすると複合ラベルも包含照合のまま
#[test]
fn test_adaptive_split_disabled() {
    let catalog = catalog(&[(1, "シルバー"), (2, "ゴールド")]);
    let config = EngineConfig {
        enable_adaptive_split: false,
        ..Default::default()
    };
    let result = extract_one(
        "シルバー・ゴールド -5000",
        Some(80_000),
        &catalog,
        &config,
        &ColorSynonyms::builtin(),
        &|s| s.to_string(),
    );

    assert_eq!(result.decomposition.extraction_method, "token");
    // 包含照合で両色とも解決はされる
    assert_eq!(result.records[0].price, 75_000);
    assert_eq!(result.records[1].price, 75_000);
}

/// 冪等性: 同じ入力からは常に同じ出力
#[test]
fn test_idempotence() {
    let catalog = catalog(&[(1, "Blue"), (2, "Silver"), (3, "Black")]);
    let first = run("Blue -2000 / Silver none / 全色+500", Some(100_000), &catalog);

    for _ in 0..3 {
        let again = run("Blue -2000 / Silver none / 全色+500", Some(100_000), &catalog);
        assert_eq!(first.records, again.records);
        assert_eq!(first.diagnostics, again.diagnostics);
        assert_eq!(first.decomposition, again.decomposition);
    }
}

/// 同一ラベルの競合はヒント優先度で決まる
#[test]
fn test_conflicting_tokens_resolved_by_priority() {
    let catalog = catalog(&[(1, "ブルー")]);
    // Signed(-2000) と AfterCurrencyMark(95000) が競合 → 通貨記号が勝つ
    let result = run("ブルー -2000 ブルー¥95000", Some(100_000), &catalog);

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].price, 95_000);
    assert_eq!(result.records[0].source, PriceSource::ExplicitAbs);
}

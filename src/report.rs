//! 抽出結果の出力
//!
//! エンジンの出すレコードにショップ識別子と取得時刻を付けて
//! JSON / CSVへ書き出す。時刻の付与は呼び出し側（ここ）の責務で、
//! エンジン自体は時刻を知らない。

use crate::error::Result;
use crate::shops::ScrapedRow;
use kaitori_price_common::{PriceSource, ResolvedPriceRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 永続化する1行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReport {
    pub shop: String,
    pub model: String,
    pub capacity: String,
    pub variant_id: i64,
    pub color: String,
    pub price: i64,
    pub source: PriceSource,
    /// 取得時刻（ISO 8601）
    pub fetched_at: String,
}

/// エンジンのレコードを出力行へ変換する
pub fn build_reports(
    row: &ScrapedRow,
    records: &[ResolvedPriceRecord],
    fetched_at: &str,
) -> Vec<PriceReport> {
    records
        .iter()
        .map(|record| PriceReport {
            shop: row.shop.clone(),
            model: row.model.clone(),
            capacity: row.capacity.clone(),
            variant_id: record.variant_id,
            color: record.color.clone(),
            price: record.price,
            source: record.source,
            fetched_at: fetched_at.to_string(),
        })
        .collect()
}

/// JSONで書き出す
pub fn write_json(path: &Path, reports: &[PriceReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// CSVで書き出す
pub fn write_csv(path: &Path, reports: &[PriceReport]) -> Result<()> {
    let mut lines = vec!["shop,model,capacity,variantId,color,price,source,fetchedAt".to_string()];
    for report in reports {
        lines.push(format!(
            "{},{},{},{},{},{},{},{}",
            escape_csv(&report.shop),
            escape_csv(&report.model),
            escape_csv(&report.capacity),
            report.variant_id,
            escape_csv(&report.color),
            report.price,
            source_label(report.source),
            report.fetched_at,
        ));
    }
    std::fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

fn source_label(source: PriceSource) -> &'static str {
    match source {
        PriceSource::ExplicitAbs => "explicitAbs",
        PriceSource::DeltaFromBase => "deltaFromBase",
        PriceSource::AllColorDelta => "allColorDelta",
        PriceSource::BaseOnly => "baseOnly",
        PriceSource::NoChange => "noChange",
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kaitori_price_rust::{cli, config, error, report, shops};

use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::{KaitoriError, Result};
use kaitori_price_common::{extract, ColorSynonyms, Diagnostics, EngineConfig};
use rayon::prelude::*;
use report::PriceReport;
use shops::ScrapedRow;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { input, output, shop, format, diagnostics } => {
            println!("💴 kaitori-price - 価格抽出\n");

            // 1. 行の読み込み
            println!("[1/3] 入力を読み込み中...");
            let mut rows = load_rows(&input)?;
            if let Some(shop) = shop {
                for row in &mut rows {
                    row.shop = shop.clone();
                }
            }
            println!("✔ {}行を読み込み\n", rows.len());

            // 2. 抽出
            println!("[2/3] 抽出中...");
            let engine_config = config.engine_config();
            let synonyms = config.load_synonyms()?;
            let fetched_at = chrono::Local::now().to_rfc3339();
            let (reports, all_diagnostics) =
                extract_rows(&rows, &engine_config, &synonyms, &fetched_at);
            println!("✔ {}件の価格レコードを抽出\n", reports.len());

            if cli.verbose || diagnostics {
                print_diagnostics(&all_diagnostics);
            }

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| PathBuf::from("prices.json"));
            write_output(&output, &reports, format)?;

            println!("\n✅ 抽出完了");
        }

        Commands::Run { folder, output, recursive, format } => {
            println!("🚀 kaitori-price - 一括処理\n");

            // 1. Scan
            println!("[1/3] 行JSONをスキャン中...");
            let files = scan_folder(&folder, recursive)?;
            println!("✔ {}ファイルを検出\n", files.len());

            if files.is_empty() {
                return Err(KaitoriError::NoRowsFound(folder.display().to_string()));
            }

            // 2. Extract
            println!("[2/3] 抽出中...");
            let engine_config = config.engine_config();
            let synonyms = config.load_synonyms()?;
            let fetched_at = chrono::Local::now().to_rfc3339();

            let mut rows = Vec::new();
            for file in &files {
                rows.extend(load_rows(file)?);
            }

            let bar = ProgressBar::new(rows.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            // 行単位で独立なので並列に回す
            let results: Vec<(Vec<PriceReport>, Diagnostics)> = rows
                .par_iter()
                .map(|row| {
                    let result = extract_row(row, &engine_config, &synonyms, &fetched_at);
                    bar.inc(1);
                    result
                })
                .collect();
            bar.finish_and_clear();

            let mut reports = Vec::new();
            let mut all_diagnostics = Vec::new();
            for (row_reports, diagnostics) in results {
                reports.extend(row_reports);
                all_diagnostics.push(diagnostics);
            }
            println!("✔ {}行から{}件の価格レコードを抽出\n", rows.len(), reports.len());

            if cli.verbose {
                print_diagnostics(&all_diagnostics);
            }

            // 3. Export
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join("prices.json"));
            write_output(&output, &reports, format)?;

            println!("\n✅ 一括処理完了");
        }

        Commands::Config { show, set_delta_ceiling, set_abs_floor, set_synonym_file } => {
            let mut config = config;
            let mut changed = false;

            if let Some(value) = set_delta_ceiling {
                config.delta_ceiling = value;
                changed = true;
            }
            if let Some(value) = set_abs_floor {
                config.abs_floor = value;
                changed = true;
            }
            if let Some(path) = set_synonym_file {
                config.synonym_file = Some(path);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// 行JSONファイルを読む（単一オブジェクトと配列の両方を受ける）
fn load_rows(path: &Path) -> Result<Vec<ScrapedRow>> {
    if !path.exists() {
        return Err(KaitoriError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    match serde_json::from_str::<Vec<ScrapedRow>>(&content) {
        Ok(rows) => Ok(rows),
        Err(_) => {
            let row: ScrapedRow = serde_json::from_str(&content)?;
            Ok(vec![row])
        }
    }
}

/// フォルダから行JSONファイルを集める
fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(KaitoriError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// 1行分の抽出
fn extract_row(
    row: &ScrapedRow,
    engine_config: &EngineConfig,
    synonyms: &ColorSynonyms,
    fetched_at: &str,
) -> (Vec<PriceReport>, Diagnostics) {
    let adapter = shops::adapter_for(&row.shop);
    let catalog = adapter.extract_catalog(row);
    let preprocess = |raw: &str| adapter.preprocess(raw);

    let extraction = extract(
        &row.fragments,
        row.base_price,
        &catalog,
        engine_config,
        synonyms,
        &preprocess,
    );

    (
        report::build_reports(row, &extraction.records, fetched_at),
        extraction.diagnostics,
    )
}

/// 全行の抽出（入力順を保つ）
fn extract_rows(
    rows: &[ScrapedRow],
    engine_config: &EngineConfig,
    synonyms: &ColorSynonyms,
    fetched_at: &str,
) -> (Vec<PriceReport>, Vec<Diagnostics>) {
    let mut reports = Vec::new();
    let mut all_diagnostics = Vec::new();
    for row in rows {
        let (row_reports, diagnostics) = extract_row(row, engine_config, synonyms, fetched_at);
        reports.extend(row_reports);
        all_diagnostics.push(diagnostics);
    }
    (reports, all_diagnostics)
}

/// 診断情報の要約を表示する
fn print_diagnostics(all_diagnostics: &[Diagnostics]) {
    let unknown: Vec<&String> = all_diagnostics
        .iter()
        .flat_map(|d| d.unknown_labels.iter())
        .collect();
    let missing: usize = all_diagnostics.iter().map(|d| d.missing_colors.len()).sum();
    let overrides: usize = all_diagnostics
        .iter()
        .map(|d| d.boundary_overrides.len())
        .sum();

    if !unknown.is_empty() {
        println!("- 未解決ラベル: {:?}", unknown);
    }
    if missing > 0 {
        println!("- 抽出漏れの疑い: {}色", missing);
    }
    if overrides > 0 {
        println!("- 境界ルール適用: {}件", overrides);
    }
}

/// 指定形式で書き出す
fn write_output(output: &Path, reports: &[PriceReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            report::write_json(output, reports)?;
            println!("✔ 結果を保存: {}", output.display());
        }
        OutputFormat::Csv => {
            let csv_path = output.with_extension("csv");
            report::write_csv(&csv_path, reports)?;
            println!("✔ 結果を保存: {}", csv_path.display());
        }
        OutputFormat::Both => {
            report::write_json(output, reports)?;
            println!("✔ 結果を保存: {}", output.display());
            let csv_path = output.with_extension("csv");
            report::write_csv(&csv_path, reports)?;
            println!("✔ 結果を保存: {}", csv_path.display());
        }
    }
    Ok(())
}

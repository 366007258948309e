use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kaitori-price")]
#[command(about = "中古スマホ買取価格表の色別価格抽出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スクレイプ済み行JSONから価格を抽出
    Extract {
        /// 入力JSONファイル（ScrapedRowの配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（デフォルト: prices.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ショップ識別子を上書き（省略時は行のshopフィールド）
        #[arg(long)]
        shop: Option<String>,

        /// 出力形式 (json/csv/both)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// 診断情報も出力する
        #[arg(long)]
        diagnostics: bool,
    },

    /// フォルダ内の行JSONを一括処理
    Run {
        /// 行JSONのフォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力先（デフォルト: 入力フォルダ/prices.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 出力形式 (json/csv/both)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 裸数字の差分閾値を設定
        #[arg(long)]
        set_delta_ceiling: Option<i64>,

        /// 符号付きの絶対価格閾値を設定
        #[arg(long)]
        set_abs_floor: Option<i64>,

        /// 色同義語テーブル（JSON）のパスを設定
        #[arg(long)]
        set_synonym_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Both,
}

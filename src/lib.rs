//! kaitori-price-rust
//!
//! 中古スマホ買取価格表の色別価格抽出ツール。
//! 抽出エンジン本体は `kaitori-price-common` にあり、ここは
//! CLIとショップ別アダプタ。

pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod shops;

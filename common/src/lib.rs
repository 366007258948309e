//! Kaitori Price Common Library
//!
//! 買取価格表の色別価格抽出エンジン。ショップ別アダプタ（CLI側）から
//! 共有される純粋なコア:
//! - tokenizer: テキスト → トークン
//! - splitter: 複合ラベルの適応分割
//! - classifier: 差分/絶対価格への振り分け
//! - resolver: カタログ各色の最終価格
//! - matcher / synonym: 色名の照合

pub mod classifier;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod resolver;
pub mod splitter;
pub mod synonym;
pub mod tokenizer;
pub mod types;

pub use error::{Error, Result};
pub use extract::{extract, extract_one, Extraction};
pub use synonym::ColorSynonyms;
pub use types::{
    BoundaryOverride, CatalogEntry, Diagnostics, EngineConfig, FormatHint, MatchToken,
    MissingColor, PriceDecomposition, PriceSource, ResolvedPriceRecord, VariantCatalog,
};

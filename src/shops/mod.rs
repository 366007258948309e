//! ショップ別アダプタ
//!
//! 約20のショップはそれぞれ違う定型文・カタログ表現を持つが、
//! エンジン側は一切ショップを知らない。ショップごとの差は
//! このトレイトの実装1つに閉じ込め、エンジンには前処理フックと
//! カタログだけを渡す。

pub mod generic;
pub mod mobaichi;
pub mod ringoya;

use kaitori_price_common::VariantCatalog;
use serde::{Deserialize, Serialize};

/// スクレイパーが持ち込む1行分の生データ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapedRow {
    /// ショップ識別子
    pub shop: String,
    /// 機種名（例: iPhone 15 Pro）
    pub model: String,
    /// 容量（例: 256GB）
    pub capacity: String,
    /// 見出し価格（基準価格）
    pub base_price: Option<i64>,
    /// 価格変動の注記テキスト
    pub fragments: Vec<String>,
    /// この（機種, 容量）の色バリアント一覧
    pub variants: Vec<RowVariant>,
}

/// 行に含まれる色バリアント
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowVariant {
    pub variant_id: i64,
    pub color: String,
}

/// ショップ別の前処理とカタログ構築
pub trait ShopAdapter: Sync {
    /// ショップ識別子
    fn shop_name(&self) -> &'static str;

    /// ショップ固有の定型文を取り除く
    fn preprocess(&self, raw: &str) -> String;

    /// 行から色カタログを組み立てる
    fn extract_catalog(&self, row: &ScrapedRow) -> VariantCatalog {
        let mut catalog = VariantCatalog::new();
        for variant in &row.variants {
            catalog.insert(variant.variant_id, &variant.color);
        }
        catalog
    }
}

static GENERIC: generic::GenericShop = generic::GenericShop;
static MOBAICHI: mobaichi::MobaichiShop = mobaichi::MobaichiShop;
static RINGOYA: ringoya::RingoyaShop = ringoya::RingoyaShop;

static ADAPTERS: &[&dyn ShopAdapter] = &[&GENERIC, &MOBAICHI, &RINGOYA];

/// 登録済みアダプタの一覧
pub fn all_adapters() -> &'static [&'static dyn ShopAdapter] {
    ADAPTERS
}

/// ショップ識別子からアダプタを引く。未登録はgenericにフォールバック
pub fn adapter_for(shop: &str) -> &'static dyn ShopAdapter {
    let normalized = shop.trim().to_lowercase();
    all_adapters()
        .iter()
        .copied()
        .find(|a| a.shop_name() == normalized)
        .unwrap_or(&GENERIC)
}

//! 汎用アダプタ
//!
//! 定型文のないショップ、または未登録ショップのフォールバック。

use super::ShopAdapter;

pub struct GenericShop;

impl ShopAdapter for GenericShop {
    fn shop_name(&self) -> &'static str {
        "generic"
    }

    fn preprocess(&self, raw: &str) -> String {
        raw.trim().to_string()
    }
}

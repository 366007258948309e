//! リンゴ屋向けアダプタ
//!
//! HTML片（<br>タグ・文字実体参照）が残ったまま渡ってくる。

use super::ShopAdapter;
use regex::Regex;

pub struct RingoyaShop;

lazy_static::lazy_static! {
    static ref BR_RE: Regex = Regex::new(r"(?i)<br */?>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
}

impl ShopAdapter for RingoyaShop {
    fn shop_name(&self) -> &'static str {
        "ringoya"
    }

    fn preprocess(&self, raw: &str) -> String {
        let with_breaks = BR_RE.replace_all(raw, "\n");
        let without_tags = TAG_RE.replace_all(&with_breaks, "");
        without_tags
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&yen;", "¥")
            .trim()
            .to_string()
    }
}

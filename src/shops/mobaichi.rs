//! モバイチ向けアダプタ
//!
//! 【】付きのバナーと※で始まる注意書き行を価格注記に混ぜてくる。

use super::ShopAdapter;
use regex::Regex;

pub struct MobaichiShop;

lazy_static::lazy_static! {
    // 【価格改定】【本日限定】等のバナー
    static ref BANNER_RE: Regex = Regex::new(r"【[^】]*】").unwrap();
    // ※で始まる注意書き（行末まで）
    static ref NOTE_RE: Regex = Regex::new(r"(?m)※[^\n]*").unwrap();
}

impl ShopAdapter for MobaichiShop {
    fn shop_name(&self) -> &'static str {
        "mobaichi"
    }

    fn preprocess(&self, raw: &str) -> String {
        let without_banner = BANNER_RE.replace_all(raw, "");
        let without_notes = NOTE_RE.replace_all(&without_banner, "");
        without_notes
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

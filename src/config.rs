use crate::error::{KaitoriError, Result};
use kaitori_price_common::{ColorSynonyms, EngineConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 裸数字をこの値未満なら差分とみなす
    pub delta_ceiling: i64,
    /// 符号付きでも絶対値がこの値超なら絶対価格とみなす
    pub abs_floor: i64,
    /// 個別情報のない色に基準価格のままの行を出す
    pub emit_default_rows: bool,
    /// 0円以下になった行を捨てる
    pub skip_non_positive: bool,
    /// 複合ラベルの適応分割を有効にする
    pub enable_adaptive_split: bool,
    /// 追加の色同義語テーブル（JSON）
    pub synonym_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            delta_ceiling: engine.delta_ceiling,
            abs_floor: engine.abs_floor,
            emit_default_rows: engine.emit_default_rows,
            skip_non_positive: engine.skip_non_positive,
            enable_adaptive_split: engine.enable_adaptive_split,
            synonym_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| KaitoriError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("kaitori-price").join("config.json"))
    }

    /// エンジンへ渡す設定を組み立てる
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            delta_ceiling: self.delta_ceiling,
            abs_floor: self.abs_floor,
            emit_default_rows: self.emit_default_rows,
            skip_non_positive: self.skip_non_positive,
            enable_adaptive_split: self.enable_adaptive_split,
        }
    }

    /// 同義語テーブルを組み立てる（組み込み + 設定ファイルの上書き）
    pub fn load_synonyms(&self) -> Result<ColorSynonyms> {
        let mut synonyms = ColorSynonyms::builtin();

        if let Some(path) = &self.synonym_file {
            if !path.exists() {
                return Err(KaitoriError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(path)?;
            let custom = ColorSynonyms::from_json(&content)?;
            synonyms.merge(&custom);
        }

        Ok(synonyms)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KaitoriError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("入力行が見つかりません: {0}")]
    NoRowsFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("エンジンエラー: {0}")]
    Engine(#[from] kaitori_price_common::Error),
}

pub type Result<T> = std::result::Result<T, KaitoriError>;

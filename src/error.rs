use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not create data folder: {0}")]
    DataDir(#[source] std::io::Error),

    #[error("Saved drafts under '{key}' are unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not serialize drafts: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Draft store is busy (lock poisoned)")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Could not find Downloads or Desktop folder.")]
    NoOutputDir,

    #[error("Invalid path characters.")]
    InvalidPath,
}

impl From<DraftError> for String {
    fn from(err: DraftError) -> String {
        err.to_string()
    }
}

impl From<ExportError> for String {
    fn from(err: ExportError) -> String {
        err.to_string()
    }
}

pub mod preview;

pub use preview::{DetailRow, DocumentPreview, PreviewRow, SignatureBlock, TotalsBlock};

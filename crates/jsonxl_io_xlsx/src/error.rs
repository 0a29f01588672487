//! Pipeline errors.

use std::fmt;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPipelineStage {
    /// Reading and validating the JSON payload.
    Decode,
    /// Encoding the workbook into XLSX bytes.
    Serialize,
    /// Moving bytes in or out of the process.
    Output,
}

impl fmt::Display for EnumPipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "decode"),
            Self::Serialize => write!(f, "serialize"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Fatal errors raised by the JSON-to-XLSX pipeline.
#[derive(Debug, Error)]
pub enum JsonXlsxError {
    /// Input is not UTF-8 JSON of the expected shape.
    #[error("decode failed: {0}")]
    DecodeJson(#[from] serde_json::Error),
    /// Input parsed but violates a sheet invariant.
    #[error("decode failed: {0}")]
    DecodeShape(String),
    /// Workbook could not be encoded.
    #[error("serialize failed: {0}")]
    Serialize(String),
    /// Reading input or writing output failed.
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
    /// Producer API called with no sheets.
    #[error("serialize failed: empty document")]
    EmptyDocument,
}

impl JsonXlsxError {
    /// Stage that raised the error.
    pub fn stage(&self) -> EnumPipelineStage {
        match self {
            Self::DecodeJson(_) | Self::DecodeShape(_) => EnumPipelineStage::Decode,
            Self::Serialize(_) | Self::EmptyDocument => EnumPipelineStage::Serialize,
            Self::Io(_) => EnumPipelineStage::Output,
        }
    }
}

impl From<XlsxError> for JsonXlsxError {
    fn from(err: XlsxError) -> Self {
        Self::Serialize(format!("xlsx write error: {err}"))
    }
}

/// A cell value has no text form; carries the length to use instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell value has no text form, assuming length {0}")]
pub struct FallbackLength(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_is_named_in_message() {
        let err = JsonXlsxError::DecodeShape("sheet #0: name must not be empty".to_string());
        assert_eq!(err.stage(), EnumPipelineStage::Decode);
        assert!(err.to_string().starts_with("decode failed:"));

        let err = JsonXlsxError::from(XlsxError::SheetnameReused("S1".to_string()));
        assert_eq!(err.stage(), EnumPipelineStage::Serialize);
        assert!(err.to_string().starts_with("serialize failed: xlsx write error:"));

        let err = JsonXlsxError::from(std::io::Error::other("broken pipe"));
        assert_eq!(err.stage(), EnumPipelineStage::Output);
    }
}

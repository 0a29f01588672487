//! `jsonxl_io_xlsx` v1:
//! JSON sheet payload to XLSX workbook kernel.
//!
//! Pipeline stages:
//! - `decode`   : JSON payload to sheet descriptors
//! - `builder`  : descriptors to in-memory workbook (widths, header style)
//! - `writer`   : in-memory workbook to XLSX bytes
//! - `pipeline` : the three stages as one pure function
//!
//! Support modules:
//! - `conf`  : constants and default presets
//! - `spec`  : models/options/report
//! - `util`  : pure helper functions
//! - `error` : pipeline errors
//! - `book`  : in-process producer API
pub mod book;
pub mod builder;
pub mod conf;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod spec;
pub mod util;
pub mod writer;

pub use book::XlsxFile;
pub use builder::{WorkbookBuilder, build_workbook, derive_text_len};
pub use conf::{
    N_DEPTH_JSON_MAX, N_HEADER_STYLE_COLUMN_SPAN, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_CELL_PADDING, N_WIDTH_FALLBACK, TUP_EXCEL_ILLEGAL,
};
pub use decode::decode_sheet_specs;
pub use error::{EnumPipelineStage, FallbackLength, JsonXlsxError};
pub use pipeline::convert_json_to_xlsx;
pub use spec::{
    EnumCellValue, EnumHeaderStyleSpan, EnumSheetNamePolicy, SpecCellFormat,
    SpecJsonXlsxWriteOptions, SpecSheet, SpecSheetInput, SpecSheetReport, SpecWorkbook,
    SpecXlsxOutput, SpecXlsxReport,
};
pub use writer::{XlsxWriter, serialize_workbook};

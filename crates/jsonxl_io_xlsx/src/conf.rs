//! JSON-to-XLSX constants and default preset factories.

use crate::spec::{
    EnumHeaderStyleSpan, EnumSheetNamePolicy, SpecCellFormat, SpecJsonXlsxWriteOptions,
};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Number of header-row columns (A..Z) that receive the header format.
pub const N_HEADER_STYLE_COLUMN_SPAN: usize = 26;
/// Padding added to the longest text length of a column.
pub const N_WIDTH_CELL_PADDING: usize = 2;
/// Length assumed for a cell value that has no text form.
pub const N_WIDTH_FALLBACK: usize = 10;
/// Deepest array/object nesting accepted in the payload.
pub const N_DEPTH_JSON_MAX: usize = 1_000;

/// Title of the implicit first sheet every workbook starts with.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet";
/// Header fill color.
pub const C_HEADER_BG_COLOR: &str = "#3B97D3";
/// Header font color.
pub const C_HEADER_FONT_COLOR: &str = "#FFFFFF";

/// Text written for `NaN` by the producer API.
pub const C_NAN_STR: &str = "NaN";
/// Text written for positive infinity by the producer API.
pub const C_POSINF_STR: &str = "Inf";
/// Text written for negative infinity by the producer API.
pub const C_NEGINF_STR: &str = "-Inf";

/// Build the header format: solid fill with a bold white font.
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        bg_color: Some(C_HEADER_BG_COLOR.to_string()),
        font_color: Some(C_HEADER_FONT_COLOR.to_string()),
        ..Default::default()
    }
}

/// Build default write options.
pub fn derive_default_write_options() -> SpecJsonXlsxWriteOptions {
    SpecJsonXlsxWriteOptions {
        fmt_header: derive_default_header_format(),
        header_style_span: EnumHeaderStyleSpan::Fixed(N_HEADER_STYLE_COLUMN_SPAN),
        width_cell_padding: N_WIDTH_CELL_PADDING,
        width_fallback: N_WIDTH_FALLBACK,
        sheet_name_policy: EnumSheetNamePolicy::Strict,
    }
}

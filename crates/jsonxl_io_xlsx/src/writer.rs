//! Workbook serializer: in-memory workbook to XLSX bytes.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet};

use crate::error::JsonXlsxError;
use crate::spec::{EnumCellValue, SpecCellFormat, SpecSheet, SpecWorkbook};
use crate::util::{
    cast_col_num, cast_row_num, validate_sheet_extent, validate_unique_sheet_names,
};

const N_ROW_HEADER: u32 = 0;

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::save_to_buffer`] is called.
pub struct XlsxWriter {
    workbook: Workbook,
    fmt_header: Format,
    n_sheets_written: usize,
}

impl XlsxWriter {
    /// Create writer with the shared header format.
    pub fn new(fmt_header: &SpecCellFormat) -> Self {
        Self {
            workbook: Workbook::new(),
            fmt_header: derive_rust_xlsx_format(fmt_header),
            n_sheets_written: 0,
        }
    }

    /// Write every sheet of `workbook`, in order.
    pub fn write_workbook(&mut self, workbook: &SpecWorkbook) -> Result<(), JsonXlsxError> {
        let l_titles: Vec<String> = workbook.sheets.iter().map(|s| s.title.clone()).collect();
        validate_unique_sheet_names(&l_titles).map_err(JsonXlsxError::Serialize)?;

        for sheet in &workbook.sheets {
            self.write_sheet(sheet)?;
        }
        Ok(())
    }

    /// Write one sheet: header row, data rows, then column widths.
    pub fn write_sheet(&mut self, sheet: &SpecSheet) -> Result<(), JsonXlsxError> {
        validate_sheet_extent(
            &sheet.title,
            sheet.rows.len(),
            sheet.rows.iter().map(Vec::len).max().unwrap_or(0),
        )
        .map_err(JsonXlsxError::Serialize)?;

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet.title)?;

        if let Some(l_header) = sheet.header() {
            write_header(worksheet, l_header, sheet.n_cols_header_styled, &self.fmt_header)?;
        }

        for (n_idx_row, row) in sheet.data_rows().iter().enumerate() {
            let n_row = cast_row_num(n_idx_row + 1).map_err(JsonXlsxError::Serialize)?;
            for (n_idx_col, value) in row.iter().enumerate() {
                let n_col = cast_col_num(n_idx_col).map_err(JsonXlsxError::Serialize)?;
                write_cell(worksheet, n_row, n_col, value)?;
            }
        }

        for (n_idx_col, n_width) in &sheet.dict_width_by_col {
            worksheet.set_column_width(
                cast_col_num(*n_idx_col).map_err(JsonXlsxError::Serialize)?,
                *n_width as f64,
            )?;
        }

        self.n_sheets_written += 1;
        Ok(())
    }

    /// Render the workbook into XLSX bytes.
    pub fn save_to_buffer(mut self) -> Result<Vec<u8>, JsonXlsxError> {
        let v_bytes = self.workbook.save_to_buffer()?;
        log::info!(
            "serialized {} sheet(s) into {} bytes",
            self.n_sheets_written,
            v_bytes.len()
        );
        Ok(v_bytes)
    }
}

/// Encode a built workbook into XLSX bytes.
pub fn serialize_workbook(workbook: &SpecWorkbook) -> Result<Vec<u8>, JsonXlsxError> {
    let mut writer = XlsxWriter::new(&workbook.fmt_header);
    writer.write_workbook(workbook)?;
    writer.save_to_buffer()
}

fn write_header(
    worksheet: &mut Worksheet,
    header: &[EnumCellValue],
    n_cols_styled: usize,
    fmt_header: &Format,
) -> Result<(), JsonXlsxError> {
    for n_idx_col in 0..usize::max(header.len(), n_cols_styled) {
        let n_col = cast_col_num(n_idx_col).map_err(JsonXlsxError::Serialize)?;
        let Some(value) = header.get(n_idx_col) else {
            worksheet.write_blank(N_ROW_HEADER, n_col, fmt_header)?;
            continue;
        };
        if n_idx_col >= n_cols_styled {
            write_cell(worksheet, N_ROW_HEADER, n_col, value)?;
            continue;
        }

        match value {
            EnumCellValue::Null | EnumCellValue::Nested(_) => {
                worksheet.write_blank(N_ROW_HEADER, n_col, fmt_header)?;
            }
            EnumCellValue::Bool(val) => {
                worksheet.write_boolean_with_format(N_ROW_HEADER, n_col, *val, fmt_header)?;
            }
            EnumCellValue::Number(val) => match val.as_f64() {
                Some(n_val) => {
                    worksheet.write_number_with_format(N_ROW_HEADER, n_col, n_val, fmt_header)?;
                }
                None => {
                    worksheet.write_string_with_format(
                        N_ROW_HEADER,
                        n_col,
                        val.to_string(),
                        fmt_header,
                    )?;
                }
            },
            EnumCellValue::String(val) => {
                worksheet.write_string_with_format(N_ROW_HEADER, n_col, val, fmt_header)?;
            }
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
) -> Result<(), JsonXlsxError> {
    match value {
        EnumCellValue::Bool(val) => {
            worksheet.write_boolean(n_row, n_col, *val)?;
        }
        EnumCellValue::Number(val) => match val.as_f64() {
            Some(n_val) => {
                worksheet.write_number(n_row, n_col, n_val)?;
            }
            None => {
                worksheet.write_string(n_row, n_col, val.to_string())?;
            }
        },
        EnumCellValue::String(val) => {
            worksheet.write_string(n_row, n_col, val)?;
        }
        EnumCellValue::Null | EnumCellValue::Nested(_) => {}
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::from(val.as_str()));
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(Color::from(val.as_str()));
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builder::build_workbook;
    use crate::spec::{SpecJsonXlsxWriteOptions, SpecSheetInput};

    fn derive_workbook(value: serde_json::Value) -> SpecWorkbook {
        let specs: Vec<SpecSheetInput> = serde_json::from_value(value).expect("valid specs");
        build_workbook(specs, &SpecJsonXlsxWriteOptions::default()).0
    }

    #[test]
    fn test_serialize_produces_zip_container() {
        let workbook = derive_workbook(json!([
            {"name": "S1", "header": ["A", "B"], "rows": [[1, "x"], [true, null]]}
        ]));

        let v_bytes = serialize_workbook(&workbook).expect("serializable");
        assert!(v_bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_duplicate_titles_fail_at_serialize() {
        let workbook = derive_workbook(json!([
            {"name": "Data", "header": ["A"]},
            {"name": "data", "header": ["B"]}
        ]));

        let err = serialize_workbook(&workbook).unwrap_err();
        assert!(matches!(err, JsonXlsxError::Serialize(_)));
        assert!(err.to_string().contains("Duplicate sheet names"), "{err}");
    }

    #[test]
    fn test_invalid_title_fails_at_serialize() {
        let workbook = derive_workbook(json!([{"name": "a/b", "header": ["A"]}]));
        assert!(matches!(
            serialize_workbook(&workbook),
            Err(JsonXlsxError::Serialize(_))
        ));

        let workbook = derive_workbook(json!([{"name": "x".repeat(32), "header": ["A"]}]));
        assert!(serialize_workbook(&workbook).is_err());
    }

    #[test]
    fn test_oversized_string_fails_at_serialize() {
        let workbook = derive_workbook(json!([
            {"name": "S", "header": ["A"], "rows": [["z".repeat(40_000)]]}
        ]));
        assert!(matches!(
            serialize_workbook(&workbook),
            Err(JsonXlsxError::Serialize(_))
        ));
    }

    #[test]
    fn test_derive_format_align() {
        assert!(matches!(
            derive_format_align(" Center "),
            Some(FormatAlign::Center)
        ));
        assert!(derive_format_align("sideways").is_none());
    }
}

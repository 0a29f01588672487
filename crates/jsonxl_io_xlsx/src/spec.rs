//! Shared models for the JSON-to-XLSX pipeline.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::conf::derive_default_write_options;

////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// One cell slot of a header or data row.
///
/// Anything that is not a JSON scalar decodes to [`EnumCellValue::Nested`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumCellValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value, kept in its JSON form.
    Number(Number),
    /// Text value.
    String(String),
    /// Missing value; written as a blank cell.
    Null,
    /// Array/object in a cell slot. Has no text form.
    Nested(Value),
}

impl EnumCellValue {
    /// Text form used for width inference and header cells.
    ///
    /// Returns `None` for [`EnumCellValue::Nested`].
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Bool(val) => Some(val.to_string()),
            Self::Number(val) => Some(derive_number_text(val)),
            Self::String(val) => Some(val.clone()),
            Self::Null => Some(String::new()),
            Self::Nested(_) => None,
        }
    }

    /// Whether the cell is left blank in the output.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Null | Self::Nested(_))
    }
}

/// Number text with a signed, two-digit exponent (`1e20` -> `1e+20`).
fn derive_number_text(val: &Number) -> String {
    let c_text = val.to_string();
    let Some((c_mantissa, c_exp)) = c_text.split_once(['e', 'E']) else {
        return c_text;
    };
    let (c_sign, c_digits) = match c_exp.strip_prefix('-') {
        Some(c_digits) => ("-", c_digits),
        None => ("+", c_exp.trim_start_matches('+')),
    };
    format!("{c_mantissa}e{c_sign}{c_digits:0>2}")
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = EnumCellValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, val: bool) -> Result<Self::Value, E> {
        Ok(EnumCellValue::Bool(val))
    }

    fn visit_i64<E: de::Error>(self, val: i64) -> Result<Self::Value, E> {
        Ok(EnumCellValue::Number(val.into()))
    }

    fn visit_u64<E: de::Error>(self, val: u64) -> Result<Self::Value, E> {
        Ok(EnumCellValue::Number(val.into()))
    }

    fn visit_f64<E: de::Error>(self, val: f64) -> Result<Self::Value, E> {
        Number::from_f64(val)
            .map(EnumCellValue::Number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E: de::Error>(self, val: &str) -> Result<Self::Value, E> {
        Ok(EnumCellValue::String(val.to_owned()))
    }

    fn visit_string<E: de::Error>(self, val: String) -> Result<Self::Value, E> {
        Ok(EnumCellValue::String(val))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(EnumCellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(EnumCellValue::Null)
    }

    // Nested values are read element by element through the same deserializer,
    // so its stack handling applies at every level.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut l_values = Vec::new();
        while let Some(value) = seq.next_element::<Value>()? {
            l_values.push(value);
        }
        Ok(EnumCellValue::Nested(Value::Array(l_values)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut dict_values = Map::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            dict_values.insert(key, value);
        }
        Ok(EnumCellValue::Nested(Value::Object(dict_values)))
    }
}

impl<'de> Deserialize<'de> for EnumCellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetInputSpecification

/// One input sheet as decoded from the JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSheetInput {
    /// Sheet title.
    pub name: String,
    /// Header row cells.
    pub header: Vec<EnumCellValue>,
    /// Data rows; `None` when the payload has `null` or omits the field.
    #[serde(default)]
    pub rows: Option<Vec<Vec<EnumCellValue>>>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Solid background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
    /// Font color (`#RRGGBB`).
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// How many header-row columns receive the header format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumHeaderStyleSpan {
    /// Style exactly this many columns, whatever the header length.
    Fixed(usize),
    /// Style as many columns as the header has cells.
    Header,
}

/// Sheet title handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSheetNamePolicy {
    /// Keep titles verbatim; invalid or duplicate titles fail at serialization.
    #[default]
    Strict,
    /// Replace illegal characters, truncate, and de-duplicate titles.
    Sanitize,
}

/// Options controlling workbook construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecJsonXlsxWriteOptions {
    /// Format applied to styled header cells.
    pub fmt_header: SpecCellFormat,
    /// Styled header span.
    pub header_style_span: EnumHeaderStyleSpan,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
    /// Length assumed for values without a text form.
    pub width_fallback: usize,
    /// Sheet title handling.
    pub sheet_name_policy: EnumSheetNamePolicy,
}

impl Default for SpecJsonXlsxWriteOptions {
    fn default() -> Self {
        derive_default_write_options()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookSpecification

/// A built sheet, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheet {
    /// Sheet title.
    pub title: String,
    /// Row 0 is the header; the rest are data rows.
    pub rows: Vec<Vec<EnumCellValue>>,
    /// Final display width by zero-based column index.
    pub dict_width_by_col: BTreeMap<usize, usize>,
    /// Number of header-row columns, starting at A, that carry the header format.
    pub n_cols_header_styled: usize,
}

impl SpecSheet {
    /// Create an empty sheet with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            dict_width_by_col: BTreeMap::new(),
            n_cols_header_styled: 0,
        }
    }

    /// Header row, if one was appended.
    pub fn header(&self) -> Option<&[EnumCellValue]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows below the header.
    pub fn data_rows(&self) -> &[Vec<EnumCellValue>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// In-memory workbook: ordered sheets plus the shared header format.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecWorkbook {
    /// Sheets in output order.
    pub sheets: Vec<SpecSheet>,
    /// Format shared by every styled header cell.
    pub fmt_header: SpecCellFormat,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-sheet summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetReport {
    /// Final sheet title.
    pub sheet_name: String,
    /// Number of data rows below the header.
    pub n_rows_data: usize,
    /// Widest row, header included.
    pub n_cols: usize,
}

/// Per-run report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// One entry per built sheet, in workbook order.
    pub sheets: Vec<SpecSheetReport>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        log::warn!("{}", msg.as_ref());
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Serialized workbook plus its build report.
#[derive(Debug, Clone)]
pub struct SpecXlsxOutput {
    /// XLSX file bytes.
    pub bytes: Vec<u8>,
    /// Build report.
    pub report: SpecXlsxReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

//! In-process producer API: assemble sheets in code and write the workbook
//! straight to any `io::Write`.

use std::io::Write;

use serde_json::Number;

use crate::builder::build_workbook;
use crate::error::JsonXlsxError;
use crate::spec::{EnumCellValue, SpecJsonXlsxWriteOptions, SpecSheetInput, SpecXlsxReport};
use crate::util::convert_nan_inf_to_str;
use crate::writer::serialize_workbook;

/// A workbook under construction.
#[derive(Debug, Clone, Default)]
pub struct XlsxFile {
    /// Sheets in output order.
    pub sheets: Vec<SpecSheetInput>,
    options: SpecJsonXlsxWriteOptions,
}

impl XlsxFile {
    /// Create an empty file with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty file with custom options.
    pub fn with_options(options: SpecJsonXlsxWriteOptions) -> Self {
        Self {
            sheets: Vec::new(),
            options,
        }
    }

    /// Append a sheet and return it for filling.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> &mut SpecSheetInput {
        self.sheets.push(SpecSheetInput {
            name: name.into(),
            header: Vec::new(),
            rows: None,
        });
        let n_idx_last = self.sheets.len() - 1;
        &mut self.sheets[n_idx_last]
    }

    /// Render the sheets as the JSON payload accepted by the decoder.
    pub fn to_json(&self) -> Result<String, JsonXlsxError> {
        serde_json::to_string(&self.sheets)
            .map_err(|err| JsonXlsxError::Serialize(err.to_string()))
    }

    /// Build and serialize the workbook, then write it to `w`.
    ///
    /// Returns the number of bytes written. Fails with
    /// [`JsonXlsxError::EmptyDocument`] when no sheet was added.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<u64, JsonXlsxError> {
        self.write_to_with_report(w).map(|(n_bytes, _)| n_bytes)
    }

    /// Same as [`Self::write_to`], also returning the build report.
    pub fn write_to_with_report<W: Write>(
        &self,
        w: &mut W,
    ) -> Result<(u64, SpecXlsxReport), JsonXlsxError> {
        if self.sheets.is_empty() {
            return Err(JsonXlsxError::EmptyDocument);
        }

        let (workbook, report) = build_workbook(self.sheets.clone(), &self.options);
        let v_bytes = serialize_workbook(&workbook)?;
        w.write_all(&v_bytes)?;
        Ok((v_bytes.len() as u64, report))
    }
}

impl SpecSheetInput {
    /// Replace the header row.
    pub fn add_header<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        self.header = values.into_iter().map(Into::into).collect();
        self
    }

    /// Append one data row.
    pub fn add_row<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        self.rows
            .get_or_insert_with(Vec::new)
            .push(values.into_iter().map(Into::into).collect());
        self
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Self::Number(n),
            None => Self::String(
                convert_nan_inf_to_str(value).unwrap_or_else(|_| value.to_string()),
            ),
        }
    }
}

impl From<f32> for EnumCellValue {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for EnumCellValue {
                fn from(value: $t) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<EnumCellValue>> From<Option<T>> for EnumCellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

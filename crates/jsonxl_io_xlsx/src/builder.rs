//! Workbook builder: sheet descriptors to an in-memory workbook.
//!
//! Every workbook starts with one implicit sheet. The first descriptor adopts
//! it; every later descriptor appends a new sheet after it. Widths are tracked
//! per column as the longest text length seen in the header and data rows, then
//! padded once all rows are in.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::C_SHEET_NAME_DEFAULT;
use crate::error::FallbackLength;
use crate::spec::{
    EnumCellValue, EnumHeaderStyleSpan, EnumSheetNamePolicy, SpecJsonXlsxWriteOptions, SpecSheet,
    SpecSheetInput, SpecSheetReport, SpecWorkbook, SpecXlsxReport,
};
use crate::util::{derive_unique_sheet_name, sanitize_sheet_name};

/// Character length of the value's text form.
///
/// Values without a text form yield `FallbackLength(n_width_fallback)`.
pub fn derive_text_len(
    value: &EnumCellValue,
    n_width_fallback: usize,
) -> Result<usize, FallbackLength> {
    value
        .to_text()
        .map(|c_text| c_text.chars().count())
        .ok_or(FallbackLength(n_width_fallback))
}

/// Stateful workbook builder.
pub struct WorkbookBuilder {
    workbook: SpecWorkbook,
    options: SpecJsonXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    report: SpecXlsxReport,
    if_default_sheet_adopted: bool,
}

impl WorkbookBuilder {
    /// Create a builder holding a workbook with its implicit first sheet.
    pub fn new(options: SpecJsonXlsxWriteOptions) -> Self {
        Self {
            workbook: SpecWorkbook {
                sheets: vec![SpecSheet::new(C_SHEET_NAME_DEFAULT)],
                fmt_header: options.fmt_header.clone(),
            },
            options,
            set_sheet_names_existing: BTreeSet::new(),
            report: SpecXlsxReport::default(),
            if_default_sheet_adopted: false,
        }
    }

    /// Append one descriptor as the next sheet; return its workbook index.
    pub fn add_sheet(&mut self, spec: SpecSheetInput) -> usize {
        let c_title = self.derive_sheet_title(&spec.name);

        let n_idx_sheet = if self.if_default_sheet_adopted {
            self.workbook.sheets.push(SpecSheet::new(c_title));
            self.workbook.sheets.len() - 1
        } else {
            self.if_default_sheet_adopted = true;
            self.workbook.sheets[0].title = c_title;
            0
        };

        let sheet = &mut self.workbook.sheets[n_idx_sheet];
        fill_sheet(sheet, spec, &self.options, &mut self.report);
        self.report.sheets.push(derive_sheet_report(sheet));
        n_idx_sheet
    }

    /// Finish building; return workbook and report.
    pub fn finish(mut self) -> (SpecWorkbook, SpecXlsxReport) {
        if !self.if_default_sheet_adopted {
            self.report
                .sheets
                .push(derive_sheet_report(&self.workbook.sheets[0]));
        }
        (self.workbook, self.report)
    }

    fn derive_sheet_title(&mut self, name: &str) -> String {
        match self.options.sheet_name_policy {
            EnumSheetNamePolicy::Strict => name.to_string(),
            EnumSheetNamePolicy::Sanitize => {
                let c_name = sanitize_sheet_name(name, "_");
                let c_unique = derive_unique_sheet_name(&c_name, &mut self.set_sheet_names_existing);
                if c_unique != name {
                    self.report
                        .warn(format!("Sheet name {name:?} written as {c_unique:?}."));
                }
                c_unique
            }
        }
    }
}

/// Build a workbook from descriptors in input order.
pub fn build_workbook(
    specs: Vec<SpecSheetInput>,
    options: &SpecJsonXlsxWriteOptions,
) -> (SpecWorkbook, SpecXlsxReport) {
    let mut builder = WorkbookBuilder::new(options.clone());
    for spec in specs {
        builder.add_sheet(spec);
    }
    builder.finish()
}

fn fill_sheet(
    sheet: &mut SpecSheet,
    spec: SpecSheetInput,
    options: &SpecJsonXlsxWriteOptions,
    report: &mut SpecXlsxReport,
) {
    let SpecSheetInput { header, rows, .. } = spec;
    let n_width_header = header.len();

    let mut dict_len_by_col: BTreeMap<usize, usize> = BTreeMap::new();
    let mut n_cells_fallback = 0usize;

    for (n_idx_col, value) in header.iter().enumerate() {
        let n_len = derive_text_len(value, options.width_fallback).unwrap_or_else(|err| {
            n_cells_fallback += 1;
            err.0
        });
        dict_len_by_col.insert(n_idx_col, n_len);
    }
    sheet.rows.push(header);

    let mut n_rows_misaligned = 0usize;
    for row in rows.unwrap_or_default() {
        if row.len() != n_width_header {
            n_rows_misaligned += 1;
        }
        for (n_idx_col, value) in row.iter().enumerate() {
            let n_len = derive_text_len(value, options.width_fallback).unwrap_or_else(|err| {
                n_cells_fallback += 1;
                err.0
            });
            dict_len_by_col
                .entry(n_idx_col)
                .and_modify(|n_len_max| *n_len_max = usize::max(*n_len_max, n_len))
                .or_insert(n_len);
        }
        sheet.rows.push(row);
    }

    sheet.dict_width_by_col = dict_len_by_col
        .into_iter()
        .map(|(n_idx_col, n_len)| (n_idx_col, n_len + options.width_cell_padding))
        .collect();

    sheet.n_cols_header_styled = match options.header_style_span {
        EnumHeaderStyleSpan::Fixed(n_span) => n_span,
        EnumHeaderStyleSpan::Header => n_width_header,
    };

    if n_cells_fallback > 0 {
        report.warn(format!(
            "Sheet {:?}: {n_cells_fallback} cell(s) have no text form; width counted as {}.",
            sheet.title, options.width_fallback
        ));
    }
    if n_rows_misaligned > 0 {
        report.warn(format!(
            "Sheet {:?}: {n_rows_misaligned} row(s) differ in length from the {n_width_header}-column header.",
            sheet.title
        ));
    }
    if n_width_header > sheet.n_cols_header_styled {
        report.warn(format!(
            "Sheet {:?}: header has {n_width_header} columns; only the first {} are styled.",
            sheet.title, sheet.n_cols_header_styled
        ));
    }

    log::debug!(
        "built sheet {:?}: {} data row(s), {} column width(s)",
        sheet.title,
        sheet.data_rows().len(),
        sheet.dict_width_by_col.len()
    );
}

fn derive_sheet_report(sheet: &SpecSheet) -> SpecSheetReport {
    SpecSheetReport {
        sheet_name: sheet.title.clone(),
        n_rows_data: sheet.data_rows().len(),
        n_cols: sheet.rows.iter().map(Vec::len).max().unwrap_or(0),
    }
}

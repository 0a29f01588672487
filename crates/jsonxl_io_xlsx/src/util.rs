//! Stateless helper utilities used by the builder and writer.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    C_NAN_STR, C_NEGINF_STR, C_POSINF_STR, C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert `NaN`/`Inf` to replacement text; return error for finite values.
pub fn convert_nan_inf_to_str(x: f64) -> Result<String, String> {
    if x.is_nan() {
        return Ok(C_NAN_STR.to_string());
    }
    if x.is_infinite() {
        return Ok(if x.is_sign_positive() {
            C_POSINF_STR.to_string()
        } else {
            C_NEGINF_STR.to_string()
        });
    }
    Err("Input is neither NaN nor Inf.".to_string())
}

/// Cast zero-based row index to the writer's row type.
pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

/// Cast zero-based column index to the writer's column type.
pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

/// Check that a sheet of `n_rows` x `n_cols` (header included) fits in Excel.
pub fn validate_sheet_extent(title: &str, n_rows: usize, n_cols: usize) -> Result<(), String> {
    if n_rows > N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Sheet {title:?} has {n_rows} rows; Excel allows at most {N_NROWS_EXCEL_MAX}."
        ));
    }
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Sheet {title:?} has {n_cols} columns; Excel allows at most {N_NCOLS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Validate that sheet titles are unique, ignoring case like Excel does.
pub fn validate_unique_sheet_names(names: &[String]) -> Result<(), String> {
    let l_names_folded: Vec<String> = names.iter().map(|c| c.to_lowercase()).collect();
    if l_names_folded.len() == l_names_folded.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in l_names_folded.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(_, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{:?} x{} at indices {:?}",
                    names[l_pos[0]],
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(format!("Duplicate sheet names detected: {c_msg}"))
}

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = C_SHEET_NAME_DEFAULT.to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Return `name`, or `name__2`, `name__3`, ... when already taken.
///
/// The chosen name is recorded in `set_names_existing` (lowercased).
pub fn derive_unique_sheet_name(name: &str, set_names_existing: &mut BTreeSet<String>) -> String {
    if set_names_existing.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let base_name: String = name
        .chars()
        .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
        .collect();

    let mut n_idx = 2usize;
    loop {
        let candidate: String = format!("{base_name}__{n_idx}")
            .chars()
            .take(N_LEN_EXCEL_SHEET_NAME_MAX)
            .collect();
        if set_names_existing.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_nan_inf_to_str() {
        assert_eq!(convert_nan_inf_to_str(f64::NAN).as_deref(), Ok("NaN"));
        assert_eq!(convert_nan_inf_to_str(f64::INFINITY).as_deref(), Ok("Inf"));
        assert_eq!(convert_nan_inf_to_str(f64::NEG_INFINITY).as_deref(), Ok("-Inf"));
        assert!(convert_nan_inf_to_str(1.0).is_err());
    }

    #[test]
    fn test_validate_unique_sheet_names_is_case_insensitive() {
        let names = vec!["Data".to_string(), "Other".to_string(), "DATA".to_string()];
        let err = validate_unique_sheet_names(&names).unwrap_err();
        assert!(err.contains("\"Data\" x2 at indices [0, 2]"), "{err}");

        assert!(validate_unique_sheet_names(&["a".to_string(), "b".to_string()]).is_ok());
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Q1/Q2 [draft]", "_"), "Q1_Q2 _draft_");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name("'quoted'", "_"), "quoted");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_derive_unique_sheet_name_appends_suffix() {
        let mut set_names = BTreeSet::new();
        assert_eq!(derive_unique_sheet_name("Data", &mut set_names), "Data");
        assert_eq!(derive_unique_sheet_name("data", &mut set_names), "data__2");
        assert_eq!(derive_unique_sheet_name("Data", &mut set_names), "Data__3");

        let c_long = "y".repeat(31);
        assert_eq!(derive_unique_sheet_name(&c_long, &mut set_names), c_long);
        let c_next = derive_unique_sheet_name(&c_long, &mut set_names);
        assert_eq!(c_next.chars().count(), 31);
        assert!(c_next.ends_with("__2"));
    }

    #[test]
    fn test_validate_sheet_extent() {
        assert!(validate_sheet_extent("S", 1_048_576, 16_384).is_ok());
        let err = validate_sheet_extent("S", 1_048_577, 1).unwrap_err();
        assert!(err.contains("1048577 rows"), "{err}");
        assert!(validate_sheet_extent("S", 1, 16_385).is_err());
    }

    #[test]
    fn test_cast_index_overflow() {
        assert_eq!(cast_col_num(25), Ok(25));
        assert!(cast_col_num(70_000).is_err());
        assert!(cast_row_num(usize::MAX).is_err());
    }
}

//! Input decoder: JSON payload to sheet descriptors.

use serde::Deserialize;

use crate::conf::N_DEPTH_JSON_MAX;
use crate::error::JsonXlsxError;
use crate::spec::SpecSheetInput;

/// Decode the whole payload into sheet descriptors, in input order.
///
/// Any failure aborts the run; there is no per-sheet recovery.
/// Nesting up to [`N_DEPTH_JSON_MAX`] is accepted; the parser stack grows on
/// demand.
pub fn decode_sheet_specs(v_input: &[u8]) -> Result<Vec<SpecSheetInput>, JsonXlsxError> {
    validate_json_depth(v_input)?;

    let mut de = serde_json::Deserializer::from_slice(v_input);
    de.disable_recursion_limit();
    let l_specs = Vec::<SpecSheetInput>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;

    validate_sheet_specs(&l_specs)?;
    log::debug!("decoded {} sheet(s) from {} bytes", l_specs.len(), v_input.len());
    Ok(l_specs)
}

/// Deepest `[`/`{` nesting of a JSON text, ignoring brackets inside strings.
///
/// Malformed input is not rejected here; the parser reports it.
pub fn derive_json_depth(v_input: &[u8]) -> usize {
    let mut n_depth = 0_usize;
    let mut n_depth_max = 0_usize;
    let mut if_in_string = false;
    let mut if_escaped = false;

    for &byte in v_input {
        if if_in_string {
            if if_escaped {
                if_escaped = false;
            } else if byte == b'\\' {
                if_escaped = true;
            } else if byte == b'"' {
                if_in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => if_in_string = true,
            b'[' | b'{' => {
                n_depth += 1;
                n_depth_max = n_depth_max.max(n_depth);
            }
            b']' | b'}' => n_depth = n_depth.saturating_sub(1),
            _ => {}
        }
    }
    n_depth_max
}

fn validate_json_depth(v_input: &[u8]) -> Result<(), JsonXlsxError> {
    let n_depth = derive_json_depth(v_input);
    if n_depth > N_DEPTH_JSON_MAX {
        return Err(JsonXlsxError::DecodeShape(format!(
            "nesting depth {n_depth} exceeds {N_DEPTH_JSON_MAX}"
        )));
    }
    Ok(())
}

/// Check invariants serde cannot express.
pub fn validate_sheet_specs(specs: &[SpecSheetInput]) -> Result<(), JsonXlsxError> {
    for (n_idx, spec) in specs.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(JsonXlsxError::DecodeShape(format!(
                "sheet #{n_idx}: name must not be empty"
            )));
        }
    }
    Ok(())
}

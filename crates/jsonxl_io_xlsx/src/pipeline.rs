//! Decode → build → serialize, as one pure function.

use crate::builder::build_workbook;
use crate::decode::decode_sheet_specs;
use crate::error::JsonXlsxError;
use crate::spec::{SpecJsonXlsxWriteOptions, SpecXlsxOutput};
use crate::writer::serialize_workbook;

/// Convert a JSON sheet payload into XLSX bytes.
///
/// Nothing is written anywhere; the caller decides what to do with the bytes.
pub fn convert_json_to_xlsx(
    v_input: &[u8],
    options: &SpecJsonXlsxWriteOptions,
) -> Result<SpecXlsxOutput, JsonXlsxError> {
    let l_specs = decode_sheet_specs(v_input)?;
    let (workbook, report) = build_workbook(l_specs, options);
    let bytes = serialize_workbook(&workbook)?;
    Ok(SpecXlsxOutput { bytes, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnumPipelineStage;

    #[test]
    fn test_convert_reports_sheets() {
        let output = convert_json_to_xlsx(
            br#"[{"name":"S1","header":["A","B"],"rows":[[1,"x"],[22,"yy"]]},
                 {"name":"S2","header":["C"],"rows":null}]"#,
            &SpecJsonXlsxWriteOptions::default(),
        )
        .expect("convertible");

        assert!(!output.bytes.is_empty());
        let l_names: Vec<&str> = output
            .report
            .sheets
            .iter()
            .map(|s| s.sheet_name.as_str())
            .collect();
        assert_eq!(l_names, ["S1", "S2"]);
    }

    #[test]
    fn test_convert_stops_at_decode() {
        let err = convert_json_to_xlsx(br#"{"name":"S1"}"#, &SpecJsonXlsxWriteOptions::default())
            .unwrap_err();
        assert_eq!(err.stage(), EnumPipelineStage::Decode);
    }
}

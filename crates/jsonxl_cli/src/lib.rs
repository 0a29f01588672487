//! `json2xlsx` command: JSON sheets on stdin, XLSX workbook on stdout.

use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use jsonxl_io_xlsx::{
    EnumPipelineStage, JsonXlsxError, SpecJsonXlsxWriteOptions, SpecXlsxReport,
    convert_json_to_xlsx,
};

/// Exit code for malformed input.
pub const N_EXIT_DECODE: u8 = 2;
/// Exit code for a workbook that cannot be encoded.
pub const N_EXIT_SERIALIZE: u8 = 3;
/// Exit code for stdin/stdout failures.
pub const N_EXIT_OUTPUT: u8 = 4;

/// Read a JSON array of sheets from stdin and write an XLSX workbook to stdout.
#[derive(Debug, Parser)]
#[command(name = "json2xlsx", version, about)]
pub struct CliArgs {
    /// Increase stderr log detail (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Run the whole pipeline from `input` to `output`.
///
/// Output is written only after the workbook was fully rendered.
pub fn run<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &SpecJsonXlsxWriteOptions,
) -> Result<SpecXlsxReport, JsonXlsxError> {
    let mut v_input = Vec::new();
    input.read_to_end(&mut v_input)?;

    let result = convert_json_to_xlsx(&v_input, options)?;

    output.write_all(&result.bytes)?;
    output.flush()?;
    Ok(result.report)
}

/// Map a pipeline error to the process exit code.
pub fn derive_exit_code(err: &JsonXlsxError) -> u8 {
    match err.stage() {
        EnumPipelineStage::Decode => N_EXIT_DECODE,
        EnumPipelineStage::Serialize => N_EXIT_SERIALIZE,
        EnumPipelineStage::Output => N_EXIT_OUTPUT,
    }
}

/// Entry point shared by the binary: stdin to stdout with default options.
pub fn main_with_args(args: CliArgs) -> ExitCode {
    if let Err(err) = jsonxl_log::init(jsonxl_log::derive_level_filter(args.verbose)) {
        eprintln!("json2xlsx: logger setup failed: {err}");
    }

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match run(&mut stdin, &mut stdout, &SpecJsonXlsxWriteOptions::default()) {
        Ok(report) => {
            log::info!(
                "wrote {} sheet(s), {} warning(s)",
                report.sheets.len(),
                report.warnings.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(derive_exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_writes_workbook() {
        let mut input = Cursor::new(br#"[{"name":"S1","header":["A"],"rows":[[1]]}]"#.to_vec());
        let mut v_out = Vec::new();

        let report = run(&mut input, &mut v_out, &SpecJsonXlsxWriteOptions::default())
            .expect("pipeline succeeds");

        assert_eq!(report.sheets.len(), 1);
        assert!(v_out.starts_with(b"PK"));
    }

    #[test]
    fn test_run_writes_nothing_on_decode_failure() {
        let mut input = Cursor::new(br#"{"name":"S1","header":["A"]}"#.to_vec());
        let mut v_out = Vec::new();

        let err = run(&mut input, &mut v_out, &SpecJsonXlsxWriteOptions::default()).unwrap_err();

        assert_eq!(derive_exit_code(&err), N_EXIT_DECODE);
        assert!(v_out.is_empty());
    }

    #[test]
    fn test_run_writes_nothing_on_serialize_failure() {
        let mut input = Cursor::new(
            br#"[{"name":"dup","header":["A"]},{"name":"dup","header":["B"]}]"#.to_vec(),
        );
        let mut v_out = Vec::new();

        let err = run(&mut input, &mut v_out, &SpecJsonXlsxWriteOptions::default()).unwrap_err();

        assert_eq!(derive_exit_code(&err), N_EXIT_SERIALIZE);
        assert!(v_out.is_empty());
    }

    #[test]
    fn test_run_maps_write_failure_to_output_stage() {
        let mut input = Cursor::new(br#"[{"name":"S1","header":["A"]}]"#.to_vec());

        let err = run(
            &mut input,
            &mut FailingWriter,
            &SpecJsonXlsxWriteOptions::default(),
        )
        .unwrap_err();

        assert_eq!(derive_exit_code(&err), N_EXIT_OUTPUT);
    }

    #[test]
    fn test_cli_args_accept_no_arguments() {
        let args = CliArgs::try_parse_from(["json2xlsx"]).expect("no-arg invocation");
        assert_eq!(args.verbose, 0);

        let args = CliArgs::try_parse_from(["json2xlsx", "-vv"]).expect("verbose flags");
        assert_eq!(args.verbose, 2);

        assert!(CliArgs::try_parse_from(["json2xlsx", "input.json"]).is_err());
    }
}

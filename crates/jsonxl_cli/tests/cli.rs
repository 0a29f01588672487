use std::io::{Cursor, Write};
use std::process::{Command, Output, Stdio};

use calamine::{Data, Reader, Xlsx};

fn run_json2xlsx(v_stdin: &[u8], l_args: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_json2xlsx"))
        .args(l_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary starts");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(v_stdin)
        .expect("stdin accepts payload");
    child.wait_with_output().expect("binary exits")
}

#[test]
fn converts_stdin_payload_to_workbook_on_stdout() {
    let output = run_json2xlsx(
        br#"[{"name":"S1","header":["A","B"],"rows":[[1,"x"],[22,"yy"]]},
             {"name":"S2","header":["C"],"rows":null}]"#,
        &[],
    );

    assert_eq!(output.status.code(), Some(0));
    let mut workbook = Xlsx::new(Cursor::new(output.stdout)).expect("readable workbook");
    assert_eq!(
        workbook.sheet_names(),
        vec!["S1".to_string(), "S2".to_string()]
    );
    let range = workbook.worksheet_range("S1").expect("sheet S1");
    assert_eq!(range.get_value((2, 0)), Some(&Data::Float(22.0)));
    assert_eq!(range.get_value((2, 1)), Some(&Data::String("yy".to_string())));
}

#[test]
fn bare_object_fails_with_decode_diagnostic() {
    let output = run_json2xlsx(br#"{"name":"S1","header":["A"]}"#, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let c_stderr = String::from_utf8_lossy(&output.stderr);
    assert!(c_stderr.contains("decode failed"), "{c_stderr}");
}

#[test]
fn duplicate_titles_fail_with_serialize_diagnostic() {
    let output = run_json2xlsx(
        br#"[{"name":"Same","header":["A"]},{"name":"Same","header":["B"]}]"#,
        &[],
    );

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let c_stderr = String::from_utf8_lossy(&output.stderr);
    assert!(c_stderr.contains("serialize failed"), "{c_stderr}");
}

#[test]
fn verbose_flag_logs_summary_to_stderr_only() {
    let output = run_json2xlsx(br#"[{"name":"S1","header":["A"]}]"#, &["-v"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.starts_with(b"PK"));
    let c_stderr = String::from_utf8_lossy(&output.stderr);
    assert!(c_stderr.contains("wrote 1 sheet(s)"), "{c_stderr}");
}

use std::io::Write;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_goscape");

fn run(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn usage_on_wrong_argument_count() {
    let cases: [&[&str]; 3] = [&[], &["encode"], &["encode", "url", "extra"]];
    for args in cases {
        let output = run(args, b"");
        assert_eq!(output.status.code(), Some(0), "args {:?}", args);
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("goscape is simple tool"), "{}", stdout);
        assert!(stdout.contains("goscape <command> <entity>"));
        assert!(output.stderr.is_empty());
    }
}

#[test]
fn encode_html() {
    let output = run(&["e", "html"], b"<text>foo&bar</text>");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"&lt;text&gt;foo&amp;bar&lt;/text&gt;");
}

#[test]
fn encode_url_without_trailing_newline() {
    let output = run(&["encode", "url"], "абвгд / abcde".as_bytes());
    assert!(output.status.success());
    assert_eq!(output.stdout, b"%D0%B0%D0%B1%D0%B2%D0%B3%D0%B4+%2F+abcde");
    assert!(output.stderr.is_empty());
}

#[test]
fn decode_base64_with_trailing_newline() {
    let output = run(&["d", "base64"], b"eyJmb28iOiAiYmFyIn0=\n");
    assert!(output.status.success());
    assert_eq!(output.stdout, br#"{"foo": "bar"}"#);
}

#[test]
fn decode_json_without_quotes() {
    let output = run(&["decode", "json"], b"tab\\there\n");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"tab\there");
}

#[test]
fn unknown_command() {
    let output = run(&["x", "html"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "unknown command x\n"
    );
}

#[test]
fn unknown_entity() {
    let output = run(&["encode", "xml"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "unknown entity type xml\n"
    );
}

#[test]
fn invalid_base64_writes_nothing() {
    let output = run(&["decode", "base64"], b"!!!");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("illegal base64 data: "), "{}", stderr);
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn invalid_url_escape() {
    let output = run(&["d", "url"], b"100%zz");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "invalid URL escape \"%zz\"\n"
    );
}

#[test]
fn verbose_logs_url_input() {
    let output = run(&["--verbose", "e", "url"], b"a b");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"a+b");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("\"a b\""), "{}", stderr);
}

#[test]
fn round_trip_through_binary() {
    let input = "Привет <world> & \"friends\"\n\ttab\0nul".as_bytes();
    for entity in ["html", "url", "base64", "json"] {
        let encoded = run(&["e", entity], input);
        assert!(encoded.status.success(), "encode {}", entity);
        let decoded = run(&["d", entity], &encoded.stdout);
        assert!(decoded.status.success(), "decode {}", entity);
        assert_eq!(decoded.stdout, input, "{}", entity);
    }
}

#[test]
fn hyphenated_tokens_are_positionals() {
    let output = run(&["-x", "html"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "unknown command -x\n"
    );

    let output = run(&["e", "-v"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "unknown entity type -v\n"
    );

    let output = run(&["e", "--nope"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "unknown entity type --nope\n"
    );
}

#[test]
fn lone_flag_prints_usage() {
    for args in [["--foo"], ["--help"], ["-V"]] {
        let output = run(&args, b"");
        assert_eq!(output.status.code(), Some(0), "args {:?}", args);
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("goscape is simple tool"), "{}", stdout);
        assert!(output.stderr.is_empty());
    }
}

#[test]
fn html_passes_invalid_utf8_through() {
    let output = run(&["e", "html"], b"\xff<");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"\xff&lt;");

    let output = run(&["d", "html"], b"\xff&lt;&check;");
    assert!(output.status.success());
    let mut expected = b"\xff<".to_vec();
    expected.extend_from_slice("\u{2713}".as_bytes());
    assert_eq!(output.stdout, expected);
}

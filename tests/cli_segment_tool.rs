use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "rudp-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn segment_tool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_segment_tool"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run segment_tool")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "segment_tool failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn decode_describes_a_valid_ack() {
    let output = segment_tool(&["decode", "4006 0503 baf6"]);
    assert_eq!(stdout_of(&output), "ACK [ SEQ = 5, ACK = 3, LEN = 6 ]\n");
}

#[test]
fn decode_json_prints_one_summary_per_segment() {
    let output = segment_tool(&["decode", "--json", "40060503baf6", "40060503baf6"]);
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);

    let v: Value = serde_json::from_str(lines[0]).expect("summary json");
    assert_eq!(v.get("kind").and_then(|k| k.as_str()), Some("ACK"));
    assert_eq!(v.get("seq").and_then(|s| s.as_u64()), Some(5));
    assert_eq!(v.get("ack").and_then(|a| a.as_u64()), Some(3));
    assert_eq!(v.get("length").and_then(|l| l.as_u64()), Some(6));
}

#[test]
fn decode_reports_invalid_segments_and_fails() {
    // 第二个数据报的校验和被篡改
    let output = segment_tool(&["decode", "40060503baf6", "40060503baf7"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "valid segment still printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid segment"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn encode_ack_matches_known_wire_bytes() {
    let output = segment_tool(&["encode", "ack", "--seq", "5", "--ack", "3"]);
    assert_eq!(stdout_of(&output).trim(), "40060503baf6");
}

#[test]
fn encoded_segments_decode_back() {
    let cases: [(&[&str], &str); 4] = [
        (
            &["encode", "eak", "--seq", "4", "--ack", "2", "--eak", "5,7,9"],
            "EAK [ SEQ = 4, ACK = 2, LEN = 9 ]",
        ),
        (
            &["encode", "dat", "--seq", "1", "--ack", "0", "--data", "68656c6c6f", "--full-checksum"],
            "DAT [ SEQ = 1, ACK = 0, LEN = 11 ]",
        ),
        (
            &["encode", "fin", "--seq", "9", "--ack", "8"],
            "FIN [ SEQ = 9, ACK = 8, LEN = 6 ]",
        ),
        (&["encode", "nul", "--seq", "3"], "NUL [ SEQ = 3, ACK = N/A, LEN = 6 ]"),
    ];
    for (args, expected) in cases {
        let hex = stdout_of(&segment_tool(args));
        let decoded = stdout_of(&segment_tool(&["decode", hex.trim()]));
        assert_eq!(decoded.trim(), expected, "args={args:?}");
    }
}

#[test]
fn encode_without_required_argument_fails() {
    let output = segment_tool(&["encode", "dat", "--seq", "1", "--ack", "0"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--data"), "unexpected stderr: {stderr}");
}

#[test]
fn syn_carries_parameters_from_profile_file() {
    let dir = unique_temp_dir("syn-profile");
    let profile = write_file(
        &dir,
        "profile.json",
        r#"{ "max_segment_size": 1400, "retransmission_timeout_ms": 900 }"#,
    );

    let hex = stdout_of(&segment_tool(&[
        "encode",
        "syn",
        "--seq",
        "0",
        "--profile",
        profile.to_str().unwrap(),
    ]));
    let decoded = stdout_of(&segment_tool(&["decode", "--json", hex.trim()]));
    let v: Value = serde_json::from_str(decoded.trim()).expect("summary json");
    assert_eq!(v.get("kind").and_then(|k| k.as_str()), Some("SYN"));
    let syn = v.get("syn").expect("syn parameters");
    assert_eq!(syn.get("max_segment_size").and_then(|m| m.as_u64()), Some(1400));
    assert_eq!(
        syn.get("retransmission_timeout_ms").and_then(|r| r.as_u64()),
        Some(900)
    );
    assert_eq!(syn.get("max_retrans").and_then(|r| r.as_u64()), Some(3));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn profile_command_validates_and_prints_effective_values() {
    let dir = unique_temp_dir("profile");
    let good = write_file(&dir, "good.json", r#"{ "max_outstanding_segs": 16 }"#);
    let bad = write_file(&dir, "bad.json", r#"{ "retransmission_timeout_ms": 10 }"#);

    let stdout = stdout_of(&segment_tool(&["profile", "--profile", good.to_str().unwrap()]));
    let v: Value = serde_json::from_str(&stdout).expect("profile json");
    assert_eq!(v.get("max_outstanding_segs").and_then(|m| m.as_u64()), Some(16));
    assert_eq!(v.get("max_segment_size").and_then(|m| m.as_u64()), Some(128));

    let output = segment_tool(&["profile", "--profile", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("retransmission_timeout_ms"),
        "unexpected stderr: {stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn decode_keeps_going_after_malformed_hex() {
    let output = segment_tool(&["decode", "40060503baf6", "zz", "0x4006 0503 baf6"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2, "both valid segments still printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed hex \"zz\""), "unexpected stderr: {stderr}");
    assert!(!stderr.contains("error:"), "batch was aborted: {stderr}");
}

#[test]
fn rejected_segment_is_reported_once() {
    let output = Command::new(env!("CARGO_BIN_EXE_segment_tool"))
        .args(["decode", "40060503baf7"])
        .env_remove("RUST_LOG")
        .output()
        .expect("run segment_tool");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("invalid segment").count(), 1, "stderr: {stderr}");
}

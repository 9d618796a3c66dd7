//! Integration tests for the conversion entry points.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use edi837_core::{
    ControlNumbers, ConvertError, EnvelopeConfig, IssueKind, check, convert, convert_document,
    convert_str,
};
use tempfile::{NamedTempFile, TempDir};
use tracing::Level;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

fn config() -> EnvelopeConfig {
    let created = NaiveDate::from_ymd_opt(2024, 7, 2)
        .unwrap()
        .and_hms_opt(15, 31, 0)
        .unwrap();
    EnvelopeConfig::new("SUBMITTER01", "RECEIVER01", created)
        .with_control_numbers(ControlNumbers::new(42, 7, 3))
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_convert_file_matches_convert_str() {
    let from_path = convert(fixture_path("dependent.json"), &config()).unwrap();
    let from_str = convert_str(&fixture_text("dependent.json"), &config()).unwrap();
    assert_eq!(from_path, from_str);
    assert!(from_path.starts_with("ISA*00*"));
    assert!(from_path.ends_with("IEA*1*000000042~\n"));
}

#[test]
fn test_conversion_summary() {
    let conversion = convert_document(&fixture_text("two_lines.json"), &config()).unwrap();
    assert_eq!(conversion.claim_number, "PCN0003");
    assert_eq!(conversion.service_lines, 2);
    assert_eq!(conversion.document.transaction_set_segments(), 24);
    assert_eq!(conversion.document.segment_count(), 28);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");
    match convert(&missing, &config()) {
        Err(ConvertError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_rejected_before_validation() {
    let file = write_temp("{ \"billing\": ");
    let error = convert(file.path(), &config()).unwrap_err();
    assert!(matches!(error, ConvertError::MalformedInput(_)));
}

#[test]
fn test_validation_errors_are_collected() {
    let mut value: serde_json::Value = serde_json::from_str(&fixture_text("minimal.json")).unwrap();
    value["billing"].as_object_mut().unwrap().remove("npi");
    value["subscriber"]["dateOfBirth"] = serde_json::json!("1980-13-45");
    let file = write_temp(&value.to_string());

    let error = check(file.path()).unwrap_err();
    let issues = error.validation().expect("validation error");
    assert!(issues.has_path("billing.npi"));
    assert!(issues.has_path("subscriber.dateOfBirth"));
    assert!(issues.len() >= 2);
    assert!(
        issues
            .issues()
            .iter()
            .any(|issue| issue.kind == IssueKind::Missing)
    );
}

#[test]
fn test_check_returns_model() {
    let model = check(&fixture_path("dependent.json")).unwrap();
    assert!(model.has_dependent_patient());
    assert_eq!(model.service_lines().len(), 1);
}

#[test]
fn test_delimiter_in_name_is_encoding_error() {
    let mut value: serde_json::Value = serde_json::from_str(&fixture_text("minimal.json")).unwrap();
    value["payer"]["organizationName"] = serde_json::json!("Lone*Star");
    let error = convert_str(&value.to_string(), &config()).unwrap_err();
    match error {
        ConvertError::Encoding(inner) => {
            assert!(inner.to_string().contains("payer.organizationName"));
        }
        other => panic!("expected an encoding error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_is_encoding_error() {
    let config = config().with_control_numbers(ControlNumbers::new(0, 1, 1));
    let error = convert_str(&fixture_text("minimal.json"), &config).unwrap_err();
    assert!(matches!(error, ConvertError::Encoding(_)));
}

/// Writer that appends formatted events to a shared buffer.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs(run: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    logs.text()
}

#[test]
fn test_events_never_carry_claim_identifiers() {
    let logs = with_captured_logs(|| {
        convert(fixture_path("dependent.json"), &config()).unwrap();
        convert_str(&fixture_text("minimal.json"), &config()).unwrap();
        check(&fixture_path("two_lines.json")).unwrap();
    });

    assert!(logs.contains("claim validated"));
    assert!(logs.contains("claim encoded"));
    assert!(logs.contains("service line written"));
    for identifier in ["PCN0001", "PCN0002", "PCN0003", "W123456789", "DOE", "Doe"] {
        assert!(!logs.contains(identifier), "{identifier} leaked into: {logs}");
    }
}

#[test]
fn test_rejected_claim_events_carry_counts_only() {
    let mut value: serde_json::Value = serde_json::from_str(&fixture_text("minimal.json")).unwrap();
    value["subscriber"]["memberId"] = serde_json::json!("");
    let logs = with_captured_logs(|| {
        assert!(convert_str(&value.to_string(), &config()).is_err());
    });

    assert!(logs.contains("claim rejected"));
    assert!(!logs.contains("PCN0001"));
}

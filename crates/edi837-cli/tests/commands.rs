//! Integration tests for argument parsing and the command layer.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use edi837_cli::cli::{CheckArgs, Cli, Command, ConvertArgs, EnvelopeArgs};
use edi837_cli::commands::{
    CheckOutcome, envelope_config, run_check, run_convert, validation_issues,
};
use edi837_cli::logging::LogFormat;
use edi837_cli::summary::{conversion_table, issue_table};
use edi837_core::{ControlNumbers, UsageIndicator};
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 2)
        .unwrap()
        .and_hms_opt(15, 31, 0)
        .unwrap()
}

fn envelope_args() -> EnvelopeArgs {
    EnvelopeArgs {
        sender_id: Some("SUBMITTER01".to_string()),
        receiver_id: Some("RECEIVER01".to_string()),
        control_number: Some(42),
        ..EnvelopeArgs::default()
    }
}

#[test]
fn test_parse_convert_command() {
    let cli = Cli::try_parse_from([
        "edi837",
        "convert",
        "claim.json",
        "--output",
        "claim.x12",
        "--sender-id",
        "SUBMITTER01",
        "--receiver-id",
        "RECEIVER01",
        "--control-number",
        "7",
        "--production",
        "--compact",
        "--log-format",
        "json",
    ])
    .unwrap();
    let Command::Convert(args) = cli.command else {
        panic!("expected convert");
    };
    assert_eq!(args.input, PathBuf::from("claim.json"));
    assert_eq!(args.output, Some(PathBuf::from("claim.x12")));
    assert_eq!(args.envelope.control_number, Some(7));
    assert!(args.envelope.production);
    assert!(args.envelope.compact);
}

#[test]
fn test_log_flags_reach_log_config() {
    let cli = Cli::try_parse_from([
        "edi837",
        "check",
        "claim.json",
        "--log-level",
        "debug",
        "--log-format",
        "compact",
        "--log-timestamps",
        "--log-target",
        "--color",
        "never",
    ])
    .unwrap();
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert!(!config.use_env_filter);
    assert!(config.with_timestamps);
    assert!(config.with_target);
    assert!(!config.with_ansi);
    assert_eq!(config.format, LogFormat::Compact);
    assert!(!config.log_data);
}

#[test]
fn test_log_config_defaults() {
    let config = Cli::try_parse_from(["edi837", "check", "claim.json"])
        .unwrap()
        .log_config();
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert!(config.use_env_filter);
    assert!(!config.with_timestamps);
    assert!(!config.with_target);
    assert_eq!(config.format, LogFormat::Pretty);
}

#[test]
fn test_parse_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["edi837", "send", "claim.json"]).is_err());
}

#[test]
fn test_envelope_from_flags() {
    let mut args = envelope_args();
    args.production = true;
    args.compact = true;
    args.sender_qualifier = Some("30".to_string());
    let config = envelope_config(&args, now()).unwrap();
    assert_eq!(config.sender_id, "SUBMITTER01");
    assert_eq!(config.sender_qualifier, "30");
    assert_eq!(config.receiver_qualifier, "ZZ");
    assert_eq!(config.created, now());
    assert_eq!(config.control_numbers, ControlNumbers::new(42, 42, 42));
    assert_eq!(config.usage, UsageIndicator::Production);
    assert!(!config.line_break);
}

#[test]
fn test_envelope_seeds_control_numbers_from_time() {
    let args = EnvelopeArgs {
        control_number: None,
        ..envelope_args()
    };
    let config = envelope_config(&args, now()).unwrap();
    let seed = now().and_utc().timestamp().unsigned_abs();
    assert_eq!(config.control_numbers, ControlNumbers::from_seed(seed));
}

#[test]
fn test_envelope_file_with_flag_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envelope.json");
    std::fs::write(
        &path,
        r#"{
            "sender_id": "FILESENDER",
            "receiver_id": "FILERECEIVER",
            "sender_name": "Riverside Billing",
            "control_numbers": { "interchange": 9, "group": 8, "transaction_set": 7 },
            "delimiters": { "element": "|" }
        }"#,
    )
    .unwrap();
    let args = EnvelopeArgs {
        envelope: Some(path),
        receiver_id: Some("FLAGRECEIVER".to_string()),
        ..EnvelopeArgs::default()
    };
    let config = envelope_config(&args, now()).unwrap();
    assert_eq!(config.sender_id, "FILESENDER");
    assert_eq!(config.receiver_id, "FLAGRECEIVER");
    assert_eq!(config.sender_name.as_deref(), Some("Riverside Billing"));
    assert_eq!(config.control_numbers, ControlNumbers::new(9, 8, 7));
    assert_eq!(config.delimiters.element, '|');
    assert_eq!(config.delimiters.segment, '~');
}

#[test]
fn test_envelope_requires_sender() {
    let args = EnvelopeArgs {
        sender_id: None,
        ..envelope_args()
    };
    let error = envelope_config(&args, now()).unwrap_err();
    assert!(error.to_string().contains("--sender-id"));
}

#[test]
fn test_convert_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("claim.x12");
    let args = ConvertArgs {
        input: fixture_path("minimal.json"),
        output: Some(output.clone()),
        envelope: envelope_args(),
    };
    let outcome = run_convert(&args, now()).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, outcome.conversion.text());
    assert!(written.contains("ISA*00*"));
    assert!(written.contains("SE*21*0042~"));
    assert!(written.ends_with("IEA*1*000000042~\n"));

    let table = conversion_table(&outcome).to_string();
    assert!(table.contains("PCN0001"));
}

#[test]
fn test_convert_surfaces_validation_issues() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("claim.json");
    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fixture_path("minimal.json")).unwrap())
            .unwrap();
    value["billing"].as_object_mut().unwrap().remove("npi");
    std::fs::write(&input, value.to_string()).unwrap();

    let args = ConvertArgs {
        input,
        output: Some(dir.path().join("claim.x12")),
        envelope: envelope_args(),
    };
    let error = run_convert(&args, now()).unwrap_err();
    let issues = validation_issues(&error).expect("validation issues");
    assert!(issues.iter().any(|issue| issue.path == "billing.npi"));
    assert!(!dir.path().join("claim.x12").exists());

    let table = issue_table(issues).to_string();
    assert!(table.contains("billing.npi"));
    assert!(table.contains("missing"));
}

#[test]
fn test_check_reports_valid_and_invalid() {
    let valid = run_check(&CheckArgs {
        input: fixture_path("dependent.json"),
    })
    .unwrap();
    assert!(matches!(valid, CheckOutcome::Valid(model) if model.has_dependent_patient()));

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("claim.json");
    std::fs::write(&input, r#"{ "claimInformation": { "serviceLines": [] } }"#).unwrap();
    let CheckOutcome::Invalid(issues) = run_check(&CheckArgs { input }).unwrap() else {
        panic!("expected validation issues");
    };
    for path in ["billing", "subscriber", "payer", "claimInformation.serviceLines"] {
        assert!(
            issues.iter().any(|issue| issue.path.starts_with(path)),
            "no issue under {path}"
        );
    }
}

#[test]
fn test_check_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = run_check(&CheckArgs {
        input: dir.path().join("absent.json"),
    });
    let error = result.unwrap_err();
    assert!(validation_issues(&error).is_none());
    assert!(format!("{error:#}").contains("absent.json"));
}

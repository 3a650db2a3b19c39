use std::fs;

use brute_bench::{Error, ExperimentConfig, analyze, read_report, write_report};
use brute_keyspace::sha1_hex;

fn small_config() -> ExperimentConfig {
    ExperimentConfig::from_json_str(
        r#"{
            "seed": 11,
            "groups": [
                { "name": "ab", "alphabet": { "symbols": "ab" }, "max_length": 3, "trials": 4 },
                { "name": "digits", "alphabet": { "symbols": "0123456789" }, "max_length": 2, "trials": 3 }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_run_write_read_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.json");

    let report = small_config().experiment().unwrap().run(|_| {}).unwrap();
    write_report(&path, &report, false).unwrap();

    let loaded = read_report(&path).unwrap();
    assert_eq!(loaded, report);
    assert!(!dir.path().join("output.json.tmp").exists());

    let analysis = analyze(&loaded, None);
    assert!(analysis.is_clean());
    assert_eq!(analysis.summaries.len(), 5);
    for summary in &analysis.summaries {
        let estimate = summary.estimate.unwrap();
        assert!(estimate.observed_mean >= 0.0);
        assert!(estimate.expected_mean >= 0.0);
    }
}

#[test]
fn test_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.json");
    fs::write(&path, "keep me").unwrap();

    let report = small_config().experiment().unwrap().run(|_| {}).unwrap();
    let err = write_report(&path, &report, false).unwrap_err();
    assert!(matches!(err, Error::FileExists { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

    write_report(&path, &report, true).unwrap();
    assert_eq!(read_report(&path).unwrap(), report);
}

#[test]
fn test_unwritable_destination_is_serialization_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("output.json");

    let report = small_config().experiment().unwrap().run(|_| {}).unwrap();
    let err = write_report(&path, &report, false).unwrap_err();
    assert!(matches!(err, Error::SerializationFailure { .. }));

    // The report is still usable for another attempt.
    let retry = dir.path().join("output.json");
    write_report(&retry, &report, false).unwrap();
}

#[test]
fn test_reads_hand_written_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.json");
    let json = format!(
        r#"{{
    "ascii_lowercase": {{
        "1": {{
            "input_set": "abcdefghijklmnopqrstuvwxyz",
            "target_length": 1,
            "test_count": 2,
            "permutation_count": 26,
            "attempts": [
                {{ "password": "a", "hash": "{a}", "runtime": 2e-06, "index": 0 }},
                {{ "password": "m", "hash": "{m}", "runtime": 4e-06, "index": 12 }}
            ]
        }}
    }}
}}"#,
        a = sha1_hex("a"),
        m = sha1_hex("m"),
    );
    fs::write(&path, json).unwrap();

    let report = read_report(&path).unwrap();
    let analysis = analyze(&report, Some("ascii_lowercase"));
    assert!(analysis.is_clean());

    let estimate = analysis.summaries[0].estimate.unwrap();
    assert!((estimate.observed_mean - 3e-6).abs() < 1e-15);
    // 2e-6 * 26/2 = 2.6e-5 and 4e-6 * 26/26 = 4e-6
    assert!((estimate.expected_mean - 1.5e-5).abs() < 1e-15);
}

#[test]
fn test_detects_corrupted_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.json");

    let mut report = small_config().experiment().unwrap().run(|_| {}).unwrap();
    let attempt = &mut report.get_mut("digits").unwrap().get_mut(&2).unwrap().attempts[0];
    attempt.password = format!("{}x", attempt.password);
    write_report(&path, &report, false).unwrap();

    let analysis = analyze(&read_report(&path).unwrap(), None);
    assert_eq!(analysis.mismatches.len(), 1);
    assert_eq!(analysis.mismatches[0].group, "digits");
    assert_eq!(analysis.mismatches[0].length, 2);
}

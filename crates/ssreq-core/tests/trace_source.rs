use std::fs;
use std::path::PathBuf;

use ssreq_core::protocol::StandardRequest;
use ssreq_core::protocol::setup::{parse_setup, setup_words};
use ssreq_core::{SourceError, StepSource, TraceFileSource};
use tempfile::TempDir;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

#[test]
fn trace_source_reads_steps_from_fixture() {
    let path = repo_root()
        .join("tests")
        .join("golden")
        .join("enumeration")
        .join("input.jsonl");
    let mut source = TraceFileSource::open(&path).unwrap();

    let mut steps = 0;
    while let Some(_step) = source.next_step().unwrap() {
        steps += 1;
    }

    assert_eq!(steps, 16);
}

#[test]
fn trace_source_skips_blank_lines() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blank.jsonl");
    fs::write(&path, "{\"rx_good\": true}\n\n   \n{}\n").unwrap();

    let mut source = TraceFileSource::open(&path).unwrap();
    assert!(source.next_step().unwrap().unwrap().rx_good);
    assert!(source.next_step().unwrap().is_some());
    assert!(source.next_step().unwrap().is_none());
}

#[test]
fn trace_source_reports_line_of_malformed_step() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.jsonl");
    fs::write(&path, "{}\n\n{\"valid\": \"all\"}\n").unwrap();

    let mut source = TraceFileSource::open(&path).unwrap();
    assert!(source.next_step().unwrap().is_some());
    let err = source.next_step().unwrap_err();
    assert!(matches!(err, SourceError::Parse { line: 3, .. }));
}

#[test]
fn trace_source_rejects_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = match TraceFileSource::open(&temp.path().join("missing.jsonl")) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn fixture_setup_words_carry_the_request_bytes() {
    let path = repo_root()
        .join("tests")
        .join("golden")
        .join("enumeration")
        .join("input.jsonl");
    let mut source = TraceFileSource::open(&path).unwrap();
    let word0 = source.next_step().unwrap().unwrap();
    let word1 = source.next_step().unwrap().unwrap();
    assert!(word0.setup && word0.first);
    assert!(word1.setup && word1.last);

    let mut bytes = word0.data.to_le_bytes().to_vec();
    bytes.extend_from_slice(&word1.data.to_le_bytes());
    let packet = parse_setup(&bytes).unwrap();
    assert_eq!(packet.standard_request(), Some(StandardRequest::SetAddress));
    assert_eq!(packet.value, 0x12);
    assert_eq!(setup_words(&packet.to_bytes()).unwrap(), (word0.data, word1.data));
}

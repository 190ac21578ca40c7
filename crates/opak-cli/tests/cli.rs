//! CLI integration tests over synthetic journal trees.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn push_record(buf: &mut Vec<u8>, record_type: u16, payload: &[u8]) {
    buf.extend_from_slice(&[0, 0]);
    buf.extend_from_slice(&record_type.to_be_bytes());
    buf.extend_from_slice(&((payload.len() + 6) as u16).to_be_bytes());
    buf.extend_from_slice(payload);
}

fn bcd6(value: u64) -> [u8; 6] {
    let mut out = [0u8; 6];
    let mut v = value;
    for slot in out.iter_mut().rev() {
        let lo = (v % 10) as u8;
        v /= 10;
        let hi = (v % 10) as u8;
        v /= 10;
        *slot = (hi << 4) | lo;
    }
    out
}

// ASCII names only; the core handles cp1250, the CLI tests don't need to.
fn packaging_payload(name: &str, qty: u64, value: u64, total: u64, returned: bool) -> Vec<u8> {
    let mut payload = vec![0u8; 40];
    payload[..name.len()].copy_from_slice(name.as_bytes());
    payload.extend_from_slice(&bcd6(value));
    payload.extend_from_slice(&bcd6(qty));
    payload.push(2);
    payload.extend_from_slice(&bcd6(total));
    payload.push(u8::from(returned));
    payload.push(0);
    payload
}

fn header_payload(doc_type: u8, timestamp: u32, doc_number: u32) -> Vec<u8> {
    let mut payload = vec![doc_type];
    payload.extend_from_slice(&timestamp.to_be_bytes());
    payload.extend_from_slice(&doc_number.to_be_bytes());
    payload.push(0);
    payload.extend_from_slice(b"1234567890");
    payload.extend_from_slice(b"A");
    payload
}

fn write_tree(root: &Path) {
    let doc_dir = root.join("sklep1/01/EJ0/DOC/0/00/00");
    fs::create_dir_all(&doc_dir).unwrap();

    let mut issue = Vec::new();
    push_record(&mut issue, 0x44, &header_payload(1, 0, 17));
    push_record(&mut issue, 0x63, &packaging_payload("kaucja", 100, 100, 100, false));
    fs::write(doc_dir.join("00000017.BIN"), &issue).unwrap();

    let mut ret = Vec::new();
    push_record(&mut ret, 0x44, &header_payload(1, 60, 18));
    push_record(&mut ret, 0x63, &packaging_payload("kaucja", 100, 100, 100, true));
    fs::write(doc_dir.join("00000018.BIN"), &ret).unwrap();
}

fn opak() -> Command {
    Command::cargo_bin("opak").unwrap()
}

#[test]
fn report_csv_prints_detail_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    opak()
        .args(["report", dir.path().to_str().unwrap(), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "location,printer,file,doc_number,timestamp,pack_name,qty,value,total",
        ))
        .stdout(predicate::str::contains(
            "sklep1,01,00000017.BIN,17,2000-01-01T00:00:00,kaucja,1.00,1.00,1.00",
        ))
        .stdout(predicate::str::contains(
            "sklep1,01,00000018.BIN,18,2000-01-01T00:01:00,kaucja,1.00,1.00,-1.00",
        ));
}

#[test]
fn report_aggregate_csv_rolls_up_buckets() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    opak()
        .args([
            "report",
            dir.path().to_str().unwrap(),
            "--aggregate",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "location,printer,pack_name,rows,returns,issued,sum_total",
        ))
        .stdout(predicate::str::contains("sklep1,01,kaucja,2,1,1,0.00"));
}

#[test]
fn report_parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());

    let sequential = opak()
        .args([
            "report",
            dir.path().to_str().unwrap(),
            "--aggregate",
            "--format",
            "csv",
        ])
        .output()
        .unwrap();
    let parallel = opak()
        .args([
            "report",
            dir.path().to_str().unwrap(),
            "--aggregate",
            "--format",
            "csv",
            "--jobs",
            "2",
        ])
        .output()
        .unwrap();

    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn report_fails_on_missing_root() {
    opak()
        .args(["report", "/nonexistent/opak-tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn inspect_lists_record_structure() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());
    let file = dir.path().join("sklep1/01/EJ0/DOC/0/00/00/00000017.BIN");

    opak()
        .args(["inspect", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("type=0x44"))
        .stdout(predicate::str::contains("Opakowanie"))
        .stdout(predicate::str::contains("Paragon"));
}

#[test]
fn show_dumps_document_json() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path());
    let file = dir.path().join("sklep1/01/EJ0/DOC/0/00/00/00000018.BIN");

    opak()
        .args(["show", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"doc_number\": 18"))
        .stdout(predicate::str::contains("\"source\": \"structured\""))
        .stdout(predicate::str::contains("-1.00"));
}

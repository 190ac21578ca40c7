//! End-to-end scenarios: synthetic journal trees through decode, extraction
//! and aggregation.

mod common;

use std::fs;
use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use opak_core::journal::records::tag;
use opak_core::{
    decode_document, extract_packaging, scan_tree, Aggregator, DecodeOutcome, EntrySource,
    ScanOptions,
};

use common::{header_payload, line_payload, packaging_payload, push_record};

fn issue_document() -> Vec<u8> {
    let mut data = Vec::new();
    push_record(&mut data, tag::HEADER, &header_payload(0x01, 0, 17));
    push_record(&mut data, tag::LINE, &line_payload("Piwo 1 x 4,50 4,50"));
    push_record(
        &mut data,
        tag::PACKAGING,
        &packaging_payload("kaucja szkło", 100, 100, 100, false),
    );
    data
}

fn return_document() -> Vec<u8> {
    let mut data = Vec::new();
    push_record(&mut data, tag::HEADER, &header_payload(0x01, 60, 18));
    push_record(
        &mut data,
        tag::PACKAGING,
        &packaging_payload("kaucja szkło", 100, 100, 100, true),
    );
    data
}

#[test]
fn structured_issue_yields_positive_total() {
    let doc = decode_document(&issue_document());
    assert_eq!(doc.header.as_ref().unwrap().doc_number, 17);
    assert_eq!(doc.packaging.len(), 1);

    let extraction = extract_packaging(&doc);
    let entries = extraction.outcome.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "kaucja szkło");
    assert_eq!(entries[0].total, Decimal::from_str("1.00").unwrap());
    assert_eq!(entries[0].source, EntrySource::Structured);
}

#[test]
fn structured_return_yields_negative_total() {
    let doc = decode_document(&return_document());
    let extraction = extract_packaging(&doc);
    let entries = extraction.outcome.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].total, Decimal::from_str("-1.00").unwrap());
    assert_eq!(entries[0].quantity, Decimal::from_str("1.00").unwrap());
}

#[test]
fn structured_record_suppresses_heuristic_for_whole_document() {
    let mut data = Vec::new();
    push_record(&mut data, tag::HEADER, &header_payload(0x01, 0, 19));
    // deposit-looking text line AND a structured record
    push_record(&mut data, tag::LINE, &line_payload("kaucja szkło 1 x 1,00 1,00"));
    push_record(
        &mut data,
        tag::PACKAGING,
        &packaging_payload("kaucja szkło", 100, 100, 100, false),
    );

    let extraction = extract_packaging(&decode_document(&data));
    assert!(matches!(extraction.outcome, DecodeOutcome::Structured(_)));
    assert_eq!(extraction.outcome.entries().len(), 1);
    assert!(extraction
        .outcome
        .entries()
        .iter()
        .all(|e| e.source == EntrySource::Structured));
}

#[test]
fn heuristic_kicks_in_without_structured_records() {
    let mut data = Vec::new();
    push_record(&mut data, tag::HEADER, &header_payload(0x01, 0, 20));
    push_record(&mut data, tag::LINE, &line_payload("Chleb 1 x 4,20 4,20"));
    push_record(&mut data, tag::LINE, &line_payload("kaucja szkło 1 x 1,00 1,00"));

    let extraction = extract_packaging(&decode_document(&data));
    let DecodeOutcome::Heuristic(entries) = &extraction.outcome else {
        panic!("expected heuristic outcome");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "kaucja szkło");
    assert_eq!(entries[0].total, Decimal::from_str("1.00").unwrap());
    assert_eq!(entries[0].source, EntrySource::Heuristic);
}

#[test]
fn truncated_file_keeps_leading_records() {
    let mut data = issue_document();
    // simulate capture mid-write: another record starts but is cut short
    data.extend_from_slice(&[0, 0, 0, 0x63, 0, 59, 1, 2, 3]);

    let doc = decode_document(&data);
    assert_eq!(doc.packaging.len(), 1);
    assert_eq!(doc.lines.len(), 1);
}

#[test]
fn tree_scan_aggregates_issues_and_returns() {
    let dir = tempfile::tempdir().unwrap();
    let doc_dir = dir.path().join("sklep1/01/EJ0/DOC/0/00/00");
    fs::create_dir_all(&doc_dir).unwrap();
    fs::write(doc_dir.join("00000017.BIN"), issue_document()).unwrap();
    fs::write(doc_dir.join("00000018.BIN"), return_document()).unwrap();

    let report = scan_tree(dir.path(), ScanOptions::default()).unwrap();
    assert_eq!(report.files, 2);
    assert_eq!(report.rows.len(), 2);
    assert!(report.skipped.is_empty());

    for row in &report.rows {
        assert_eq!(row.location, "sklep1");
        assert_eq!(row.printer, "01");
        assert_eq!(row.pack_name, "kaucja szkło");
    }

    let mut agg = Aggregator::new();
    for row in &report.rows {
        agg.fold(row);
    }
    let buckets = agg.finalize();
    assert_eq!(buckets.len(), 1);

    let (key, bucket) = &buckets[0];
    assert_eq!(key.location, "sklep1");
    assert_eq!(key.printer, "01");
    assert_eq!(key.pack_name, "kaucja szkło");
    assert_eq!(bucket.rows, 2);
    assert_eq!(bucket.issued, 1);
    assert_eq!(bucket.returns, 1);
    assert_eq!(bucket.sum_total, Decimal::from_str("0.00").unwrap());
}

#[test]
fn unrecognized_lines_surface_only_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let doc_dir = dir.path().join("sklep1/01");
    fs::create_dir_all(&doc_dir).unwrap();

    let mut data = Vec::new();
    push_record(&mut data, tag::HEADER, &header_payload(0x01, 0, 21));
    push_record(&mut data, tag::LINE, &line_payload("OPAKOWANIA ZWROTNE"));
    fs::write(doc_dir.join("00000021.BIN"), &data).unwrap();

    let quiet = scan_tree(dir.path(), ScanOptions::default()).unwrap();
    assert!(quiet.rows.is_empty());

    let all = scan_tree(
        dir.path(),
        ScanOptions {
            include_unrecognized: true,
            ..ScanOptions::default()
        },
    )
    .unwrap();
    assert_eq!(all.rows.len(), 1);
    assert_eq!(all.rows[0].pack_name, "");
    assert_eq!(all.rows[0].total, None);

    // rows without totals never reach a bucket
    let mut agg = Aggregator::new();
    for row in &all.rows {
        agg.fold(row);
    }
    assert!(agg.is_empty());
}

#[test]
fn sidecar_mismatch_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let doc_dir = dir.path().join("sklep1/01");
    fs::create_dir_all(&doc_dir).unwrap();
    let path = doc_dir.join("00000017.BIN");
    fs::write(&path, issue_document()).unwrap();
    fs::write(
        doc_dir.join("00000017.BIN.meta.json"),
        r#"{"size": 1, "sha256": "deadbeef"}"#,
    )
    .unwrap();

    let report = scan_tree(
        dir.path(),
        ScanOptions {
            verify_sidecars: true,
            ..ScanOptions::default()
        },
    )
    .unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.sidecar_mismatches, vec![path.clone()]);
    // no sibling .SIG was written either
    assert_eq!(report.missing_signatures, vec![path]);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_skipped_and_walk_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let doc_dir = dir.path().join("sklep1/01");
    fs::create_dir_all(&doc_dir).unwrap();
    let good = doc_dir.join("00000017.BIN");
    let bad = doc_dir.join("00000018.BIN");
    fs::write(&good, issue_document()).unwrap();
    fs::write(&bad, return_document()).unwrap();
    fs::set_permissions(&bad, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&bad).is_ok() {
        // running as root bypasses permission bits; nothing to test
        return;
    }

    let report = scan_tree(dir.path(), ScanOptions::default()).unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, bad);

    fs::set_permissions(&bad, fs::Permissions::from_mode(0o644)).unwrap();
}

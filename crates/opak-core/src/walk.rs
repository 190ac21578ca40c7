//! Directory tree walking and per-file scanning.
//!
//! The on-disk layout is `<root>/<location>/<printer>/.../DOC/...` as written
//! at acquisition time; location and printer are derived from the first two
//! path segments under the scan root. Each journal file may carry a sibling
//! `.SIG` signature file and a `.meta.json` sidecar.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, WalkError};
use crate::journal::document::decode_document;
use crate::models::report::DetailRow;
use crate::packaging::extract_packaging;

/// One journal file discovered under the scan root.
#[derive(Debug, Clone)]
pub struct BinFile {
    pub path: PathBuf,
    /// First path segment under the root.
    pub location: String,
    /// Second path segment under the root.
    pub printer: String,
}

/// Scan options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Also emit rows for keyword lines the heuristic could not parse.
    pub include_unrecognized: bool,
    /// Verify `.meta.json` sidecars against file contents.
    pub verify_sidecars: bool,
}

/// Acquisition sidecar written next to each journal file.
#[derive(Debug, Clone, Deserialize)]
pub struct SidecarMeta {
    #[serde(default)]
    pub original_path: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

/// Outcome of scanning one journal file.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub rows: Vec<DetailRow>,
    /// A sibling `.SIG` file exists on disk.
    pub signature_file: bool,
    /// The `.meta.json` sidecar disagreed with the file contents.
    pub sidecar_mismatch: bool,
}

/// Result of scanning a whole tree.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub rows: Vec<DetailRow>,
    /// Journal files processed.
    pub files: usize,
    /// Files skipped with the reason; the walk continued past them.
    pub skipped: Vec<(PathBuf, String)>,
    /// Files whose sidecar failed verification.
    pub sidecar_mismatches: Vec<PathBuf>,
    /// Files without a sibling `.SIG` file (verify mode only).
    pub missing_signatures: Vec<PathBuf>,
}

/// Collect the journal files under `root`, in walk order.
pub fn collect_bin_files(root: &Path) -> Result<Vec<BinFile>> {
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()).into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_bin = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
        if !is_bin {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        let mut dirs = rel
            .parent()
            .map(|parent| parent.iter())
            .into_iter()
            .flatten()
            .map(|part| part.to_string_lossy().into_owned());
        let location = dirs.next().unwrap_or_default();
        let printer = dirs.next().unwrap_or_default();

        files.push(BinFile {
            path: path.to_path_buf(),
            location,
            printer,
        });
    }
    Ok(files)
}

/// Decode one journal file and emit its detail rows.
///
/// A read failure is fatal for this file only; callers continue with the
/// remaining files.
pub fn scan_file(file: &BinFile, options: ScanOptions) -> Result<FileScan> {
    let data = fs::read(&file.path).map_err(|source| WalkError::Read {
        path: file.path.clone(),
        source,
    })?;

    let sidecar_mismatch = options.verify_sidecars && sidecar_disagrees(&file.path, &data);
    let signature_file = signature_sibling_exists(&file.path);

    let doc = decode_document(&data);
    let extraction = extract_packaging(&doc);
    let (doc_number, timestamp) = match &doc.header {
        Some(header) => (Some(header.doc_number), header.timestamp),
        None => (None, None),
    };
    let file_name = file
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let context_row = |pack_name: String| DetailRow {
        location: file.location.clone(),
        printer: file.printer.clone(),
        file: file_name.clone(),
        doc_number,
        timestamp,
        pack_name,
        qty: None,
        value: None,
        total: None,
    };

    let mut rows = Vec::new();
    for entry in extraction.outcome.entries() {
        let mut row = context_row(entry.name.clone());
        row.qty = Some(entry.quantity);
        row.value = Some(entry.unit_value);
        row.total = Some(entry.total);
        rows.push(row);
    }
    if options.include_unrecognized {
        for _ in &extraction.unrecognized {
            rows.push(context_row(String::new()));
        }
    }

    debug!(path = %file.path.display(), rows = rows.len(), "scanned journal file");
    Ok(FileScan {
        rows,
        signature_file,
        sidecar_mismatch,
    })
}

/// Walk a tree sequentially and collect every file's rows.
///
/// Equivalent to [`collect_bin_files`] + [`scan_file`] per file; parallel
/// callers use those directly and merge partial aggregates themselves.
pub fn scan_tree(root: &Path, options: ScanOptions) -> Result<ScanReport> {
    let files = collect_bin_files(root)?;
    let mut report = ScanReport::default();

    for file in &files {
        match scan_file(file, options) {
            Ok(scan) => {
                report.files += 1;
                report.rows.extend(scan.rows);
                if scan.sidecar_mismatch {
                    report.sidecar_mismatches.push(file.path.clone());
                }
                if options.verify_sidecars && !scan.signature_file {
                    report.missing_signatures.push(file.path.clone());
                }
            }
            Err(err) => {
                warn!(path = %file.path.display(), %err, "skipping file");
                report.skipped.push((file.path.clone(), err.to_string()));
            }
        }
    }
    Ok(report)
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(".meta.json");
    PathBuf::from(os)
}

fn signature_sibling_exists(path: &Path) -> bool {
    path.with_extension("SIG").exists() || path.with_extension("sig").exists()
}

/// Check the `.meta.json` sidecar against the file contents.
///
/// A missing sidecar is fine; an unreadable one, or one whose recorded size
/// or sha256 disagrees with the data, is a mismatch.
fn sidecar_disagrees(path: &Path, data: &[u8]) -> bool {
    let meta_path = sidecar_path(path);
    if !meta_path.exists() {
        return false;
    }

    let meta: SidecarMeta = match fs::read_to_string(&meta_path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
    {
        Some(meta) => meta,
        None => {
            warn!(path = %meta_path.display(), "unreadable sidecar");
            return true;
        }
    };

    if let Some(size) = meta.size {
        if size != data.len() as u64 {
            warn!(path = %path.display(), expected = size, actual = data.len(), "sidecar size mismatch");
            return true;
        }
    }
    if let Some(expected) = &meta.sha256 {
        let actual: String = Sha256::digest(data)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        if !actual.eq_ignore_ascii_case(expected) {
            warn!(path = %path.display(), "sidecar sha256 mismatch");
            return true;
        }
    }
    false
}

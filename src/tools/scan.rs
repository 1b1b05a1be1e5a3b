//! Script scan over extraction records
//!
//! Flags entries whose letters fall outside the Latin alphabet, per category
//! and per file, and writes one `non_english_<year>.json` report per year.
//! Entries that look like HTML are judged by their rendered text, with tags
//! dropped and character references decoded.

use super::json::write_pretty;
use crate::entities::{Category, ExtractionResult};
use rayon::prelude::*;
use scraper::Html;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Only entries containing one of these are treated as HTML
const HTML_MARKERS: &[&str] = &["<div", "<span", "<td", "</div>", "</i>", "</a>"];

/// category -> record path -> flagged entries
pub type Findings = BTreeMap<Category, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Data directory not found: {0}")]
    DataNotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub years: RangeInclusive<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub year: i32,
    pub files_scanned: usize,
    pub flagged_entries: usize,
    pub report_path: PathBuf,
}

/// True when every letter in `text` is ASCII `a-z`/`A-Z`
pub fn is_english(text: &str) -> bool {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_ascii_alphabetic())
}

fn visible_text(entry: &str) -> Cow<'_, str> {
    if HTML_MARKERS.iter().any(|marker| entry.contains(marker)) {
        let fragment = Html::parse_fragment(entry);
        Cow::Owned(fragment.root_element().text().collect::<String>())
    } else {
        Cow::Borrowed(entry)
    }
}

pub fn is_flagged(entry: &str) -> bool {
    !is_english(&visible_text(entry))
}

/// Flagged entries of one record, by category
fn scan_record(result: &ExtractionResult) -> Vec<(Category, Vec<String>)> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let flagged: Vec<String> = result
                .get(category)
                .iter()
                .filter(|entry| is_flagged(entry))
                .cloned()
                .collect();
            (!flagged.is_empty()).then_some((category, flagged))
        })
        .collect()
}

fn read_record(path: &Path) -> Option<ExtractionResult> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable record");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed record");
            None
        }
    }
}

fn partition_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Scan all records of one year (parallelized with rayon)
pub fn scan_year(data_dir: &Path, year: i32) -> (usize, Findings) {
    let mut findings = Findings::new();
    let mut files_scanned = 0;

    for month in 1..=12 {
        let files = partition_files(&data_dir.join(format!("{year}-{month:02}")));
        files_scanned += files.len();

        let per_file: Vec<(String, Vec<(Category, Vec<String>)>)> = files
            .par_iter()
            .filter_map(|path| {
                let record = read_record(path)?;
                Some((path.to_string_lossy().to_string(), scan_record(&record)))
            })
            .collect();

        for (file, flagged) in per_file {
            for (category, entries) in flagged {
                findings
                    .entry(category)
                    .or_default()
                    .insert(file.clone(), entries);
            }
        }
    }

    (files_scanned, findings)
}

/// Run the scan for every requested year
pub fn run_scan(options: &ScanOptions) -> Result<Vec<ScanReport>, ScanError> {
    if !options.data_dir.is_dir() {
        return Err(ScanError::DataNotFound(options.data_dir.clone()));
    }
    std::fs::create_dir_all(&options.output_dir)?;

    let mut reports = Vec::new();
    for year in options.years.clone() {
        let (files_scanned, findings) = scan_year(&options.data_dir, year);
        let flagged_entries = findings
            .values()
            .flat_map(|files| files.values())
            .map(Vec::len)
            .sum();

        let report_path = options.output_dir.join(format!("non_english_{year}.json"));
        write_pretty(&report_path, &findings)?;
        info!(year, files_scanned, flagged_entries, "scanned year");

        reports.push(ScanReport {
            year,
            files_scanned,
            flagged_entries,
            report_path,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_english() {
        assert!(is_english(""));
        assert!(is_english("set x = 1; // done!"));
        assert!(is_english("snake_case42"));
        assert!(!is_english("größe"));
        assert!(!is_english("设置 x"));
        assert!(!is_english("привет"));
    }

    #[test]
    fn test_html_is_stripped_before_checking() {
        assert!(!is_flagged("<span class=\"x\">hello</span>"));
        assert!(is_flagged("<div>привет</div>"));
        // Tag-like text without a known marker is checked verbatim
        assert!(!is_flagged("<b>ok</b>"));
    }

    #[test]
    fn test_html_character_references_are_decoded() {
        assert_eq!(visible_text("<div>&#1087;&#1088;</div>"), "пр");
        assert!(is_flagged("<div>&#1087;&#1088;</div>"));
        assert!(is_flagged("<span>caf&eacute;</span>"));
        assert!(!is_flagged("<td>&lt;ok&gt; &amp; done</td>"));
        // Without a marker the reference is plain ASCII text
        assert!(!is_flagged("&#1087;"));
    }

    #[test]
    fn test_only_json_records_are_scanned() {
        let dir = tempdir().unwrap();
        let partition = dir.path().join("2020-03");
        fs::create_dir_all(&partition).unwrap();
        fs::write(partition.join("a_2020_03.json"), "{}").unwrap();
        fs::write(partition.join(".a_2020_03.json.7.0.tmp"), "{ \"comments\": [").unwrap();

        let files = partition_files(&partition);
        assert_eq!(files, vec![partition.join("a_2020_03.json")]);
    }

    #[test]
    fn test_run_scan_reports_per_category() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let reports_dir = dir.path().join("reports");
        fs::create_dir_all(data.join("2020-01")).unwrap();
        fs::create_dir_all(data.join("2020-02")).unwrap();

        let record = ExtractionResult {
            identifiers: vec!["größe".into(), "size".into()],
            comments: vec!["设置 x".into(), "plain".into()],
            docstrings: vec!["<div>привет</div>".into()],
            literals: vec!["<span>hello</span>".into()],
            ..Default::default()
        };
        fs::write(
            data.join("2020-01/a_2020_01.json"),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();
        fs::write(data.join("2020-02/broken.json"), "{ not json").unwrap();

        let options = ScanOptions {
            data_dir: data.clone(),
            output_dir: reports_dir.clone(),
            years: 2020..=2020,
        };
        let reports = run_scan(&options).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].files_scanned, 2);
        assert_eq!(reports[0].flagged_entries, 3);

        let text = fs::read_to_string(reports_dir.join("non_english_2020.json")).unwrap();
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        let file_key = data.join("2020-01/a_2020_01.json").to_string_lossy().to_string();
        assert_eq!(report["identifiers"][&file_key], serde_json::json!(["größe"]));
        assert_eq!(report["comments"][&file_key], serde_json::json!(["设置 x"]));
        assert_eq!(report["docstrings"][&file_key], serde_json::json!(["<div>привет</div>"]));
        assert!(report.get("literals").is_none());
    }

    #[test]
    fn test_missing_data_dir() {
        let dir = tempdir().unwrap();
        let options = ScanOptions {
            data_dir: dir.path().join("nope"),
            output_dir: dir.path().join("reports"),
            years: 2020..=2021,
        };
        assert!(matches!(run_scan(&options), Err(ScanError::DataNotFound(_))));
    }
}

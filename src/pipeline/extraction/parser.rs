//! Marker-delimited reply parsing.
//!
//! Providers are instructed to wrap their output in fixed marker lines
//! and number each category heading. Replies that ignore the envelope
//! parse to an empty result; the validator downstream decides what that
//! means. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use super::prompt::{EXTRACTION_END_MARKER, EXTRACTION_START_MARKER};
use super::types::{ExtractionRecord, ExtractionResult};

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(EXTRACTION_START_MARKER),
        regex::escape(EXTRACTION_END_MARKER)
    ))
    .unwrap()
});

static RECORD_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Parse a provider reply into ordered category records.
///
/// A line matching `N.` opens a record; its text minus the numeric
/// prefix and any trailing colons becomes the category, verbatim
/// otherwise. Lines starting with `-` append a detail to the open
/// record; bullets before the first heading and any other prose are
/// silently ignored.
pub fn parse_extraction(reply: &str) -> ExtractionResult {
    let section = SECTION_RE
        .captures(reply)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    let mut records: Vec<ExtractionRecord> = Vec::new();
    let mut current: Option<ExtractionRecord> = None;

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if RECORD_PREFIX_RE.is_match(line) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            let heading = RECORD_PREFIX_RE.replace(line, "");
            current = Some(ExtractionRecord {
                category: heading.trim_end_matches(':').trim().to_string(),
                details: Vec::new(),
            });
        } else if let Some(rest) = line.strip_prefix('-') {
            if let Some(record) = current.as_mut() {
                record.details.push(rest.trim().to_string());
            }
        }
    }

    if let Some(record) = current.take() {
        records.push(record);
    }

    ExtractionResult::from_records(records)
}

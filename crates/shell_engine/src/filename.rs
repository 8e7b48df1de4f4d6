use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const MAX_FILENAME_LEN: usize = 120;

/// Local name for a downloaded URL: its last path segment, or `download_{unix_millis}`.
pub fn download_filename(url: &str, now: DateTime<Utc>) -> String {
    match last_path_segment(url) {
        Some(segment) => sanitize_filename(&segment),
        None => format!("download_{}", now.timestamp_millis()),
    }
}

/// Cache-relative location for a page-supplied export filename.
///
/// Returns `(namespace, filename)`. The namespace hashes the name and payload
/// together with the invocation's creation time, sequence number and process,
/// so two exports never share a path even when their content is identical.
pub fn artifact_location(
    page_filename: &str,
    payload: &str,
    created: DateTime<Utc>,
    sequence: u64,
) -> (String, String) {
    let mut hasher = Sha256::new();
    hasher.update(page_filename.as_bytes());
    hasher.update([0]);
    hasher.update(payload.as_bytes());
    hasher.update([0]);
    hasher.update(created.timestamp_micros().to_le_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    (short_hex(&hasher.finalize()), sanitize_filename(page_filename))
}

/// Makes an untrusted name safe to join onto a directory.
pub fn sanitize_filename(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "untitled".to_string();
    }
    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut final_name = truncate_keeping_extension(compacted);
    if is_reserved_windows_name(&final_name) {
        final_name.insert(0, '_');
    }
    final_name
}

fn last_path_segment(url: &str) -> Option<String> {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
        Err(_) => relative_path_segment(url).map(str::to_string),
    }
}

/// Hand-split for inputs `Url` rejects, such as relative links.
fn relative_path_segment(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

fn truncate_keeping_extension(name: String) -> String {
    if name.chars().count() <= MAX_FILENAME_LEN {
        return name;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.chars().count() < 16 => (stem, Some(ext)),
        _ => (name.as_str(), None),
    };
    let ext_len = ext.map_or(0, |ext| ext.chars().count() + 1);
    let mut truncated: String = stem.chars().take(MAX_FILENAME_LEN - ext_len).collect();
    if let Some(ext) = ext {
        truncated.push('.');
        truncated.push_str(ext);
    }
    truncated
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

fn short_hex(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

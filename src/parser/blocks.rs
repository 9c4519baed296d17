// src/parser/blocks.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback group label for sources with no resolvable group header.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Sentinel group value meaning "applies to every group". Skipped during
/// group resolution; never used as a real group label.
const ALL_GROUPS_SENTINEL: &str = "ALL";

// --- Header Patterns (Lazy Static) ---
// Soundvision numbers every section header: "3. Source: KARA L" or
// "2. Group: Subs". A source block runs from its own header to the next
// numbered header of either kind.
static SOURCE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*Source:\s*(.+)$").expect("Failed to compile SOURCE_HEADER_RE")
});

static GROUP_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*Group:\s*(.+)$").expect("Failed to compile GROUP_HEADER_RE")
});

static ANY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s*(?:Source|Group):").expect("Failed to compile ANY_HEADER_RE")
});

/// One source block: its raw header name and the byte span of the block
/// within the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub raw_name: String,
    pub start: usize,
    pub end: usize,
}

/// Splits document text into ordered source blocks. Each span runs from a
/// source header's start to the start of the next numbered header (source
/// or group), or to the end of text. Zero matches yields an empty list.
pub fn split_blocks(text: &str) -> Vec<SourceBlock> {
    let header_starts: Vec<usize> = ANY_HEADER_RE.find_iter(text).map(|m| m.start()).collect();

    SOURCE_HEADER_RE
        .captures_iter(text)
        .map(|cap| {
            let whole = cap.get(0).expect("match always has a group 0");
            let start = whole.start();
            let end = header_starts
                .iter()
                .copied()
                .find(|&h| h > start)
                .unwrap_or(text.len());
            SourceBlock {
                raw_name: cap[1].trim().to_string(),
                start,
                end,
            }
        })
        .collect()
}

/// Resolves the owning group of a source block starting at `source_start`:
/// the nearest preceding group header whose value is not the "ALL"
/// sentinel, scanning backward past any sentinel headers. Returns
/// [`UNKNOWN_GROUP`] when no qualifying group header precedes the source.
pub fn resolve_group(text: &str, source_start: usize) -> String {
    let preceding: Vec<&str> = GROUP_HEADER_RE
        .captures_iter(&text[..source_start])
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .collect();

    preceding
        .iter()
        .rev()
        .find(|name| !name.eq_ignore_ascii_case(ALL_GROUPS_SENTINEL))
        .map(|name| name.to_string())
        .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

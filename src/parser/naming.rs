// src/parser/naming.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Raw source names carry an orientation suffix and an optional numeric
// disambiguator: "<base> L", "<base> R 2". Canonicalization only ever looks
// at the name string, never at block content.
static ORIENTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*\S)\s+([LR])(?:\s+(\d+))?$").expect("Failed to compile ORIENTATION_RE")
});

/// Strips the orientation letter from a raw source name, preserving any
/// trailing numeric index: "KARA L" becomes "KARA", "KARA R 2" becomes
/// "KARA 2". Names without an orientation suffix pass through unchanged.
pub fn canonicalize(raw_name: &str) -> String {
    let trimmed = raw_name.trim();
    match ORIENTATION_RE.captures(trimmed) {
        Some(cap) => match cap.get(3) {
            Some(index) => format!("{} {}", &cap[1], index.as_str()),
            None => cap[1].to_string(),
        },
        None => trimmed.to_string(),
    }
}

/// True iff the name denotes the right-hand half of a symmetric pair: it
/// ends in "R", optionally followed by a numeric index.
pub fn is_mirror(raw_name: &str) -> bool {
    ORIENTATION_RE
        .captures(raw_name.trim())
        .map_or(false, |cap| &cap[2] == "R")
}

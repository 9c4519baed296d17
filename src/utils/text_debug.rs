// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::utils::error::AppError;

/// Saves a text snippet to a file with inline debug markers around the
/// given (start, end, tag) spans.
pub fn save_debug_text(
    text: &str,
    filename: &str,
    highlights: &[(usize, usize, &str)],
) -> Result<(), AppError> {
    let path = Path::new(filename);
    let mut file = File::create(path)?;

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    let mut annotated = String::with_capacity(text.len() + highlights.len() * 16);
    let mut last_pos = 0;

    for (start, end, tag) in sorted_highlights {
        // Skip spans overlapping an already-emitted highlight.
        if start < last_pos {
            continue;
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{}]]", tag));
        annotated.push_str(&text[start..end]);
        annotated.push_str(&format!("[[/{}]]", tag));
        last_pos = end;
    }
    annotated.push_str(&text[last_pos..]);

    file.write_all(annotated.as_bytes())?;

    tracing::info!("Saved debug text to {}", path.display());
    Ok(())
}

/// Creates a debug copy of extracted text with every match of the given
/// regex patterns marked, so header recognition can be inspected when a
/// document parses to less than expected.
pub fn create_debug_text(
    text: &str,
    filename: &str,
    patterns: &[(&str, &str)],
) -> Result<(), AppError> {
    use regex::Regex;

    let mut highlights = Vec::new();

    for (pattern, tag) in patterns {
        let re = Regex::new(pattern)
            .map_err(|e| AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e)))?;

        for mat in re.find_iter(text) {
            highlights.push((mat.start(), mat.end(), *tag));
        }
    }

    save_debug_text(text, filename, &highlights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_markers_wrap_matches() {
        let dir = std::env::temp_dir().join("svx_text_debug_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("annotated.txt");
        let path_str = path.to_str().expect("utf-8 path");

        let text = "1. Group: Mains\n2. Source: KARA L\nbody\n";
        create_debug_text(
            text,
            path_str,
            &[
                (r"(?m)^\d+\.\s*Group:.*$", "group"),
                (r"(?m)^\d+\.\s*Source:.*$", "source"),
            ],
        )
        .expect("debug text written");

        let written = fs::read_to_string(&path).expect("file readable");
        assert!(written.contains("[[group]]1. Group: Mains[[/group]]"));
        assert!(written.contains("[[source]]2. Source: KARA L[[/source]]"));
        assert!(written.contains("body"));
    }
}

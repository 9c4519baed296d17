// src/parser/physical.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Field names referenced elsewhere (fingerprinting treats these two as
// sign-insensitive between mirrored halves).
pub const FIELD_POSITION_X: &str = "Position X (m)";
pub const FIELD_AZIMUTH: &str = "Azimuth (°)";

/// Fixed, ordered field table: display name plus the labeled-value pattern
/// that locates it inside a source block. Extraction and rendering both
/// follow this order. Note the case-sensitive "Site:" label, which must not
/// match "Top site:" or "Bottom site:".
static PHYSICAL_FIELDS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("Configuration", r"Configuration:\s*(.+)"),
        ("Bumper", r"Bumper:\s*(.+)"),
        ("# Motors", r"# motors:\s*(\d+)"),
        (FIELD_POSITION_X, r"Position \(X; Y; Z, m\):\s*([\-\d.]+);"),
        (
            "Position Y (m)",
            r"Position \(X; Y; Z, m\):\s*[\-\d.]+;\s*([\-\d.]+);",
        ),
        (
            "Position Z (m)",
            r"Position \(X; Y; Z, m\):\s*[\-\d.]+;\s*[\-\d.]+;\s*([\-\d.]+)",
        ),
        ("Site (°)", r"Site:\s*([\-\d.]+)\s*°"),
        (FIELD_AZIMUTH, r"Azimuth:\s*([\-\d.]+)\s*°"),
        ("Bottom Elev. (m)", r"Bottom elevation:\s*([\-\d.]+)"),
        ("Top Site (°)", r"Top site:\s*([\-\d.]+)\s*°"),
        ("Bottom Site (°)", r"Bottom site:\s*([\-\d.]+)\s*°"),
        (
            "Total Weight (kg)",
            r"Total weight \(Enclosures \+ Frames\):\s*([\d.]+)",
        ),
        ("Enclosure Wt (kg)", r"Total enclosure weight:\s*([\d.]+)"),
        ("Front Motor (kg)", r"Front motor load:\s*([\d.]+)"),
        ("Rear Motor (kg)", r"Rear motor load:\s*([\d.]+)"),
    ]
    .iter()
    .map(|(name, pattern)| {
        (
            *name,
            Regex::new(pattern).expect("Failed to compile physical field pattern"),
        )
    })
    .collect()
});

/// Extracts the sparse physical configuration of a source block. Each field
/// is searched independently; a field whose label is absent is omitted
/// entirely (a sub stack legitimately has no angle fields). Values are the
/// trimmed literal text, never converted or unit-normalized.
pub fn extract_physical(block: &str) -> Vec<(&'static str, String)> {
    PHYSICAL_FIELDS
        .iter()
        .filter_map(|(name, re)| {
            re.captures(block)
                .and_then(|cap| cap.get(1))
                .map(|m| (*name, m.as_str().trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_ARRAY_BLOCK: &str = "\
2. Source: KARA L
Configuration: Flown
Bumper: KARA-MINIBU
# motors: 2
Position (X; Y; Z, m): -5.49; 0.00; 8.06
Site: -2.5 °
Azimuth: 30.0 °
Bottom elevation: 5.63
Top site: -2.5 °
Bottom site: -11.2 °
Total weight (Enclosures + Frames): 312.0
Total enclosure weight: 292.0
Front motor load: 180.5
Rear motor load: 131.5
";

    #[test]
    fn test_extract_all_fields_in_table_order() {
        let physical = extract_physical(LINE_ARRAY_BLOCK);
        let names: Vec<&str> = physical.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "Configuration",
                "Bumper",
                "# Motors",
                "Position X (m)",
                "Position Y (m)",
                "Position Z (m)",
                "Site (°)",
                "Azimuth (°)",
                "Bottom Elev. (m)",
                "Top Site (°)",
                "Bottom Site (°)",
                "Total Weight (kg)",
                "Enclosure Wt (kg)",
                "Front Motor (kg)",
                "Rear Motor (kg)",
            ]
        );
    }

    #[test]
    fn test_position_triple_is_split() {
        let physical = extract_physical(LINE_ARRAY_BLOCK);
        let get = |field: &str| {
            physical
                .iter()
                .find(|(n, _)| *n == field)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("Position X (m)"), Some("-5.49"));
        assert_eq!(get("Position Y (m)"), Some("0.00"));
        assert_eq!(get("Position Z (m)"), Some("8.06"));
    }

    #[test]
    fn test_site_label_does_not_match_top_or_bottom_site() {
        let physical = extract_physical(LINE_ARRAY_BLOCK);
        let site = physical.iter().find(|(n, _)| *n == "Site (°)");
        assert_eq!(site.map(|(_, v)| v.as_str()), Some("-2.5"));
    }

    #[test]
    fn test_sub_stack_is_sparse() {
        let block = "\
6. Source: SUB L
Configuration: Stacked
Position (X; Y; Z, m): -3.20; 1.50; 0.00
Azimuth: 15.0 °
";
        let physical = extract_physical(block);
        let names: Vec<&str> = physical.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "Configuration",
                "Position X (m)",
                "Position Y (m)",
                "Position Z (m)",
                "Azimuth (°)",
            ]
        );
        // Absent fields are omitted, never placeholder values.
        assert!(!physical.iter().any(|(_, v)| v == "N/A"));
    }

    #[test]
    fn test_empty_block_yields_empty_mapping() {
        assert!(extract_physical("no labels here").is_empty());
    }
}

// src/parser/document.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::blocks::{resolve_group, split_blocks};
use crate::parser::enclosures::extract_enclosures;
use crate::parser::fingerprint::{fingerprint, Fingerprint};
use crate::parser::models::{Group, ParsedDocument, SourceRecord};
use crate::parser::naming::{canonicalize, is_mirror};
use crate::parser::physical::extract_physical;
use crate::utils::error::ParseError;

/// Parses a full report into the ordered group/record structure. Never
/// fails: missing sections degrade to empty groups, sparse fields and empty
/// enclosure lists, so one malformed document cannot halt a batch.
///
/// A block whose fingerprint equals that of a record already in the same
/// group (the right half of a mirrored pair) is discarded without a record.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();
    let mut seen: Vec<(String, Fingerprint)> = Vec::new();

    for block in split_blocks(text) {
        let body = &text[block.start..block.end];
        let group_name = resolve_group(text, block.start);
        let physical = extract_physical(body);
        let (schema, enclosures) = extract_enclosures(body);
        let key = fingerprint(&physical, &enclosures);

        if seen
            .iter()
            .any(|(group, fp)| *group == group_name && *fp == key)
        {
            tracing::debug!(
                "Discarding '{}' in group '{}': mirrored duplicate",
                block.raw_name,
                group_name
            );
            continue;
        }
        seen.push((group_name.clone(), key));

        let record = SourceRecord {
            name: canonicalize(&block.raw_name),
            mirror: is_mirror(&block.raw_name),
            raw_name: block.raw_name,
            physical,
            enclosures,
            schema,
        };
        tracing::debug!(
            "Adding '{}' to group '{}' ({} enclosures, {})",
            record.name,
            group_name,
            record.enclosures.len(),
            record.schema.label()
        );
        doc.group_mut(&group_name).records.push(record);
    }

    doc
}

// --- Legacy fixed-schema mode ---
// The original workflow expected exactly one flown KARA source per report.
// That single block is mandatory; everything else in the document is
// ignored. Kept for reports produced by that template.

static KARA_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"1\. Source: (KARA [LR])").expect("Failed to compile KARA_HEADER_RE")
});

// The block ends at whichever of these markers appears first after the
// header, or at end of text.
const KARA_END_MARKERS: &[&str] = &["2. Source: KARA", "2. Group:", "3. Group:"];

/// Locates the single mandatory "1. Source: KARA L|R" block. Returns the
/// source name and the block text; a report without the block is a hard
/// failure with no partial output.
pub fn parse_kara_section(text: &str) -> Result<(String, String), ParseError> {
    let cap = KARA_HEADER_RE
        .captures(text)
        .ok_or(ParseError::KaraBlockMissing)?;
    let header = cap.get(0).expect("match always has a group 0");

    let rest = &text[header.start()..];
    let end = KARA_END_MARKERS
        .iter()
        .filter_map(|marker| rest[header.as_str().len()..].find(marker))
        .min()
        .map(|offset| offset + header.as_str().len())
        .unwrap_or(rest.len());

    Ok((cap[1].to_string(), rest[..end].to_string()))
}

/// Legacy entry point: parses the single KARA block into the same
/// group/record structure the general parser produces, under a fixed
/// "Mains" group, so the renderers need no second code path.
pub fn parse_kara_document(text: &str) -> Result<ParsedDocument, ParseError> {
    let (raw_name, block) = parse_kara_section(text)?;
    let physical = extract_physical(&block);
    let (schema, enclosures) = extract_enclosures(&block);

    let record = SourceRecord {
        name: canonicalize(&raw_name),
        mirror: is_mirror(&raw_name),
        raw_name,
        physical,
        enclosures,
        schema,
    };

    Ok(ParsedDocument {
        groups: vec![Group {
            name: "Mains".to_string(),
            records: vec![record],
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::RowSchema;

    // Two groups, each a mirrored pair with sign-flipped Position X and
    // Azimuth and identical enclosure composition.
    const MIRRORED_DOC: &str = "\
Soundvision 3.8.2 report
1. Group: Mains
2. Source: MAIN L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
Azimuth: 30.0 °
Enclosures Angles (°) Site (°) Top Z (m) Bottom Z (m) Panflex
#1 KARA II 0.0 -2.5 8.06 7.81 70/70
#2 KARA II -0.25 -2.75 7.81 7.56 70/70
3. Source: MAIN R
Configuration: Flown
Position (X; Y; Z, m): 5.49; 0.00; 8.06
Azimuth: -30.0 °
Enclosures Angles (°) Site (°) Top Z (m) Bottom Z (m) Panflex
#1 KARA II 0.0 -2.5 8.06 7.81 70/70
#2 KARA II -0.25 -2.75 7.81 7.56 70/70
4. Group: Subs
5. Source: SUB L
Configuration: Stacked
Position (X; Y; Z, m): -3.20; 1.50; 0.00
Azimuth: 15.0 °
Enclosures Site (°) Top Z (m) Bottom Z (m)
#1 SB18 0.0 1.15 0.58
6. Source: SUB R
Configuration: Stacked
Position (X; Y; Z, m): 3.20; 1.50; 0.00
Azimuth: -15.0 °
Enclosures Site (°) Top Z (m) Bottom Z (m)
#1 SB18 0.0 1.15 0.58
";

    #[test]
    fn test_mirrored_pairs_collapse_to_one_record_per_group() {
        let doc = parse_document(MIRRORED_DOC);

        let group_names: Vec<&str> = doc.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, vec!["Mains", "Subs"]);

        assert_eq!(doc.groups[0].records.len(), 1);
        assert_eq!(doc.groups[0].records[0].name, "MAIN");
        assert_eq!(doc.groups[0].records[0].raw_name, "MAIN L");
        assert!(!doc.groups[0].records[0].mirror);
        assert_eq!(
            doc.groups[0].records[0].schema,
            RowSchema::LineArrayWithPanflex
        );

        assert_eq!(doc.groups[1].records.len(), 1);
        assert_eq!(doc.groups[1].records[0].name, "SUB");
        assert_eq!(doc.groups[1].records[0].schema, RowSchema::PointSource);
    }

    #[test]
    fn test_distinct_sources_in_one_group_both_survive() {
        let doc = parse_document(
            "\
1. Group: Mains
2. Source: MAIN L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
3. Source: OUTFILL L
Configuration: Flown
Position (X; Y; Z, m): -9.10; 0.00; 6.20
",
        );
        assert_eq!(doc.groups.len(), 1);
        let names: Vec<&str> = doc.groups[0]
            .records
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["MAIN", "OUTFILL"]);
    }

    #[test]
    fn test_equal_fingerprint_in_different_groups_not_deduplicated() {
        let doc = parse_document(
            "\
1. Group: Mains
2. Source: DELAY L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
3. Group: Delays
4. Source: DELAY R
Configuration: Flown
Position (X; Y; Z, m): 5.49; 0.00; 8.06
",
        );
        // Deduplication is scoped per group.
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[0].records.len(), 1);
        assert_eq!(doc.groups[1].records.len(), 1);
    }

    #[test]
    fn test_unresolved_sources_fall_into_unknown_group() {
        let doc = parse_document(
            "\
1. Source: ORPHAN
Configuration: Stacked
",
        );
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.groups[0].name, "Unknown");
        assert_eq!(doc.groups[0].records[0].name, "ORPHAN");
    }

    #[test]
    fn test_headerless_document_parses_to_nothing() {
        let doc = parse_document("just some page text\nwith no headers at all\n");
        assert!(doc.groups.is_empty());
        assert_eq!(doc.record_count(), 0);
    }

    const KARA_DOC: &str = "\
Soundvision report
1. Source: KARA L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
Enclosures Angles (°) Site (°) Top Z (m) Bottom Z (m) Panflex
#1 KARA II 0.0 -2.5 8.06 7.81 70/70
2. Group: Subs
ignored tail
";

    #[test]
    fn test_parse_kara_section() {
        let (name, block) = parse_kara_section(KARA_DOC).expect("block present");
        assert_eq!(name, "KARA L");
        assert!(block.starts_with("1. Source: KARA L"));
        assert!(block.contains("#1 KARA II"));
        assert!(!block.contains("ignored tail"));
    }

    #[test]
    fn test_parse_kara_section_runs_to_end_without_marker() {
        let doc = "1. Source: KARA R\nConfiguration: Flown\n";
        let (name, block) = parse_kara_section(doc).expect("block present");
        assert_eq!(name, "KARA R");
        assert_eq!(block, doc);
    }

    #[test]
    fn test_parse_kara_section_missing_is_fatal() {
        let err = parse_kara_section("1. Source: K3 L\nConfiguration: Flown\n").unwrap_err();
        assert!(matches!(err, ParseError::KaraBlockMissing));
    }

    #[test]
    fn test_parse_kara_document_shape() {
        let doc = parse_kara_document(KARA_DOC).expect("block present");
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.groups[0].name, "Mains");
        assert_eq!(doc.groups[0].records[0].name, "KARA");
        assert_eq!(doc.groups[0].records[0].enclosures.len(), 1);
    }
}

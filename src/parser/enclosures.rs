// src/parser/enclosures.rs

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::parser::models::{EnclosureRow, RowSchema};

// --- Schema Markers ---
// Schema selection is content-driven: the presence of these substrings in a
// block decides which row shape to look for. "Angles (°)" is the column
// header Soundvision prints above line-array tables; point-source tables
// have no inter-enclosure angles at all.
const PANFLEX_MARKER: &str = "Panflex";
const ANGLE_MARKER: &str = "Angles (°)";

// --- Row Patterns (Lazy Static) ---
// A row starts with "#<n>", then the enclosure type (may contain internal
// whitespace, optionally suffixed "_C"), then exactly the schema's count of
// numeric fields, with the Panflex setting ("70/70") last where present.
// The type capture is non-greedy so the trailing numeric fields anchor the
// split between type token and geometry.
static PANFLEX_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^#(\d+)\s+(\S+(?:\s+\S+)*?)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\d/]+)\s*$",
    )
    .expect("Failed to compile PANFLEX_ROW_RE")
});

static PLAIN_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^#(\d+)\s+(\S+(?:\s+\S+)*?)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\-\d.]+)\s*$",
    )
    .expect("Failed to compile PLAIN_ROW_RE")
});

static POINT_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#(\d+)\s+(\S+(?:\s+\S+)*?)\s+([\-\d.]+)\s+([\-\d.]+)\s+([\-\d.]+)\s*$")
        .expect("Failed to compile POINT_ROW_RE")
});

/// Decides the row schema of a block from its marker substrings. The three
/// outcomes are mutually exclusive; a Panflex marker without an angle
/// column still means a point source.
pub fn sniff_schema(block: &str) -> RowSchema {
    let has_angles = block.contains(ANGLE_MARKER);
    let has_panflex = block.contains(PANFLEX_MARKER);
    match (has_angles, has_panflex) {
        (true, true) => RowSchema::LineArrayWithPanflex,
        (true, false) => RowSchema::LineArrayPlain,
        (false, _) => RowSchema::PointSource,
    }
}

/// Extracts the enclosure table of a block: sniffs the schema, then returns
/// all matching rows in document order. Zero rows is not an error; the list
/// is simply empty. Rows whose numeric fields fail to parse are dropped.
pub fn extract_enclosures(block: &str) -> (RowSchema, Vec<EnclosureRow>) {
    let schema = sniff_schema(block);
    let rows = match schema {
        RowSchema::LineArrayWithPanflex => PANFLEX_ROW_RE
            .captures_iter(block)
            .filter_map(|cap| parse_panflex_row(&cap))
            .collect(),
        RowSchema::LineArrayPlain => PLAIN_ROW_RE
            .captures_iter(block)
            .filter_map(|cap| parse_plain_row(&cap))
            .collect(),
        RowSchema::PointSource => POINT_ROW_RE
            .captures_iter(block)
            .filter_map(|cap| parse_point_row(&cap))
            .collect(),
    };
    (schema, rows)
}

fn parse_panflex_row(cap: &Captures) -> Option<EnclosureRow> {
    Some(EnclosureRow::LineArrayWithPanflex {
        index: cap[1].parse().ok()?,
        kind: cap[2].trim().to_string(),
        angle: cap[3].parse().ok()?,
        site: cap[4].parse().ok()?,
        top_z: cap[5].parse().ok()?,
        bottom_z: cap[6].parse().ok()?,
        panflex: cap[7].to_string(),
    })
}

fn parse_plain_row(cap: &Captures) -> Option<EnclosureRow> {
    Some(EnclosureRow::LineArrayPlain {
        index: cap[1].parse().ok()?,
        kind: cap[2].trim().to_string(),
        angle: cap[3].parse().ok()?,
        site: cap[4].parse().ok()?,
        top_z: cap[5].parse().ok()?,
        bottom_z: cap[6].parse().ok()?,
    })
}

fn parse_point_row(cap: &Captures) -> Option<EnclosureRow> {
    Some(EnclosureRow::PointSource {
        index: cap[1].parse().ok()?,
        kind: cap[2].trim().to_string(),
        site: cap[3].parse().ok()?,
        top_z: cap[4].parse().ok()?,
        bottom_z: cap[5].parse().ok()?,
    })
}

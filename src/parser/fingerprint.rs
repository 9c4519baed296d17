// src/parser/fingerprint.rs

use std::collections::BTreeMap;

use crate::parser::models::EnclosureRow;
use crate::parser::physical::{FIELD_AZIMUTH, FIELD_POSITION_X};

/// Fields whose sign flips between the left and right halves of a symmetric
/// pair. Their values are compared by absolute value.
const SIGN_INSENSITIVE_FIELDS: &[&str] = &[FIELD_POSITION_X, FIELD_AZIMUTH];

/// Order-independent equivalence key over a record's physical fields and
/// enclosure composition. Two mirrored halves of a symmetric array produce
/// equal fingerprints; the right half is then discarded as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Sorted field name to normalized value.
    physical: BTreeMap<String, String>,
    /// Sorted enclosure type label to occurrence count. A multiset, not a
    /// sequence: a reflected numbering scheme still matches.
    enclosures: BTreeMap<String, usize>,
}

/// Builds the fingerprint of a record from its sparse physical mapping and
/// enclosure rows. Position X and Azimuth are replaced by their absolute
/// value when they parse as numbers; anything unparseable is compared as
/// the raw string.
pub fn fingerprint(physical: &[(&'static str, String)], enclosures: &[EnclosureRow]) -> Fingerprint {
    let physical_key = physical
        .iter()
        .map(|(name, value)| {
            let normalized = if SIGN_INSENSITIVE_FIELDS.contains(name) {
                value
                    .trim()
                    .parse::<f64>()
                    .map(|n| n.abs().to_string())
                    .unwrap_or_else(|_| value.clone())
            } else {
                value.clone()
            };
            (name.to_string(), normalized)
        })
        .collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in enclosures {
        *counts.entry(row.kind().to_string()).or_insert(0) += 1;
    }

    Fingerprint {
        physical: physical_key,
        enclosures: counts,
    }
}

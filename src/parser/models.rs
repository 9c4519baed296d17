// src/parser/models.rs
use serde::Serialize;

/// Row schema of a source's enclosure table, selected by content sniffing
/// (see `enclosures::sniff_schema`). All rows within one record share the
/// same schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowSchema {
    /// Flown line array with per-enclosure Panflex settings (7 columns).
    LineArrayWithPanflex,
    /// Line array without a Panflex column (6 columns).
    LineArrayPlain,
    /// Point-source / sub stack: no inter-enclosure angles (5 columns).
    PointSource,
}

impl RowSchema {
    /// Ordered column labels for this schema. Downstream renderers consume
    /// these together with `EnclosureRow::cells` and stay schema-agnostic.
    pub fn column_labels(&self) -> &'static [&'static str] {
        match self {
            RowSchema::LineArrayWithPanflex => &[
                "Enclosure #",
                "Type",
                "Angle (°)",
                "Site (°)",
                "Top Z (m)",
                "Bottom Z (m)",
                "Panflex",
            ],
            RowSchema::LineArrayPlain => &[
                "Enclosure #",
                "Type",
                "Angle (°)",
                "Site (°)",
                "Top Z (m)",
                "Bottom Z (m)",
            ],
            RowSchema::PointSource => {
                &["Enclosure #", "Type", "Site (°)", "Top Z (m)", "Bottom Z (m)"]
            }
        }
    }

    /// Short human-readable label used in summaries and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            RowSchema::LineArrayWithPanflex => "line array (panflex)",
            RowSchema::LineArrayPlain => "line array",
            RowSchema::PointSource => "point source",
        }
    }
}

/// One cabinet entry of a source's geometry table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EnclosureRow {
    LineArrayWithPanflex {
        index: u32,
        kind: String,
        angle: f64,
        site: f64,
        top_z: f64,
        bottom_z: f64,
        panflex: String,
    },
    LineArrayPlain {
        index: u32,
        kind: String,
        angle: f64,
        site: f64,
        top_z: f64,
        bottom_z: f64,
    },
    PointSource {
        index: u32,
        kind: String,
        site: f64,
        top_z: f64,
        bottom_z: f64,
    },
}

impl EnclosureRow {
    pub fn schema(&self) -> RowSchema {
        match self {
            EnclosureRow::LineArrayWithPanflex { .. } => RowSchema::LineArrayWithPanflex,
            EnclosureRow::LineArrayPlain { .. } => RowSchema::LineArrayPlain,
            EnclosureRow::PointSource { .. } => RowSchema::PointSource,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            EnclosureRow::LineArrayWithPanflex { index, .. }
            | EnclosureRow::LineArrayPlain { index, .. }
            | EnclosureRow::PointSource { index, .. } => *index,
        }
    }

    /// Enclosure type label, e.g. "KARA II" or "SB18_C".
    pub fn kind(&self) -> &str {
        match self {
            EnclosureRow::LineArrayWithPanflex { kind, .. }
            | EnclosureRow::LineArrayPlain { kind, .. }
            | EnclosureRow::PointSource { kind, .. } => kind,
        }
    }

    /// Cell values in column order. The length always equals the length of
    /// `self.schema().column_labels()`.
    pub fn cells(&self) -> Vec<String> {
        match self {
            EnclosureRow::LineArrayWithPanflex {
                index,
                kind,
                angle,
                site,
                top_z,
                bottom_z,
                panflex,
            } => vec![
                index.to_string(),
                kind.clone(),
                angle.to_string(),
                site.to_string(),
                top_z.to_string(),
                bottom_z.to_string(),
                panflex.clone(),
            ],
            EnclosureRow::LineArrayPlain {
                index,
                kind,
                angle,
                site,
                top_z,
                bottom_z,
            } => vec![
                index.to_string(),
                kind.clone(),
                angle.to_string(),
                site.to_string(),
                top_z.to_string(),
                bottom_z.to_string(),
            ],
            EnclosureRow::PointSource {
                index,
                kind,
                site,
                top_z,
                bottom_z,
            } => vec![
                index.to_string(),
                kind.clone(),
                site.to_string(),
                top_z.to_string(),
                bottom_z.to_string(),
            ],
        }
    }
}

/// One parsed source (array or cabinet stack), mirror halves already
/// unified under the canonical display name.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    /// Canonical display name, orientation letter stripped ("KARA", not "KARA L").
    pub name: String,
    /// Name exactly as it appeared in the source header.
    pub raw_name: String,
    /// True for the right-hand half of a symmetric pair.
    pub mirror: bool,
    /// Sparse physical configuration, in field-table order. Absent fields
    /// are simply not present.
    pub physical: Vec<(&'static str, String)>,
    pub enclosures: Vec<EnclosureRow>,
    pub schema: RowSchema,
}

impl SourceRecord {
    pub fn column_labels(&self) -> &'static [&'static str] {
        self.schema.column_labels()
    }
}

/// Named container a source is associated under.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub name: String,
    pub records: Vec<SourceRecord>,
}

/// Full parse result: groups in first-occurrence order, records within a
/// group in first-occurrence (post-dedup) order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedDocument {
    pub groups: Vec<Group>,
}

impl ParsedDocument {
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    /// Returns the group with the given name, creating it at the end of the
    /// group list on first use.
    pub(crate) fn group_mut(&mut self, name: &str) -> &mut Group {
        if let Some(idx) = self.groups.iter().position(|g| g.name == name) {
            return &mut self.groups[idx];
        }
        self.groups.push(Group {
            name: name.to_string(),
            records: Vec::new(),
        });
        self.groups.last_mut().expect("group just pushed")
    }
}

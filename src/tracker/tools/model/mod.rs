use std::fmt;

use serde::Serialize;

/// Fixed header row of the canonical workbook, in column order.
pub const CANONICAL_HEADERS: [&str; 12] = [
    "Platform/Tool",
    "GTM Status",
    "GTM Notes",
    "GA4 Status",
    "GA4 Notes",
    "MSA Status",
    "MSA Notes",
    "Docs Links",
    "Example Sites",
    "WCS Team Considerations",
    "Ops Notes",
    "SK Recommended",
];

/// Categories exported to JSON, in output order.
///
/// This list is configuration, not discovery: sheets not named here are never
/// exported, and the order of the JSON array never depends on the sheet order
/// inside the workbook.
pub const EXPORT_CATEGORIES: [&str; 7] = [
    "Website Backends",
    "Chat Tools",
    "Booking Tools",
    "User Consent Systems",
    "SEO-Marketing Companies",
    "Google Ads Integrations",
    "Galaxy Compatible",
];

/// Canonical trackability classification for a tracking mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Trackable as-is.
    Yes,
    /// Not trackable.
    No,
    /// Trackable with caveats.
    Partial,
    /// Requires nuance; read the notes.
    Special,
    /// No usable information.
    Unknown,
}

impl Status {
    /// The capitalized form written into status cells.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Yes => "Yes",
            Status::No => "No",
            Status::Partial => "Partial",
            Status::Special => "Special",
            Status::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized tracking column: canonical status plus consolidated notes.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingCell {
    pub status: Status,
    pub notes: String,
}

/// One canonical row of the migrated workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRow {
    pub platform: String,
    pub gtm: TrackingCell,
    pub ga4: TrackingCell,
    pub msa: TrackingCell,
    pub docs_links: String,
    pub example_sites: String,
    pub wcs_considerations: String,
    pub ops_notes: String,
    pub sk_recommended: bool,
}

impl ToolRow {
    /// Cell values in canonical column order.
    pub fn to_cells(&self) -> [String; 12] {
        [
            self.platform.clone(),
            self.gtm.status.to_string(),
            self.gtm.notes.clone(),
            self.ga4.status.to_string(),
            self.ga4.notes.clone(),
            self.msa.status.to_string(),
            self.msa.notes.clone(),
            self.docs_links.clone(),
            self.example_sites.clone(),
            self.wcs_considerations.clone(),
            self.ops_notes.clone(),
            if self.sk_recommended { "TRUE" } else { "FALSE" }.to_string(),
        ]
    }
}

/// A category sheet to be materialised in the migrated workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    pub title: String,
    pub rows: Vec<ToolRow>,
}

/// Represents all sheets required to materialise the migrated workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub categories: Vec<CategoryTable>,
}

/// Status/notes pair of an exported record.
///
/// Values are carried exactly as read from the canonical workbook; the
/// exporter never re-normalizes hand-curated cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingField {
    pub status: String,
    pub notes: String,
}

/// One exported catalog record. Field order matches the JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolRecord {
    pub category: String,
    pub platform: String,
    pub gtm_ads_trackable: TrackingField,
    pub ga4_trackable: TrackingField,
    pub msa_tracking: TrackingField,
    pub doc_links: Vec<String>,
    pub example_sites: Vec<String>,
    pub wcs_team_considerations: String,
    pub ops_notes: String,
    pub sk_recommended: bool,
}

/// Replaces the characters Excel rejects in sheet titles and keeps the result
/// within the 31 character sheet-name limit.
pub fn sanitize_sheet_title(raw: &str) -> String {
    let invalid = ['/', '\\', '?', '*', '[', ']', ':'];
    let mut sanitized: String = raw
        .chars()
        .map(|ch| if invalid.contains(&ch) { '-' } else { ch })
        .collect();

    if sanitized.len() > 31 {
        sanitized.truncate(31);
    }

    sanitized
}

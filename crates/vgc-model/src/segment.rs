//! Named analytical views over the merged table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named, non-exclusive filtered subset of merged rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Rows whose four regional figures were all originally present.
    CompleteSales,
    /// Rows released on or after the recent-year threshold.
    RecentGames,
    /// Rows whose publisher is on the major-publisher allow-list.
    MajorPublishers,
    /// Rows whose platform is on the top-platform allow-list.
    TopPlatforms,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::CompleteSales,
        SegmentKind::RecentGames,
        SegmentKind::MajorPublishers,
        SegmentKind::TopPlatforms,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::CompleteSales => "complete_sales",
            SegmentKind::RecentGames => "recent_games",
            SegmentKind::MajorPublishers => "major_publishers",
            SegmentKind::TopPlatforms => "top_platforms",
        }
    }

    /// File name of the persisted view.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Engine category tag

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed engine categories, plus `Other` for anything unrecognized
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Images,
    Videos,
    News,
    Books,
    Maps,
    Shaping,
    Other,
}

impl Category {
    /// Every bucket a registry partitions engines into
    pub const ALL: [Category; 8] = [
        Self::General,
        Self::Images,
        Self::Videos,
        Self::News,
        Self::Books,
        Self::Maps,
        Self::Shaping,
        Self::Other,
    ];

    /// Case-insensitive parse; unknown names map to `Other`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "general" => Self::General,
            "images" => Self::Images,
            "videos" => Self::Videos,
            "news" => Self::News,
            "books" => Self::Books,
            "maps" => Self::Maps,
            "shaping" => Self::Shaping,
            _ => Self::Other,
        }
    }

    /// Category an engine declared in its config; undeclared is `General`
    pub fn from_declared(declared: Option<&str>) -> Self {
        declared.map(Self::parse).unwrap_or(Self::General)
    }

    /// Category a request asked for. Absent or unknown falls back to `General`.
    pub fn for_request(requested: Option<&str>) -> Self {
        match requested.map(Self::parse) {
            None | Some(Self::Other) => Self::General,
            Some(category) => category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::News => "news",
            Self::Books => "books",
            Self::Maps => "maps",
            Self::Shaping => "shaping",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Project entries and lifecycle status badges.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle stage of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Dev,
    Filed,
    Offline,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dev => "dev",
            Self::Filed => "filed",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    /// Matches exactly `active`, `dev`, `filed` or `offline`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "dev" => Ok(Self::Dev),
            "filed" => Ok(Self::Filed),
            "offline" => Ok(Self::Offline),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown project status: {0:?}")]
pub struct UnknownStatus(pub String);

/// Visual variant of a badge. Maps to a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Destructive,
}

impl BadgeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Secondary => "secondary",
            Self::Outline => "outline",
            Self::Destructive => "destructive",
        }
    }
}

/// Variant and label shown for a project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub variant: BadgeVariant,
    pub text: &'static str,
}

impl StatusBadge {
    /// Map a status to its badge.
    pub fn from_status(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Active => Self {
                variant: BadgeVariant::Default,
                text: "ACTIVE",
            },
            ProjectStatus::Dev => Self {
                variant: BadgeVariant::Secondary,
                text: "DEV",
            },
            ProjectStatus::Filed => Self {
                variant: BadgeVariant::Outline,
                text: "FILED",
            },
            ProjectStatus::Offline => Self {
                variant: BadgeVariant::Destructive,
                text: "OFFLINE",
            },
        }
    }

    /// Map a raw status string. Absent or unrecognized values give no badge.
    pub fn for_status(status: Option<&str>) -> Option<Self> {
        status
            .and_then(|s| s.parse::<ProjectStatus>().ok())
            .map(Self::from_status)
    }
}

/// An entry in `project.projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,

    /// One-line description.
    #[serde(default)]
    pub description: String,

    /// Link to the live project.
    #[serde(default)]
    pub href: Option<String>,

    /// Link to the source repository.
    #[serde(default, alias = "repoLink")]
    pub repo_link: Option<String>,

    /// Raw lifecycle status. Kept as written so unknown values are tolerated.
    #[serde(default)]
    pub status: Option<String>,
}

impl Project {
    /// Parsed status, `None` when absent or unrecognized.
    pub fn status(&self) -> Option<ProjectStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Badge for this project's status.
    pub fn badge(&self) -> Option<StatusBadge> {
        StatusBadge::for_status(self.status.as_deref())
    }

    /// Whether a status is set but not one of the known values.
    pub fn has_unknown_status(&self) -> bool {
        self.status.is_some() && self.status().is_none()
    }

    /// Non-empty external links, live site first.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        [self.href.as_deref(), self.repo_link.as_deref()]
            .into_iter()
            .flatten()
            .filter(|link| !link.trim().is_empty())
    }
}

use serde::{Deserialize, Serialize};

// --- Platform ---

/// A social platform under investigation. One collection job runs per
/// platform that discovery finds a profile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Tiktok,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Youtube, Platform::Tiktok, Platform::Facebook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
        }
    }

    /// File stem of the artifact a collection job writes for this platform.
    /// Facebook keeps the historical `fb` stem its scrape script uses.
    pub fn artifact_stem(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "fb",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// --- Subject ---

/// The brand under research. Only the name is load-bearing; the rest is
/// context handed to the report prompts when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    pub name: Option<String>,
    pub url: Option<String>,
    pub industry: Option<String>,
    pub hq_location: Option<String>,
}

impl Subject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Display name, falling back when grounding has not normalized yet.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Company")
    }
}

// --- Reference ---

/// A citation accumulated during the run, rendered into the report's
/// references block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Reference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// --- RunStatus ---

/// Phase of one end-to-end research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Discovering,
    Collecting,
    Synthesizing,
    Complete,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Pending => "pending",
            RunStatus::Discovering => "discovering",
            RunStatus::Collecting => "collecting",
            RunStatus::Synthesizing => "synthesizing",
            RunStatus::Complete => "complete",
            RunStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serde_is_snake_case() {
        let json = serde_json::to_string(&Platform::Youtube).unwrap();
        assert_eq!(json, "\"youtube\"");
        let back: Platform = serde_json::from_str("\"facebook\"").unwrap();
        assert_eq!(back, Platform::Facebook);
    }

    #[test]
    fn facebook_artifact_keeps_fb_stem() {
        assert_eq!(Platform::Facebook.artifact_stem(), "fb");
        assert_eq!(Platform::Tiktok.artifact_stem(), "tiktok");
    }

    #[test]
    fn subject_falls_back_to_unknown_company() {
        assert_eq!(Subject::default().display_name(), "Unknown Company");
        assert_eq!(Subject::named("Acme").display_name(), "Acme");
    }
}

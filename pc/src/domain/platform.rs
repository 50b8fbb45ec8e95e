//! Platform registry
//!
//! Static metadata for the four target surfaces. Pure data, loaded once.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from platform lookup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Unknown platform: {0} (expected one of twitter, linkedin, instagram, blog)")]
    Unknown(String),
}

/// Target platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Linkedin,
    Instagram,
    Blog,
}

/// Display metadata and constraints for a platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub id: Platform,
    pub name: &'static str,
    pub icon: &'static str,
    /// Maximum character length of a post
    pub max_length: usize,
    pub tone: &'static str,
    pub constraints: &'static [&'static str],
}

static TWITTER: PlatformConfig = PlatformConfig {
    id: Platform::Twitter,
    name: "Twitter / X",
    icon: "𝕏",
    max_length: 280,
    tone: "Concise, punchy, conversational",
    constraints: &[
        "Maximum 280 characters",
        "Hashtags count toward limit",
        "Thread-friendly structure",
    ],
};

static LINKEDIN: PlatformConfig = PlatformConfig {
    id: Platform::Linkedin,
    name: "LinkedIn",
    icon: "in",
    max_length: 3000,
    tone: "Professional, insightful, credible",
    constraints: &[
        "Hook in first 2 lines",
        "Line breaks for readability",
        "Professional terminology",
    ],
};

static INSTAGRAM: PlatformConfig = PlatformConfig {
    id: Platform::Instagram,
    name: "Instagram",
    icon: "📷",
    max_length: 2200,
    tone: "Visual-first, authentic, engaging",
    constraints: &[
        "Caption supports visual content",
        "Emoji usage encouraged",
        "Hashtags in comments optional",
    ],
};

static BLOG: PlatformConfig = PlatformConfig {
    id: Platform::Blog,
    name: "Blog Post",
    icon: "✍️",
    max_length: 10000,
    tone: "In-depth, structured, authoritative",
    constraints: &["Clear headline structure", "SEO-optimized intro", "Scannable sections"],
};

impl Platform {
    /// All platforms in registry order
    pub const ALL: [Platform; 4] = [Self::Twitter, Self::Linkedin, Self::Instagram, Self::Blog];

    /// Parse a platform identifier (case-insensitive)
    pub fn parse(id: &str) -> Result<Self, PlatformError> {
        debug!(%id, "Platform::parse: called");
        match id.trim().to_lowercase().as_str() {
            "twitter" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::Linkedin),
            "instagram" => Ok(Self::Instagram),
            "blog" => Ok(Self::Blog),
            _ => {
                debug!(%id, "Platform::parse: no match");
                Err(PlatformError::Unknown(id.to_string()))
            }
        }
    }

    /// Stable identifier used in ids, templates and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
            Self::Blog => "blog",
        }
    }

    /// Look up the static configuration for this platform
    pub fn config(&self) -> &'static PlatformConfig {
        match self {
            Self::Twitter => &TWITTER,
            Self::Linkedin => &LINKEDIN,
            Self::Instagram => &INSTAGRAM,
            Self::Blog => &BLOG,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_platforms() {
        assert_eq!(Platform::parse("twitter"), Ok(Platform::Twitter));
        assert_eq!(Platform::parse("LinkedIn"), Ok(Platform::Linkedin));
        assert_eq!(Platform::parse(" instagram "), Ok(Platform::Instagram));
        assert_eq!(Platform::parse("blog"), Ok(Platform::Blog));
    }

    #[test]
    fn test_parse_unknown_platform() {
        assert_eq!(
            Platform::parse("myspace"),
            Err(PlatformError::Unknown("myspace".to_string()))
        );
    }

    #[test]
    fn test_config_matches_id() {
        for platform in Platform::ALL {
            let config = platform.config();
            assert_eq!(config.id, platform);
            assert_eq!(config.constraints.len(), 3);
        }
    }

    #[test]
    fn test_config_limits() {
        assert_eq!(Platform::Twitter.config().max_length, 280);
        assert_eq!(Platform::Linkedin.config().max_length, 3000);
        assert_eq!(Platform::Instagram.config().max_length, 2200);
        assert_eq!(Platform::Blog.config().max_length, 10000);
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>(), Ok(platform));
        }
    }
}

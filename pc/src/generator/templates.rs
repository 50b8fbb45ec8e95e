//! Template Engine
//!
//! Renders platform drafts from Handlebars templates, falling back to the
//! embedded defaults when no override directory provides one.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::embedded;
use crate::domain::Platform;

/// Prefix lengths (chars) taken from the intent per platform
pub const TWITTER_FALLBACK_CHARS: usize = 50;
pub const LINKEDIN_TOPIC_CHARS: usize = 100;
pub const INSTAGRAM_EXCERPT_CHARS: usize = 150;
pub const BLOG_TITLE_CHARS: usize = 80;

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("valid hashtag regex"));

/// Errors from template loading and rendering
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template for {platform}: {message}")]
    Render { platform: Platform, message: String },
}

/// Values available to every draft template
#[derive(Debug, Clone, Serialize)]
pub struct DraftContext {
    /// Full intent text
    pub intent: String,
    /// First sentence, or the first 50 chars when there is none
    pub hook: String,
    /// First 100 chars, lower-cased
    pub topic: String,
    /// First 150 chars
    pub excerpt: String,
    /// First 80 chars
    pub title: String,
    /// Platform display name
    pub platform_name: String,
}

impl DraftContext {
    pub fn new(platform: Platform, intent: &str) -> Self {
        debug!(%platform, intent_len = intent.len(), "DraftContext::new: called");
        Self {
            intent: intent.to_string(),
            hook: twitter_hook(intent),
            topic: truncate_chars(intent, LINKEDIN_TOPIC_CHARS).to_lowercase(),
            excerpt: truncate_chars(intent, INSTAGRAM_EXCERPT_CHARS).to_string(),
            title: truncate_chars(intent, BLOG_TITLE_CHARS).to_string(),
            platform_name: platform.config().name.to_string(),
        }
    }
}

/// First `n` chars of `text`, never splitting a code point
pub fn truncate_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First sentence-like segment of the intent, trimmed
pub fn twitter_hook(intent: &str) -> String {
    let first = SENTENCE_BREAK.split(intent).find(|s| !s.is_empty());
    match first.map(str::trim) {
        Some(hook) if !hook.is_empty() => hook.to_string(),
        _ => {
            debug!("twitter_hook: no sentence found, using prefix");
            truncate_chars(intent, TWITTER_FALLBACK_CHARS).to_string()
        }
    }
}

/// All `#word` hashtags in order of appearance
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Loads and renders draft templates
pub struct TemplateEngine {
    hbs: Handlebars<'static>,
    /// Override directory holding `{platform}.hbs` files
    override_dir: Option<PathBuf>,
}

impl TemplateEngine {
    /// Create an engine that checks `override_dir` before the embedded templates
    pub fn new(override_dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = override_dir.map(|d| d.as_ref().to_path_buf());
        debug!(?override_dir, "TemplateEngine::new: called");
        let override_dir = match override_dir {
            Some(dir) if dir.is_dir() => Some(dir),
            Some(dir) => {
                debug!(?dir, "TemplateEngine::new: override directory missing, ignoring");
                None
            }
            None => None,
        };

        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        Self { hbs, override_dir }
    }

    /// Create an engine that only uses embedded templates
    pub fn embedded_only() -> Self {
        debug!("TemplateEngine::embedded_only: called");
        Self::new(None::<PathBuf>)
    }

    /// Load the template source for a platform
    ///
    /// Checks in order:
    /// 1. Override: `{override_dir}/{platform}.hbs`
    /// 2. Embedded fallback
    fn load_template(&self, platform: Platform) -> Result<String, TemplateError> {
        debug!(%platform, "TemplateEngine::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.hbs", platform));
            if path.exists() {
                debug!(?path, "TemplateEngine::load_template: found override");
                return std::fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source });
            }
            debug!(?path, "TemplateEngine::load_template: no override");
        }

        Ok(embedded::get_embedded(platform).to_string())
    }

    /// Render the draft for a platform
    pub fn render(&self, platform: Platform, intent: &str) -> Result<String, TemplateError> {
        debug!(%platform, intent_len = intent.len(), "TemplateEngine::render: called");
        let template = self.load_template(platform)?;
        let context = DraftContext::new(platform, intent);

        let rendered = self
            .hbs
            .render_template(&template, &context)
            .map_err(|e| TemplateError::Render {
                platform,
                message: e.to_string(),
            })?;

        info!("Rendered {} draft ({} chars)", platform, rendered.chars().count());
        // Template files end with a newline the drafts don't carry
        Ok(rendered.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::embedded_only()
    }
}

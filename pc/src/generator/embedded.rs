//! Embedded draft templates
//!
//! These are compiled into the binary from .hbs files at build time.

use tracing::debug;

use crate::domain::Platform;

/// Twitter / X thread opener
pub const TWITTER: &str = include_str!("../../templates/twitter.hbs");

/// LinkedIn reflection post
pub const LINKEDIN: &str = include_str!("../../templates/linkedin.hbs");

/// Instagram caption
pub const INSTAGRAM: &str = include_str!("../../templates/instagram.hbs");

/// Long-form blog outline
pub const BLOG: &str = include_str!("../../templates/blog.hbs");

/// Get the embedded template for a platform
pub fn get_embedded(platform: Platform) -> &'static str {
    debug!(%platform, "get_embedded: called");
    match platform {
        Platform::Twitter => TWITTER,
        Platform::Linkedin => LINKEDIN,
        Platform::Instagram => INSTAGRAM,
        Platform::Blog => BLOG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_twitter() {
        let template = get_embedded(Platform::Twitter);
        assert!(template.contains("{{hook}}"));
        assert!(template.contains("#Growth #Mindset"));
    }

    #[test]
    fn test_get_embedded_blog() {
        let template = get_embedded(Platform::Blog);
        assert!(template.starts_with("# {{title}}"));
        assert!(template.contains("## The Challenge We All Face"));
        assert!(template.contains("{{intent}}"));
    }

    #[test]
    fn test_every_platform_has_template() {
        for platform in Platform::ALL {
            assert!(!get_embedded(platform).is_empty());
        }
    }
}

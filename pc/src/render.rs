//! Terminal rendering of session snapshots

use colored::Colorize;

use crate::domain::{ContentStatus, GeneratedContent, Platform, ReasoningStep, StepStatus};
use crate::session::{SessionEvent, SessionSnapshot};

/// Header shown while drafts generate
pub fn progress_header(snapshot: &SessionSnapshot) -> String {
    format!(
        "{}\n\"{}\"",
        "Crafting platform-optimized content".bright_cyan().bold(),
        snapshot.intent_preview().dimmed()
    )
}

/// One line for a live event, or None for events with nothing to print
pub fn event_line(snapshot: &SessionSnapshot, event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::StepStarted { item_id, index, .. } => {
            let item = snapshot.item(item_id)?;
            let step = item.reasoning.get(*index)?;
            Some(format!(
                "  {} {} {}",
                platform_label(item.platform),
                "…".yellow(),
                step.title
            ))
        }
        SessionEvent::StepCompleted { item_id, index, .. } => {
            let item = snapshot.item(item_id)?;
            let step = item.reasoning.get(*index)?;
            Some(format!(
                "  {} {} {} {}",
                platform_label(item.platform),
                "✓".green(),
                step.title,
                format!("({}%)", item.progress_percent()).dimmed()
            ))
        }
        SessionEvent::ItemReady { item_id } => {
            let item = snapshot.item(item_id)?;
            Some(format!("  {} {}", platform_label(item.platform), "ready".green().bold()))
        }
        _ => None,
    }
}

fn platform_label(platform: Platform) -> String {
    let config = platform.config();
    format!("[{} {}]", config.icon, config.name).cyan().to_string()
}

fn step_marker(status: StepStatus) -> String {
    match status {
        StepStatus::Complete => "✓".green().to_string(),
        StepStatus::Processing => "…".yellow().to_string(),
        StepStatus::Pending => "○".dimmed().to_string(),
    }
}

/// A reasoning step with its insights
pub fn step_block(step: &ReasoningStep) -> String {
    let mut out = format!("  {} {}\n    {}\n", step_marker(step.status), step.title.bold(), step.description.dimmed());
    if let Some(ref insights) = step.insights {
        for insight in insights {
            out.push_str(&format!("      • {}\n", insight));
        }
    }
    out
}

/// Review card for one item
pub fn card(index: usize, item: &GeneratedContent, show_reasoning: bool) -> String {
    let config = item.platform.config();
    let length = format!("{} / {} chars", item.displayed_length(), config.max_length);
    let length = if item.is_over_limit() {
        format!("{} {}", length.red(), "(over limit)".red())
    } else {
        length.dimmed().to_string()
    };

    let indicator = if item.is_edited {
        "Modified".magenta().to_string()
    } else {
        format!("{}% match", item.confidence_percent()).cyan().to_string()
    };

    let badge = match item.status {
        ContentStatus::Approved => format!(" {}", "✓ Approved".green().bold()),
        ContentStatus::Generating => format!(" {}", "generating".yellow()),
        _ => String::new(),
    };

    let mut out = format!(
        "{} {} {}  {}  {}{}\n{}\n",
        format!("#{}", index + 1).bold(),
        config.icon,
        config.name.bold(),
        length,
        indicator,
        badge,
        "─".repeat(40).dimmed()
    );
    out.push_str(item.displayed_content());
    out.push('\n');

    if show_reasoning {
        out.push_str(&format!("\n{}\n", "Generation Reasoning".dimmed().bold()));
        for step in &item.reasoning {
            out.push_str(&step_block(step));
        }
    }
    out
}

/// Header for the review screen
pub fn review_header(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "{}\n{} of {} approved\n{} {}\n",
        "Review Generated Content".bright_cyan().bold(),
        snapshot.approved_count(),
        snapshot.items.len(),
        "Original intent:".dimmed(),
        snapshot.intent
    );
    if let Some(created) = snapshot.created_at {
        out.push_str(&format!(
            "{} {}\n",
            "Generated:".dimmed(),
            created.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if snapshot.all_approved() {
        out.push_str(&format!(
            "{}\n",
            "All content approved. Ready to publish across all platforms.".green().bold()
        ));
    }
    out
}

/// The full review screen
pub fn review(snapshot: &SessionSnapshot, show_reasoning: bool) -> String {
    let mut out = review_header(snapshot);
    for (index, item) in snapshot.items.iter().enumerate() {
        out.push('\n');
        out.push_str(&card(index, item, show_reasoning));
    }
    out
}

/// Registry listing
pub fn platform_table() -> String {
    let mut out = String::new();
    for platform in Platform::ALL {
        let config = platform.config();
        out.push_str(&format!(
            "{} {:<10} {:<12} max {:>5}  {}\n",
            config.icon,
            platform.as_str().yellow(),
            config.name,
            config.max_length,
            config.tone.dimmed()
        ));
        for constraint in config.constraints {
            out.push_str(&format!("      - {}\n", constraint));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Sampler, SeededRandom, TemplateEngine, draft};
    use crate::session::SessionState;

    fn item(platform: Platform) -> GeneratedContent {
        let engine = TemplateEngine::embedded_only();
        let mut sampler = Sampler::new(Box::new(SeededRandom::new(5)), 0.85..0.97, 0..1);
        draft(&engine, &mut sampler, platform, "Build in public").unwrap()
    }

    #[test]
    fn test_card_shows_length_and_match() {
        let item = item(Platform::Twitter);
        let out = card(0, &item, false);
        assert!(out.contains(&format!("{} / 280 chars", item.displayed_length())));
        assert!(out.contains("% match"));
        assert!(out.contains("Build in public."));
        assert!(!out.contains("Generation Reasoning"));
    }

    #[test]
    fn test_card_marks_edit_and_overflow() {
        let mut item = item(Platform::Twitter);
        item.edit("x".repeat(300));
        let out = card(1, &item, true);
        assert!(out.contains("Modified"));
        assert!(out.contains("over limit"));
        assert!(out.contains("Generation Reasoning"));
        assert!(out.contains("Maximum 280 characters"));
    }

    #[test]
    fn test_review_header_counts() {
        let mut state = SessionState::default();
        let mut items = vec![item(Platform::Blog), item(Platform::Linkedin)];
        items[0].approve();
        state.begin("Build in public".to_string(), items);
        let out = review_header(&state.snapshot(false));
        assert!(out.contains("1 of 2 approved"));
        assert!(!out.contains("All content approved"));
    }

    #[test]
    fn test_review_header_shows_generation_time() {
        let mut state = SessionState::default();
        assert!(!review_header(&state.snapshot(false)).contains("Generated:"));

        state.begin("Build in public".to_string(), vec![item(Platform::Twitter)]);
        let snapshot = state.snapshot(false);
        let created = snapshot.created_at.unwrap();
        let out = review_header(&snapshot);
        assert!(out.contains("Generated:"));
        assert!(out.contains(&created.format("%Y-%m-%d %H:%M:%S UTC").to_string()));
    }

    #[test]
    fn test_platform_table_lists_all() {
        let out = platform_table();
        for platform in Platform::ALL {
            assert!(out.contains(platform.config().name));
        }
    }
}

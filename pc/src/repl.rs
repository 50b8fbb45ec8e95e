//! Interactive review session

use std::path::PathBuf;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::Platform;
use crate::export::write_export;
use crate::render;
use crate::session::{SessionManager, SessionPhase, SessionSnapshot};

/// Interactive review REPL over a session
pub struct ReviewRepl {
    manager: SessionManager,
    platforms: Vec<Platform>,
    export_dir: PathBuf,
    export_file: String,
    show_reasoning: bool,
}

/// Outcome of a slash command
#[derive(Debug, PartialEq, Eq)]
enum SlashResult {
    Continue,
    Quit,
}

/// Parsed slash command
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Help,
    Quit,
    New(String),
    Platforms(Vec<Platform>),
    List,
    Show(usize),
    Approve(usize),
    ApproveAll,
    Edit(usize, String),
    Regen(usize),
    Reasoning,
    Export(Option<PathBuf>),
    Reset,
}

/// Parse one input line; plain text is treated as a new intent
fn parse_command(input: &str) -> std::result::Result<ReplCommand, String> {
    let input = input.trim();
    if !input.starts_with('/') {
        return Ok(ReplCommand::New(input.to_string()));
    }

    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };

    // Card numbers are 1-based on screen
    let index = |arg: &str| -> std::result::Result<usize, String> {
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("expected a card number, got '{}'", arg)),
        }
    };

    match cmd {
        "/help" | "/h" => Ok(ReplCommand::Help),
        "/quit" | "/q" | "/exit" => Ok(ReplCommand::Quit),
        "/new" if !rest.is_empty() => Ok(ReplCommand::New(rest.to_string())),
        "/new" => Err("usage: /new <intent>".to_string()),
        "/platforms" | "/p" => rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| Platform::parse(s).map_err(|e| e.to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(ReplCommand::Platforms),
        "/list" | "/ls" => Ok(ReplCommand::List),
        "/show" => index(rest).map(ReplCommand::Show),
        "/approve" | "/a" => index(rest).map(ReplCommand::Approve),
        "/approve-all" | "/aa" => Ok(ReplCommand::ApproveAll),
        "/edit" | "/e" => {
            let (n, text) = rest.split_once(char::is_whitespace).ok_or("usage: /edit <n> <text>")?;
            // Literal \n in the text becomes a line break
            Ok(ReplCommand::Edit(index(n)?, text.trim().replace("\\n", "\n")))
        }
        "/regen" | "/r" => index(rest).map(ReplCommand::Regen),
        "/reasoning" => Ok(ReplCommand::Reasoning),
        "/export" => Ok(ReplCommand::Export(if rest.is_empty() {
            None
        } else {
            Some(PathBuf::from(rest))
        })),
        "/reset" => Ok(ReplCommand::Reset),
        other => Err(format!("unknown command: {}", other)),
    }
}

impl ReviewRepl {
    pub fn new(manager: SessionManager, platforms: Vec<Platform>, export_dir: PathBuf, export_file: String) -> Self {
        Self {
            manager,
            platforms,
            export_dir,
            export_file,
            show_reasoning: false,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_intent: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(intent) = initial_intent {
            println!("{} {}", ">".bright_green(), intent);
            self.generate(&intent).await?;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse_command(input) {
                        Ok(cmd) => {
                            if self.execute(cmd).await? == SlashResult::Quit {
                                break;
                            }
                        }
                        Err(msg) => println!("{} {}", "!".red(), msg),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        self.manager.shutdown().await?;
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "What would you like to share?".bright_cyan().bold());
        println!(
            "Platforms: {}",
            self.platforms.iter().map(|p| p.config().name).collect::<Vec<_>>().join(", ")
        );
        println!("Type an intent to generate, {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  <text>               Generate drafts for a new intent");
        println!("  /new <text>          Same as typing the intent");
        println!("  /platforms a,b       Choose target platforms");
        println!("  /list                Show all drafts");
        println!("  /show <n>            Show one draft with reasoning");
        println!("  /approve <n>         Approve draft n");
        println!("  /approve-all         Approve every draft");
        println!("  /edit <n> <text>     Replace draft n (\\n for line breaks)");
        println!("  /regen <n>           Regenerate draft n");
        println!("  /reasoning           Toggle reasoning under drafts");
        println!("  /export [path]       Write the JSON export");
        println!("  /reset               Start over");
        println!("  /quit                Exit");
    }

    async fn execute(&mut self, cmd: ReplCommand) -> Result<SlashResult> {
        debug!(?cmd, "ReviewRepl::execute: called");
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => return Ok(SlashResult::Quit),
            ReplCommand::New(intent) => self.generate(&intent).await?,
            ReplCommand::Platforms(platforms) if platforms.is_empty() => {
                println!("{}", render::platform_table());
            }
            ReplCommand::Platforms(platforms) => {
                self.platforms = platforms;
                println!("{} platforms set", "✓".green());
            }
            ReplCommand::List => self.print_review().await?,
            ReplCommand::Show(n) => {
                let snapshot = self.manager.snapshot().await?;
                match snapshot.items.get(n) {
                    Some(item) => println!("{}", render::card(n, item, true)),
                    None => println!("{} no draft #{}", "!".red(), n + 1),
                }
            }
            ReplCommand::Approve(n) => {
                if let Some(id) = self.item_id(n).await? {
                    report(self.manager.approve(&id).await, "approved");
                }
            }
            ReplCommand::ApproveAll => {
                let count = self.manager.approve_all().await?;
                println!("{} approved {} drafts", "✓".green(), count);
            }
            ReplCommand::Edit(n, text) => {
                if let Some(id) = self.item_id(n).await? {
                    report(self.manager.edit(&id, &text).await, "saved");
                }
            }
            ReplCommand::Regen(n) => {
                if let Some(id) = self.item_id(n).await? {
                    match self.manager.regenerate(&id).await {
                        Ok(()) => self.follow_reveal().await?,
                        Err(e) => println!("{} {}", "!".red(), e),
                    }
                }
            }
            ReplCommand::Reasoning => {
                self.show_reasoning = !self.show_reasoning;
                println!("reasoning {}", if self.show_reasoning { "on" } else { "off" });
            }
            ReplCommand::Export(target) => {
                let records = self.manager.export().await?;
                let target = target.unwrap_or_else(|| self.export_dir.clone());
                let path = write_export(&target, Some(&self.export_file), &records)?;
                println!("{} exported {} drafts to {}", "✓".green(), records.len(), path.display());
            }
            ReplCommand::Reset => {
                self.manager.reset().await?;
                println!("{} session cleared", "✓".green());
            }
        }
        Ok(SlashResult::Continue)
    }

    async fn item_id(&self, n: usize) -> Result<Option<String>> {
        let snapshot = self.manager.snapshot().await?;
        let id = snapshot.items.get(n).map(|i| i.id.clone());
        if id.is_none() {
            println!("{} no draft #{}", "!".red(), n + 1);
        }
        Ok(id)
    }

    async fn generate(&mut self, intent: &str) -> Result<()> {
        let snapshot = self.manager.snapshot().await?;
        if snapshot.phase != SessionPhase::Input {
            self.manager.reset().await?;
        }
        match self.manager.submit(intent, &self.platforms).await {
            Ok(_) => self.follow_reveal().await,
            Err(e) => {
                println!("{} {}", "!".red(), e);
                Ok(())
            }
        }
    }

    /// Print live progress until the reveal finishes, then the review
    async fn follow_reveal(&self) -> Result<()> {
        follow_reveal(&self.manager).await?;
        self.print_review().await
    }

    async fn print_review(&self) -> Result<()> {
        let snapshot = self.manager.snapshot().await?;
        if snapshot.items.is_empty() {
            println!("No drafts yet. Type an intent to get started.");
        } else {
            println!("{}", render::review(&snapshot, self.show_reasoning));
        }
        Ok(())
    }
}

fn report(result: crate::session::SessionResult<()>, done: &str) {
    match result {
        Ok(()) => println!("{} {}", "✓".green(), done),
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

/// Stream reveal progress to stdout until the session is idle
pub async fn follow_reveal(manager: &SessionManager) -> Result<SessionSnapshot> {
    let mut events = manager.subscribe();
    let snapshot = manager.snapshot().await?;
    if !snapshot.revealing {
        return Ok(snapshot);
    }
    println!("{}\n", render::progress_header(&snapshot));

    loop {
        match events.recv().await {
            Ok(crate::session::SessionEvent::RevealFinished) | Ok(crate::session::SessionEvent::SessionReset) => {
                break;
            }
            Ok(event) => {
                let snapshot = manager.snapshot().await?;
                if let Some(line) = render::event_line(&snapshot, &event) {
                    println!("{}", line);
                }
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
    println!();
    Ok(manager.wait_for_idle().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_new_intent() {
        assert_eq!(
            parse_command("Launch day is here"),
            Ok(ReplCommand::New("Launch day is here".to_string()))
        );
    }

    #[test]
    fn test_parse_indexed_commands() {
        assert_eq!(parse_command("/approve 2"), Ok(ReplCommand::Approve(1)));
        assert_eq!(parse_command("/regen 1"), Ok(ReplCommand::Regen(0)));
        assert_eq!(parse_command("/show 3"), Ok(ReplCommand::Show(2)));
        assert!(parse_command("/approve 0").is_err());
        assert!(parse_command("/approve x").is_err());
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            parse_command("/edit 1 first line\\nsecond"),
            Ok(ReplCommand::Edit(0, "first line\nsecond".to_string()))
        );
        assert!(parse_command("/edit 1").is_err());
    }

    #[test]
    fn test_parse_platforms() {
        assert_eq!(
            parse_command("/platforms blog, twitter"),
            Ok(ReplCommand::Platforms(vec![Platform::Blog, Platform::Twitter]))
        );
        assert_eq!(parse_command("/platforms"), Ok(ReplCommand::Platforms(vec![])));
        assert!(parse_command("/platforms myspace").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("/quit"), Ok(ReplCommand::Quit));
        assert_eq!(parse_command("/approve-all"), Ok(ReplCommand::ApproveAll));
        assert_eq!(parse_command("/export"), Ok(ReplCommand::Export(None)));
        assert_eq!(
            parse_command("/export out.json"),
            Ok(ReplCommand::Export(Some(PathBuf::from("out.json"))))
        );
        assert!(parse_command("/new").is_err());
        assert!(parse_command("/bogus").is_err());
    }
}

//! `arbor browse` command implementation.
//!
//! Interactive loop: stdin commands and session updates are handled as they
//! arrive, so a new command can supersede a page that is still loading.

use arbor_client::SitePath;
use arbor_view::{Session, Update};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{BackendArgs, backend};
use crate::error::CliError;
use crate::output::Output;
use crate::screen::{Screen, render_screen};

const HELP: &str = "Commands: /path, <number>, back, forward, reload, help, quit";

/// Arguments for the browse command.
#[derive(Args)]
pub(crate) struct BrowseArgs {
    /// Site path to start at.
    #[arg(default_value = "/")]
    path: String,

    #[command(flatten)]
    backend: BackendArgs,
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Go(SitePath),
    Follow(usize),
    Back,
    Forward,
    Reload,
    Help,
    Quit,
}

impl Command {
    /// Parse an input line. Blank lines yield `None`.
    fn parse(input: &str) -> Option<Result<Self, String>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let command = match input {
            "back" | "b" => Ok(Self::Back),
            "forward" | "f" => Ok(Self::Forward),
            "reload" | "r" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ if input.starts_with('/') => SitePath::parse(input)
                .map(Self::Go)
                .map_err(|e| e.to_string()),
            _ => input
                .parse()
                .map(Self::Follow)
                .map_err(|_| format!("Unknown command: {input}")),
        };
        Some(command)
    }
}

impl BrowseArgs {
    /// Execute the browse command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the start path is invalid, or
    /// stdin cannot be read.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.backend.load_config(None, None)?;
        let start = SitePath::parse(&self.path)?;

        let mut session = Session::new(backend(&config), config.view.max_redirects);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut screen: Option<Screen> = None;

        output.hint(HELP);
        session.navigate(start);

        loop {
            tokio::select! {
                update = session.next_update(), if session.is_loading() => {
                    if let Some(Update::Redirected(redirect)) = &update {
                        output.hint(&format!("{} -> {}", redirect.from, redirect.to));
                    }
                    if !session.is_loading() {
                        let rendered = render_screen(session.layout());
                        output.page(&rendered.text);
                        screen = Some(rendered);
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match Command::parse(&line) {
                        None => {}
                        Some(Err(message)) => output.warning(&message),
                        Some(Ok(Command::Quit)) => break,
                        Some(Ok(command)) => {
                            run(&mut session, screen.as_ref(), command, &output);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Apply a navigation command to the session.
fn run(session: &mut Session, screen: Option<&Screen>, command: Command, output: &Output) {
    tracing::debug!(command = ?command, "Browse command");
    match command {
        Command::Go(path) => session.navigate(path),
        Command::Follow(number) => match screen.and_then(|s| s.link(number)) {
            Some(path) => session.navigate(path.clone()),
            None => output.warning(&format!("No link numbered {number}")),
        },
        Command::Back => {
            if !session.back() {
                output.warning("Already at the oldest page");
            }
        }
        Command::Forward => {
            if !session.forward() {
                output.warning("Already at the newest page");
            }
        }
        Command::Reload => session.reload(),
        Command::Help => output.hint(HELP),
        Command::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("back"), Some(Ok(Command::Back)));
        assert_eq!(Command::parse(" f "), Some(Ok(Command::Forward)));
        assert_eq!(Command::parse("reload"), Some(Ok(Command::Reload)));
        assert_eq!(Command::parse("q"), Some(Ok(Command::Quit)));
        assert_eq!(Command::parse("?"), Some(Ok(Command::Help)));
    }

    #[test]
    fn test_parse_path_and_number() {
        assert_eq!(
            Command::parse("/news/"),
            Some(Ok(Command::Go(SitePath::parse("/news").unwrap())))
        );
        assert_eq!(Command::parse("3"), Some(Ok(Command::Follow(3))));
    }

    #[test]
    fn test_parse_blank_and_invalid() {
        assert_eq!(Command::parse("   "), None);
        assert!(matches!(Command::parse("/a/../b"), Some(Err(_))));
        assert_eq!(
            Command::parse("jump"),
            Some(Err("Unknown command: jump".to_owned()))
        );
    }
}

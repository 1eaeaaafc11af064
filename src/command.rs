use std::str::FromStr;

use crate::capture::{ClickTarget, Field};
use crate::models::{NotificationId, SourceKind};

/// A user action typed at the console prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PreviousPage,
    Page(u32),
    Reload,
    OpenForm,
    SelectKind(SourceKind),
    SetField(Field, String),
    Submit,
    Cancel,
    Click(ClickTarget),
    Digest,
    Stats,
    Dismiss(NotificationId),
    /// Open the Nth card (1-based) in the browser.
    OpenArticle(usize),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  next | prev | page N | reload     browse the feed
  add                               open the capture form
  kind newsapi|rss|scraping         switch the form's source type
  set FIELD VALUE                   fill a field (api_key, country, category,
                                    rss_url, site_url, title_selector,
                                    content_selector)
  submit | cancel                   send or discard the form
  backdrop | inside                 click outside / inside the form
  digest                            generate the news digest
  stats                             refresh the header figures
  dismiss ID                        close a notification
  open N                            open the Nth article in the browser
  help | quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let number = |what: &str| -> Result<u64, String> {
            rest.parse::<u64>()
                .map_err(|_| format!("{what} expects a number, got {rest:?}"))
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "next" | "n" => Command::NextPage,
            "prev" | "p" => Command::PreviousPage,
            "page" => Command::Page(
                u32::try_from(number("page")?).map_err(|_| "page number too large".to_string())?,
            ),
            "reload" => Command::Reload,
            "add" | "capture" => Command::OpenForm,
            "kind" => Command::SelectKind(rest.parse()?),
            "set" => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::SetField(name.parse()?, value.trim().to_string())
            }
            "submit" => Command::Submit,
            "cancel" => Command::Cancel,
            "backdrop" => Command::Click(ClickTarget::Backdrop),
            "inside" => Command::Click(ClickTarget::Content),
            "digest" => Command::Digest,
            "stats" => Command::Stats,
            "dismiss" => Command::Dismiss(NotificationId(number("dismiss")?)),
            "open" => {
                let n = number("open")?;
                if n == 0 {
                    return Err("articles are numbered from 1".to_string());
                }
                Command::OpenArticle(n as usize)
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(command)
    }
}

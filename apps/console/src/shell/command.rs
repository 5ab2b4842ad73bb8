use std::path::PathBuf;

use secrecy::SecretString;

use crate::api::{InterviewStatus, LovName};
use crate::preferences::{FontSize, Locale};
use crate::views::candidates::SortField;
use crate::views::Section;

pub const HELP: &str = "\
Session
  login <email> <password>     sign in as an administrator
  logout [--yes]               sign out and clear local state
  whoami                       show the signed-in user and preferences
Navigation
  open <section>               candidates | configuration | jd | profiles
  show                         redraw the current section
Candidates
  tab <status>                 not-scheduled | scheduled | in-progress | completed | all
  page <n>                     go to page n
  rows <n>                     rows per page (returns to page 1)
  sort <field>                 id | name | email | location | department | grade | status
  search <text>                search candidates (empty text clears the results)
Rows (candidates and configuration)
  select <id> | deselect <id> | toggle <id> | select-all | deselect-all
Configuration
  lov <skill|designation>      load a list of values
  lov-value <text>             type the value to add
  lov-save | lov-delete | lov-reset
Job descriptions
  jd options | jd skill <name> | jd designation <name>
  jd file <path> | jd questions <path> | jd upload
Profiles
  profiles <path.xlsx> | profiles upload
Preferences
  locale <code> | font <small|medium|large> | theme
  help | quit
";

/// Row-checkbox operations; ids are interpreted by the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Select(i64),
    Deselect(i64),
    Toggle(i64),
    All,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JdCommand {
    Options,
    Skill(String),
    Designation(String),
    File(PathBuf),
    Questions(PathBuf),
    Upload,
}

#[derive(Debug)]
pub enum Command {
    Help,
    Quit,
    Whoami,
    Login { email: String, password: SecretString },
    Logout { confirmed: bool },
    Open(Section),
    Show,
    Tab(InterviewStatus),
    /// 1-based page number.
    Page(u32),
    RowsPerPage(u32),
    Sort(SortField),
    Search(String),
    Mark(Mark),
    Lov(LovName),
    LovValue(String),
    LovSave,
    LovDelete,
    LovReset,
    Jd(JdCommand),
    ProfileFile(PathBuf),
    ProfileUpload,
    Locale(Locale),
    Font(FontSize),
    Theme,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = split_word(line);

        let command = match verb.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "whoami" => Command::Whoami,
            "login" => {
                // Missing parts are passed through so the sign-in form reports them.
                let (email, password) = split_word(rest);
                Command::Login {
                    email: email.to_string(),
                    password: SecretString::new(password.to_string()),
                }
            }
            "logout" => Command::Logout {
                confirmed: matches!(rest, "--yes" | "-y"),
            },
            "open" => Command::Open(required(rest, "open <section>")?.parse()?),
            "show" => Command::Show,
            "tab" => Command::Tab(required(rest, "tab <status>")?.parse()?),
            "page" => Command::Page(positive(rest, "page <n>", "page number")?),
            "rows" => Command::RowsPerPage(positive(rest, "rows <n>", "row count")?),
            "sort" => Command::Sort(required(rest, "sort <field>")?.parse()?),
            "search" => Command::Search(rest.to_string()),
            "select" => Command::Mark(Mark::Select(row_id(rest, "select <id>")?)),
            "deselect" => Command::Mark(Mark::Deselect(row_id(rest, "deselect <id>")?)),
            "toggle" => Command::Mark(Mark::Toggle(row_id(rest, "toggle <id>")?)),
            "select-all" => Command::Mark(Mark::All),
            "deselect-all" => Command::Mark(Mark::None),
            "lov" => Command::Lov(required(rest, "lov <skill|designation>")?.parse()?),
            "lov-value" => Command::LovValue(rest.to_string()),
            "lov-save" => Command::LovSave,
            "lov-delete" => Command::LovDelete,
            "lov-reset" => Command::LovReset,
            "jd" => Command::Jd(parse_jd(rest)?),
            "profiles" => match rest {
                "" => return Err("Usage: profiles <path.xlsx> | profiles upload".to_string()),
                "upload" => Command::ProfileUpload,
                path => Command::ProfileFile(PathBuf::from(path)),
            },
            "locale" | "language" => Command::Locale(required(rest, "locale <code>")?.parse()?),
            "font" => Command::Font(required(rest, "font <small|medium|large>")?.parse()?),
            "theme" => Command::Theme,
            other => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
        };
        Ok(Some(command))
    }

    /// Commands available before signing in.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Command::Help
                | Command::Quit
                | Command::Whoami
                | Command::Login { .. }
                | Command::Logout { .. }
                | Command::Locale(_)
                | Command::Font(_)
                | Command::Theme
        )
    }
}

fn parse_jd(rest: &str) -> Result<JdCommand, String> {
    let (sub, arg) = split_word(rest);
    match sub {
        "" | "options" => Ok(JdCommand::Options),
        "skill" => Ok(JdCommand::Skill(required(arg, "jd skill <name>")?.to_string())),
        "designation" => Ok(JdCommand::Designation(
            required(arg, "jd designation <name>")?.to_string(),
        )),
        "file" => Ok(JdCommand::File(PathBuf::from(required(arg, "jd file <path>")?))),
        "questions" => Ok(JdCommand::Questions(PathBuf::from(required(
            arg,
            "jd questions <path>",
        )?))),
        "upload" => Ok(JdCommand::Upload),
        other => Err(format!("Unknown jd command '{other}'")),
    }
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(arg)
    }
}

fn positive(arg: &str, usage: &str, what: &str) -> Result<u32, String> {
    match required(arg, usage)?.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{arg}' is not a {what}")),
    }
}

fn row_id(arg: &str, usage: &str) -> Result<i64, String> {
    required(arg, usage)?
        .parse()
        .map_err(|_| format!("'{arg}' is not a row id"))
}

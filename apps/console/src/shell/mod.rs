//! Interactive shell: reads commands from stdin, drives the views and prints them.
//!
//! Unauthenticated users are confined to the login route. Search text goes through a
//! [`Debouncer`]; the run loop selects between input lines and settled queries.

use std::hash::Hash;
use std::path::Path;

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::api::{InterviewStatus, UploadFile};
use crate::debounce::Debouncer;
use crate::errors::AppError;
use crate::preferences::Preferences;
use crate::selection::Selection;
use crate::state::AppState;
use crate::views::{
    CandidateTable, JdUploader, LovEditor, Notice, ProfileUploader, Route, Section,
};

pub mod command;
mod render;

pub use command::{Command, JdCommand, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    state: AppState,
    route: Route,
    candidates: CandidateTable,
    lov: LovEditor,
    jd: JdUploader,
    profiles: ProfileUploader,
    search: Debouncer<String>,
}

impl Shell {
    /// A stored session resumes on the dashboard; otherwise the shell starts at login.
    pub fn new(state: AppState, search: Debouncer<String>) -> Self {
        let route = if state.session.is_signed_in() {
            Route::Dashboard(Section::Candidates)
        } else {
            Route::Login
        };
        let candidates = CandidateTable::new(InterviewStatus::All, state.config.rows_per_page);
        Self {
            state,
            route,
            candidates,
            lov: LovEditor::new(),
            jd: JdUploader::new(),
            profiles: ProfileUploader::new(),
            search,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.route)
    }

    pub async fn banner(&mut self) -> String {
        match self.route {
            Route::Login => "Sign in with: login <email> <password> (type 'help' for commands)\n"
                .to_string(),
            Route::Dashboard(section) => {
                let mut out = match self.state.session.current_session() {
                    Some(session) => format!("Welcome back, {}.\n", session.name),
                    None => String::new(),
                };
                out.push_str(&self.enter(section).await);
                out
            }
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> (String, Flow) {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return (String::new(), Flow::Continue),
            Err(usage) => return (format!("{usage}\n"), Flow::Continue),
        };
        let flow = if matches!(command, Command::Quit) {
            Flow::Quit
        } else {
            Flow::Continue
        };
        (self.dispatch(command).await, flow)
    }

    /// Shows results for a settled search query. Results that arrive after the user
    /// left the candidates section or signed out are dropped.
    pub async fn apply_search(&mut self, query: String) -> String {
        if self.route != Route::Dashboard(Section::Candidates) {
            debug!("Dropping search results outside the candidates section");
            return String::new();
        }
        self.candidates.apply_search(&self.state.api, &query).await;
        render::candidates(&self.candidates)
    }

    async fn dispatch(&mut self, command: Command) -> String {
        if !command.is_public() && !self.state.session.is_signed_in() {
            self.route = Route::Login;
            return "Please sign in first: login <email> <password>\n".to_string();
        }

        match command {
            Command::Help => command::HELP.to_string(),
            Command::Quit => "Goodbye.\n".to_string(),
            Command::Whoami => self.whoami(),
            Command::Login { email, password } => self.login(&email, &password).await,
            Command::Logout { confirmed: false } => {
                "Are you sure you want to log out? Run 'logout --yes' to confirm.\n".to_string()
            }
            Command::Logout { confirmed: true } => self.logout(),
            Command::Open(section) => {
                self.route = Route::Dashboard(section);
                self.enter(section).await
            }
            Command::Show => self.render_current(),
            Command::Tab(status) => {
                self.route = Route::Dashboard(Section::Candidates);
                self.candidates.set_status(status);
                self.enter(Section::Candidates).await
            }
            Command::Page(n) => self.go_to_page(n).await,
            Command::RowsPerPage(n) => {
                self.route = Route::Dashboard(Section::Candidates);
                self.candidates.set_rows_per_page(n);
                self.enter(Section::Candidates).await
            }
            Command::Sort(field) => {
                self.route = Route::Dashboard(Section::Candidates);
                self.candidates.sort_by(field);
                render::candidates(&self.candidates)
            }
            Command::Search(text) => {
                self.route = Route::Dashboard(Section::Candidates);
                self.search.push(text);
                String::new()
            }
            Command::Mark(mark) => self.mark(mark),
            Command::Lov(name) => {
                self.route = Route::Dashboard(Section::Configuration);
                self.lov.select_name(&self.state.api, name).await;
                render::lov(&self.lov)
            }
            Command::LovValue(raw) => {
                self.lov.set_input(&raw);
                format!("Value: {}\n", self.lov.input())
            }
            Command::LovSave => {
                let notice = self.lov.save(&self.state.api).await;
                render::notice(&notice) + &render::lov(&self.lov)
            }
            Command::LovDelete => {
                let notice = self.lov.delete(&self.state.api).await;
                render::notice(&notice) + &render::lov(&self.lov)
            }
            Command::LovReset => {
                self.lov.reset();
                render::lov(&self.lov)
            }
            Command::Jd(jd) => {
                self.route = Route::Dashboard(Section::JobDescriptions);
                self.jd_command(jd).await
            }
            Command::ProfileFile(path) => {
                self.route = Route::Dashboard(Section::Profiles);
                match read_file(&path).await {
                    Ok(file) => match self.profiles.select_file(file) {
                        Ok(()) => render::profiles(&self.profiles),
                        Err(notice) => render::notice(&notice),
                    },
                    Err(message) => message,
                }
            }
            Command::ProfileUpload => {
                self.route = Route::Dashboard(Section::Profiles);
                let notice = self.profiles.upload(&self.state.api).await;
                render::notice(&notice)
            }
            Command::Locale(locale) => {
                match Preferences::set_locale(self.state.store.as_ref(), &locale) {
                    Ok(()) => format!("Language set to {}.\n", locale.as_str()),
                    Err(e) => storage_failure(e.into()),
                }
            }
            Command::Font(size) => {
                match Preferences::set_font_size(self.state.store.as_ref(), size) {
                    Ok(()) => format!("Font size set to {}.\n", size.as_str()),
                    Err(e) => storage_failure(e.into()),
                }
            }
            Command::Theme => match Preferences::toggle_theme(self.state.store.as_ref()) {
                Ok(mode) => format!("Theme is now {}.\n", mode.as_str()),
                Err(e) => storage_failure(e.into()),
            },
        }
    }

    async fn login(&mut self, email: &str, password: &SecretString) -> String {
        match self.state.session.login(email, password).await {
            Ok(session) => {
                self.reset_views();
                self.route = Route::Dashboard(Section::Candidates);
                let mut out = format!("Welcome, {} ({}).\n", session.name, session.role);
                out.push_str(&self.enter(Section::Candidates).await);
                out
            }
            Err(e) => {
                self.route = Route::Login;
                format!("Error: {}\n", e.user_message())
            }
        }
    }

    fn logout(&mut self) -> String {
        match self.state.session.logout() {
            Ok(route) => {
                self.route = route;
                self.reset_views();
                "Signed out.\n".to_string()
            }
            Err(e) => storage_failure(e.into()),
        }
    }

    fn whoami(&self) -> String {
        let prefs = Preferences::load(self.state.store.as_ref());
        match self.state.session.current_session() {
            Some(s) => format!(
                "{} (id {}, {}) in {}\nPreferences: {prefs}\n",
                s.name, s.user_id, s.role, s.location
            ),
            None => format!("Not signed in.\nPreferences: {prefs}\n"),
        }
    }

    /// Loads whatever the section needs and renders it.
    async fn enter(&mut self, section: Section) -> String {
        let api = &self.state.api;
        match section {
            Section::Candidates => {
                self.candidates.load(api).await;
                render::candidates(&self.candidates)
            }
            Section::Configuration => {
                self.lov.refresh(api).await;
                render::lov(&self.lov)
            }
            Section::JobDescriptions => {
                self.jd.load_options(api).await;
                render::jd_form(&self.jd)
            }
            Section::Profiles => render::profiles(&self.profiles),
        }
    }

    fn render_current(&self) -> String {
        match self.route {
            Route::Login => "Not signed in.\n".to_string(),
            Route::Dashboard(Section::Candidates) => render::candidates(&self.candidates),
            Route::Dashboard(Section::Configuration) => render::lov(&self.lov),
            Route::Dashboard(Section::JobDescriptions) => render::jd_form(&self.jd),
            Route::Dashboard(Section::Profiles) => render::profiles(&self.profiles),
        }
    }

    async fn go_to_page(&mut self, n: u32) -> String {
        self.route = Route::Dashboard(Section::Candidates);
        let pages = self.candidates.page_count();
        if pages > 0 && u64::from(n) > pages {
            return format!("Page {n} does not exist (1-{pages}).\n");
        }
        self.candidates.set_page(n - 1);
        self.enter(Section::Candidates).await
    }

    fn mark(&mut self, mark: Mark) -> String {
        match self.route {
            Route::Dashboard(Section::Candidates) => {
                apply_mark(self.candidates.selection_mut(), mark, row_id(mark));
                render::candidates(&self.candidates)
            }
            Route::Dashboard(Section::Configuration) => {
                let id = row_id(mark).and_then(|id| usize::try_from(id).ok());
                apply_mark(self.lov.selection_mut(), mark, id);
                render::lov(&self.lov)
            }
            _ => "Nothing to select in this section.\n".to_string(),
        }
    }

    async fn jd_command(&mut self, command: JdCommand) -> String {
        match command {
            JdCommand::Options => {
                self.jd.load_options(&self.state.api).await;
                render::jd_form(&self.jd)
            }
            JdCommand::Skill(skill) => match pick(self.jd.skills(), &skill) {
                Ok(skill) => {
                    self.jd.set_skill(&skill);
                    render::jd_form(&self.jd)
                }
                Err(message) => message,
            },
            JdCommand::Designation(designation) => {
                match pick(self.jd.designations(), &designation) {
                    Ok(designation) => {
                        self.jd.set_designation(&designation);
                        render::jd_form(&self.jd)
                    }
                    Err(message) => message,
                }
            }
            JdCommand::File(path) => match read_file(&path).await {
                Ok(file) => {
                    self.jd.set_jd_file(file);
                    render::jd_form(&self.jd)
                }
                Err(message) => message,
            },
            JdCommand::Questions(path) => match read_file(&path).await {
                Ok(file) => {
                    self.jd.set_question_bank(file);
                    render::jd_form(&self.jd)
                }
                Err(message) => message,
            },
            JdCommand::Upload => {
                let notice: Notice = self.jd.upload(&self.state.api).await;
                render::notice(&notice) + &render::jd_form(&self.jd)
            }
        }
    }

    fn reset_views(&mut self) {
        self.candidates = CandidateTable::new(InterviewStatus::All, self.state.config.rows_per_page);
        self.lov = LovEditor::new();
        self.jd = JdUploader::new();
        self.profiles = ProfileUploader::new();
    }
}

fn row_id(mark: Mark) -> Option<i64> {
    match mark {
        Mark::Select(id) | Mark::Deselect(id) | Mark::Toggle(id) => Some(id),
        Mark::All | Mark::None => None,
    }
}

fn apply_mark<T: Eq + Hash + Clone>(selection: &mut Selection<T>, mark: Mark, id: Option<T>) {
    match (mark, id) {
        (Mark::All, _) => selection.select_all(),
        (Mark::None, _) => selection.deselect_all(),
        (Mark::Select(_), Some(id)) => selection.select_one(id),
        (Mark::Deselect(_), Some(id)) => selection.deselect_one(&id),
        (Mark::Toggle(_), Some(id)) => selection.toggle(id),
        _ => {}
    }
}

/// Resolves a choice against a loaded pick list, case-insensitively. With no list
/// loaded the value is taken as typed.
fn pick(options: &[String], wanted: &str) -> Result<String, String> {
    if options.is_empty() {
        return Ok(wanted.to_string());
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| format!("'{wanted}' is not one of: {}\n", options.join(", ")))
}

async fn read_file(path: &Path) -> Result<UploadFile, String> {
    UploadFile::read(path)
        .await
        .map_err(|e| format!("Error: could not read {}: {e}\n", path.display()))
}

fn storage_failure(e: AppError) -> String {
    format!("Error: {}\n", e.user_message())
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

/// Runs the console until `quit` or end of input.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let (search, mut settled) = Debouncer::spawn(state.config.search_debounce);
    let mut shell = Shell::new(state, search);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let banner = shell.banner().await;
    write_out(&mut stdout, &banner).await?;

    loop {
        write_out(&mut stdout, &shell.prompt()).await?;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let (output, flow) = shell.handle_line(&line).await;
                write_out(&mut stdout, &output).await?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Some(query) = settled.recv() => {
                let output = shell.apply_search(query).await;
                write_out(&mut stdout, &format!("\n{output}")).await?;
            }
        }
    }

    info!("Console closed");
    Ok(())
}

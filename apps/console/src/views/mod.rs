//! Screen-level state for the console. Each view owns its rows, selection and error
//! state; failures end up as a local message or a [`Notice`], never as a propagated
//! error.

use std::fmt;
use std::str::FromStr;

pub mod candidates;
pub mod configuration;
pub mod uploads;

pub use candidates::CandidateTable;
pub use configuration::LovEditor;
pub use uploads::{JdUploader, ProfileUploader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Candidates,
    Configuration,
    JobDescriptions,
    Profiles,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Candidates => "candidates",
            Section::Configuration => "configuration",
            Section::JobDescriptions => "jd",
            Section::Profiles => "profiles",
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidates" | "interviews" => Ok(Section::Candidates),
            "configuration" | "config" | "lov" => Ok(Section::Configuration),
            "jd" | "job-descriptions" => Ok(Section::JobDescriptions),
            "profiles" | "profile-upload" => Ok(Section::Profiles),
            _ => Err(format!("Unknown section '{s}'")),
        }
    }
}

/// Where the console is. Unauthenticated users only ever see `Login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard(Section),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("login"),
            Route::Dashboard(section) => write!(f, "dashboard/{}", section.as_str()),
        }
    }
}

/// A message the console shows in a dialog after an action completes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

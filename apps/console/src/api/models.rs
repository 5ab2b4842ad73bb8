use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A candidate row as returned by `/candidates` and `/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    #[serde(default)]
    pub resume: Option<i64>,
    #[serde(default)]
    pub skill_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub interview_status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePage {
    #[serde(default)]
    pub data: Vec<Candidate>,
    #[serde(default)]
    pub count: u64,
}

/// `{message}` body returned by the asset upload endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkUploadSummary {
    #[serde(default)]
    pub errored_records: u64,
    #[serde(default)]
    pub existing_candidates_skipped: u64,
    #[serde(default)]
    pub new_candidates_added: u64,
}

impl fmt::Display for BulkUploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upload Summary:\n- Errors: {}\n- Skipped: {}\n- Added: {}",
            self.errored_records, self.existing_candidates_skipped, self.new_candidates_added
        )
    }
}

/// Error body of the data endpoints: either `{message}` or `{detail}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    detail: Option<Value>,
}

impl ErrorBody {
    pub(crate) fn text(&self) -> Option<String> {
        [&self.message, &self.detail]
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str().map(str::to_string))
    }
}

/// Interview status tabs of the candidate table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterviewStatus {
    NotScheduled,
    Scheduled,
    InProgress,
    Completed,
    #[default]
    All,
}

impl InterviewStatus {
    pub const TABS: [InterviewStatus; 5] = [
        InterviewStatus::NotScheduled,
        InterviewStatus::Scheduled,
        InterviewStatus::InProgress,
        InterviewStatus::Completed,
        InterviewStatus::All,
    ];

    /// Value sent as the `interview_status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::NotScheduled => "Not Scheduled",
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::InProgress => "In Progress",
            InterviewStatus::Completed => "Completed",
            InterviewStatus::All => "ALL",
        }
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "notscheduled" => Ok(InterviewStatus::NotScheduled),
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "inprogress" => Ok(InterviewStatus::InProgress),
            "completed" => Ok(InterviewStatus::Completed),
            "all" => Ok(InterviewStatus::All),
            _ => Err(format!("Unknown interview status '{s}'")),
        }
    }
}

/// Named lists of values the configuration editor manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LovName {
    Skill,
    Designation,
}

impl LovName {
    pub fn as_str(&self) -> &'static str {
        match self {
            LovName::Skill => "skill",
            LovName::Designation => "designation",
        }
    }
}

impl FromStr for LovName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skill" => Ok(LovName::Skill),
            "designation" => Ok(LovName::Designation),
            _ => Err(format!("Unknown list '{s}'. Use skill or designation")),
        }
    }
}

/// A file staged for a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            file_name,
            contents,
        })
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        Path::new(&self.file_name)
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Accepts a string, a number, or null for fields the service is loose about.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

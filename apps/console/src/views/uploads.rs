//! Upload forms: job description + question bank, and bulk candidate profiles.

use tracing::warn;

use crate::api::{ApiClient, LovName, UploadFile, UploadMessage};
use crate::errors::{AppError, SIGN_IN_AGAIN};
use crate::views::Notice;

#[derive(Default)]
pub struct JdUploader {
    skill: Option<String>,
    designation: Option<String>,
    jd_file: Option<UploadFile>,
    question_bank: Option<UploadFile>,
    skills: Vec<String>,
    designations: Vec<String>,
}

impl JdUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn designations(&self) -> &[String] {
        &self.designations
    }

    pub fn skill(&self) -> Option<&str> {
        self.skill.as_deref()
    }

    pub fn designation(&self) -> Option<&str> {
        self.designation.as_deref()
    }

    pub fn jd_file_name(&self) -> Option<&str> {
        self.jd_file.as_ref().map(|f| f.file_name.as_str())
    }

    pub fn question_bank_name(&self) -> Option<&str> {
        self.question_bank.as_ref().map(|f| f.file_name.as_str())
    }

    /// Loads the skill and designation pick lists. A failed list stays empty.
    pub async fn load_options(&mut self, api: &ApiClient) {
        if !api.session().is_signed_in() {
            return;
        }
        match api.get_lov(LovName::Skill).await {
            Ok(skills) => self.skills = skills,
            Err(e) => warn!("Error fetching skills: {e}"),
        }
        match api.get_lov(LovName::Designation).await {
            Ok(designations) => self.designations = designations,
            Err(e) => warn!("Error fetching designations: {e}"),
        }
    }

    pub fn set_skill(&mut self, skill: &str) {
        self.skill = non_empty(skill);
    }

    pub fn set_designation(&mut self, designation: &str) {
        self.designation = non_empty(designation);
    }

    pub fn set_jd_file(&mut self, file: UploadFile) {
        self.jd_file = Some(file);
    }

    pub fn set_question_bank(&mut self, file: UploadFile) {
        self.question_bank = Some(file);
    }

    /// Uploads the JD, then the question bank. The notice carries each server message.
    /// After an attempted upload the form is cleared.
    pub async fn upload(&mut self, api: &ApiClient) -> Notice {
        let (Some(skill), Some(designation), Some(jd), Some(qb)) = (
            self.skill.as_deref(),
            self.designation.as_deref(),
            self.jd_file.as_ref(),
            self.question_bank.as_ref(),
        ) else {
            return Notice::error("Please select all fields and both files.");
        };

        if !api.session().is_signed_in() {
            return Notice::error(SIGN_IN_AGAIN);
        }

        let notice = match upload_pair(api, jd, qb, skill, designation).await {
            Ok(message) => Notice::info(message),
            Err(e) => {
                warn!("JD upload failed: {e}");
                Notice::error("Error uploading files. Please try again.")
            }
        };

        let (skills, designations) = (
            std::mem::take(&mut self.skills),
            std::mem::take(&mut self.designations),
        );
        *self = Self {
            skills,
            designations,
            ..Self::default()
        };
        notice
    }
}

async fn upload_pair(
    api: &ApiClient,
    jd: &UploadFile,
    qb: &UploadFile,
    skill: &str,
    designation: &str,
) -> Result<String, AppError> {
    let jd_reply = server_message(api.upload_jd(jd, skill, designation).await)?;
    let qb_reply = server_message(api.upload_question_bank(qb, skill, designation).await)?;
    Ok(format!(
        "JD Upload: {jd_reply}\nQuestion Bank Upload: {qb_reply}"
    ))
}

/// The body's `message` (or "Success"); a rejected upload reports the server's reason
/// instead of failing the whole form.
fn server_message(result: Result<UploadMessage, AppError>) -> Result<String, AppError> {
    match result {
        Ok(reply) => Ok(reply.message.unwrap_or_else(|| "Success".to_string())),
        Err(AppError::Fetch { message, .. }) => Ok(message),
        Err(e) => Err(e),
    }
}

#[derive(Default)]
pub struct ProfileUploader {
    file: Option<UploadFile>,
}

impl ProfileUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.file_name.as_str())
    }

    /// Only `.xlsx` spreadsheets are accepted; anything else clears the choice.
    pub fn select_file(&mut self, file: UploadFile) -> Result<(), Notice> {
        if file.has_extension("xlsx") {
            self.file = Some(file);
            Ok(())
        } else {
            self.file = None;
            Err(Notice::error("Only .xlsx files are allowed"))
        }
    }

    pub async fn upload(&mut self, api: &ApiClient) -> Notice {
        let Some(file) = self.file.as_ref() else {
            return Notice::error("Please select a file first.");
        };
        if !api.session().is_signed_in() {
            return Notice::error(SIGN_IN_AGAIN);
        }

        let notice = match api.upload_bulk_profile(file).await {
            Ok(summary) => Notice::info(summary.to_string()),
            Err(e) => {
                warn!("Bulk profile upload failed: {e}");
                Notice::error(e.user_message())
            }
        };
        self.file = None;
        notice
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{serve, signed_in_api, unsigned_api, UNREACHABLE};

    fn file(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            contents: b"contents".to_vec(),
        }
    }

    fn filled_form() -> JdUploader {
        let mut form = JdUploader::new();
        form.set_skill("RUST");
        form.set_designation("SDE 2");
        form.set_jd_file(file("jd.pdf"));
        form.set_question_bank(file("qb.xlsx"));
        form
    }

    #[tokio::test]
    async fn test_jd_upload_requires_every_field() {
        let (api, _store) = signed_in_api(UNREACHABLE);
        let mut form = JdUploader::new();
        form.set_skill("RUST");
        form.set_jd_file(file("jd.pdf"));

        let notice = form.upload(&api).await;
        assert_eq!(
            notice,
            Notice::error("Please select all fields and both files.")
        );
    }

    #[tokio::test]
    async fn test_jd_upload_without_session() {
        let api = unsigned_api(UNREACHABLE);
        let mut form = filled_form();

        let notice = form.upload(&api).await;
        assert_eq!(notice, Notice::error(SIGN_IN_AGAIN));
    }

    #[tokio::test]
    async fn test_jd_upload_reports_both_messages_and_resets() {
        let router = Router::new()
            .route(
                "/assets/jd",
                post(|| async { Json(json!({"message": "JD saved"})) }),
            )
            .route("/assets/question_bank", post(|| async { Json(json!({})) }))
            .route("/lov", get(|| async { Json(json!(["RUST"])) }));
        let base = serve(router).await;
        let (api, _store) = signed_in_api(&base);
        let mut form = filled_form();
        form.load_options(&api).await;

        let notice = form.upload(&api).await;

        assert_eq!(
            notice,
            Notice::info("JD Upload: JD saved\nQuestion Bank Upload: Success")
        );
        assert_eq!(form.skills(), &["RUST".to_string()]);
        let again = form.upload(&api).await;
        assert_eq!(again.message, "Please select all fields and both files.");
    }

    #[tokio::test]
    async fn test_jd_upload_rejection_shows_server_reason() {
        let router = Router::new()
            .route(
                "/assets/jd",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"message": "Unsupported file type"})),
                    )
                }),
            )
            .route(
                "/assets/question_bank",
                post(|| async { Json(json!({"message": "Stored"})) }),
            );
        let base = serve(router).await;
        let (api, _store) = signed_in_api(&base);

        let notice = filled_form().upload(&api).await;
        assert_eq!(
            notice.message,
            "JD Upload: Unsupported file type\nQuestion Bank Upload: Stored"
        );
    }

    #[tokio::test]
    async fn test_jd_upload_network_failure() {
        let (api, _store) = signed_in_api(UNREACHABLE);
        let notice = filled_form().upload(&api).await;
        assert_eq!(
            notice,
            Notice::error("Error uploading files. Please try again.")
        );
    }

    #[test]
    fn test_profile_upload_rejects_non_xlsx() {
        let mut uploader = ProfileUploader::new();
        uploader.select_file(file("ok.xlsx")).unwrap();
        let err = uploader.select_file(file("profiles.csv")).unwrap_err();
        assert_eq!(err.message, "Only .xlsx files are allowed");
        assert_eq!(uploader.file_name(), None);
    }

    #[tokio::test]
    async fn test_profile_upload_requires_file() {
        let (api, _store) = signed_in_api(UNREACHABLE);
        let notice = ProfileUploader::new().upload(&api).await;
        assert_eq!(notice.message, "Please select a file first.");
    }

    #[tokio::test]
    async fn test_profile_upload_shows_summary() {
        let router = Router::new().route(
            "/assets/bulk_profile",
            post(|| async {
                Json(json!({
                    "errored_records": 0,
                    "existing_candidates_skipped": 5,
                    "new_candidates_added": 12
                }))
            }),
        );
        let base = serve(router).await;
        let (api, _store) = signed_in_api(&base);
        let mut uploader = ProfileUploader::new();
        uploader.select_file(file("batch.xlsx")).unwrap();

        let notice = uploader.upload(&api).await;

        assert_eq!(
            notice,
            Notice::info("Upload Summary:\n- Errors: 0\n- Skipped: 5\n- Added: 12")
        );
        assert_eq!(uploader.file_name(), None);
    }

    #[tokio::test]
    async fn test_profile_upload_server_error_message() {
        let router = Router::new().route(
            "/assets/bulk_profile",
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base = serve(router).await;
        let (api, _store) = signed_in_api(&base);
        let mut uploader = ProfileUploader::new();
        uploader.select_file(file("batch.xlsx")).unwrap();

        let notice = uploader.upload(&api).await;
        assert_eq!(notice, Notice::error("Server error: 502"));
    }
}

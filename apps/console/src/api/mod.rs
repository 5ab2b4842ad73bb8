//! Client for the screening service's data endpoints.
//!
//! Every request is authorised through [`SessionManager::authorize`]; without a stored
//! session the call fails with [`AppError::Unauthenticated`] before anything is sent.

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::session::SessionManager;

pub mod models;

pub use models::{
    BulkUploadSummary, Candidate, CandidatePage, InterviewStatus, LovName, UploadFile,
    UploadMessage,
};

use models::ErrorBody;

#[derive(Clone)]
pub struct ApiClient {
    session: SessionManager,
}

impl ApiClient {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// GET /candidates. `page_num` is 1-based.
    pub async fn list_candidates(
        &self,
        page_num: u32,
        results_per_page: u32,
        status: InterviewStatus,
    ) -> Result<CandidatePage, AppError> {
        let request = self.session.http().get(self.session.endpoint("candidates")).query(&[
            ("page_num", page_num.to_string()),
            ("results_per_page", results_per_page.to_string()),
            ("interview_status", status.as_str().to_string()),
        ]);
        self.send_json(request).await
    }

    /// GET /search
    pub async fn search_candidates(&self, text: &str) -> Result<Vec<Candidate>, AppError> {
        let request = self
            .session
            .http()
            .get(self.session.endpoint("search"))
            .query(&[("search_text", text)]);
        self.send_json(request).await
    }

    /// GET /lov
    pub async fn get_lov(&self, name: LovName) -> Result<Vec<String>, AppError> {
        let request = self
            .session
            .http()
            .get(self.session.endpoint("lov"))
            .query(&[("lov_name", name.as_str())]);
        self.send_json(request).await
    }

    /// PUT /lov: adds one value.
    pub async fn add_lov(&self, name: LovName, value: &str) -> Result<(), AppError> {
        let form = Form::new()
            .text("lov_name", name.as_str())
            .text("lov_value", value.to_string());
        let request = self
            .session
            .http()
            .put(self.session.endpoint("lov"))
            .multipart(form);
        self.send(request).await.map(|_| ())
    }

    /// DELETE /lov: removes every listed value.
    pub async fn delete_lov(&self, name: LovName, values: &[String]) -> Result<(), AppError> {
        let form = Form::new()
            .text("lov_name", name.as_str())
            .text("lov_value", values.join(","));
        let request = self
            .session
            .http()
            .delete(self.session.endpoint("lov"))
            .multipart(form);
        self.send(request).await.map(|_| ())
    }

    /// POST /assets/jd
    pub async fn upload_jd(
        &self,
        file: &UploadFile,
        skill: &str,
        designation: &str,
    ) -> Result<UploadMessage, AppError> {
        self.upload_asset("assets/jd", "jd", file, skill, designation)
            .await
    }

    /// POST /assets/question_bank
    pub async fn upload_question_bank(
        &self,
        file: &UploadFile,
        skill: &str,
        designation: &str,
    ) -> Result<UploadMessage, AppError> {
        self.upload_asset(
            "assets/question_bank",
            "question_bank",
            file,
            skill,
            designation,
        )
        .await
    }

    /// POST /assets/bulk_profile. The spreadsheet must be `.xlsx`.
    pub async fn upload_bulk_profile(
        &self,
        file: &UploadFile,
    ) -> Result<BulkUploadSummary, AppError> {
        if !file.has_extension("xlsx") {
            return Err(AppError::Validation(
                "Only .xlsx files are allowed".to_string(),
            ));
        }
        let form = Form::new().part("bulk_profile", file_part(file));
        let request = self
            .session
            .http()
            .post(self.session.endpoint("assets/bulk_profile"))
            .multipart(form);
        self.send_json(request).await
    }

    async fn upload_asset(
        &self,
        path: &str,
        field: &'static str,
        file: &UploadFile,
        skill: &str,
        designation: &str,
    ) -> Result<UploadMessage, AppError> {
        let form = Form::new()
            .part(field, file_part(file))
            .text("skill", skill.to_string())
            .text("designation", designation.to_string());
        let request = self
            .session
            .http()
            .post(self.session.endpoint(path))
            .multipart(form);
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            warn!("Unexpected response body: {e}");
            AppError::Fetch {
                status,
                message: "Unexpected response from server.".to_string(),
            }
        })
    }

    /// Authorises, sends, and turns a non-2xx status into [`AppError::Fetch`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = self.session.authorize(request)?.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.text())
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        warn!("API returned {status}: {message}");

        Err(AppError::Fetch {
            status: status.as_u16(),
            message,
        })
    }
}

fn file_part(file: &UploadFile) -> Part {
    Part::bytes(file.contents.clone()).file_name(file.file_name.clone())
}

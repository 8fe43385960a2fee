use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::PlatformError;
use crate::models::meroshare::{
    ApplicableIssue, ApplicableIssuesResponse, ApplyShareRequest, BankDetails, ConflictBody,
    LoginRequest, OwnDetails,
};

pub const DEFAULT_BASE_URL: &str = "https://webbackend.cdsc.com.np/api/meroShare";

/// Issues requested per listing call.
const APPLICABLE_ISSUE_PAGE_SIZE: u32 = 10;

lazy_static! {
    static ref XML_MESSAGE_REGEX: Regex = Regex::new(r"(?s)<message>\s*(.*?)\s*</message>").unwrap();
}

/// What a known 409 message means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictOutcome {
    InvalidPin,
    /// The platform already holds an application for this issue.
    InProcess,
}

/// Every platform message that changes how a 409 is handled. Messages not
/// listed here surface as `PlatformError::ConflictOther`.
pub const KNOWN_CONFLICTS: &[(&str, ConflictOutcome)] = &[
    (
        "You have entered wrong transaction PIN.",
        ConflictOutcome::InvalidPin,
    ),
    (
        "Application in process. Please try again later.",
        ConflictOutcome::InProcess,
    ),
];

pub fn classify_conflict(message: &str) -> Option<ConflictOutcome> {
    KNOWN_CONFLICTS
        .iter()
        .find(|(known, _)| *known == message.trim())
        .map(|(_, outcome)| *outcome)
}

/// Pull the `message` out of a 409 body. The platform answers with XML or
/// JSON depending on the negotiated content type.
pub fn conflict_message(content_type: &str, body: &str) -> Option<String> {
    if content_type.contains("application/xml") || content_type.contains("text/xml") {
        return XML_MESSAGE_REGEX
            .captures(body)
            .map(|cap| cap[1].to_string());
    }
    if content_type.contains("application/json") {
        return serde_json::from_str::<ConflictBody>(body)
            .ok()
            .map(|b| b.message);
    }
    None
}

/// Session token returned by login and echoed on every later call.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(Value),
    /// Duplicate submission already being processed upstream; nothing to record.
    InProcess,
}

#[derive(Clone)]
pub struct MeroShareClient {
    client: Client,
    base_url: String,
}

impl MeroShareClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PlatformError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(
        &self,
        client_id: u16,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, PlatformError> {
        let url = format!("{}/auth/", self.base_url);
        let body = LoginRequest {
            client_id: client_id.to_string(),
            username,
            password,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "MeroShare login rejected");
            return Err(PlatformError::LoginFailed {
                status: Some(response.status().as_u16()),
            });
        }

        response
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| AuthToken(v.to_string()))
            .ok_or(PlatformError::LoginFailed { status: None })
    }

    pub async fn fetch_own_details(&self, token: &AuthToken) -> Result<OwnDetails, PlatformError> {
        let url = format!("{}/ownDetail/", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, token.as_str())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(PlatformError::FetchFailed {
                what: "user details",
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// May return an empty list; picking a record is the caller's concern.
    pub async fn fetch_bank_details(
        &self,
        token: &AuthToken,
        bank_id: &str,
    ) -> Result<Vec<BankDetails>, PlatformError> {
        let url = format!("{}/bank/{}", self.base_url, bank_id);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, token.as_str())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(PlatformError::FetchFailed {
                what: "bank details",
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn fetch_applicable_issues(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<ApplicableIssue>, PlatformError> {
        let url = format!("{}/companyShare/applicableIssue/", self.base_url);
        let payload = json!({
            "filterFieldParams": [
                { "key": "companyIssue.companyISIN.script", "alias": "Scrip" },
                { "key": "companyIssue.companyISIN.company.name", "alias": "Company Name" },
                { "key": "companyIssue.assignedToClient.name", "value": "", "alias": "Issue Manager" }
            ],
            "page": 1,
            "size": APPLICABLE_ISSUE_PAGE_SIZE,
            "searchRoleViewConstants": "VIEW_APPLICABLE_SHARE",
            "filterDateParams": [
                { "key": "minIssueOpenDate", "condition": "", "alias": "", "value": "" },
                { "key": "maxIssueCloseDate", "condition": "", "alias": "", "value": "" }
            ]
        });

        // Status is not checked: an error page fails to decode and surfaces here
        let response: ApplicableIssuesResponse = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, token.as_str())
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        tracing::debug!(
            "Fetched {} applicable issues (total {})",
            response.issues.len(),
            response.total_count
        );

        Ok(response.issues)
    }

    pub async fn apply(
        &self,
        token: &AuthToken,
        request: &ApplyShareRequest,
    ) -> Result<ApplyOutcome, PlatformError> {
        let url = format!("{}/applicantForm/share/apply/", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, token.as_str())
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::OK {
            // The application went through; an unreadable body does not undo that
            let result = match response.text().await {
                Ok(body) => serde_json::from_str(&body).unwrap_or(Value::Null),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read apply response body");
                    Value::Null
                }
            };
            return Ok(ApplyOutcome::Applied(result));
        }

        if status != StatusCode::CONFLICT {
            return Err(PlatformError::SubmissionFailed(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        let Some(message) = conflict_message(&content_type, &body) else {
            return Err(PlatformError::SubmissionFailed(status.as_u16()));
        };

        match classify_conflict(&message) {
            Some(ConflictOutcome::InvalidPin) => Err(PlatformError::InvalidPin(message)),
            Some(ConflictOutcome::InProcess) => {
                tracing::info!(
                    company_share_id = %request.company_share_id,
                    "Application in process, skipping duplicate application"
                );
                Ok(ApplyOutcome::InProcess)
            }
            None => Err(PlatformError::ConflictOther(message)),
        }
    }
}

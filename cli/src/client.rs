use anyhow::{Result, anyhow};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxInfo {
    pub total_squares: i64,
    pub selected_squares: Vec<i64>,
}

/// Thin typed wrapper over the HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the new account's id.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<String> {
        log::debug!("POST {}", self.url("/register"));
        let response = self
            .http
            .post(self.url("/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "isAdmin": is_admin,
            }))
            .send()
            .await?;

        let data: serde_json::Value = expect_success(response, "Registration").await?;
        data["userId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("userId missing in response"))
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        is_admin: Option<bool>,
    ) -> Result<LoginResponse> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(is_admin) = is_admin {
            body["isAdmin"] = json!(is_admin);
        }

        log::debug!("POST {}", self.url("/login"));
        let response = self.http.post(self.url("/login")).json(&body).send().await?;
        expect_success(response, "Login").await
    }

    pub async fn profile(&self, token: &str) -> Result<Profile> {
        let response = self.http.get(self.url("/user")).bearer_auth(token).send().await?;
        expect_success(response, "Fetching profile").await
    }

    /// `Ok(false)` means the server looked at the token and said no.
    /// Transport failures and 5xx are errors.
    pub async fn verify(&self, token: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.url("/verify-token"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let text = response.text().await.unwrap_or_default();
                log::debug!("token rejected: {}", extract_message(&text));
                Ok(false)
            }
            _ => {
                let data: serde_json::Value = expect_success(response, "Token check").await?;
                Ok(data["isValid"].as_bool().unwrap_or(false))
            }
        }
    }

    pub async fn box_info(&self, token: &str) -> Result<BoxInfo> {
        let response = self
            .http
            .get(self.url("/user/getBoxInfo"))
            .bearer_auth(token)
            .send()
            .await?;
        expect_success(response, "Loading boxes").await
    }

    /// Saves `info` and returns what the server actually stored.
    pub async fn save_box_info(&self, token: &str, info: &BoxInfo) -> Result<BoxInfo> {
        self.post_box_info(
            token,
            json!({
                "totalSquares": info.total_squares,
                "selectedSquares": info.selected_squares,
                "isReset": false,
            }),
        )
        .await
    }

    pub async fn reset_boxes(&self, token: &str) -> Result<BoxInfo> {
        self.post_box_info(token, json!({ "isReset": true })).await
    }

    async fn post_box_info(&self, token: &str, body: serde_json::Value) -> Result<BoxInfo> {
        let response = self
            .http
            .post(self.url("/user/saveBoxInfo"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        expect_success(response, "Saving boxes").await
    }
}

/// Turns a non-2xx response into an error carrying the server's message.
async fn expect_success<T: serde::de::DeserializeOwned>(
    response: Response,
    action: &str,
) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(anyhow!(
            "{} failed ({}): {}",
            action,
            status,
            extract_message(&text)
        ));
    }

    serde_json::from_str(&text).map_err(|_| anyhow!("Server returned invalid JSON: {}", text))
}

/// Pulls `message` out of a JSON error body. Falls back to the raw text for
/// anything else (proxy error pages, plain-text 500s).
pub fn extract_message(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => json["message"].as_str().unwrap_or(text).to_string(),
        Err(_) => text.to_string(),
    }
}

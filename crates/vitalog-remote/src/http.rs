use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use vitalog_types::{HealthRecord, SessionIdentity};

use crate::error::{Error, Result};
use crate::gateway::RemoteGateway;
use crate::wire::RecordRow;

const RECORDS_TABLE: &str = "health_entries";

/// Gateway over the hosted backend's REST surface (GoTrue-style auth under
/// `/auth/v1`, PostgREST-style rows under `/rest/v1`).
///
/// Holds at most one bearer token. The token is process-local state; the
/// coordinator persists it through `auth_token`/`restore_token`.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    token: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl WireUser {
    fn into_identity(self) -> SessionIdentity {
        SessionIdentity {
            user_id: self.id,
            email: self.email.unwrap_or_default(),
            display_name: self.user_metadata.name,
        }
    }
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            token: Mutex::new(None),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn current_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn store_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, url).header("apikey", &self.api_key);
        if let Some(token) = self.current_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Turn a non-success response into the two-way error taxonomy:
    /// server-side failures read as unreachable, everything else as a
    /// rejection carrying the backend's message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body).unwrap_or_else(|| status.to_string());
        if status.is_server_error() {
            Err(Error::Disconnected(message))
        } else {
            Err(Error::Rejected(message))
        }
    }

    async fn authenticate(&self, url: String, body: serde_json::Value) -> Result<SessionIdentity> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        self.store_token(Some(auth.access_token));
        Ok(auth.user.into_identity())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn get_session(&self) -> Result<Option<SessionIdentity>> {
        if self.current_token().is_none() {
            return Ok(None);
        }
        let response = self
            .request(reqwest::Method::GET, self.auth_url("user"))
            .send()
            .await?;
        // An expired or revoked token is "no session", not a failure.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!("stored token no longer valid");
            self.store_token(None);
            return Ok(None);
        }
        let user: WireUser = Self::check(response).await?.json().await?;
        Ok(Some(user.into_identity()))
    }

    async fn sign_in(&self, email: &str, credential: &str) -> Result<SessionIdentity> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        self.authenticate(url, json!({ "email": email, "password": credential }))
            .await
    }

    async fn sign_up(
        &self,
        email: &str,
        credential: &str,
        display_name: &str,
    ) -> Result<SessionIdentity> {
        let body = json!({
            "email": email,
            "password": credential,
            "data": { "name": display_name },
        });
        self.authenticate(self.auth_url("signup"), body).await
    }

    async fn sign_out(&self) -> Result<()> {
        // Drop the token before the call; sign-out must succeed locally
        // even when the backend is unreachable.
        let token = self.token.lock().unwrap().take();
        if token.is_none() {
            return Ok(());
        }
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(token.unwrap_or_default())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn insert_record(&self, record: &HealthRecord, owner_id: &str) -> Result<()> {
        let row = RecordRow::from_record(record, owner_id);
        let response = self
            .request(reqwest::Method::POST, self.rest_url(RECORDS_TABLE))
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_records(&self, owner_id: &str, limit: usize) -> Result<Vec<HealthRecord>> {
        let response = self
            .request(reqwest::Method::GET, self.rest_url(RECORDS_TABLE))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", owner_id)),
                ("order", "timestamp.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<RecordRow> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    fn auth_token(&self) -> Option<String> {
        self.current_token()
    }

    fn restore_token(&self, token: String) {
        self.store_token(Some(token));
    }
}

/// Pull a human-readable message out of a backend error body. The auth and
/// rest surfaces use different field names for the same thing.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["error_description", "msg", "message", "error"] {
        if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_token_means_no_session_without_network() {
        let gateway = HttpGateway::new("https://example.invalid", "key");
        assert!(gateway.get_session().await.unwrap().is_none());
    }

    #[test]
    fn token_restore_round_trip() {
        let gateway = HttpGateway::new("https://example.invalid/", "key");
        assert_eq!(gateway.auth_token(), None);
        gateway.restore_token("tok-1".to_string());
        assert_eq!(gateway.auth_token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new("https://example.invalid/", "key");
        assert_eq!(gateway.auth_url("user"), "https://example.invalid/auth/v1/user");
        assert_eq!(
            gateway.rest_url("health_entries"),
            "https://example.invalid/rest/v1/health_entries"
        );
    }

    #[test]
    fn extracts_backend_error_messages() {
        assert_eq!(
            extract_message(r#"{"error_description":"Invalid login credentials"}"#).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            extract_message(r#"{"message":"duplicate key"}"#).as_deref(),
            Some("duplicate key")
        );
        assert_eq!(extract_message("<html>"), None);
    }
}

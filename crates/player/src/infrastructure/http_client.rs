//! HTTP adapter for the code API.

use std::time::Duration;

use aimmo_domain::GameId;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ports::outbound::{CodeApi, PortError};

/// Request and response body of the code endpoint.
#[derive(Debug, Serialize, Deserialize)]
struct CodePayload {
    code: String,
}

/// `CodeApi` backed by the game's REST API.
///
/// Code lives at `{base_url}/code/{game_id}/`: `GET` returns it and `POST`
/// replaces it, both as `{"code": "..."}`.
pub struct HttpCodeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCodeApi {
    pub fn new(base_url: &str) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PortError::http("build_client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn code_url(&self, game_id: GameId) -> String {
        format!("{}/code/{}/", self.base_url, game_id)
    }
}

#[async_trait]
impl CodeApi for HttpCodeApi {
    async fn fetch_code(&self, game_id: GameId) -> Result<String, PortError> {
        let response = self
            .client
            .get(self.code_url(game_id))
            .send()
            .await
            .map_err(|e| PortError::http("fetch_code", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PortError::not_found("Code", game_id));
        }
        if !status.is_success() {
            return Err(PortError::http("fetch_code", format!("status {status}")));
        }

        let payload: CodePayload = response
            .json()
            .await
            .map_err(PortError::serialization)?;
        Ok(payload.code)
    }

    async fn post_code(&self, game_id: GameId, code: &str) -> Result<(), PortError> {
        let response = self
            .client
            .post(self.code_url(game_id))
            .json(&CodePayload {
                code: code.to_string(),
            })
            .send()
            .await
            .map_err(|e| PortError::http("post_code", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PortError::not_found("Code", game_id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::http("post_code", format!("status {status}: {body}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_url_ignores_trailing_slash() {
        let api = HttpCodeApi::new("http://localhost:8000/aimmo/api/").unwrap();
        assert_eq!(
            api.code_url(GameId::new(4)),
            "http://localhost:8000/aimmo/api/code/4/"
        );
    }

    #[test]
    fn payload_is_a_code_object() {
        let json = serde_json::to_value(CodePayload {
            code: "wait()".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"code": "wait()"}));
    }
}

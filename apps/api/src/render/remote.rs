//! `Engine` backed by an HTTP compile service.
//!
//! Contract:
//! - `GET  {base}/health`: any 2xx means the service is up (bring-up).
//! - `POST {base}/compile` with `{ "main", "files", "format" }`:
//!   - 2xx: body is the artifact bytes.
//!   - 400 / 422: `{ "diagnostics": [string | { "message": ... }] }`.
//!   - anything else is a protocol error.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::render::engine::{
    Diagnostic, Engine, EngineError, EngineOutput, OutputFormat, MAIN_SOURCE,
};

#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    main: &'a str,
    files: &'a BTreeMap<String, String>,
    format: OutputFormat,
}

#[derive(Debug, Deserialize)]
struct CompileFailure {
    #[serde(default)]
    diagnostics: Vec<Diagnostic>,
}

pub struct RemoteEngine {
    client: Client,
    base_url: String,
    files: BTreeMap<String, String>,
    ready: bool,
}

impl RemoteEngine {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            files: BTreeMap::new(),
            ready: false,
        }
    }
}

#[async_trait]
impl Engine for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn init(&mut self) -> Result<(), EngineError> {
        let url = format!("{}/health", self.base_url);
        self.client.get(&url).send().await?.error_for_status()?;
        info!("Compile service reachable at {}", self.base_url);
        self.ready = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.files.clear();
    }

    fn add_source(&mut self, path: &str, text: &str) {
        self.files.insert(path.to_string(), text.to_string());
    }

    async fn compile(&mut self, format: OutputFormat) -> Result<EngineOutput, EngineError> {
        if !self.ready {
            return Err(EngineError::NotInitialized);
        }

        let response = self
            .client
            .post(format!("{}/compile", self.base_url))
            .json(&CompileRequest {
                main: MAIN_SOURCE,
                files: &self.files,
                format,
            })
            .send()
            .await?;

        let status = response.status();
        debug!("Compile service returned {}", status);

        if status.is_success() {
            return Ok(EngineOutput::artifact(response.bytes().await?.to_vec()));
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(EngineOutput::failed(parse_failure(&body)));
        }

        warn!("Compile service error {}: {}", status, body);
        Err(EngineError::Protocol(format!(
            "compile service returned {status}: {body}"
        )))
    }
}

/// Diagnostics from a failure body. A body that is not the documented JSON shape
/// is passed through as a single message, unless it is blank.
fn parse_failure(body: &str) -> Vec<Diagnostic> {
    match serde_json::from_str::<CompileFailure>(body) {
        Ok(failure) => failure.diagnostics,
        Err(_) if body.trim().is_empty() => Vec::new(),
        Err(_) => vec![Diagnostic::Text(body.trim().to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_mixed_diagnostics() {
        let body = r#"{"diagnostics": ["error A", {"message": "error B", "span": null}]}"#;
        let diagnostics = parse_failure(body);
        let messages: Vec<&str> = diagnostics.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, vec!["error A", "error B"]);
    }

    #[test]
    fn test_parse_failure_without_diagnostics() {
        assert!(parse_failure("{}").is_empty());
        assert!(parse_failure("").is_empty());
    }

    #[test]
    fn test_parse_failure_plain_text_body() {
        assert_eq!(
            parse_failure("syntax error\n"),
            vec![Diagnostic::Text("syntax error".to_string())]
        );
    }

    #[test]
    fn test_compile_request_shape() {
        let mut files = BTreeMap::new();
        files.insert(MAIN_SOURCE.to_string(), "= Hi".to_string());
        let request = CompileRequest {
            main: MAIN_SOURCE,
            files: &files,
            format: OutputFormat::Svg,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "main": "/main.typ",
                "files": { "/main.typ": "= Hi" },
                "format": "svg"
            })
        );
    }

    #[tokio::test]
    async fn test_compile_before_init_is_rejected() {
        let mut engine = RemoteEngine::new("http://127.0.0.1:9/");
        assert_eq!(engine.base_url, "http://127.0.0.1:9");
        assert!(matches!(
            engine.compile(OutputFormat::Pdf).await,
            Err(EngineError::NotInitialized)
        ));
    }
}

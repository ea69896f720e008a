use std::sync::Arc;

use anyhow::{Context, anyhow};
use poem::{
    Body, IntoResponse, Response, handler,
    http::header,
    web::Data,
};
use serde_json::Value as JsonValue;

use crate::{AppState, error::GenerateError, schemas::generate::GenerateRequest};

pub const ATTACHMENT_NAME: &str = "emby-cover.png";

/// Generate
///
/// Render a cover PNG from a JSON body.
///
/// # Example Request
/// ```json
/// {
///   "embyUrl": "http://emby.local:8096",
///   "apiKey": "0123456789abcdef",
///   "timeRange": "7d",
///   "rule": "rating>8",
///   "font": "Arial"
/// }
/// ```
#[handler]
pub async fn generate(state: Data<&Arc<AppState>>, body: Body) -> Response {
    match generate_cover(state.0, body).await {
        Ok(png) => {
            tracing::info!("Render completed successfully, size: {} bytes", png.len());
            Response::builder()
                .header(header::CONTENT_TYPE, "image/png")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!(r#"attachment; filename="{ATTACHMENT_NAME}""#),
                )
                .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
                .body(png)
        }
        Err(e) => {
            match &e {
                GenerateError::Validation(msg) => tracing::warn!("Rejected request: {}", msg),
                GenerateError::Unexpected(err) => tracing::error!("Generate error: {:#}", err),
            }
            e.into_response()
        }
    }
}

async fn generate_cover(state: &AppState, body: Body) -> Result<Vec<u8>, GenerateError> {
    let bytes = body.into_vec().await.context("Failed to read request body")?;
    let params = parse_request(&bytes)?;

    if !params.has_required() {
        return Err(GenerateError::missing_params());
    }

    tracing::info!(
        "Rendering: time_range={:?}, rule={:?}, font={:?}",
        params.time_range(),
        params.rule(),
        params.font()
    );

    Ok(state.renderer.render(params).await?)
}

fn parse_request(bytes: &[u8]) -> anyhow::Result<GenerateRequest> {
    let value: JsonValue = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(anyhow!("Request body must be a JSON object"));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_body() {
        let req = parse_request(br#"{"embyUrl":"http://x","apiKey":"k","rule":"r"}"#).unwrap();
        assert!(req.has_required());
        assert_eq!(req.rule(), "r");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_request(b"{not json").is_err());
        assert!(parse_request(b"").is_err());
    }

    #[test]
    fn rejects_non_object_json() {
        let err = parse_request(b"[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "Request body must be a JSON object");
        assert!(parse_request(b"null").is_err());
    }
}

use futures_util::StreamExt;
use serde::de::DeserializeOwned;

use crate::{Result, YidunError};

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
const MAX_RESPONSE_BODY_BYTES: usize = 16 * 1024 * 1024;

pub(crate) async fn response_text_truncated(
    response: reqwest::Response,
    max_bytes: usize,
) -> String {
    let (bytes, truncated) = match response_bytes_truncated(response, max_bytes).await {
        Ok(read) => read,
        Err(_) => (Vec::new(), false),
    };
    let mut body = String::from_utf8_lossy(&bytes).to_string();
    if truncated {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("...(truncated)");
    }
    body
}

/// Reads at most `max_bytes` of the body; the flag is set when more was pending.
async fn response_bytes_truncated(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<(Vec<u8>, bool)> {
    let max_bytes = max_bytes.max(1);
    let mut out = Vec::<u8>::new();

    let mut stream = response.bytes_stream();
    while let Some(next) = stream.next().await {
        let chunk = next?;
        let remaining = max_bytes.saturating_sub(out.len());
        if chunk.len() > remaining {
            out.extend_from_slice(&chunk.as_ref()[..remaining]);
            return Ok((out, true));
        }
        out.extend_from_slice(chunk.as_ref());
    }
    Ok((out, false))
}

/// Sends the request and turns any non-2xx status into [`YidunError::Status`].
pub(crate) async fn send_checked(req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let response = req.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response_text_truncated(response, MAX_ERROR_BODY_BYTES).await;
        return Err(YidunError::Status { status, body });
    }
    Ok(response)
}

/// Like [`send_checked`], then decodes the body with serde_json so that a
/// malformed payload surfaces as [`YidunError::Decode`] rather than as a
/// transport error.
pub(crate) async fn send_checked_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
) -> Result<T> {
    send_checked_json_capped(req, MAX_RESPONSE_BODY_BYTES).await
}

async fn send_checked_json_capped<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
    max_bytes: usize,
) -> Result<T> {
    let response = send_checked(req).await?;
    let (bytes, truncated) = response_bytes_truncated(response, max_bytes).await?;
    if truncated {
        return Err(YidunError::Decode(serde::de::Error::custom(format!(
            "response exceeded max bytes ({max_bytes})"
        ))));
    }
    Ok(serde_json::from_slice::<T>(&bytes)?)
}

#[cfg(test)]
mod tests {
    use httpmock::{Method::POST, MockServer};

    use super::*;
    use crate::utils::test_support::should_skip_httpmock;

    #[tokio::test]
    async fn oversized_success_body_is_a_decode_failure() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/big");
                then.status(200)
                    .body(format!(r#"{{"code":200,"msg":"{}"}}"#, "x".repeat(4096)));
            })
            .await;

        let http = reqwest::Client::new();
        let err = send_checked_json_capped::<serde_json::Value>(
            http.post(server.url("/big")),
            1024,
        )
        .await
        .expect_err("body over cap");
        assert!(err.is_decode());
        assert!(err.to_string().contains("max bytes (1024)"));

        let ok = send_checked_json_capped::<serde_json::Value>(
            http.post(server.url("/big")),
            MAX_RESPONSE_BODY_BYTES,
        )
        .await?;
        assert_eq!(ok["code"], 200);
        Ok(())
    }

    #[tokio::test]
    async fn error_body_is_truncated() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/fail");
                then.status(503).body("y".repeat(MAX_ERROR_BODY_BYTES + 10));
            })
            .await;

        let err = send_checked(reqwest::Client::new().post(server.url("/fail")))
            .await
            .expect_err("503");
        match err {
            YidunError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.ends_with("...(truncated)"));
                assert!(body.len() < MAX_ERROR_BODY_BYTES + 20);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }
}

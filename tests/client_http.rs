use std::time::Duration;

use httpmock::{Method::POST, MockServer};
use serde_json::json;
use yidun_sdk::utils::test_support::should_skip_httpmock;
use yidun_sdk::{
    ClientConfig, Credentials, Endpoint, RequestParams, Result, SignatureMethod,
    SignedRequestClient, YidunError,
};

const QUERY: Endpoint = Endpoint::new("/v1/image/query/task", "v1");

fn client_for(base_url: &str, method: SignatureMethod) -> Result<SignedRequestClient> {
    let creds = Credentials::new("sid-1", "skey-1")?.with_business_id("bid-1");
    SignedRequestClient::new(
        ClientConfig::new(creds)
            .with_base_url(base_url)
            .with_connect_timeout(Duration::from_secs(2))
            .with_read_timeout(Duration::from_secs(2))
            .with_signature_method(method),
    )
}

#[tokio::test]
async fn posts_signed_form_and_decodes_success() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/image/query/task")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_includes("secretId=sid-1")
                .body_includes("businessId=bid-1")
                .body_includes("version=v1")
                .body_includes("taskIds=%5B%22t1%22%5D")
                .body_includes("timestamp=")
                .body_includes("nonce=")
                .body_includes("signature=");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"code":200,"msg":"ok","result":[]}"#);
        })
        .await;

    let client = client_for(&server.base_url(), SignatureMethod::Md5)?;
    let response = client
        .call(&QUERY, RequestParams::new().with("taskIds", vec!["t1"]))
        .await?;
    mock.assert_async().await;

    assert!(response.is_success());
    assert_eq!(response.msg, "ok");
    assert_eq!(response.result, Some(json!([])));
    Ok(())
}

#[tokio::test]
async fn sm3_requests_carry_signature_method() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/image/query/task")
                .body_includes("signatureMethod=SM3");
            then.status(200).body(r#"{"code":200,"msg":"ok"}"#);
        })
        .await;

    let client = client_for(&server.base_url(), SignatureMethod::Sm3)?;
    let response = client.call(&QUERY, RequestParams::new()).await?;
    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.result, None);
    Ok(())
}

#[tokio::test]
async fn application_error_is_a_response_not_an_error() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/image/query/task");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"code":431,"msg":"invalid signature"}"#);
        })
        .await;

    let client = client_for(&server.base_url(), SignatureMethod::Md5)?;
    let response = client.call(&QUERY, RequestParams::new()).await?;
    assert!(!response.is_success());
    assert_eq!(response.code, 431);
    assert_eq!(response.msg, "invalid signature");

    let err = response.into_result().expect_err("code 431");
    assert_eq!(err.code, 431);
    Ok(())
}

#[tokio::test]
async fn non_2xx_status_is_a_transport_failure() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/image/query/task");
            then.status(502).body("bad gateway");
        })
        .await;

    let client = client_for(&server.base_url(), SignatureMethod::Md5)?;
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("502");
    assert!(err.is_transport());
    match err {
        YidunError::Status { status, body } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/image/query/task");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let client = client_for(&server.base_url(), SignatureMethod::Md5)?;
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("html body");
    assert!(err.is_decode());
    assert!(!err.is_transport());
    Ok(())
}

#[tokio::test]
async fn slow_server_times_out() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/image/query/task");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(r#"{"code":200,"msg":"ok"}"#);
        })
        .await;

    let creds = Credentials::new("sid-1", "skey-1")?.with_business_id("bid-1");
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()?;
    let client = SignedRequestClient::with_http_client(
        ClientConfig::new(creds).with_base_url(server.base_url()),
        http,
    )?;
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("timeout");
    assert!(err.is_timeout());
    assert!(err.is_transport());
    Ok(())
}

#[tokio::test]
async fn configured_read_timeout_applies() -> Result<()> {
    if should_skip_httpmock() {
        return Ok(());
    }
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/image/query/task");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(r#"{"code":200,"msg":"ok"}"#);
        })
        .await;

    let creds = Credentials::new("sid-1", "skey-1")?.with_business_id("bid-1");
    let client = SignedRequestClient::new(
        ClientConfig::new(creds)
            .with_base_url(server.base_url())
            .with_read_timeout(Duration::from_millis(200)),
    )?;
    let started = std::time::Instant::now();
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("read timeout");
    assert!(err.is_timeout());
    assert!(err.is_transport());
    assert!(started.elapsed() < Duration::from_secs(3));
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() -> Result<()> {
    let client = client_for("http://127.0.0.1:1", SignatureMethod::Md5)?;
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("connection refused");
    assert!(err.is_transport());
    assert!(!err.is_decode());
    Ok(())
}

#[tokio::test]
async fn missing_business_id_never_hits_the_network() -> Result<()> {
    let client = SignedRequestClient::new(
        ClientConfig::new(Credentials::new("sid", "skey")?).with_base_url("http://127.0.0.1:1"),
    )?;
    let err = client
        .call(&QUERY, RequestParams::new())
        .await
        .expect_err("no business id");
    assert!(matches!(err, YidunError::InvalidConfig(_)));
    Ok(())
}

#![cfg(feature = "integration")]

use yidun_sdk::{ClientConfig, Env, Result, SignedRequestClient};

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Polls the image callback queue with real credentials. Any well-formed
/// envelope counts as a pass; the queue is usually empty.
#[cfg(feature = "image")]
#[tokio::test]
async fn image_callback_smoke() -> Result<()> {
    if env_nonempty("YIDUN_SECRET_ID").is_none() || env_nonempty("YIDUN_BUSINESS_ID").is_none() {
        return Ok(());
    }

    let client = SignedRequestClient::new(ClientConfig::from_env(&Env::default())?)?;
    let response = client.image_callback_results().await?;
    assert_ne!(response.code, 0);
    assert!(!response.msg.is_empty());
    Ok(())
}

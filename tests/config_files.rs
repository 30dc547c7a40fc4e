use std::time::Duration;

use yidun_sdk::{ClientConfig, Env, Result, SignatureMethod, YidunError};

#[tokio::test]
async fn loads_toml_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("yidun.toml");
    tokio::fs::write(
        &path,
        "[yidun]\nsecret_id = \"sid\"\nsecret_key = \"skey\"\nsignature_method = \"SM3\"\nconnect_timeout_ms = 250\n",
    )
    .await?;

    let config = ClientConfig::load_toml(&path).await?;
    assert_eq!(config.signature_method, SignatureMethod::Sm3);
    assert_eq!(config.connect_timeout, Duration::from_millis(250));
    assert_eq!(config.credentials.business_id(), None);
    Ok(())
}

#[tokio::test]
async fn dotenv_file_feeds_env_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(".env");
    tokio::fs::write(
        &path,
        "YIDUN_SECRET_ID=sid\nYIDUN_SECRET_KEY=skey\nYIDUN_BUSINESS_ID=bid\n",
    )
    .await?;

    let env = Env::load_dotenv(&path).await?;
    let config = ClientConfig::from_env(&env)?;
    assert_eq!(config.credentials.secret_id(), "sid");
    assert_eq!(config.credentials.business_id(), Some("bid"));
    Ok(())
}

#[tokio::test]
async fn missing_config_file_is_an_io_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let err = ClientConfig::load_toml(dir.path().join("absent.toml"))
        .await
        .expect_err("missing file");
    assert!(matches!(err, YidunError::Io(_)));
    Ok(())
}

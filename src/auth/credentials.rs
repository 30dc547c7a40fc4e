use crate::config::Env;
use crate::{Result, YidunError};

/// Operator-issued key pair plus the optional tenant identifier.
#[derive(Clone)]
pub struct Credentials {
    secret_id: String,
    secret_key: String,
    business_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field("business_id", &self.business_id)
            .finish()
    }
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let secret_id = secret_id.into();
        let secret_key = secret_key.into();

        if secret_id.trim().is_empty() {
            return Err(YidunError::InvalidConfig(
                "secret_id is required".to_string(),
            ));
        }
        if secret_key.trim().is_empty() {
            return Err(YidunError::InvalidConfig(
                "secret_key is required".to_string(),
            ));
        }

        Ok(Self {
            secret_id,
            secret_key,
            business_id: None,
        })
    }

    /// Blank ids are treated as absent.
    pub fn with_business_id(mut self, business_id: impl Into<String>) -> Self {
        let business_id = business_id.into();
        self.business_id = Some(business_id).filter(|id| !id.trim().is_empty());
        self
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn business_id(&self) -> Option<&str> {
        self.business_id.as_deref()
    }
}

pub const SECRET_ID_KEY: &str = "YIDUN_SECRET_ID";
pub const SECRET_KEY_KEY: &str = "YIDUN_SECRET_KEY";
pub const BUSINESS_ID_KEY: &str = "YIDUN_BUSINESS_ID";

pub fn resolve_credentials(env: &Env) -> Result<Credentials> {
    let secret_id = env.require(SECRET_ID_KEY, "secret_id")?;
    let secret_key = env.require(SECRET_KEY_KEY, "secret_key")?;

    let mut out = Credentials::new(secret_id, secret_key)?;
    if let Some(business_id) = env.get(BUSINESS_ID_KEY) {
        out = out.with_business_id(business_id);
    }
    Ok(out)
}

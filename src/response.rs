use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::Result;

pub const SUCCESS_CODE: i64 = 200;

/// Envelope shared by every endpoint: `{"code":..,"msg":..,"result":..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

/// A well-formed response whose `code` is not 200.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service returned code {code}: {msg}")]
pub struct ServiceError {
    pub code: i64,
    pub msg: String,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Splits the envelope into the payload or the service-side failure.
    pub fn into_result(self) -> std::result::Result<Option<T>, ServiceError> {
        if self.is_success() {
            Ok(self.result)
        } else {
            Err(ServiceError {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

impl<T: Default> ApiResponse<T> {
    /// Payload of a successful call, with an absent `result` read as empty.
    pub fn into_result_or_default(self) -> std::result::Result<T, ServiceError> {
        self.into_result().map(Option::unwrap_or_default)
    }
}

impl ApiResponse<serde_json::Value> {
    /// Decodes `result` into `T` for successful responses.
    ///
    /// Failed responses keep `code` and `msg` but drop the payload, since its
    /// shape is not defined for errors.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        let result = match self.result {
            Some(value) if self.code == SUCCESS_CODE && !value.is_null() => {
                Some(serde_json::from_value::<T>(value)?)
            }
            _ => None,
        };
        Ok(ApiResponse {
            code: self.code,
            msg: self.msg,
            result,
        })
    }
}

/// Reads an explicit `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod auth;
pub mod client;
pub mod config;
mod error;
pub mod params;
pub mod response;
pub mod utils;

#[cfg(feature = "audio")]
pub mod audio;
#[cfg(feature = "crawler")]
pub mod crawler;
#[cfg(feature = "image")]
pub mod image;
#[cfg(feature = "list")]
pub mod list;
#[cfg(feature = "solution")]
pub mod solution;
#[cfg(feature = "video")]
pub mod video;

pub use auth::{Credentials, SignatureMethod, canonical_string, resolve_credentials, sign};
pub use client::{Endpoint, NONCE_BOUND, SignedRequest, SignedRequestClient};
pub use config::{ClientConfig, Env, parse_dotenv};
pub use error::{Result, YidunError};
pub use params::{ParamValue, RequestParams};
pub use response::{ApiResponse, SUCCESS_CODE, ServiceError};

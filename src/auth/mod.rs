//! Credentials and request signing.

pub mod credentials;
pub mod signature;

pub use credentials::{Credentials, resolve_credentials};
pub use signature::{SignatureMethod, canonical_string, sign};

//! Boundary to the external vision model.

pub mod client;
pub mod prompts;
pub mod provider;
pub mod response;

pub use client::{OracleClient, OracleConfig};
pub use provider::{Provider, ProviderConfig, ProviderError};
pub use response::{OracleResponse, StructuredResponse};

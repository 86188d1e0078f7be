//! Core library for the `solar` CLI.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The NREL solar resource client behind an HTTP transport seam
//! - The query form controller and its error taxonomy
//!
//! It is used by `solar-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::QueryError;
pub use form::{Rendered, SolarForm};
pub use model::{Revision, SolarQuery, SolarResult};
pub use provider::{HttpReply, HttpTransport, ReqwestTransport, nrel::NrelClient};

/// Client for the configured endpoint over a real HTTP transport.
pub fn client_from_config(config: &Config) -> NrelClient {
    NrelClient::new(config.base_url(), Box::new(ReqwestTransport::new()))
}

/// Builds the form for `revision`, pulling the API key from configuration
/// when the revision does not ask the user for one.
pub fn form_from_config(revision: Revision, config: &Config) -> anyhow::Result<SolarForm> {
    let client = client_from_config(config);

    if revision.collects_credential() {
        Ok(SolarForm::new(revision, client))
    } else {
        let api_key = config.resolve_api_key()?;
        Ok(SolarForm::with_configured_credential(revision, client, api_key))
    }
}

//! # Skytime environment state
//!
//! [`SkytimeEnv`] holds the resources shared by the network-facing parts of the crate:
//! currently a single [`ureq::Agent`], reused for every catalog lookup so that connections
//! are pooled.
//!
//! The agent uses a global timeout of ten seconds; a lookup that stalls fails with
//! [`SkytimeError::UreqHttpError`] instead of blocking the caller indefinitely.

use std::convert::TryFrom;
use std::{fmt::Debug, time::Duration};
use ureq::{
    http::{self, Uri},
    Agent,
};

use crate::skytime_errors::SkytimeError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared environment of a [`Skytime`](crate::skytime::Skytime) handle.
#[derive(Debug, Clone)]
pub struct SkytimeEnv {
    pub http_client: Agent,
}

impl Default for SkytimeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SkytimeEnv {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build();
        let agent: Agent = config.into();

        SkytimeEnv { http_client: agent }
    }

    /// Blocking GET, returning the body as text.
    pub(crate) fn get_from_url<U>(&self, url: U) -> Result<String, SkytimeError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let body = self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }
}

//! Entry point that owns the endpoint, token and transport.
//!
//! # Design
//! `Client` holds no mutable state after construction. Every service call is
//! `build_request` → `Transport::execute` → `parse_response`, one blocking
//! round-trip each. The services are cheap borrowed views over the client, so
//! `client.topics().list()` allocates nothing beyond the call itself.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::graphql;
use crate::services::{OrganizationService, PostService, TopicService, UserService};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the Slab GraphQL API.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    endpoint: String,
    token: String,
    transport: T,
}

impl Client<UreqTransport> {
    /// Build a client using a `ureq` agent configured from `config`.
    pub fn new(config: Config) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    /// Build a client from `SLAB_TOKEN`, `SLAB_ENDPOINT` and `SLAB_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Config::from_env().map(Self::new)
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over a caller-supplied transport. `config.timeout` is
    /// ignored; the transport owns its own timeouts.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            endpoint: config.endpoint,
            token: config.token,
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn organization(&self) -> OrganizationService<'_, T> {
        OrganizationService::new(self)
    }

    pub fn posts(&self) -> PostService<'_, T> {
        PostService::new(self)
    }

    pub fn topics(&self) -> TopicService<'_, T> {
        TopicService::new(self)
    }

    pub fn users(&self) -> UserService<'_, T> {
        UserService::new(self)
    }

    /// Run one GraphQL operation and decode its `data` into `R`.
    pub fn execute<V, R>(&self, query: &str, variables: &V) -> Result<R, ApiError>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        let request = graphql::build_request(&self.endpoint, &self.token, query, variables)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            body_len = request.body.len(),
            "executing graphql operation"
        );
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "graphql response received");
        graphql::parse_response(response)
    }
}

//! Synchronous client for the Slab GraphQL API.
//!
//! # Overview
//! `Client` sends static GraphQL queries with typed variables over HTTP and
//! decodes the responses into organizations, posts, topics and users. On top
//! of the topic service, `TopicService::auto_generate` resolves a path such
//! as `"Engineering/Services/App 1"` to a topic id, creating missing levels.
//!
//! # Design
//! - Requests and responses cross the `Transport` seam as plain data
//!   (`HttpRequest` / `HttpResponse`), so tests script replies without a
//!   socket. `UreqTransport` is the blocking production transport.
//! - The client is immutable after construction; share it freely across
//!   threads.
//! - Timestamps accept both epoch seconds and RFC3339 strings.
//! - Nothing is retried, cached or logged above `debug`.

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod hierarchy;
pub mod http;
pub mod input;
pub mod services;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{Config, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use graphql::GraphqlError;
pub use hierarchy::{HierarchyPath, TopicIndex};
pub use http::{HttpRequest, HttpResponse};
pub use input::{CreateTopic, DeletePost, PostFormat, SyncPost, UpdatePost};
pub use services::{OrganizationService, PostService, TopicService, UserService};
pub use timestamp::Timestamp;
pub use transport::{Transport, UreqTransport};
pub use types::{Avatar, Organization, Post, Topic, TopicRef, User};

//! One service per entity, each a borrowed view over `Client`.
//!
//! Services bind static query templates to typed variable sets. List
//! operations keep server order and are single-shot; the API exposes no
//! cursor for these queries.

mod organization;
mod post;
mod topic;
mod user;

pub use organization::OrganizationService;
pub use post::PostService;
pub use topic::TopicService;
pub use user::UserService;

use serde::Deserialize;

/// `{"organization": {...}}` wrapper shared by the list queries.
#[derive(Debug, Deserialize)]
struct OrganizationData<T> {
    organization: T,
}

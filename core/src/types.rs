//! Domain DTOs decoded from Slab API responses.
//!
//! # Design
//! Fields the server may omit are `Option`s: `None` means "not returned",
//! which is different from an empty string or an empty list. Topic relations
//! are identifier references (`TopicRef`), never nested owned topics; the tree
//! is rebuilt by lookup against a flat list (see `hierarchy`).

use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::Timestamp;

/// The workspace the API token belongs to.
///
/// Nested posts, topics and users are shallow: only the fields the
/// organization query selects are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub host: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub inserted_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Rich-document JSON encoded as a string. Only populated by targeted
    /// fetches and mutations, never by `list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<Timestamp>,
    /// `None` until the post is published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// A node in the single-parent topic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
    /// Dot-joined identifier paths, e.g. `"efg234.abc123"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<TopicRef>,
    /// Kept in server order, nearest ancestor first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<TopicRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TopicRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Topic {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.id.as_str())
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Identifier reference to another topic. `name` is only present where the
/// query selects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A member of the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Role tag, e.g. `"user"` or `"admin"`.
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<Timestamp>,
}

impl User {
    pub fn is_deactivated(&self) -> bool {
        self.deactivated_at.is_some()
    }
}

/// Avatar image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub original: Option<String>,
    pub thumb: Option<String>,
}

/// Treat a JSON `null` as an empty string for plain text fields.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

//! Typed variable sets for the GraphQL mutations and queries.
//!
//! Each struct serializes to exactly the `variables` object its operation
//! expects. Optional arguments that are `None` or empty are left out so the
//! server applies its own defaults.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Content format accepted by `syncPost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostFormat {
    Html,
    Markdown,
}

/// Upsert of an externally managed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPost {
    pub external_id: String,
    pub content: String,
    pub edit_url: String,
    /// The server falls back to `edit_url` when omitted.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub read_url: Option<String>,
    pub format: PostFormat,
}

/// Edit of an existing post's content or publication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePost {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Identifies the post to delete. When both identifiers are set, `id` wins
/// and `external_id` is not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl DeletePost {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            external_id: None,
        }
    }

    pub fn by_external_id(external_id: impl Into<String>) -> Self {
        Self {
            id: None,
            external_id: Some(external_id.into()),
        }
    }

    /// The variables actually sent, after applying id precedence.
    pub fn variables(&self) -> Result<DeletePost, ApiError> {
        if let Some(id) = non_blank(&self.id) {
            return Ok(Self::by_id(id));
        }
        if let Some(external_id) = non_blank(&self.external_id) {
            return Ok(Self::by_external_id(external_id));
        }
        Err(ApiError::InvalidArgument(
            "deleting a post needs an id or an external id".to_string(),
        ))
    }
}

/// A new topic. An absent or empty `parent_id` creates a top-level topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopic {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub parent_id: Option<String>,
}

impl CreateTopic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parent_id: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ById<'a> {
    pub id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePostVariables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostTopicVariables<'a> {
    pub post_id: &'a str,
    pub topic_id: &'a str,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delete_prefers_id_over_external_id() {
        let input = DeletePost {
            id: Some("abc123".to_string()),
            external_id: Some("ext-1".to_string()),
        };
        let vars = serde_json::to_value(input.variables().unwrap()).unwrap();
        assert_eq!(vars, json!({"id": "abc123"}));
    }

    #[test]
    fn delete_by_external_id() {
        let vars = serde_json::to_value(DeletePost::by_external_id("ext-1").variables().unwrap())
            .unwrap();
        assert_eq!(vars, json!({"externalId": "ext-1"}));
    }

    #[test]
    fn delete_treats_empty_strings_as_absent() {
        let input = DeletePost {
            id: Some(String::new()),
            external_id: Some("ext-1".to_string()),
        };
        assert_eq!(input.variables().unwrap(), DeletePost::by_external_id("ext-1"));
    }

    #[test]
    fn delete_without_identifier_is_rejected() {
        let err = DeletePost::default().variables().unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn sync_post_omits_missing_read_url() {
        let input = SyncPost {
            external_id: "readme".to_string(),
            content: "# Title".to_string(),
            edit_url: "https://example.com/edit".to_string(),
            read_url: None,
            format: PostFormat::Markdown,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "externalId": "readme",
                "content": "# Title",
                "editUrl": "https://example.com/edit",
                "format": "MARKDOWN"
            })
        );
    }

    #[test]
    fn post_format_wire_names() {
        assert_eq!(serde_json::to_value(PostFormat::Html).unwrap(), json!("HTML"));
        assert_eq!(serde_json::to_value(PostFormat::Markdown).unwrap(), json!("MARKDOWN"));
    }

    #[test]
    fn create_topic_top_level_omits_parent() {
        let vars = serde_json::to_value(CreateTopic::new("Engineering")).unwrap();
        assert_eq!(vars, json!({"name": "Engineering", "description": ""}));

        let vars = serde_json::to_value(CreateTopic::new("Engineering").parent("")).unwrap();
        assert_eq!(vars, json!({"name": "Engineering", "description": ""}));
    }

    #[test]
    fn create_topic_with_parent() {
        let input = CreateTopic::new("Services").description("Backends").parent("bcd234");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "Services", "description": "Backends", "parentId": "bcd234"})
        );
    }
}

//! Post queries and mutations, including the `syncPost` upsert.

use serde::Deserialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::graphql::NoVariables;
use crate::input::{ById, CreatePostVariables, DeletePost, SyncPost, UpdatePost};
use crate::services::{OrganizationData, TopicService};
use crate::transport::Transport;
use crate::types::Post;

/// Content is deliberately not selected; the server only returns it for
/// targeted fetches.
pub(crate) const LIST_POSTS: &str = "query {
  organization {
    posts { id title version insertedAt publishedAt updatedAt }
  }
}";

pub(crate) const GET_POST: &str = "query ($id: ID!) {
  post(id: $id) { id title version content insertedAt publishedAt updatedAt }
}";

pub(crate) const CREATE_POST: &str = "mutation ($topicId: ID) {
  createPost(topicId: $topicId) { id }
}";

/// Upstream currently rejects this mutation; the error surfaces as-is.
pub(crate) const UPDATE_POST: &str = "mutation ($id: ID!, $content: Json, $published: Boolean) {
  updatePost(id: $id, content: $content, published: $published) {
    id title version content insertedAt publishedAt updatedAt
  }
}";

pub(crate) const DELETE_POST: &str = "mutation ($id: ID, $externalId: ID) {
  deletePost(id: $id, externalId: $externalId) { id }
}";

pub(crate) const SYNC_POST: &str = "mutation ($content: String!, $editUrl: String!, $externalId: ID!, $format: PostContentFormat!, $readUrl: String) {
  syncPost(content: $content, editUrl: $editUrl, externalId: $externalId, format: $format, readUrl: $readUrl) {
    id title version content insertedAt publishedAt updatedAt
  }
}";

#[derive(Debug, Deserialize)]
struct PostsField {
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct PostData {
    post: Option<Post>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostData {
    create_post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePostData {
    update_post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletePostData {
    delete_post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncPostData {
    sync_post: Post,
}

/// Post queries and mutations.
pub struct PostService<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> PostService<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// All posts in server order, without content.
    pub fn list(&self) -> Result<Vec<Post>, ApiError> {
        let data: OrganizationData<PostsField> =
            self.client.execute(LIST_POSTS, &NoVariables {})?;
        Ok(data.organization.posts)
    }

    /// One post including its content.
    pub fn get(&self, id: &str) -> Result<Post, ApiError> {
        let data: PostData = self.client.execute(GET_POST, &ById { id })?;
        data.post.ok_or(ApiError::NotFound)
    }

    /// Create a blank, unpublished post, optionally filed under a topic.
    /// Only the new post's `id` is populated.
    pub fn create(&self, topic_id: Option<&str>) -> Result<Post, ApiError> {
        let vars = CreatePostVariables {
            topic_id: topic_id.filter(|t| !t.is_empty()),
        };
        let data: CreatePostData = self.client.execute(CREATE_POST, &vars)?;
        Ok(data.create_post)
    }

    pub fn update(&self, input: &UpdatePost) -> Result<Post, ApiError> {
        let data: UpdatePostData = self.client.execute(UPDATE_POST, input)?;
        Ok(data.update_post)
    }

    /// Delete by `id` or, failing that, by `external_id`. Only the deleted
    /// post's `id` is populated.
    pub fn delete(&self, input: &DeletePost) -> Result<Post, ApiError> {
        let vars = input.variables()?;
        let data: DeletePostData = self.client.execute(DELETE_POST, &vars)?;
        Ok(data.delete_post)
    }

    /// Create or update the post identified by `input.external_id`.
    pub fn sync(&self, input: &SyncPost) -> Result<Post, ApiError> {
        let data: SyncPostData = self.client.execute(SYNC_POST, input)?;
        Ok(data.sync_post)
    }

    pub fn add_topic(&self, post_id: &str, topic_id: &str) -> Result<(), ApiError> {
        TopicService::new(self.client).add_to_post(topic_id, post_id)?;
        Ok(())
    }

    pub fn remove_topic(&self, post_id: &str, topic_id: &str) -> Result<(), ApiError> {
        TopicService::new(self.client).remove_from_post(topic_id, post_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ApiError;
    use crate::input::{DeletePost, PostFormat, SyncPost, UpdatePost};
    use crate::services::testing;

    const RICH_CONTENT: &str = r#"[{\"insert\":\"slab-go\"},{\"attributes\":{\"header\":1},\"insert\":\"\\n\"}]"#;

    #[test]
    fn list_decodes_posts_without_content() {
        let client = testing::client(&[r#"{"data":{"organization":{"posts":[
            {"id": "postid1", "title": "Post 1", "insertedAt":"2019-05-01T22:44:33.078957Z", "updatedAt":"2019-06-18T22:40:16.733422Z", "publishedAt":"2019-06-18T22:40:15.733422Z","version": 0},
            {"id": "postid2", "title": "Post 2", "insertedAt":1556750673, "updatedAt":1560897616, "publishedAt":null,"version": 3}
        ]}}}"#]);
        let posts = client.posts().list().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "postid1");
        assert!(posts[0].is_published());
        assert!(!posts[1].is_published());
        assert_eq!(posts[1].version, Some(3));
        assert!(posts.iter().all(|p| p.content.is_none()));
        assert!(!client.transport().body(0)["query"]
            .as_str()
            .unwrap()
            .contains("content"));
    }

    #[test]
    fn get_includes_content() {
        let body = format!(
            r#"{{"data":{{"post":{{"id":"abc123","title":"slab-go","version":0,"content":"{RICH_CONTENT}"}}}}}}"#
        );
        let client = testing::client(&[body.as_str()]);
        let post = client.posts().get("abc123").unwrap();
        let content: serde_json::Value = serde_json::from_str(post.content.as_deref().unwrap()).unwrap();
        assert_eq!(content[0]["insert"], "slab-go");
        assert_eq!(client.transport().body(0)["variables"], json!({"id": "abc123"}));
    }

    #[test]
    fn get_missing_post_is_not_found() {
        let client = testing::client(&[r#"{"data":{"post":null}}"#]);
        assert!(matches!(client.posts().get("gone"), Err(ApiError::NotFound)));
    }

    #[test]
    fn create_with_and_without_topic() {
        let client = testing::client(&[
            r#"{"data":{"createPost":{"id":"abc123"}}}"#,
            r#"{"data":{"createPost":{"id":"def456"}}}"#,
        ]);
        assert_eq!(client.posts().create(None).unwrap().id, "abc123");
        assert_eq!(client.posts().create(Some("topic1")).unwrap().id, "def456");
        assert_eq!(client.transport().body(0)["variables"], json!({}));
        assert_eq!(client.transport().body(1)["variables"], json!({"topicId": "topic1"}));
    }

    #[test]
    fn delete_sends_only_the_id_when_both_given() {
        let client = testing::client(&[r#"{"data":{"deletePost":{"id":"abc123"}}}"#]);
        let input = DeletePost {
            id: Some("abc123".to_string()),
            external_id: Some("readme".to_string()),
        };
        assert_eq!(client.posts().delete(&input).unwrap().id, "abc123");
        assert_eq!(client.transport().body(0)["variables"], json!({"id": "abc123"}));
    }

    #[test]
    fn delete_without_identifier_makes_no_request() {
        let client = testing::client(&[]);
        let err = client.posts().delete(&DeletePost::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn sync_sends_typed_variables() {
        let client = testing::client(&[r#"{"data":{"syncPost":{
            "id":"abc123",
            "title":"slab-go",
            "insertedAt":"2019-05-01T22:44:33.078957Z",
            "updatedAt":"2019-06-18T22:40:16.733422Z",
            "publishedAt":"2019-06-18T22:40:15.733422Z",
            "version":0,
            "content":"[]"
        }}}"#]);
        let input = SyncPost {
            external_id: "slabgoREADME".to_string(),
            content: "# slab-go".to_string(),
            edit_url: "https://github.com/VEVO/slab-go/blob/master/README.md".to_string(),
            read_url: None,
            format: PostFormat::Markdown,
        };
        let post = client.posts().sync(&input).unwrap();
        assert_eq!(post.title, "slab-go");
        assert_eq!(post.version, Some(0));
        assert_eq!(
            client.transport().body(0)["variables"],
            json!({
                "externalId": "slabgoREADME",
                "content": "# slab-go",
                "editUrl": "https://github.com/VEVO/slab-go/blob/master/README.md",
                "format": "MARKDOWN"
            })
        );
    }

    #[test]
    fn update_surfaces_upstream_rejection() {
        let client = testing::client(&[
            r#"{"data":{"updatePost":null},"errors":[{"message":"updatePost is disabled","path":["updatePost"]}]}"#,
        ]);
        let input = UpdatePost {
            id: "abc123".to_string(),
            content: None,
            published: Some(true),
        };
        let err = client.posts().update(&input).unwrap_err();
        assert!(matches!(err, ApiError::GraphqlErrors(ref e) if e[0].message == "updatePost is disabled"));
        assert_eq!(
            client.transport().body(0)["variables"],
            json!({"id": "abc123", "published": true})
        );
    }

    #[test]
    fn add_topic_delegates_to_topic_mutation() {
        let client = testing::client(&[
            r#"{"data":{"addTopicToPost":{"name":"foo","id":"abc123","description":"bar"}}}"#,
            r#"{"data":{"removeTopicFromPost":{"name":"foo","id":"abc123","description":"bar"}}}"#,
        ]);
        client.posts().add_topic("dummypostid", "abc123").unwrap();
        client.posts().remove_topic("dummypostid", "abc123").unwrap();
        let expected = json!({"postId": "dummypostid", "topicId": "abc123"});
        assert_eq!(client.transport().body(0)["variables"], expected);
        assert_eq!(client.transport().body(1)["variables"], expected);
    }
}

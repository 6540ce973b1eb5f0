//! Topic queries, post membership mutations and `auto_generate`, which
//! resolves a separator-delimited path to a topic id.

use serde::Deserialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::graphql::NoVariables;
use crate::hierarchy::HierarchyPath;
use crate::input::{ById, CreateTopic, PostTopicVariables};
use crate::services::OrganizationData;
use crate::transport::Transport;
use crate::types::Topic;

/// Every topic with identifier-only relations; the input of `auto_generate`.
pub(crate) const LIST_TOPICS: &str = "query {
  organization {
    topics {
      id
      name
      description
      hierarchy
      parent { id }
      ancestors { id }
      children { id }
      posts { id title }
      insertedAt
      updatedAt
    }
  }
}";

pub(crate) const GET_TOPIC: &str = "query ($id: ID!) {
  topic(id: $id) {
    id
    name
    description
    hierarchy
    parent { id name }
    ancestors { id name }
    children { id name }
    posts { id title }
    insertedAt
    updatedAt
  }
}";

pub(crate) const CREATE_TOPIC: &str = "mutation ($name: String!, $description: String, $parentId: ID) {
  createTopic(name: $name, description: $description, parentId: $parentId) {
    id
    name
    description
  }
}";

pub(crate) const ADD_TOPIC_TO_POST: &str = "mutation ($postId: ID!, $topicId: ID!) {
  addTopicToPost(postId: $postId, topicId: $topicId) {
    id
    name
    description
  }
}";

pub(crate) const REMOVE_TOPIC_FROM_POST: &str = "mutation ($postId: ID!, $topicId: ID!) {
  removeTopicFromPost(postId: $postId, topicId: $topicId) {
    id
    name
    description
  }
}";

#[derive(Debug, Deserialize)]
struct TopicsField {
    topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
struct TopicData {
    topic: Option<Topic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTopicData {
    create_topic: Topic,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTopicData {
    add_topic_to_post: Topic,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveTopicData {
    remove_topic_from_post: Topic,
}

/// Topic queries, mutations and path resolution.
pub struct TopicService<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> TopicService<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// All topics of the organization in server order.
    pub fn list(&self) -> Result<Vec<Topic>, ApiError> {
        let data: OrganizationData<TopicsField> =
            self.client.execute(LIST_TOPICS, &NoVariables {})?;
        Ok(data.organization.topics)
    }

    pub fn get(&self, id: &str) -> Result<Topic, ApiError> {
        let data: TopicData = self.client.execute(GET_TOPIC, &ById { id })?;
        data.topic.ok_or(ApiError::NotFound)
    }

    /// Returns the created topic's `id`, `name` and `description`.
    pub fn create(&self, input: &CreateTopic) -> Result<Topic, ApiError> {
        let data: CreateTopicData = self.client.execute(CREATE_TOPIC, input)?;
        Ok(data.create_topic)
    }

    /// Attach a post; returns the topic's `id`, `name` and `description`.
    pub fn add_to_post(&self, topic_id: &str, post_id: &str) -> Result<Topic, ApiError> {
        let vars = PostTopicVariables { post_id, topic_id };
        let data: AddTopicData = self.client.execute(ADD_TOPIC_TO_POST, &vars)?;
        Ok(data.add_topic_to_post)
    }

    /// Detach a post; returns the topic's `id`, `name` and `description`.
    pub fn remove_from_post(&self, topic_id: &str, post_id: &str) -> Result<Topic, ApiError> {
        let vars = PostTopicVariables { post_id, topic_id };
        let data: RemoveTopicData = self.client.execute(REMOVE_TOPIC_FROM_POST, &vars)?;
        Ok(data.remove_topic_from_post)
    }

    /// Return the identifier of the topic at `path`, creating missing levels.
    ///
    /// The path is validated before any request. One `list` round-trip is
    /// made, then one `create` per missing level, sequentially. Topics created
    /// before a failure are left in place.
    pub fn auto_generate(&self, path: &str, separator: &str) -> Result<String, ApiError> {
        let path = HierarchyPath::parse(path, separator)?;
        let topics = self.list()?;
        path.resolve(&topics, |name, parent| {
            tracing::debug!(topic = name, parent = ?parent, "creating missing topic");
            let mut input = CreateTopic::new(name);
            input.parent_id = parent.map(str::to_string);
            self.create(&input)
        })
    }
}

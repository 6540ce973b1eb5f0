//! In-memory stand-in for the Slab GraphQL endpoint.
//!
//! Serves `POST /v1/graphql` for the operations the client issues. The root
//! field of the query picks the handler and the `variables` object supplies
//! the arguments; selection sets are not interpreted, every handler returns
//! its full object. `insertedAt` is emitted as epoch seconds and the other
//! timestamps as RFC3339 strings so both wire formats get exercised.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const GRAPHQL_PATH: &str = "/v1/graphql";

#[derive(Clone, Debug)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub version: i64,
    pub external_id: Option<String>,
    pub topic_ids: Vec<String>,
    pub inserted_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parent_id: Option<String>,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub kind: String,
    pub inserted_at: DateTime<Utc>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Everything the server knows. Vectors keep insertion order, which is the
/// order list queries return.
#[derive(Debug)]
pub struct Store {
    pub organization_id: String,
    pub host: String,
    pub name: String,
    pub inserted_at: DateTime<Utc>,
    pub posts: Vec<Post>,
    pub topics: Vec<Topic>,
    pub users: Vec<User>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            organization_id: new_id(),
            host: "acme.slab.com".to_string(),
            name: "Acme".to_string(),
            inserted_at: Utc::now(),
            posts: Vec::new(),
            topics: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl Store {
    /// Seed a published post whose title is the first line of `content`.
    pub fn add_post(&mut self, content: &str) -> Post {
        let now = Utc::now();
        let post = Post {
            id: new_id(),
            title: title_of(content),
            content: Some(content.to_string()),
            version: 0,
            external_id: None,
            topic_ids: Vec::new(),
            inserted_at: now,
            published_at: Some(now),
            updated_at: now,
        };
        self.posts.push(post.clone());
        post
    }

    pub fn add_user(&mut self, name: &str, email: &str) -> User {
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            title: String::new(),
            kind: "user".to_string(),
            inserted_at: Utc::now(),
            deactivated_at: None,
        };
        self.users.push(user.clone());
        user
    }

    pub fn add_topic(&mut self, name: &str, description: &str, parent_id: Option<&str>) -> Topic {
        let now = Utc::now();
        let topic = Topic {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            parent_id: parent_id.map(str::to_string),
            inserted_at: now,
            updated_at: now,
        };
        self.topics.push(topic.clone());
        topic
    }

    fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// Ancestors of `topic`, nearest first.
    fn ancestors(&self, topic: &Topic) -> Vec<&Topic> {
        let mut chain = Vec::new();
        let mut next = topic.parent_id.as_deref();
        while let Some(id) = next {
            match self.topic(id) {
                Some(parent) => {
                    chain.push(parent);
                    next = parent.parent_id.as_deref();
                }
                None => break,
            }
        }
        chain
    }

    fn topic_json(&self, topic: &Topic) -> Value {
        let ancestors = self.ancestors(topic);
        let mut path: Vec<&str> = ancestors.iter().rev().map(|t| t.id.as_str()).collect();
        path.push(&topic.id);
        let children: Vec<Value> = self
            .topics
            .iter()
            .filter(|t| t.parent_id.as_deref() == Some(topic.id.as_str()))
            .map(|t| json!({"id": t.id, "name": t.name}))
            .collect();
        let posts: Vec<Value> = self
            .posts
            .iter()
            .filter(|p| p.topic_ids.contains(&topic.id))
            .map(|p| json!({"id": p.id, "title": p.title}))
            .collect();
        json!({
            "id": topic.id,
            "name": topic.name,
            "description": topic.description,
            "hierarchy": [path.join(".")],
            "parent": topic.parent_id.as_deref().and_then(|id| self.topic(id)).map(|p| json!({"id": p.id, "name": p.name})),
            "ancestors": ancestors.iter().map(|a| json!({"id": a.id, "name": a.name})).collect::<Vec<_>>(),
            "children": children,
            "posts": posts,
            "insertedAt": topic.inserted_at.timestamp(),
            "updatedAt": rfc3339(&topic.updated_at),
        })
    }

    fn organization_json(&self) -> Value {
        json!({
            "id": self.organization_id,
            "host": self.host,
            "name": self.name,
            "posts": self.posts.iter().map(|p| post_json(p, false)).collect::<Vec<_>>(),
            "topics": self.topics.iter().map(|t| self.topic_json(t)).collect::<Vec<_>>(),
            "users": self.users.iter().map(user_json).collect::<Vec<_>>(),
            "insertedAt": self.inserted_at.timestamp(),
            "updatedAt": rfc3339(&self.inserted_at),
        })
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route(GRAPHQL_PATH, post(graphql))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_store(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

async fn graphql(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(request): Json<GraphqlRequest>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing authorization token").into_response();
    }

    let vars = request.variables.unwrap_or_default();
    let Some(field) = root_field(&request.query) else {
        return errors(None, "could not find a root field in the query");
    };

    tracing::debug!(field, "graphql request");
    let result = match field {
        "organization" => Ok(db.read().await.organization_json()),
        "post" => get_post(&db, &vars).await,
        "createPost" => create_post(&db, &vars).await,
        "updatePost" => update_post(&db, &vars).await,
        "deletePost" => delete_post(&db, &vars).await,
        "syncPost" => sync_post(&db, &vars).await,
        "topic" => get_topic(&db, &vars).await,
        "createTopic" => create_topic(&db, &vars).await,
        "addTopicToPost" => set_post_topic(&db, &vars, true).await,
        "removeTopicFromPost" => set_post_topic(&db, &vars, false).await,
        "user" => get_user(&db, &vars).await,
        other => Err(format!("unknown field {other}")),
    };

    match result {
        Ok(value) => Json(json!({"data": {field: value}})).into_response(),
        Err(message) => {
            tracing::info!(field, %message, "graphql error");
            errors(Some(field), &message)
        }
    }
}

fn errors(field: Option<&str>, message: &str) -> Response {
    let data = field.map(|f| json!({f: null}));
    let path: Vec<&str> = field.into_iter().collect();
    Json(json!({"data": data, "errors": [{"message": message, "path": path}]})).into_response()
}

/// First field name inside the outermost selection set.
pub fn root_field(query: &str) -> Option<&str> {
    let start = query.find('{')? + 1;
    let rest = query[start..].trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let field = &rest[..end];
    (!field.is_empty()).then_some(field)
}

fn var<'a>(vars: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    vars.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn required<'a>(vars: &'a Map<String, Value>, name: &str) -> Result<&'a str, String> {
    var(vars, name).ok_or_else(|| format!("argument {name} is required"))
}

async fn get_post(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let id = required(vars, "id")?;
    let store = db.read().await;
    Ok(store
        .posts
        .iter()
        .find(|p| p.id == id)
        .map_or(Value::Null, |p| post_json(p, true)))
}

async fn create_post(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let mut store = db.write().await;
    let topic_ids = match var(vars, "topicId") {
        Some(topic_id) if store.topic(topic_id).is_none() => {
            return Err(format!("topic {topic_id} not found"))
        }
        Some(topic_id) => vec![topic_id.to_string()],
        None => Vec::new(),
    };
    let now = Utc::now();
    let post = Post {
        id: new_id(),
        title: String::new(),
        content: None,
        version: 0,
        external_id: None,
        topic_ids,
        inserted_at: now,
        published_at: None,
        updated_at: now,
    };
    store.posts.push(post.clone());
    Ok(json!({"id": post.id}))
}

async fn update_post(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let id = required(vars, "id")?;
    let mut store = db.write().await;
    let post = store
        .post_mut(id)
        .ok_or_else(|| format!("post {id} not found"))?;
    if let Some(content) = var(vars, "content") {
        post.title = title_of(content);
        post.content = Some(content.to_string());
    }
    match vars.get("published").and_then(Value::as_bool) {
        Some(true) if post.published_at.is_none() => post.published_at = Some(Utc::now()),
        Some(false) => post.published_at = None,
        _ => {}
    }
    post.version += 1;
    post.updated_at = Utc::now();
    Ok(post_json(post, true))
}

async fn delete_post(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let mut store = db.write().await;
    let position = match (var(vars, "id"), var(vars, "externalId")) {
        (Some(id), _) => store.posts.iter().position(|p| p.id == id),
        (None, Some(external_id)) => store
            .posts
            .iter()
            .position(|p| p.external_id.as_deref() == Some(external_id)),
        (None, None) => return Err("id or externalId is required".to_string()),
    };
    let post = position
        .map(|i| store.posts.remove(i))
        .ok_or_else(|| "post not found".to_string())?;
    Ok(json!({"id": post.id}))
}

async fn sync_post(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let external_id = required(vars, "externalId")?;
    let content = required(vars, "content")?;
    required(vars, "editUrl")?;
    match var(vars, "format") {
        Some("HTML") | Some("MARKDOWN") => {}
        other => return Err(format!("invalid format {other:?}")),
    }

    let mut store = db.write().await;
    let now = Utc::now();
    let existing = store
        .posts
        .iter_mut()
        .find(|p| p.external_id.as_deref() == Some(external_id));
    let post = match existing {
        Some(post) => {
            post.title = title_of(content);
            post.content = Some(content.to_string());
            post.version += 1;
            post.updated_at = now;
            post.clone()
        }
        None => {
            let post = Post {
                id: new_id(),
                title: title_of(content),
                content: Some(content.to_string()),
                version: 0,
                external_id: Some(external_id.to_string()),
                topic_ids: Vec::new(),
                inserted_at: now,
                published_at: Some(now),
                updated_at: now,
            };
            store.posts.push(post.clone());
            post
        }
    };
    Ok(post_json(&post, true))
}

async fn get_topic(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let id = required(vars, "id")?;
    let store = db.read().await;
    Ok(store
        .topic(id)
        .map_or(Value::Null, |t| store.topic_json(t)))
}

async fn create_topic(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let name = required(vars, "name")?;
    let description = var(vars, "description").unwrap_or_default();
    let parent_id = var(vars, "parentId");

    let mut store = db.write().await;
    if let Some(parent_id) = parent_id {
        if store.topic(parent_id).is_none() {
            return Err(format!("parent topic {parent_id} not found"));
        }
    }
    let topic = store.add_topic(name, description, parent_id);
    Ok(minimal_topic(&topic))
}

async fn set_post_topic(db: &Db, vars: &Map<String, Value>, attach: bool) -> Result<Value, String> {
    let post_id = required(vars, "postId")?;
    let topic_id = required(vars, "topicId")?;

    let mut store = db.write().await;
    let topic = store
        .topic(topic_id)
        .cloned()
        .ok_or_else(|| format!("topic {topic_id} not found"))?;
    let post = store
        .post_mut(post_id)
        .ok_or_else(|| format!("post {post_id} not found"))?;
    if attach {
        if !post.topic_ids.contains(&topic.id) {
            post.topic_ids.push(topic.id.clone());
        }
    } else {
        post.topic_ids.retain(|t| *t != topic.id);
    }
    Ok(minimal_topic(&topic))
}

async fn get_user(db: &Db, vars: &Map<String, Value>) -> Result<Value, String> {
    let id = required(vars, "id")?;
    let store = db.read().await;
    Ok(store
        .users
        .iter()
        .find(|u| u.id == id)
        .map_or(Value::Null, user_json))
}

fn post_json(post: &Post, with_content: bool) -> Value {
    let mut value = json!({
        "id": post.id,
        "title": post.title,
        "version": post.version,
        "insertedAt": post.inserted_at.timestamp(),
        "publishedAt": post.published_at.as_ref().map(rfc3339),
        "updatedAt": rfc3339(&post.updated_at),
    });
    if with_content {
        value["content"] = json!(post.content);
    }
    value
}

fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "description": "",
        "email": user.email,
        "title": user.title,
        "type": user.kind,
        "avatar": {"original": null, "thumb": null},
        "insertedAt": user.inserted_at.timestamp(),
        "updatedAt": rfc3339(&user.inserted_at),
        "deactivatedAt": user.deactivated_at.as_ref().map(rfc3339),
    })
}

fn minimal_topic(topic: &Topic) -> Value {
    json!({"id": topic.id, "name": topic.name, "description": topic.description})
}

/// First non-empty line with Markdown heading markers stripped.
fn title_of(content: &str) -> String {
    content
        .lines()
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

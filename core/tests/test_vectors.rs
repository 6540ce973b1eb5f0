//! Verify service calls against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its input, the `variables` object the
//! request must carry, a simulated HTTP response and either the decoded
//! result or the error kind. Results are compared as typed values after
//! decoding `expected_result` through the same serde impls, so field order
//! and timestamp spelling don't cause false negatives.

use std::fmt::Debug;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;
use slab_client::{
    ApiError, Client, Config, CreateTopic, DeletePost, HttpRequest, HttpResponse, Organization,
    Post, SyncPost, Topic, Transport, User,
};

const ENDPOINT: &str = "http://localhost:3000/v1/graphql";

/// Answers every request with the same response and keeps what it was sent.
struct Replay {
    response: HttpResponse,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Transport for Replay {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

fn replay_client(case: &Value) -> Client<Replay> {
    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    };
    let transport = Replay {
        response,
        seen: Mutex::new(Vec::new()),
    };
    Client::with_transport(Config::new("dummy_token").with_endpoint(ENDPOINT), transport)
}

fn input<T: DeserializeOwned>(case: &Value) -> T {
    serde_json::from_value(case["input"].clone()).unwrap()
}

fn arg<'a>(case: &'a Value, key: &str) -> &'a str {
    case["input"][key].as_str().unwrap()
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::NotFound => "NotFound",
        ApiError::TransportError(_) => "TransportError",
        ApiError::HttpError { .. } => "HttpError",
        ApiError::GraphqlErrors(_) => "GraphqlErrors",
        ApiError::DeserializationError(_) => "DeserializationError",
        ApiError::SerializationError(_) => "SerializationError",
        ApiError::InvalidArgument(_) => "InvalidArgument",
    }
}

/// Check the outcome of one call against `expected_result` / `expected_error`.
fn check_result<T>(name: &str, case: &Value, actual: Result<T, ApiError>)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    match (&case["expected_error"], actual) {
        (Value::String(kind), Err(err)) => assert_eq!(error_kind(&err), kind.as_str(), "{name}: error kind"),
        (Value::String(kind), Ok(value)) => panic!("{name}: expected {kind}, got {value:?}"),
        (_, Ok(value)) => {
            let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(value, expected, "{name}: decoded result");
        }
        (_, Err(err)) => panic!("{name}: unexpected error {err:?}"),
    }
}

/// Check the recorded request: `expected_variables: null` means none was sent.
fn check_request(name: &str, case: &Value, client: &Client<Replay>) {
    let seen = client.transport().seen.lock().unwrap();
    let expected = &case["expected_variables"];
    if expected.is_null() {
        assert!(seen.is_empty(), "{name}: no request expected");
        return;
    }
    assert_eq!(seen.len(), 1, "{name}: request count");
    let request = &seen[0];
    assert_eq!(request.url, ENDPOINT, "{name}: url");
    assert_eq!(request.header("authorization"), Some("dummy_token"), "{name}: token");
    assert_eq!(request.header("content-type"), Some("application/json"), "{name}: content type");

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(&body["variables"], expected, "{name}: variables");
    let field = case["expected_root_field"].as_str().unwrap();
    assert!(
        body["query"].as_str().unwrap().contains(field),
        "{name}: query should select {field}"
    );
}

fn run_case(case: &Value) {
    let name = case["name"].as_str().unwrap();
    let operation = case["operation"].as_str().unwrap();
    let client = replay_client(case);

    match operation {
        "organization.get" => check_result::<Organization>(name, case, client.organization().get()),
        "posts.list" => check_result::<Vec<Post>>(name, case, client.posts().list()),
        "posts.get" => check_result::<Post>(name, case, client.posts().get(arg(case, "id"))),
        "posts.create" => {
            let topic_id = case["input"]["topicId"].as_str();
            check_result::<Post>(name, case, client.posts().create(topic_id))
        }
        "posts.delete" => {
            check_result::<Post>(name, case, client.posts().delete(&input::<DeletePost>(case)))
        }
        "posts.sync" => check_result::<Post>(name, case, client.posts().sync(&input::<SyncPost>(case))),
        "topics.list" => check_result::<Vec<Topic>>(name, case, client.topics().list()),
        "topics.get" => check_result::<Topic>(name, case, client.topics().get(arg(case, "id"))),
        "topics.create" => {
            check_result::<Topic>(name, case, client.topics().create(&input::<CreateTopic>(case)))
        }
        "topics.add_to_post" => check_result::<Topic>(
            name,
            case,
            client
                .topics()
                .add_to_post(arg(case, "topicId"), arg(case, "postId")),
        ),
        "users.list" => check_result::<Vec<User>>(name, case, client.users().list()),
        "users.get" => check_result::<User>(name, case, client.users().get(arg(case, "id"))),
        other => panic!("{name}: unknown operation {other}"),
    }

    check_request(name, case, &client);
}

fn run_file(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let cases = vectors["cases"].as_array().unwrap();
    assert!(!cases.is_empty());
    for case in cases {
        run_case(case);
    }
}

#[test]
fn organization_vectors() {
    run_file(include_str!("../../test-vectors/organization.json"));
}

#[test]
fn post_vectors() {
    run_file(include_str!("../../test-vectors/posts.json"));
}

#[test]
fn topic_vectors() {
    run_file(include_str!("../../test-vectors/topics.json"));
}

#[test]
fn user_vectors() {
    run_file(include_str!("../../test-vectors/users.json"));
}

#[test]
fn error_vectors() {
    run_file(include_str!("../../test-vectors/errors.json"));
}

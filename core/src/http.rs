//! HTTP request and response values exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. `graphql::build_request` produces
//! an `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and
//! `graphql::parse_response` decodes the result. Keeping the round-trip as
//! data lets tests script responses and inspect outgoing requests without a
//! socket.
//!
//! Every GraphQL call is a `POST` to one endpoint, so the method is implied.

/// An HTTP `POST` described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Value of the first header whose name matches `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "http://localhost/graphql".to_string(),
            headers: vec![("Authorization".to_string(), "token".to_string())],
            body: String::new(),
        };
        assert_eq!(req.header("authorization"), Some("token"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn success_covers_the_2xx_range() {
        let mut response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 304;
        assert!(!response.is_success());
    }
}

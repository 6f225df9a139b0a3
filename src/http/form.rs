//! Request parameter parsing
//!
//! Parameters come from the query string and, for
//! `application/x-www-form-urlencoded` requests, the body. Body values are
//! listed before query values, so single-value lookups prefer the body.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use thiserror::Error;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(u64),

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Decoded request parameters, in order of appearance
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Decode a body (may be empty) and a query string
    pub fn parse(body: &[u8], query: Option<&str>) -> Self {
        let mut pairs: Vec<(String, String)> = form_urlencoded::parse(body).into_owned().collect();
        if let Some(query) = query {
            pairs.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
        }
        Self { pairs }
    }

    /// First value for `key`, or `""` when absent
    pub fn first(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map_or("", |(_, v)| v.as_str())
    }

    /// Every value for `key`, empty ones included
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

fn is_form_body<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        })
}

/// Read query and form body parameters from a request
pub async fn read_params<B>(req: Request<B>, max_body_size: u64) -> Result<FormParams, FormError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let query = req.uri().query().map(ToString::to_string);
    if !is_form_body(&req) {
        return Ok(FormParams::parse(&[], query.as_deref()));
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                FormError::TooLarge(max_body_size)
            } else {
                FormError::Read(e.to_string())
            }
        })?
        .to_bytes();

    Ok(FormParams::parse(&body, query.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn form_request(uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    #[test]
    fn test_parse_query() {
        let params = FormParams::parse(&[], Some("regex=a%2Bb&input=x&input=&input=y+z"));
        assert_eq!(params.first("regex"), "a+b");
        assert_eq!(params.all("input"), vec!["x", "", "y z"]);
        assert_eq!(params.first("missing"), "");
        assert!(params.all("missing").is_empty());
    }

    #[test]
    fn test_body_values_come_first() {
        let params = FormParams::parse(b"regex=body&option=posix", Some("regex=query"));
        assert_eq!(params.first("regex"), "body");
        assert_eq!(params.all("regex"), vec!["body", "query"]);
        assert_eq!(params.all("option"), vec!["posix"]);
    }

    #[tokio::test]
    async fn test_read_form_body() {
        let req = form_request("/test.json?callback=cb", "regex=%3Cscript%3E&input=abc");
        let params = read_params(req, 1024).await.unwrap();
        assert_eq!(params.first("regex"), "<script>");
        assert_eq!(params.first("input"), "abc");
        assert_eq!(params.first("callback"), "cb");
    }

    #[tokio::test]
    async fn test_non_form_body_ignored() {
        let req = Request::builder()
            .method("POST")
            .uri("/test.json?regex=q")
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(r#"{"regex":"b"}"#)))
            .unwrap();
        let params = read_params(req, 1024).await.unwrap();
        assert_eq!(params.all("regex"), vec!["q"]);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let req = form_request("/test.json", "regex=aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let err = read_params(req, 8).await.unwrap_err();
        assert!(matches!(err, FormError::TooLarge(8)));
    }
}

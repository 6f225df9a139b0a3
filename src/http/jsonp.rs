//! JSON / JSONP response writer shared by the JSON endpoints

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use super::response::{log_build_error, CORS_HEADERS};
use crate::logger;

/// Body written when a payload cannot be serialized
pub const SERIALIZE_FALLBACK: &str = r#"{"success":false,"html":"<p>json.Marshal failed</p>"}"#;

const CONTENT_TYPE: &str = "text/plain; charset=utf8";
const MAX_CALLBACK_LEN: usize = 128;

/// Whether `callback` is safe to emit as a JavaScript function reference
///
/// Accepts dot-separated identifier segments such as `cb`, `$jsonp_1` or
/// `window.app.handle`.
pub fn is_valid_callback(callback: &str) -> bool {
    if callback.is_empty() || callback.len() > MAX_CALLBACK_LEN {
        return false;
    }
    callback.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    })
}

/// Serialize `value`, wrapping it as `callback(<json>);` when a valid callback is given
pub fn render_body<T: Serialize>(callback: &str, value: &T) -> Vec<u8> {
    let json = serde_json::to_vec(value).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize response: {e}"));
        SERIALIZE_FALLBACK.as_bytes().to_vec()
    });

    if callback.is_empty() {
        return json;
    }
    if !is_valid_callback(callback) {
        logger::log_warning(&format!(
            "Ignoring invalid JSONP callback ({} bytes)",
            callback.len()
        ));
        return json;
    }

    let mut body = Vec::with_capacity(callback.len() + json.len() + 3);
    body.extend_from_slice(callback.as_bytes());
    body.push(b'(');
    body.extend_from_slice(&json);
    body.extend_from_slice(b");");
    body
}

/// Build the 200 response for a JSON endpoint
pub fn build_jsonp_response<T: Serialize>(
    callback: &str,
    value: &T,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let body = Bytes::from(render_body(callback, value));

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", CONTENT_TYPE)
        .header("Server", server_name);
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }

    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        log_build_error("JSON", &e);
        Response::new(Full::new(body))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    #[derive(Serialize)]
    struct Payload {
        success: bool,
        message: &'static str,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("nope"))
        }
    }

    const PAYLOAD: Payload = Payload {
        success: true,
        message: "OK",
    };

    #[test]
    fn test_plain_json() {
        let body = render_body("", &PAYLOAD);
        assert_eq!(body, br#"{"success":true,"message":"OK"}"#);
    }

    #[test]
    fn test_callback_wrapping() {
        let body = render_body("handle", &PAYLOAD);
        assert_eq!(body, br#"handle({"success":true,"message":"OK"});"#);
    }

    #[test]
    fn test_invalid_callback_not_echoed() {
        let body = render_body("alert(1)//", &PAYLOAD);
        assert_eq!(body, br#"{"success":true,"message":"OK"}"#);
    }

    #[test]
    fn test_serialize_failure_fallback() {
        assert_eq!(render_body("", &Unserializable), SERIALIZE_FALLBACK.as_bytes());
        let wrapped = String::from_utf8(render_body("cb", &Unserializable)).unwrap();
        assert_eq!(wrapped, format!("cb({SERIALIZE_FALLBACK});"));
    }

    #[test]
    fn test_callback_validation() {
        assert!(is_valid_callback("cb"));
        assert!(is_valid_callback("$jsonp_12"));
        assert!(is_valid_callback("window.app.handle"));
        assert!(is_valid_callback("jQuery3600_1700000000000"));
        assert!(!is_valid_callback(""));
        assert!(!is_valid_callback("1abc"));
        assert!(!is_valid_callback("a..b"));
        assert!(!is_valid_callback("a.b."));
        assert!(!is_valid_callback("x<script>"));
        assert!(!is_valid_callback("f(1);g"));
        assert!(!is_valid_callback(&"a".repeat(MAX_CALLBACK_LEN + 1)));
    }

    #[test]
    fn test_response_headers() {
        let resp = build_jsonp_response("", &PAYLOAD, "regex-tester");
        assert_eq!(resp.status(), 200);
        let headers = resp.headers();
        assert_eq!(headers["Content-Type"], "text/plain; charset=utf8");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "POST, GET");
        assert_eq!(headers["Access-Control-Max-Age"], "604800");
        assert_eq!(headers["Server"], "regex-tester");
    }
}

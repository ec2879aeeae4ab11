use crate::constants::{is_recognized_status_code, reason_phrase};
use crate::error::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

/// An HTTP response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Text(String),
    Json(Value),
    Binary(Bytes),
}

impl Body {
    /// The serialized bytes this body puts on the wire. JSON values are
    /// rendered through serde_json.
    pub fn to_wire(&self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Text(text) => Bytes::from(text.clone()),
            Body::Json(value) => Bytes::from(value.to_string()),
            Body::Binary(bytes) => bytes.clone(),
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Body {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Body {
        Body::Text(text.to_owned())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Body {
        Body::Json(value)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Body {
        Body::Binary(bytes)
    }
}

/// An HTTP response: a recognized status code, headers, and a body.
///
/// Builder methods consume and return the response so they can be chained:
///
/// ```
/// use switchboard::Response;
///
/// let res = Response::new()
///     .status(201)?
///     .header("x-request-id", "abc123")?
///     .body("created");
/// assert_eq!(201, res.status_code());
/// # Ok::<(), switchboard::Error>(())
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) code: u16,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Body,
}

impl Response {
    /// Creates an empty response with status 200.
    pub fn new() -> Response {
        Response {
            code: 200,
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    /// Sets the status code. Fails with [`Error::InvalidStatusCode`] when
    /// the code is not in the recognized set.
    pub fn status(mut self, code: u16) -> Result<Response> {
        if !is_recognized_status_code(code) {
            return Err(Error::InvalidStatusCode { code });
        }
        self.code = code;
        Ok(self)
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Response> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::new(format!("invalid header name {:?}: {}", name, e)))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| Error::new(format!("invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets the body.
    pub fn body<B: Into<Body>>(mut self, body: B) -> Response {
        self.body = body.into();
        self
    }

    pub fn status_code(&self) -> u16 {
        self.code
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body_ref(&self) -> &Body {
        &self.body
    }

    /// Serializes the response for the wire: status line, headers, and body.
    ///
    /// `Content-Type` defaults to `application/json` when not set and
    /// `Content-Length` is computed from the serialized body.
    pub fn to_bytes(&self) -> Bytes {
        let body = self.body.to_wire();

        let mut out = Vec::with_capacity(64 + body.len());
        out.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", self.code, reason_phrase(self.code)).as_bytes());

        if !self.headers.contains_key(CONTENT_TYPE) {
            out.extend_from_slice(b"content-type: application/json\r\n");
        }
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_str().as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("{}: {}\r\n\r\n", CONTENT_LENGTH, body.len()).as_bytes());
        out.extend_from_slice(&body);

        Bytes::from(out)
    }
}

impl Default for Response {
    fn default() -> Response {
        Response::new()
    }
}

/// What a route handler or controller method may return.
///
/// A [`Response`] passes through dispatch unchanged; any other value is
/// wrapped into a fresh 200 response with the value as its body.
#[derive(Debug)]
pub enum Reply {
    Response(Response),
    Value(Value),
    Text(String),
}

impl Reply {
    /// Builds a JSON reply from any serializable value.
    pub fn json<S: Serialize>(value: S) -> Result<Reply> {
        serde_json::to_value(value)
            .map(Reply::Value)
            .map_err(|e| Error::new(format!("could not serialize reply to JSON: {}", e)))
    }

    /// Response normalization: pass an actual response through, wrap
    /// anything else in a default 200 response.
    pub(crate) fn into_response(self) -> Response {
        match self {
            Reply::Response(response) => response,
            Reply::Value(value) => Response::new().body(Body::Json(value)),
            Reply::Text(text) => Response::new().body(Body::Text(text)),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Reply {
        Reply::Response(response)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Reply {
        Reply::Value(value)
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Reply {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Reply {
        Reply::Text(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_an_empty_200_response() {
        let res = Response::new();
        assert_eq!(200, res.status_code());
        assert_eq!(&Body::Empty, res.body_ref());
        assert!(res.headers().is_empty());
    }

    #[test]
    fn recognized_status_codes_are_accepted() {
        for &code in &[100, 204, 301, 404, 501] {
            assert_eq!(code, Response::new().status(code).unwrap().status_code());
        }
    }

    #[test]
    fn unrecognized_status_code_is_rejected() {
        let err = Response::new().status(999).unwrap_err();
        assert!(matches!(err, Error::InvalidStatusCode { code: 999 }));
    }

    #[test]
    fn serializes_a_status_line_with_the_reason_phrase() {
        let wire = Response::new().status(404).unwrap().to_bytes();
        let text = String::from_utf8(wire.to_vec()).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn content_type_defaults_to_json_and_length_is_computed() {
        let wire = Response::new().body(json!({"ok": true})).to_bytes();
        let text = String::from_utf8(wire.to_vec()).unwrap();
        assert!(text.contains("content-type: application/json\r\n"));
        assert!(text.contains("content-length: 11\r\n"));
        assert!(text.ends_with("{\"ok\":true}"));
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let wire = Response::new()
            .header("Content-Type", "text/plain")
            .unwrap()
            .body("hi")
            .to_bytes();
        let text = String::from_utf8(wire.to_vec()).unwrap();
        assert!(text.contains("content-type: text/plain\r\n"));
        assert!(!text.contains("application/json"));
    }

    #[test]
    fn plain_values_normalize_to_a_200_response() {
        let res = Reply::from("User list").into_response();
        assert_eq!(200, res.status_code());
        assert_eq!(&Body::Text("User list".to_owned()), res.body_ref());
    }

    #[test]
    fn a_response_reply_passes_through_unchanged() {
        let res = Reply::from(Response::new().status(204).unwrap()).into_response();
        assert_eq!(204, res.status_code());
    }
}

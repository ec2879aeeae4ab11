use crate::constants::ALLOWED_METHODS;
use crate::error::{Error, Result};
use http::Method;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// An inbound HTTP request, reduced to what routing needs: a validated
/// method, a percent-decoded path, and the parsed query and body parameters.
///
/// The query string is stripped from the URI and parsed into `query()`;
/// form-style body parameters can be attached with [`with_body`](Request::with_body).
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: HashMap<String, String>,
}

impl Request {
    /// Creates a request from a method name and a request URI.
    ///
    /// The method is matched case-insensitively against the HTTP method
    /// vocabulary and normalized to uppercase; anything else fails with
    /// [`Error::InvalidMethod`].
    pub fn new(method: &str, uri: &str) -> Result<Request> {
        let method = parse_method(method)?;

        let (raw_path, raw_query) = match uri.find('?') {
            Some(pos) => (&uri[..pos], &uri[pos + 1..]),
            None => (uri, ""),
        };

        Ok(Request {
            method,
            path: decode_component(raw_path)?,
            query: parse_query(raw_query)?,
            body: HashMap::new(),
        })
    }

    /// Attaches form-style body parameters.
    pub fn with_body<I, K, V>(mut self, pairs: I) -> Request
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path without its query string, percent-decoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> &HashMap<String, String> {
        &self.body
    }
}

pub(crate) fn parse_method(method: &str) -> Result<Method> {
    let normalized = method.to_ascii_uppercase();
    ALLOWED_METHODS
        .iter()
        .find(|m| m.as_str() == normalized)
        .cloned()
        .ok_or(Error::InvalidMethod {
            method: method.to_owned(),
        })
}

fn decode_component(raw: &str) -> Result<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Error::new(format!("could not percent-decode {:?}: {}", raw, e)))
}

fn parse_query(raw: &str) -> Result<HashMap<String, String>> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = match pair.find('=') {
                Some(pos) => (&pair[..pos], &pair[pos + 1..]),
                None => (pair, ""),
            };
            Ok((
                decode_component(&key.replace('+', " "))?,
                decode_component(&value.replace('+', " "))?,
            ))
        })
        .collect()
}

#![allow(dead_code)]

use switchboard::{Body, Request, Response};

pub fn req(method: &str, uri: &str) -> Request {
    Request::new(method, uri).unwrap()
}

pub fn body_text(res: &Response) -> String {
    match res.body_ref() {
        Body::Empty => String::new(),
        Body::Text(text) => text.clone(),
        Body::Json(value) => value.to_string(),
        Body::Binary(bytes) => String::from_utf8_lossy(bytes).to_string(),
    }
}

pub fn body_json(res: &Response) -> serde_json::Value {
    match res.body_ref() {
        Body::Json(value) => value.clone(),
        other => panic!("expected a JSON body, got {:?}", other),
    }
}

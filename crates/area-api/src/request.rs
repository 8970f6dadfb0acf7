//! Declarative request descriptors and response envelope handling.
//!
//! Every remote operation is described by a [`Request`] value; the client
//! turns it into an HTTP call and [`classify_response`] turns the answer into
//! either the payload or an [`ApiFailure`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use area_core::ApiFailure;

/// HTTP verb of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// How the response body is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{code, data}`; the payload is `data`.
    Data,
    /// The body is the payload.
    Raw,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// Sent as-is with a `text/plain` content type.
    Text(String),
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Send the bearer token when the session has one.
    pub authenticated: bool,
    pub envelope: Envelope,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
            envelope: Envelope::Data,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body. Serialization failures leave the body empty and
    /// are logged; request bodies here are plain structs that always encode.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(Body::Json(value)),
            Err(e) => tracing::error!("Failed to encode request body for {}: {}", self.path, e),
        }
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    /// Do not send the session token.
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// The body is the payload, without an envelope.
    pub fn raw(mut self) -> Self {
        self.envelope = Envelope::Raw;
        self
    }
}

/// Turn an HTTP status and body into a payload or a failure.
///
/// Returns `Ok(None)` for a successful answer without a body (204).
pub fn classify_response(
    status: u16,
    body: &[u8],
    envelope: Envelope,
) -> Result<Option<Value>, ApiFailure> {
    let parsed: Option<Value> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice(body) {
            Ok(value) => Some(value),
            Err(e) if (200..300).contains(&status) => {
                return Err(ApiFailure::Decode(e.to_string()));
            }
            Err(_) => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
        }
    };

    match status {
        200..=299 => match (envelope, parsed) {
            (_, None) => Ok(None),
            (Envelope::Raw, Some(value)) => Ok(Some(value)),
            (Envelope::Data, Some(mut value)) => match value.get_mut("data") {
                Some(data) => Ok(Some(data.take())),
                None => Err(ApiFailure::Decode("response has no `data` field".to_string())),
            },
        },
        401 => Err(ApiFailure::Unauthorized),
        406 => match parsed.as_ref().and_then(invalid_field_map) {
            Some(fields) => Err(ApiFailure::InvalidFields(fields)),
            None => Err(ApiFailure::Rejected {
                status,
                payload: parsed.unwrap_or(Value::Null),
            }),
        },
        _ => Err(ApiFailure::Rejected {
            status,
            payload: parsed.unwrap_or(Value::Null),
        }),
    }
}

fn invalid_field_map(body: &Value) -> Option<BTreeMap<String, bool>> {
    let data = body.get("data")?.as_object()?;
    data.iter()
        .map(|(key, value)| value.as_bool().map(|valid| (key.clone(), valid)))
        .collect()
}

/// Pull the `message` string out of a mutation payload.
pub fn message_of(payload: Option<Value>) -> String {
    match payload {
        Some(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => "OK".to_string(),
        },
        Some(Value::String(message)) => message,
        _ => "OK".to_string(),
    }
}

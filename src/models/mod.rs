pub mod document;
pub mod review;
pub mod user;

pub use document::{Branch, Document, DocumentSize, Semester};
pub use review::{Rating, Review, ReviewAuthor};
pub use user::{BlockToggle, User};

/// Anything cached by a list controller. Identity is the backend's `_id`.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Review {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Untyped acknowledgement body (`{"message": "..."}`) returned by mutations
/// whose payload the client does not otherwise use.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Ack {
    /// Lenient decode: an empty body or a non-object JSON value is still a
    /// successful acknowledgement.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Ack::default();
        }
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => {
                serde_json::from_value(serde_json::Value::Object(map)).unwrap_or_default()
            }
            Ok(serde_json::Value::String(message)) => Ack {
                message: Some(message),
                extra: serde_json::Map::new(),
            },
            _ => Ack::default(),
        }
    }
}

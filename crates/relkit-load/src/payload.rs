use serde::{Deserialize, Serialize};

/// How a fetched body should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Text,
    Json,
    Binary,
}

impl ResponseType {
    /// Parse a user-supplied name (`text`, `json`, `binary`, case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "binary" | "arraybuffer" => Some(Self::Binary),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Binary => "binary",
        }
    }
}

/// Per-batch options handed to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub response_type: ResponseType,
}

impl LoadOptions {
    #[must_use]
    pub const fn new(response_type: ResponseType) -> Self {
        Self { response_type }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

impl Payload {
    #[must_use]
    pub const fn response_type(&self) -> ResponseType {
        match self {
            Self::Text(_) => ResponseType::Text,
            Self::Json(_) => ResponseType::Json,
            Self::Binary(_) => ResponseType::Binary,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_type_names() {
        assert_eq!(ResponseType::parse("JSON"), Some(ResponseType::Json));
        assert_eq!(ResponseType::parse(" text "), Some(ResponseType::Text));
        assert_eq!(ResponseType::parse("arraybuffer"), Some(ResponseType::Binary));
        assert_eq!(ResponseType::parse("xml"), None);
    }

    #[test]
    fn response_type_round_trips_through_its_name() {
        for kind in [ResponseType::Text, ResponseType::Json, ResponseType::Binary] {
            assert_eq!(ResponseType::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn options_default_to_text() {
        let opts: LoadOptions = serde_json::from_str("{}").expect("empty options parse");
        assert_eq!(opts.response_type, ResponseType::Text);
    }

    #[test]
    fn payload_accessors_match_variant() {
        let payload = Payload::Json(serde_json::json!({"k": 1}));
        assert_eq!(payload.response_type(), ResponseType::Json);
        assert!(payload.as_text().is_none());
        assert_eq!(payload.as_json().and_then(|v| v.get("k")), Some(&serde_json::json!(1)));

        let payload = Payload::Binary(vec![1, 2]);
        assert_eq!(payload.as_bytes(), Some(&[1_u8, 2][..]));
    }

    #[test]
    fn loaded_payloads_compare_as_eq() {
        fn total<T: Eq>(left: &T, right: &T) -> bool {
            left == right
        }

        let body = Payload::Json(serde_json::json!({"k": [1, 2]}));
        assert!(total(&crate::Loaded::One(body.clone()), &crate::Loaded::One(body)));
        assert!(!total(&Payload::Text("a".into()), &Payload::Binary(b"a".to_vec())));
    }
}

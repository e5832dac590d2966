//! Synthetic users fed into SDK calls.

use rand::Rng;
use serde_json::{json, Map, Value};

const USER_ID_LEN: usize = 13;
const USER_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const GLOBAL_USER_ID: &str = "global_user";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// SDK-agnostic user record; clients convert it into their own user type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticUser {
    pub user_id: String,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub locale: Option<String>,
    pub app_version: Option<String>,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub custom: Option<Map<String, Value>>,
    pub private_attributes: Option<Map<String, Value>>,
}

impl SyntheticUser {
    /// The shared user reused across every `*_global_user` benchmark
    pub fn global() -> Self {
        Self {
            user_id: GLOBAL_USER_ID.to_string(),
            ..Default::default()
        }
    }

    /// A fresh user with a random id and the fixed sample attributes
    pub fn random() -> Self {
        Self::with_id(random_user_id(&mut rand::thread_rng()))
    }

    pub fn with_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: Some("user@example.com".to_string()),
            ip: Some("127.0.0.1".to_string()),
            locale: Some("en-US".to_string()),
            app_version: Some("1.0.0".to_string()),
            country: Some("US".to_string()),
            user_agent: Some(USER_AGENT.to_string()),
            custom: Some(object(json!({ "isAdmin": false }))),
            private_attributes: Some(object(json!({ "isPaid": "nah" }))),
        }
    }
}

/// Lowercase-alphanumeric id of fixed length
pub fn random_user_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..USER_ID_LEN)
        .map(|_| USER_ID_ALPHABET[rng.gen_range(0..USER_ID_ALPHABET.len())] as char)
        .collect()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

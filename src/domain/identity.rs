use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier handed out by the authentication service. Login responses
/// carry strings, registration responses carry numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityId {
    Number(u64),
    Text(String),
}

impl core::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IdentityId::Number(n) => write!(f, "{}", n),
            IdentityId::Text(s) => f.write_str(s),
        }
    }
}

/// Identity record of the signed-in user.
///
/// Only `id` and `name` are required; every other field the auth service
/// returns is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn new(id: IdentityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parses a persisted record. `None` for anything that is not a JSON
    /// object with an `id` and a non-empty `name`.
    pub fn from_json(raw: &str) -> Option<Self> {
        let identity: Identity = serde_json::from_str(raw).ok()?;
        if identity.name.trim().is_empty() {
            return None;
        }
        if let IdentityId::Text(id) = &identity.id {
            if id.trim().is_empty() {
                return None;
            }
        }
        Some(identity)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_collaborator_fields() {
        let raw = r#"{"id":7,"name":"Asha","username":"asha","upiId":"asha@upi"}"#;
        let identity = Identity::from_json(raw).unwrap();
        assert_eq!(identity.id, IdentityId::Number(7));
        assert_eq!(identity.extra.get("upiId"), Some(&Value::from("asha@upi")));

        let again = Identity::from_json(&identity.to_json().unwrap()).unwrap();
        assert_eq!(again, identity);
    }

    #[test]
    fn string_ids_are_accepted() {
        let identity = Identity::from_json(r#"{"id":"m-42","name":"Shop"}"#).unwrap();
        assert_eq!(identity.id.to_string(), "m-42");
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(Identity::from_json("not json").is_none());
        assert!(Identity::from_json("null").is_none());
        assert!(Identity::from_json("[1,2]").is_none());
        assert!(Identity::from_json(r#"{"name":"no id"}"#).is_none());
        assert!(Identity::from_json(r#"{"id":1}"#).is_none());
        assert!(Identity::from_json(r#"{"id":1,"name":"  "}"#).is_none());
        assert!(Identity::from_json(r#"{"id":"","name":"x"}"#).is_none());
    }
}

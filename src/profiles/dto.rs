use serde::{Deserialize, Deserializer, Serialize};

use crate::profiles::model::UserProfile;

/// Public part of a profile returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<UserProfile> for ProfileSummary {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            name: p.name,
        }
    }
}

/// Request body for create, update and partial update.
///
/// The outer `Option` is "was the key sent", the inner one "was it non-null",
/// so missing and `null` fields are reported per field instead of as a parse
/// failure.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
}

impl ProfilePayload {
    pub fn new(email: Option<&str>, name: Option<&str>, password: Option<&str>) -> Self {
        let given = |v: Option<&str>| v.map(|v| Some(v.to_string()));
        Self {
            email: given(email),
            name: given(name),
            password: given(password),
        }
    }
}

/// Only called for keys that are present, so a JSON `null` becomes `Some(None)`.
fn present<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

impl SearchQuery {
    /// Terms separated by whitespace or commas; empty when there is no filter.
    pub fn terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

use serde::{Deserialize, Deserializer, Serialize};

/// A named credential set. The name is also the file stem on disk.
///
/// Field names match the documents written by earlier Alelo CLI releases
/// so existing home directories keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Session", default, deserialize_with = "lenient_session")]
    pub session: Session,
}

impl Profile {
    /// A fresh profile with an empty session
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session: Session::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Session data as returned by the login endpoint.
///
/// Either empty (`token` blank) or populated; the login flow never stores a
/// session without a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "firstName", default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(rename = "lastName", default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cpf: String,
    #[serde(rename = "userId", default, deserialize_with = "lenient_string")]
    pub user_id: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Display name, derived and never persisted
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Accepts a string, `null` (written by older releases for fresh profiles)
/// or a number (some responses carry a numeric `userId`).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

fn lenient_session<'de, D>(deserializer: D) -> Result<Session, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Session>::deserialize(deserializer)?.unwrap_or_default())
}

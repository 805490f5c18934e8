use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_sessions::{session, Session};

use crate::api::lenient::scalar_to_string;

pub const SESSION_USER_KEY: &str = "user_id";
pub const SESSION_USERNAME_KEY: &str = "username";
pub const SESSION_CONVERSATION_KEY: &str = "conversation";

/// The two identifiers kept for a signed-in browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: String,
}

impl SessionIdentity {
    /// Reads the identity out of a successful auth reply body.
    pub fn from_reply(data: &Value) -> Option<Self> {
        let user_id = data.get("user_id").and_then(scalar_to_string)?;
        let username = data.get("username").and_then(scalar_to_string)?;

        Some(Self { user_id, username })
    }

    pub async fn load(session: &Session) -> Result<Option<Self>, session::Error> {
        let user_id = session.get::<String>(SESSION_USER_KEY).await?;
        let username = session.get::<String>(SESSION_USERNAME_KEY).await?;

        Ok(user_id
            .zip(username)
            .map(|(user_id, username)| Self { user_id, username }))
    }

    pub async fn save(&self, session: &Session) -> Result<(), session::Error> {
        session.insert(SESSION_USER_KEY, &self.user_id).await?;
        session.insert(SESSION_USERNAME_KEY, &self.username).await
    }
}

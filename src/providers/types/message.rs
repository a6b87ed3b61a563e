use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat turn as sent to the completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> ClientResult<Self> {
        let msg = Self {
            role,
            content: content.into(),
        };
        msg.validate()?;
        Ok(msg)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.role == Role::User && self.content.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "User message must include text".to_string(),
            ));
        }
        Ok(())
    }

    pub fn user(text: &str) -> ClientResult<Self> {
        Self::new(Role::User, text)
    }
}

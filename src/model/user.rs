//! User resource.

use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::error::StoreError;
use crate::store::Resource;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Payload for creating or replacing a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }
}

impl Resource for User {
    type Draft = UserDraft;

    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn from_draft(id: i64, draft: UserDraft) -> Result<Self, StoreError> {
        let name =
            non_empty(draft.name).ok_or_else(|| StoreError::validation("name is required"))?;
        let email =
            non_empty(draft.email).ok_or_else(|| StoreError::validation("email is required"))?;

        Ok(Self { id, name, email })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Alice Johnson".to_string(),
                email: "alice@example.com".to_string(),
            },
            Self {
                id: 2,
                name: "Bob Smith".to_string(),
                email: "bob@example.com".to_string(),
            },
        ]
    }
}

//! Resource types served by the API.
//!
//! This module handles:
//! - The health record resource (`/records`)
//! - The user resource (`/users`)
//! - Selecting between them at startup

pub mod health_record;
pub mod user;

use serde::Deserialize;
use strum::{Display, EnumString};

pub use health_record::{HealthRecord, HealthRecordDraft};
pub use user::{User, UserDraft};

/// Which resource a process serves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Display, EnumString,
)]
#[serde(try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResourceKind {
    /// Health records at `/api/v1/records`.
    #[default]
    Records,
    /// Users at `/api/v1/users`.
    Users,
}

impl ResourceKind {
    /// Whether this service wraps responses in a `data` envelope by default.
    pub fn default_envelope(self) -> bool {
        matches!(self, Self::Users)
    }

    /// Whether this service answers with permissive CORS headers by default.
    pub fn default_cors(self) -> bool {
        matches!(self, Self::Users)
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Treat a missing or empty string as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

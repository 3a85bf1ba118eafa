use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::{User, UserStatus};

/// Request body for registration. Every field is optional at the serde level
/// so that a missing field is reported by name instead of as a parse error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

/// A coordinate as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Returned after registration. Never includes the password.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: UserStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub register_at: OffsetDateTime,
    pub token: String,
}

impl CreatedUser {
    pub fn new(user: User, token: String) -> Self {
        Self {
            name: user.name,
            email: user.email,
            address: user.address,
            latitude: user.latitude,
            longitude: user.longitude,
            status: user.status,
            register_at: user.register_at,
            token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub destination_latitude: Option<String>,
    pub destination_longitude: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week_numbers: Option<String>,
}

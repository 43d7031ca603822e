//! User Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::flag::optional_id;
use super::station::Station;

/// User entity (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// Station reference, `None` for sales staff
    #[serde(default, deserialize_with = "optional_id")]
    pub station_id: Option<u64>,
}

/// Logged-in user, with the station resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub station: Option<Station>,
}

impl SessionUser {
    /// Station users work the fulfillment screen, everyone else the till
    pub fn is_station_user(&self) -> bool {
        self.station.as_ref().is_some_and(|s| s.id != 0)
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub station_id: Option<u64>,
}

impl UserCreate {
    pub fn new(username: impl Into<String>, password: impl Into<String>, station_id: Option<u64>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
            station_id,
        }
    }

    /// Multipart form fields; a missing station is sent as `0`
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("station_id", self.station_id.unwrap_or(0).to_string()),
        ]
    }
}

//! Request/response types for the movie-list API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile of the logged-in user, replaced wholesale on login and cleared on
/// logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque id; a string or a number depending on the backend.
    pub id: Value,
    pub name: String,
    pub email: String,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration request body
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response. Both fields are required for a session to be established;
/// either missing means the response is malformed.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

/// A movie record in the user's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: Value,
    pub title: String,
    pub director: Option<String>,
    pub year: Option<u16>,
    pub genre: Option<String>,
    pub rating: Option<u8>,
}

impl Movie {
    /// Display form of the opaque id (strings without quotes).
    pub fn id_display(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Fields for creating or updating a movie. Absent fields are omitted from
/// the serialized body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MovieDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl MovieDraft {
    /// True when no field is set (nothing to send).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.director.is_none()
            && self.genre.is_none()
            && self.year.is_none()
            && self.rating.is_none()
    }
}

/// Envelope wrapping a movie record alongside a server message, as returned
/// by the create and update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieEnvelope {
    pub message: Option<String>,
    pub movie: Movie,
}

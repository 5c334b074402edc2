use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ChecklistItem, Priority};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: crate::models::Todo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<crate::models::Todo>,
}

/// Full replacement payload for one todo. The checklist must already be
/// filtered to non-empty titles before this is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub tasks: Vec<ChecklistItem>,
    pub label: String,
    pub assigned_to: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Submitted atomically as one update; password change rides along with
/// the name/email edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
}

/// Error body shape of the backend.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Moderate,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Moderate, Priority::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Moderate => "MODERATE",
            Priority::Low => "LOW",
        }
    }
}

/// A single checklist entry of a todo. Has no identity of its own;
/// items are addressed by position for the duration of an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub title: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub tasks: Vec<ChecklistItem>,
    #[serde(default)]
    pub label: String,
    /// Assignee email; empty string when unassigned.
    #[serde(default)]
    pub assigned_to: String,
}

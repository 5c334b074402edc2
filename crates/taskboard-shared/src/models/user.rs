use serde::{Deserialize, Serialize};

/// Directory entry used only as a selectable assignee value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub email: String,
}

/// Session payload returned by login and profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub token: String,
}

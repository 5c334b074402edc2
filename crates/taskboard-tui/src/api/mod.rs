mod client;
mod session;

use taskboard_shared::{
    Credentials, LoginRequest, Todo, UpdateProfileRequest, UpdateTodoRequest, UserRef,
};
use uuid::Uuid;

pub use client::{ApiClient, ApiError};
pub use session::{FileSession, SessionStore};
#[cfg(test)]
pub use session::MemorySession;

/// Backend operations the controllers depend on. The concrete client talks
/// HTTP; tests substitute a recording fake.
#[allow(async_fn_in_trait)]
pub trait Api {
    async fn fetch_todo(&mut self, id: Uuid) -> Result<Todo, ApiError>;
    async fn list_todos(&mut self) -> Result<Vec<Todo>, ApiError>;
    async fn update_todo(&mut self, id: Uuid, req: UpdateTodoRequest) -> Result<Todo, ApiError>;
    async fn list_users(&mut self) -> Result<Vec<UserRef>, ApiError>;
    async fn login(&mut self, req: LoginRequest) -> Result<Credentials, ApiError>;
    async fn update_profile(&mut self, req: UpdateProfileRequest)
        -> Result<Credentials, ApiError>;

    fn set_token(&mut self, token: Option<String>);
}

use reqwest::{Client, StatusCode};
use taskboard_shared::{
    ApiMessage, Credentials, LoginRequest, Todo, TodoListResponse, TodoResponse,
    UpdateProfileRequest, UpdateTodoRequest, UserRef,
};
use uuid::Uuid;

use super::Api;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    /// Application-level error reported by the backend; carries the
    /// server-provided message verbatim.
    #[error("{0}")]
    Application(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn authed_get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let auth = self.auth_header().ok_or(ApiError::Unauthorized)?;
        self.client
            .get(self.url(path))
            .header("Authorization", auth)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    async fn authed_put<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let auth = self.auth_header().ok_or(ApiError::Unauthorized)?;
        self.client
            .put(self.url(path))
            .header("Authorization", auth)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    /// Map HTTP status to the error taxonomy, pulling the `{message}` body
    /// for errors the backend reports at the application level.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            _ if status.is_client_error() => {
                let text = response.text().await.unwrap_or_default();
                match serde_json::from_str::<ApiMessage>(&text) {
                    Ok(body) => Err(ApiError::Application(body.message)),
                    Err(_) => Err(ApiError::Application(text)),
                }
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Server(format!("{}: {}", status, text)))
            }
        }
    }
}

impl Api for ApiClient {
    async fn fetch_todo(&mut self, id: Uuid) -> Result<Todo, ApiError> {
        let response = self.authed_get(&format!("/todos/{}", id)).await?;
        let body: TodoResponse = self.handle_response(response).await?;
        Ok(body.todo)
    }

    async fn list_todos(&mut self) -> Result<Vec<Todo>, ApiError> {
        let response = self.authed_get("/todos").await?;
        let body: TodoListResponse = self.handle_response(response).await?;
        Ok(body.todos)
    }

    async fn update_todo(&mut self, id: Uuid, req: UpdateTodoRequest) -> Result<Todo, ApiError> {
        let response = self.authed_put(&format!("/todos/{}", id), &req).await?;
        let body: TodoResponse = self.handle_response(response).await?;
        Ok(body.todo)
    }

    async fn list_users(&mut self) -> Result<Vec<UserRef>, ApiError> {
        let response = self.authed_get("/users").await?;
        self.handle_response(response).await
    }

    async fn login(&mut self, req: LoginRequest) -> Result<Credentials, ApiError> {
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(&req)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let creds: Credentials = self.handle_response(response).await?;
        self.token = Some(creds.token.clone());
        Ok(creds)
    }

    async fn update_profile(
        &mut self,
        req: UpdateProfileRequest,
    ) -> Result<Credentials, ApiError> {
        let response = self.authed_put("/users/profile", &req).await?;
        self.handle_response(response).await
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

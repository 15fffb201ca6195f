use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, UsersApi};
use crate::error::ApiError;
use crate::models::{BlockToggle, User};

#[async_trait]
impl UsersApi for ApiClient {
    async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::GET, &["users", "allusers"], |r| r).await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::GET, &["users", "search"], |r| r.query(&[("query", query)]))
            .await
    }

    async fn user_details(&self, id: &str) -> Result<User, ApiError> {
        self.send_json(Method::GET, &["users", "details", id], |r| r)
            .await
    }

    async fn toggle_block(&self, id: &str) -> Result<BlockToggle, ApiError> {
        self.send_json(Method::PATCH, &["users", id, "toggle-block"], |r| r)
            .await
    }
}

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, ReviewsApi};
use crate::error::ApiError;
use crate::models::{Ack, Rating, Review};

#[async_trait]
impl ReviewsApi for ApiClient {
    async fn all_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.send_json(Method::GET, &["reviews", "allreviews"], |r| r).await
    }

    async fn toggle_visibility(&self, id: &str) -> Result<Ack, ApiError> {
        self.send_ack(Method::PATCH, &["reviews", id, "toggleshowhide"], |r| r)
            .await
    }

    async fn delete_review(&self, id: &str) -> Result<Ack, ApiError> {
        self.send_ack(Method::DELETE, &["reviews", "delete", id], |r| r)
            .await
    }

    async fn reviews_by_rating(&self, rating: Rating) -> Result<Vec<Review>, ApiError> {
        let rating = rating.to_string();
        self.send_json(Method::GET, &["reviews", rating.as_str()], |r| r)
            .await
    }
}

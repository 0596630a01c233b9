//! User management endpoints

use super::request::{ApiRequest, path_segment};
use super::{ClientError, Payload, StockroomClient};
use serde::Serialize;

impl StockroomClient {
    /// List users with paging and search
    pub async fn get_users<P: Serialize + ?Sized>(&self, params: &P) -> Result<Payload, ClientError> {
        self.send(ApiRequest::get("/users").query(params)?).await
    }

    /// Create a user
    pub async fn create_user<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        self.send(ApiRequest::post("/users").json(payload)?).await
    }

    /// Update a user. Omitted fields are left unchanged by the backend.
    pub async fn update_user<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        let endpoint = format!("/users/{}", path_segment(user_id));
        self.send(ApiRequest::patch(endpoint).json(payload)?).await
    }

    /// Delete a user
    pub async fn delete_user(&self, user_id: &str) -> Result<Payload, ClientError> {
        let endpoint = format!("/users/{}", path_segment(user_id));
        self.send(ApiRequest::delete(endpoint)).await
    }
}

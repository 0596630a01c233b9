//! Session resource endpoints

use super::request::{ApiRequest, path_segment};
use super::{ClientError, Payload, StockroomClient};
use serde::Serialize;

impl StockroomClient {
    /// List sessions with paging and search
    pub async fn get_sessions<P: Serialize + ?Sized>(
        &self,
        params: &P,
    ) -> Result<Payload, ClientError> {
        self.send(ApiRequest::get("/session").query(params)?).await
    }

    /// Create a session
    pub async fn create_session<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        self.send(ApiRequest::post("/session").json(payload)?).await
    }

    /// Delete a session by id
    pub async fn delete_session(&self, session_id: &str) -> Result<Payload, ClientError> {
        let endpoint = format!("/session/{}", path_segment(session_id));
        self.send(ApiRequest::delete(endpoint)).await
    }
}

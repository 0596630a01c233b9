//! Inventory resource endpoints

use super::request::{ApiRequest, path_segment};
use super::{ClientError, Payload, StockroomClient};
use serde::Serialize;

impl StockroomClient {
    /// List inventory items with paging
    pub async fn get_inventory_items<P: Serialize + ?Sized>(
        &self,
        params: &P,
    ) -> Result<Payload, ClientError> {
        self.get_inventory(params).await
    }

    /// List inventory items with paging and filters
    pub async fn get_inventory<P: Serialize + ?Sized>(
        &self,
        params: &P,
    ) -> Result<Payload, ClientError> {
        self.send(ApiRequest::get("/inventory").query(params)?).await
    }

    /// Create an inventory item
    pub async fn create_inventory_item<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        self.send(ApiRequest::post("/inventory").json(payload)?).await
    }

    /// Delete an inventory item
    pub async fn delete_inventory_item(&self, item_id: &str) -> Result<Payload, ClientError> {
        let endpoint = format!("/inventory/{}", path_segment(item_id));
        self.send(ApiRequest::delete(endpoint)).await
    }

    /// Record stock coming in for an item
    pub async fn add_stock<T: Serialize + ?Sized>(
        &self,
        item_id: &str,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        let endpoint = format!("/inventory/{}/input", path_segment(item_id));
        self.send(ApiRequest::patch(endpoint).json(payload)?).await
    }

    /// Record stock going out for an item
    pub async fn remove_stock<T: Serialize + ?Sized>(
        &self,
        item_id: &str,
        payload: &T,
    ) -> Result<Payload, ClientError> {
        let endpoint = format!("/inventory/{}/output", path_segment(item_id));
        self.send(ApiRequest::patch(endpoint).json(payload)?).await
    }
}

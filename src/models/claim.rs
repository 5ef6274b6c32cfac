use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub deal_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub claim_id: i64,
    pub deal_id: i64,
    pub claimed_at: String,
    pub confirmed: bool,
}

/// A claim joined with its deal and restaurant for the orders page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub claim_id: i64,
    pub deal_id: i64,
    pub claimed_at: String,
    pub confirmed: bool,
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub updated_price: f64,
    pub pickup_start: String,
    pub pickup_end: String,
    pub restaurant_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total_count: i64,
}

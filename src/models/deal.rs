use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub original_price: f64,
    pub updated_price: f64,
    pub pickup_start: String,
    pub pickup_end: String,
    pub claimed: bool,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealCreateRequest {
    pub title: String,
    pub description: String,
    pub quantity: i64,
    pub original_price: f64,
    pub updated_price: f64,
    pub pickup_start: String,
    pub pickup_end: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealGetRequest {
    pub deal_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDeleteRequest {
    pub deal_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealListResponse {
    pub deals: Vec<DealResponse>,
    pub total_count: i64,
}

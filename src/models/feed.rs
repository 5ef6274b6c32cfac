use crate::feed::EnrichedDeal;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub deals: Vec<EnrichedDeal>,
    pub total_count: i64,
}

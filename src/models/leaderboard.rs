use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub name: String,
    pub location: String,
    pub points: i64,
    pub food_saved_kg: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub customers: Vec<LeaderboardEntry>,
    pub restaurants: Vec<LeaderboardEntry>,
}

use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySavings {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummaryResponse {
    pub total_deals: i64,
    pub claimed_deals: i64,
    pub total_claims: i64,
    pub money_saved: f64,
    pub portions_saved: i64,
    pub monthly_savings: Vec<MonthlySavings>,
}

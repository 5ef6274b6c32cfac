use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::database::{fetch_all, fetch_one, get_connection, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{AnalyticsSummaryResponse, MonthlySavings};

pub fn router() -> Router<AppState> {
    Router::new().route("/analytics/summary", post(analytics_summary))
}

pub(crate) fn build_summary(conn: &DbConn) -> AppResult<AnalyticsSummaryResponse> {
    let (total_deals, claimed_deals) =
        fetch_one(conn, queries::analytics::COUNT_DEALS, &[], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .ok_or_else(|| AppError::Internal("Failed to aggregate deals".to_string()))?;

    let (total_claims, money_saved, portions_saved) =
        fetch_one(conn, queries::analytics::CLAIM_TOTALS, &[], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?
        .ok_or_else(|| AppError::Internal("Failed to aggregate claims".to_string()))?;

    let monthly_savings = fetch_all(conn, queries::analytics::MONTHLY_SAVINGS, &[], |row| {
        Ok(MonthlySavings {
            month: row.get(0)?,
            amount: row.get(1)?,
        })
    })?;

    Ok(AnalyticsSummaryResponse {
        total_deals,
        claimed_deals,
        total_claims,
        money_saved,
        portions_saved,
        monthly_savings,
    })
}

async fn analytics_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<AnalyticsSummaryResponse>> {
    let conn = get_connection(&state.pool)?;
    Ok(Json(build_summary(&conn)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::claims::claim_deal_for_customer;
    use crate::test_utils::{create_test_deal, create_test_user, create_test_db};

    #[test]
    fn test_summary_empty_database() {
        let pool = create_test_db();
        let conn = pool.get().unwrap();

        let summary = build_summary(&conn).unwrap();

        assert_eq!(summary.total_deals, 0);
        assert_eq!(summary.claimed_deals, 0);
        assert_eq!(summary.total_claims, 0);
        assert_eq!(summary.money_saved, 0.0);
        assert!(summary.monthly_savings.is_empty());
    }

    #[test]
    fn test_summary_counts_claims_and_savings() {
        let pool = create_test_db();
        let mut conn = pool.get().unwrap();

        let restaurant = create_test_user(&pool, "Pasta Palace", "pasta@example.com", "restaurant");
        let customer = create_test_user(&pool, "Casey", "casey@example.com", "customer");

        // Fixture deals are priced 15.99 -> 6.99 with quantity 3
        let claimed = create_test_deal(&pool, restaurant, "Claimed deal");
        let _open = create_test_deal(&pool, restaurant, "Open deal");
        claim_deal_for_customer(&mut conn, claimed, customer).unwrap();

        let summary = build_summary(&conn).unwrap();

        assert_eq!(summary.total_deals, 2);
        assert_eq!(summary.claimed_deals, 1);
        assert_eq!(summary.total_claims, 1);
        assert!((summary.money_saved - 9.0).abs() < 1e-9);
        assert_eq!(summary.portions_saved, 3);
        assert_eq!(summary.monthly_savings.len(), 1);
    }
}

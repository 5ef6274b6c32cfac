use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::auth::{AppState, RequireCustomer};
use crate::constants::UNKNOWN_RESTAURANT;
use crate::database::{fetch_all, get_connection, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{ClaimRequest, ClaimResponse, OrderListResponse, OrderResponse};
use crate::utils::datetime::format_datetime;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals/claim", post(claim_deal))
        .route("/orders/list", post(list_orders))
}

/// Transitions a deal to claimed and records the claim event.
///
/// Both writes share one transaction and the claimed flag is check-and-set,
/// so two concurrent claims resolve to exactly one claim row: the loser's
/// conditional update touches zero rows and maps to NotFound or Conflict.
/// The UNIQUE constraint on claims.deal_id backstops the same invariant.
pub(crate) fn claim_deal_for_customer(
    conn: &mut DbConn,
    deal_id: i64,
    customer_id: i64,
) -> AppResult<ClaimResponse> {
    let claimed_at = format_datetime(&Utc::now());

    let tx = conn.transaction()?;

    let updated = tx.execute(queries::deals::MARK_CLAIMED, params![deal_id])?;
    if updated == 0 {
        let exists: Option<i64> = tx
            .query_row(queries::deals::CHECK_EXISTS, params![deal_id], |row| {
                row.get(0)
            })
            .optional()?;

        return Err(match exists {
            Some(_) => AppError::Conflict("Deal already claimed".to_string()),
            None => AppError::NotFound("Deal not found".to_string()),
        });
    }

    tx.execute(
        queries::claims::INSERT,
        params![deal_id, customer_id, claimed_at],
    )?;
    let claim_id = tx.last_insert_rowid();

    tx.commit()?;

    Ok(ClaimResponse {
        claim_id,
        deal_id,
        claimed_at,
        confirmed: false,
    })
}

async fn claim_deal(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Json(request): Json<ClaimRequest>,
) -> AppResult<Json<ClaimResponse>> {
    let mut conn = get_connection(&state.pool)?;
    let claim = claim_deal_for_customer(&mut conn, request.deal_id, customer.id)?;
    Ok(Json(claim))
}

fn map_order_row(row: &rusqlite::Row) -> rusqlite::Result<OrderResponse> {
    Ok(OrderResponse {
        claim_id: row.get(0)?,
        deal_id: row.get(1)?,
        claimed_at: row.get(2)?,
        confirmed: row.get::<_, i32>(3)? != 0,
        title: row.get(4)?,
        description: row.get(5)?,
        quantity: row.get(6)?,
        updated_price: row.get(7)?,
        pickup_start: row.get(8)?,
        pickup_end: row.get(9)?,
        restaurant_name: row
            .get::<_, Option<String>>(10)?
            .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string()),
    })
}

async fn list_orders(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> AppResult<Json<OrderListResponse>> {
    let conn = get_connection(&state.pool)?;

    let orders = fetch_all(
        &conn,
        queries::claims::SELECT_FOR_CUSTOMER,
        &[&customer.id],
        map_order_row,
    )?;

    let total_count = orders.len() as i64;

    Ok(Json(OrderListResponse {
        orders,
        total_count,
    }))
}

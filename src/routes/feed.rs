use axum::{extract::State, routing::post, Json, Router};
use std::collections::HashMap;

use crate::auth::{AppState, RequireCustomer};
use crate::database::{fetch_all, fetch_one, get_connection, queries, DbConn};
use crate::error::AppResult;
use crate::feed::{assemble_feed, DealRecord, RestaurantRecord};
use crate::models::FeedResponse;
use crate::routes::deals::fetch_images_by_deal_ids;
use crate::utils::distance::Coordinate;

pub fn router() -> Router<AppState> {
    Router::new().route("/feed/nearby", post(nearby_deals))
}

async fn nearby_deals(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> AppResult<Json<FeedResponse>> {
    let conn = get_connection(&state.pool)?;
    let feed = build_feed(&conn, customer.id)?;
    Ok(Json(feed))
}

fn map_deal_record(row: &rusqlite::Row) -> rusqlite::Result<DealRecord> {
    Ok(DealRecord {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        quantity: row.get(4)?,
        original_price: row.get(5)?,
        updated_price: row.get(6)?,
        pickup_start: row.get(7)?,
        pickup_end: row.get(8)?,
        claimed: row.get::<_, i32>(9)? != 0,
        created_at: row.get(10)?,
    })
}

/// Batch restaurant lookup, one query regardless of feed size.
fn fetch_restaurants_by_ids(
    conn: &DbConn,
    ids: &[i64],
) -> AppResult<HashMap<i64, RestaurantRecord>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = queries::feed::SELECT_RESTAURANTS_BY_IDS.replace("{}", &placeholders);

    let params: Vec<Box<dyn rusqlite::ToSql>> = ids
        .iter()
        .map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>)
        .collect();
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let rows = fetch_all(conn, &sql, &param_refs, |row| {
        Ok(RestaurantRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            coordinate: Coordinate::from_parts(row.get(2)?, row.get(3)?),
        })
    })?;

    Ok(rows.into_iter().map(|r| (r.id, r)).collect())
}

/// Assembles the proximity-sorted feed for one customer from a fresh
/// snapshot: unclaimed deals, then their restaurants and images resolved in
/// one batch each before enrichment.
pub(crate) fn build_feed(conn: &DbConn, customer_id: i64) -> AppResult<FeedResponse> {
    let coordinate = fetch_one(
        conn,
        queries::users::SELECT_COORDINATE,
        &[&customer_id],
        |row| {
            Ok((
                row.get::<_, Option<f64>>(0)?,
                row.get::<_, Option<f64>>(1)?,
            ))
        },
    )?
    .and_then(|(latitude, longitude)| Coordinate::from_parts(latitude, longitude));

    let deals = fetch_all(conn, queries::deals::SELECT_UNCLAIMED, &[], map_deal_record)?;

    let mut restaurant_ids: Vec<i64> = deals.iter().map(|d| d.restaurant_id).collect();
    restaurant_ids.sort_unstable();
    restaurant_ids.dedup();
    let restaurants_by_id = fetch_restaurants_by_ids(conn, &restaurant_ids)?;

    let deal_ids: Vec<i64> = deals.iter().map(|d| d.id).collect();
    let images_by_deal_id = fetch_images_by_deal_ids(conn, &deal_ids)?;

    let deals = assemble_feed(coordinate, deals, &restaurants_by_id, &images_by_deal_id)?;
    let total_count = deals.len() as i64;

    Ok(FeedResponse { deals, total_count })
}

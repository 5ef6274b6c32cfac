use axum::{extract::State, routing::post, Json, Router};
use std::collections::HashMap;

use crate::auth::{AppState, CurrentUser, RequireRestaurant};
use crate::database::{execute_query, fetch_all, fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    DealCreateRequest, DealDeleteRequest, DealGetRequest, DealListResponse, DealResponse,
};
use crate::utils::datetime::parse_datetime;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals/create", post(create_deal))
        .route("/deals/list", post(list_deals))
        .route("/deals/get", post(get_deal))
        .route("/deals/delete", post(delete_deal))
}

struct DealRow {
    id: i64,
    restaurant_id: i64,
    title: String,
    description: String,
    quantity: i64,
    original_price: f64,
    updated_price: f64,
    pickup_start: String,
    pickup_end: String,
    claimed: i32,
    created_at: String,
}

fn map_deal_row(row: &rusqlite::Row) -> rusqlite::Result<DealRow> {
    Ok(DealRow {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        quantity: row.get(4)?,
        original_price: row.get(5)?,
        updated_price: row.get(6)?,
        pickup_start: row.get(7)?,
        pickup_end: row.get(8)?,
        claimed: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn to_response(row: DealRow, image_url: Option<String>) -> DealResponse {
    DealResponse {
        id: row.id,
        restaurant_id: row.restaurant_id,
        title: row.title,
        description: row.description,
        quantity: row.quantity,
        original_price: row.original_price,
        updated_price: row.updated_price,
        pickup_start: row.pickup_start,
        pickup_end: row.pickup_end,
        claimed: row.claimed != 0,
        image_url,
        created_at: row.created_at,
    }
}

fn validate_deal_request(request: &DealCreateRequest) -> AppResult<()> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }

    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Description must not be empty".to_string(),
        ));
    }

    if request.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be a positive number".to_string(),
        ));
    }

    if request.original_price < 0.0 || request.updated_price < 0.0 {
        return Err(AppError::Validation(
            "Prices must not be negative".to_string(),
        ));
    }

    if request.updated_price > request.original_price {
        return Err(AppError::Validation(
            "Discounted price must not exceed the original price".to_string(),
        ));
    }

    let start = parse_datetime(&request.pickup_start)
        .ok_or_else(|| AppError::Validation("Invalid pickup start time".to_string()))?;
    let end = parse_datetime(&request.pickup_end)
        .ok_or_else(|| AppError::Validation("Invalid pickup end time".to_string()))?;

    if end <= start {
        return Err(AppError::Validation(
            "Pickup window must end after it starts".to_string(),
        ));
    }

    Ok(())
}

fn insert_deal(
    conn: &DbConn,
    restaurant_id: i64,
    request: &DealCreateRequest,
) -> AppResult<DealResponse> {
    validate_deal_request(request)?;

    let deal_id = insert_returning_id(
        conn,
        queries::deals::INSERT,
        &[
            &restaurant_id,
            &request.title.trim(),
            &request.description.trim(),
            &request.quantity,
            &request.original_price,
            &request.updated_price,
            &request.pickup_start,
            &request.pickup_end,
        ],
    )?;

    if let Some(ref url) = request.image_url {
        execute_query(conn, queries::deals::INSERT_IMAGE, &[&deal_id, url])?;
    }

    let row = fetch_one(conn, queries::deals::SELECT_BY_ID, &[&deal_id], map_deal_row)?
        .ok_or_else(|| AppError::Internal("Failed to create deal".to_string()))?;

    Ok(to_response(row, request.image_url.clone()))
}

/// Batch image lookup for a set of deals, one query regardless of count.
pub(crate) fn fetch_images_by_deal_ids(
    conn: &DbConn,
    deal_ids: &[i64],
) -> AppResult<HashMap<i64, String>> {
    if deal_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders: String = deal_ids
        .iter()
        .map(|_| "?")
        .collect::<Vec<_>>()
        .join(",");
    let sql = queries::deals::SELECT_IMAGES_FOR_DEALS.replace("{}", &placeholders);

    let params: Vec<Box<dyn rusqlite::ToSql>> = deal_ids
        .iter()
        .map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>)
        .collect();
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let rows = fetch_all(conn, &sql, &param_refs, |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    Ok(rows.into_iter().collect())
}

async fn create_deal(
    State(state): State<AppState>,
    RequireRestaurant(restaurant): RequireRestaurant,
    Json(request): Json<DealCreateRequest>,
) -> AppResult<Json<DealResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    let deal = insert_deal(&conn, restaurant.id, &request)?;
    Ok(Json(deal))
}

async fn list_deals(
    State(state): State<AppState>,
    RequireRestaurant(restaurant): RequireRestaurant,
) -> AppResult<Json<DealListResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;

    let rows = fetch_all(
        &conn,
        queries::deals::SELECT_FOR_RESTAURANT,
        &[&restaurant.id],
        map_deal_row,
    )?;

    let deal_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut images = fetch_images_by_deal_ids(&conn, &deal_ids)?;

    let deals: Vec<DealResponse> = rows
        .into_iter()
        .map(|row| {
            let image = images.remove(&row.id);
            to_response(row, image)
        })
        .collect();

    let total_count = deals.len() as i64;

    Ok(Json(DealListResponse { deals, total_count }))
}

async fn get_deal(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<DealGetRequest>,
) -> AppResult<Json<DealResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;

    let row = fetch_one(
        &conn,
        queries::deals::SELECT_BY_ID,
        &[&request.deal_id],
        map_deal_row,
    )?
    .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

    let image = fetch_one(
        &conn,
        queries::deals::SELECT_IMAGE,
        &[&request.deal_id],
        |r| r.get::<_, String>(0),
    )?;

    Ok(Json(to_response(row, image)))
}

async fn delete_deal(
    State(state): State<AppState>,
    RequireRestaurant(restaurant): RequireRestaurant,
    Json(request): Json<DealDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;

    let owned = fetch_one(
        &conn,
        queries::deals::CHECK_OWNERSHIP,
        &[&request.deal_id, &restaurant.id],
        |row| row.get::<_, i64>(0),
    )?;

    if owned.is_none() {
        let exists = fetch_one(
            &conn,
            queries::deals::CHECK_EXISTS,
            &[&request.deal_id],
            |row| row.get::<_, i64>(0),
        )?;
        return Err(match exists {
            Some(_) => AppError::Authorization("Deal belongs to another restaurant".to_string()),
            None => AppError::NotFound("Deal not found".to_string()),
        });
    }

    execute_query(&conn, queries::deals::DELETE, &[&request.deal_id])?;

    Ok(Json(
        serde_json::json!({"message": "Deal deleted successfully"}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, create_test_user};

    fn make_request() -> DealCreateRequest {
        DealCreateRequest {
            title: "Fresh Baguettes".to_string(),
            description: "Freshly baked baguettes from today".to_string(),
            quantity: 15,
            original_price: 12.99,
            updated_price: 4.99,
            pickup_start: "2025-06-01T17:00:00".to_string(),
            pickup_end: "2025-06-01T20:00:00".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_deal() {
        assert!(validate_deal_request(&make_request()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut request = make_request();
        request.title = "   ".to_string();
        assert!(matches!(
            validate_deal_request(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        let mut request = make_request();
        request.quantity = 0;
        assert!(validate_deal_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_price_increase() {
        let mut request = make_request();
        request.updated_price = 13.99;
        assert!(validate_deal_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_pickup_window() {
        let mut request = make_request();
        request.pickup_start = "2025-06-01T20:00:00".to_string();
        request.pickup_end = "2025-06-01T17:00:00".to_string();
        assert!(validate_deal_request(&request).is_err());
    }

    #[test]
    fn test_insert_deal_round_trip() {
        let pool = create_test_db();
        let conn = pool.get().unwrap();
        let restaurant_id = create_test_user(&pool, "Pasta Palace", "pasta@example.com", "restaurant");

        let mut request = make_request();
        request.image_url = Some("https://img.example/baguette.jpg".to_string());

        let deal = insert_deal(&conn, restaurant_id, &request).unwrap();

        assert_eq!(deal.restaurant_id, restaurant_id);
        assert_eq!(deal.title, "Fresh Baguettes");
        assert!(!deal.claimed);
        assert_eq!(
            deal.image_url.as_deref(),
            Some("https://img.example/baguette.jpg")
        );
    }

    #[test]
    fn test_fetch_images_batches_only_requested_deals() {
        let pool = create_test_db();
        let conn = pool.get().unwrap();
        let restaurant_id = create_test_user(&pool, "Pasta Palace", "pasta@example.com", "restaurant");

        let mut with_image = make_request();
        with_image.image_url = Some("https://img.example/1.jpg".to_string());
        let first = insert_deal(&conn, restaurant_id, &with_image).unwrap();

        let second = insert_deal(&conn, restaurant_id, &make_request()).unwrap();

        let images = fetch_images_by_deal_ids(&conn, &[first.id, second.id]).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images.get(&first.id).map(String::as_str), Some("https://img.example/1.jpg"));

        let none = fetch_images_by_deal_ids(&conn, &[]).unwrap();
        assert!(none.is_empty());
    }
}

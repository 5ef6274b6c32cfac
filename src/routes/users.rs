use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{hash_password, AppState, CurrentUser, USER_TYPE_CUSTOMER, USER_TYPE_RESTAURANT};
use crate::constants::MIN_PASSWORD_LENGTH;
use crate::database::{execute_query, fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    CustomerSignupRequest, RestaurantSignupRequest, UpdateLocationRequest, UserResponse,
};
use crate::utils::distance::Coordinate;
use crate::utils::geocoding::geocode_address;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/signup/customer", post(signup_customer))
        .route("/user/signup/restaurant", post(signup_restaurant))
        .route("/user/get", post(get_user))
        .route("/user/location", post(update_location))
}

fn map_user_row(row: &rusqlite::Row) -> rusqlite::Result<UserResponse> {
    Ok(UserResponse {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        user_type: row.get(3)?,
        address: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        is_active: row.get::<_, i32>(7)? != 0,
        created_at: row.get(8)?,
    })
}

fn validate_signup(name: &str, email: &str, password: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }

    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

fn validate_coordinate(latitude: f64, longitude: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }

    Ok(())
}

fn insert_user(
    conn: &DbConn,
    name: &str,
    email: &str,
    password: &str,
    user_type: &str,
    address: Option<&str>,
    coordinate: Option<Coordinate>,
) -> AppResult<UserResponse> {
    let existing = fetch_one(conn, queries::users::SELECT_ID_BY_EMAIL, &[&email], |row| {
        row.get::<_, i64>(0)
    })?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let hashed = hash_password(password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let latitude = coordinate.map(|c| c.latitude);
    let longitude = coordinate.map(|c| c.longitude);

    let user_id = insert_returning_id(
        conn,
        queries::users::INSERT,
        &[
            &name, &email, &hashed, &user_type, &address, &latitude, &longitude,
        ],
    )?;

    fetch_one(conn, queries::users::SELECT_BY_ID, &[&user_id], map_user_row)?
        .ok_or_else(|| AppError::Internal("Failed to create user".to_string()))
}

async fn signup_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerSignupRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_signup(&request.name, &request.email, &request.password)?;

    let coordinate = Coordinate::from_parts(request.latitude, request.longitude);
    if let Some(c) = coordinate {
        validate_coordinate(c.latitude, c.longitude)?;
    }

    let conn = state.pool.get().map_err(AppError::Pool)?;
    let user = insert_user(
        &conn,
        request.name.trim(),
        &request.email,
        &request.password,
        USER_TYPE_CUSTOMER,
        None,
        coordinate,
    )?;

    Ok(Json(user))
}

async fn signup_restaurant(
    State(state): State<AppState>,
    Json(request): Json<RestaurantSignupRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_signup(&request.name, &request.email, &request.password)?;

    if request.address.trim().is_empty() {
        return Err(AppError::Validation(
            "Address must not be empty".to_string(),
        ));
    }

    let mut coordinate = Coordinate::from_parts(request.latitude, request.longitude);
    if let Some(c) = coordinate {
        validate_coordinate(c.latitude, c.longitude)?;
    }

    // Without an explicit coordinate, geocode the street address off the
    // runtime; failure leaves the restaurant unlocated (and hidden from
    // distance-sorted feeds until a coordinate is set).
    if coordinate.is_none() {
        let geo_config = state.config.geocoding.clone();
        let address = request.address.clone();
        coordinate = tokio::task::spawn_blocking(move || geocode_address(&geo_config, &address))
            .await
            .unwrap_or(None);
    }

    let conn = state.pool.get().map_err(AppError::Pool)?;
    let user = insert_user(
        &conn,
        request.name.trim(),
        &request.email,
        &request.password,
        USER_TYPE_RESTAURANT,
        Some(request.address.trim()),
        coordinate,
    )?;

    Ok(Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;

    let user = fetch_one(
        &conn,
        queries::users::SELECT_BY_ID,
        &[&current_user.id],
        map_user_row,
    )?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

async fn update_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<UpdateLocationRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_coordinate(request.latitude, request.longitude)?;

    let conn = state.pool.get().map_err(AppError::Pool)?;

    execute_query(
        &conn,
        queries::users::UPDATE_COORDINATE,
        &[&request.latitude, &request.longitude, &current_user.id],
    )?;

    let user = fetch_one(
        &conn,
        queries::users::SELECT_BY_ID,
        &[&current_user.id],
        map_user_row,
    )?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

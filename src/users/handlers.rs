use anyhow::Context;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::{get, patch, post},
    Router,
};
use indexmap::IndexMap;
use tracing::{info, instrument};

use crate::{
    auth::{extractors::AuthUser, password::hash_password},
    envelope::Envelope,
    error::AppError,
    geo::{format_km, haversine_km},
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreatedUser, DistanceQuery, WeekQuery},
        extractors::JsonOrForm,
        repo_types::{NewUser, UserSummary},
        services::{
            current_week_windows, parse_destination, parse_week_numbers, validate_new_user,
        },
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create-user", post(create_user))
        .route("/users/change-status", patch(change_status))
        .route("/users/get-distance", post(get_distance).get(get_distance))
        .route("/users/get-all-users", get(get_all_users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<CreateUserRequest>,
) -> Result<Envelope<CreatedUser>, AppError> {
    let input = validate_new_user(payload)?;

    if state.users.find_by_email(&input.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password = input.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")??;

    let user = state
        .users
        .insert(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
        })
        .await?;

    let token = state.keys.sign(user.id, user.latitude, user.longitude)?;
    state.users.set_token(user.id, &token).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Envelope::ok(
        "User created successfully",
        CreatedUser::new(user, token),
    ))
}

#[instrument(skip(state, _caller))]
pub async fn change_status(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Envelope<()>, AppError> {
    let affected = state.users.toggle_all_statuses().await?;
    info!(affected, "user statuses toggled");
    Ok(Envelope::message(
        axum::http::StatusCode::OK,
        "User status updated successfully",
    ))
}

#[instrument(skip(claims, query), fields(user_id = %claims.sub))]
pub async fn get_distance(
    AuthUser(claims): AuthUser,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Envelope<()>, AppError> {
    let invalid = || {
        AppError::InvalidParameters(
            "Valid destination latitude and longitude are required.".into(),
        )
    };
    let Query(query) = query.map_err(|_| invalid())?;
    let dest_lat = parse_destination(query.destination_latitude.as_deref()).ok_or_else(invalid)?;
    let dest_lon = parse_destination(query.destination_longitude.as_deref()).ok_or_else(invalid)?;

    let km = haversine_km(claims.latitude, claims.longitude, dest_lat, dest_lon);
    tracing::debug!(
        origin_lat = claims.latitude,
        origin_lon = claims.longitude,
        dest_lat,
        dest_lon,
        km,
        "distance calculated"
    );
    Ok(Envelope::distance(
        "Distance calculated successfully",
        format_km(km),
    ))
}

#[instrument(skip(state, _caller, query))]
pub async fn get_all_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    query: Result<Query<WeekQuery>, QueryRejection>,
) -> Result<Envelope<IndexMap<String, Vec<UserSummary>>>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::InvalidParameters(e.body_text()))?;
    let offsets = parse_week_numbers(query.week_numbers.as_deref())?;

    // Keys keep request order; a repeated weekday keeps its first position.
    let mut results = IndexMap::new();
    for window in current_week_windows(state.config.utc_offset, &offsets)? {
        let users = state
            .users
            .list_registered_between(window.start, window.end)
            .await?;
        results.insert(window.weekday, users);
    }

    Ok(Envelope::ok("User listing retrieved successfully", results))
}

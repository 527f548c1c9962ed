use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use carlot_service::{CreateListing, ListQuery, Operation};
use carlot_types::{Listing, ListingUpdate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::Bearer;
use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Body of a successful create.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /api/cars?userId=&search=`
pub async fn list_cars(
    State(state): State<AppState>,
    Bearer(credentials): Bearer,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let listings = state.listings.list(&credentials, &query).await?;
    Ok(Json(listings))
}

/// `POST /api/cars`
///
/// The credential is checked before the body is decoded, so an anonymous
/// request is a 401 whatever it carries.
pub async fn create_car(
    State(state): State<AppState>,
    Bearer(credentials): Bearer,
    body: Result<Json<CreateListing>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let subject = state.listings.authenticate(&credentials).await?;
    let Json(body) = body.map_err(|e| ApiError::invalid_body(Operation::Create, &e))?;
    let id = state.listings.create_as(&subject, body).await?;
    Ok(Json(CreatedResponse { id: id.to_string() }))
}

/// `GET /api/cars/:id`
pub async fn get_car(
    State(state): State<AppState>,
    Bearer(credentials): Bearer,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    let listing = state.listings.get(&credentials, &id).await?;
    Ok(Json(listing))
}

/// `PUT /api/cars/:id`
pub async fn update_car(
    State(state): State<AppState>,
    Bearer(credentials): Bearer,
    Path(id): Path<String>,
    body: Result<Json<ListingUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let subject = state.listings.authenticate(&credentials).await?;
    let Json(body) = body.map_err(|e| ApiError::invalid_body(Operation::Update, &e))?;
    state.listings.update_as(&subject, &id, body).await?;
    Ok(Json(json!({ "message": "Car updated successfully" })))
}

/// `DELETE /api/cars/:id`
pub async fn delete_car(
    State(state): State<AppState>,
    Bearer(credentials): Bearer,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.listings.delete(&credentials, &id).await?;
    Ok(Json(json!({ "message": "Car deleted successfully" })))
}

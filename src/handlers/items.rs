use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::Result,
    models::{
        Activity, Flight, Hotel, ItemType, NewActivity, NewFlight, NewHotel, NewRestaurant,
        Restaurant, UpdateActivityRequest, UpdateFlightRequest, UpdateHotelRequest,
        UpdateRestaurantRequest,
    },
    services::item_service,
};

#[derive(Debug, Deserialize)]
pub struct DeleteItemQuery {
    pub id: Uuid,
}

// Flights

pub async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>> {
    let flights = item_service::list_flights(&state.db).await?;
    Ok(Json(flights))
}

pub async fn create_flight(
    State(state): State<AppState>,
    Json(payload): Json<NewFlight>,
) -> Result<Json<Flight>> {
    payload.validate()?;

    let flight = item_service::create_flight(&state.db, &payload).await?;
    Ok(Json(flight))
}

pub async fn update_flight(
    State(state): State<AppState>,
    Json(payload): Json<UpdateFlightRequest>,
) -> Result<Json<Flight>> {
    let flight = item_service::update_flight(&state.db, &payload).await?;
    Ok(Json(flight))
}

pub async fn delete_flight(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemQuery>,
) -> Result<Json<Value>> {
    item_service::delete_item(&state.db, ItemType::Flight, params.id).await?;
    Ok(Json(json!({ "success": true })))
}

// Hotels

pub async fn list_hotels(State(state): State<AppState>) -> Result<Json<Vec<Hotel>>> {
    let hotels = item_service::list_hotels(&state.db).await?;
    Ok(Json(hotels))
}

pub async fn create_hotel(
    State(state): State<AppState>,
    Json(payload): Json<NewHotel>,
) -> Result<Json<Hotel>> {
    payload.validate()?;

    let hotel = item_service::create_hotel(&state.db, &payload).await?;
    Ok(Json(hotel))
}

pub async fn update_hotel(
    State(state): State<AppState>,
    Json(payload): Json<UpdateHotelRequest>,
) -> Result<Json<Hotel>> {
    let hotel = item_service::update_hotel(&state.db, &payload).await?;
    Ok(Json(hotel))
}

pub async fn delete_hotel(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemQuery>,
) -> Result<Json<Value>> {
    item_service::delete_item(&state.db, ItemType::Hotel, params.id).await?;
    Ok(Json(json!({ "success": true })))
}

// Activities

pub async fn list_activities(State(state): State<AppState>) -> Result<Json<Vec<Activity>>> {
    let activities = item_service::list_activities(&state.db).await?;
    Ok(Json(activities))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(payload): Json<NewActivity>,
) -> Result<Json<Activity>> {
    payload.validate()?;

    let activity = item_service::create_activity(&state.db, &payload).await?;
    Ok(Json(activity))
}

pub async fn update_activity(
    State(state): State<AppState>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>> {
    let activity = item_service::update_activity(&state.db, &payload).await?;
    Ok(Json(activity))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemQuery>,
) -> Result<Json<Value>> {
    item_service::delete_item(&state.db, ItemType::Activity, params.id).await?;
    Ok(Json(json!({ "success": true })))
}

// Restaurants

pub async fn list_restaurants(State(state): State<AppState>) -> Result<Json<Vec<Restaurant>>> {
    let restaurants = item_service::list_restaurants(&state.db).await?;
    Ok(Json(restaurants))
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<NewRestaurant>,
) -> Result<Json<Restaurant>> {
    payload.validate()?;

    let restaurant = item_service::create_restaurant(&state.db, &payload).await?;
    Ok(Json(restaurant))
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> Result<Json<Restaurant>> {
    let restaurant = item_service::update_restaurant(&state.db, &payload).await?;
    Ok(Json(restaurant))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemQuery>,
) -> Result<Json<Value>> {
    item_service::delete_item(&state.db, ItemType::Restaurant, params.id).await?;
    Ok(Json(json!({ "success": true })))
}

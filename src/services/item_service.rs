use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Activity, Comment, Flight, Hotel, ItemType, NewActivity, NewFlight, NewHotel, NewRestaurant,
    Restaurant, UpdateActivityRequest, UpdateFlightRequest, UpdateHotelRequest,
    UpdateRestaurantRequest, Vote,
};

/// Votes and comments for every item of one type, grouped by item id.
/// Comments come back in ascending creation order.
async fn children_for(
    db: &PgPool,
    item_type: ItemType,
) -> Result<(HashMap<Uuid, Vec<Vote>>, HashMap<Uuid, Vec<Comment>>)> {
    let votes: Vec<Vote> = sqlx::query_as("SELECT * FROM votes WHERE item_type = $1")
        .bind(item_type)
        .fetch_all(db)
        .await?;

    let comments: Vec<Comment> =
        sqlx::query_as("SELECT * FROM comments WHERE item_type = $1 ORDER BY created_at ASC")
            .bind(item_type)
            .fetch_all(db)
            .await?;

    let mut votes_by_item: HashMap<Uuid, Vec<Vote>> = HashMap::new();
    for vote in votes {
        votes_by_item.entry(vote.item_id).or_default().push(vote);
    }

    let mut comments_by_item: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        comments_by_item
            .entry(comment.item_id)
            .or_default()
            .push(comment);
    }

    Ok((votes_by_item, comments_by_item))
}

async fn children_of(
    db: &PgPool,
    item_type: ItemType,
    item_id: Uuid,
) -> Result<(Vec<Vote>, Vec<Comment>)> {
    let votes: Vec<Vote> =
        sqlx::query_as("SELECT * FROM votes WHERE item_type = $1 AND item_id = $2")
            .bind(item_type)
            .bind(item_id)
            .fetch_all(db)
            .await?;

    let comments: Vec<Comment> = sqlx::query_as(
        "SELECT * FROM comments WHERE item_type = $1 AND item_id = $2 ORDER BY created_at ASC",
    )
    .bind(item_type)
    .bind(item_id)
    .fetch_all(db)
    .await?;

    Ok((votes, comments))
}

pub async fn item_exists(db: &PgPool, item_type: ItemType, item_id: Uuid) -> Result<bool> {
    let row: Option<(Uuid,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE id = $1", item_type.table()))
            .bind(item_id)
            .fetch_optional(db)
            .await?;

    Ok(row.is_some())
}

/// Deletes an item and its polymorphic children in one transaction.
pub async fn delete_item(db: &PgPool, item_type: ItemType, id: Uuid) -> Result<()> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", item_type.table()))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "{} not found",
            item_type.as_str()
        )));
    }

    sqlx::query("DELETE FROM votes WHERE item_type = $1 AND item_id = $2")
        .bind(item_type)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM comments WHERE item_type = $1 AND item_id = $2")
        .bind(item_type)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

// Flights

pub async fn list_flights(db: &PgPool) -> Result<Vec<Flight>> {
    let mut flights: Vec<Flight> = sqlx::query_as("SELECT * FROM flights ORDER BY created_at ASC")
        .fetch_all(db)
        .await?;

    let (mut votes, mut comments) = children_for(db, ItemType::Flight).await?;
    for item in flights.iter_mut() {
        if let Some(id) = item.id.as_server() {
            item.votes = votes.remove(&id).unwrap_or_default();
            item.comments = comments.remove(&id).unwrap_or_default();
        }
    }

    Ok(flights)
}

pub async fn create_flight(db: &PgPool, new: &NewFlight) -> Result<Flight> {
    let flight: Flight = sqlx::query_as(
        r#"
        INSERT INTO flights (id, traveler_name, airline, price_3_night, price_4_night,
                             inbound_flight, outbound_flight, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.traveler_name)
    .bind(&new.airline)
    .bind(new.price_3_night)
    .bind(new.price_4_night)
    .bind(&new.inbound_flight)
    .bind(&new.outbound_flight)
    .bind(&new.notes)
    .fetch_one(db)
    .await?;

    Ok(flight)
}

pub async fn update_flight(db: &PgPool, req: &UpdateFlightRequest) -> Result<Flight> {
    let flight: Option<Flight> = sqlx::query_as(
        r#"
        UPDATE flights SET
            traveler_name = COALESCE($2, traveler_name),
            airline = COALESCE($3, airline),
            price_3_night = COALESCE($4, price_3_night),
            price_4_night = COALESCE($5, price_4_night),
            inbound_flight = COALESCE($6, inbound_flight),
            outbound_flight = COALESCE($7, outbound_flight),
            notes = COALESCE($8, notes)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.patch.traveler_name)
    .bind(&req.patch.airline)
    .bind(req.patch.price_3_night)
    .bind(req.patch.price_4_night)
    .bind(&req.patch.inbound_flight)
    .bind(&req.patch.outbound_flight)
    .bind(&req.patch.notes)
    .fetch_optional(db)
    .await?;

    let mut flight = flight.ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let (votes, comments) = children_of(db, ItemType::Flight, req.id).await?;
    flight.votes = votes;
    flight.comments = comments;

    Ok(flight)
}

// Hotels

pub async fn list_hotels(db: &PgPool) -> Result<Vec<Hotel>> {
    let mut hotels: Vec<Hotel> = sqlx::query_as("SELECT * FROM hotels ORDER BY created_at ASC")
        .fetch_all(db)
        .await?;

    let (mut votes, mut comments) = children_for(db, ItemType::Hotel).await?;
    for item in hotels.iter_mut() {
        if let Some(id) = item.id.as_server() {
            item.votes = votes.remove(&id).unwrap_or_default();
            item.comments = comments.remove(&id).unwrap_or_default();
        }
    }

    Ok(hotels)
}

pub async fn create_hotel(db: &PgPool, new: &NewHotel) -> Result<Hotel> {
    let hotel: Hotel = sqlx::query_as(
        r#"
        INSERT INTO hotels (id, name, url, total_price, per_person, includes, neighborhood, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.url)
    .bind(new.total_price)
    .bind(new.per_person)
    .bind(&new.includes)
    .bind(&new.neighborhood)
    .bind(&new.notes)
    .fetch_one(db)
    .await?;

    Ok(hotel)
}

pub async fn update_hotel(db: &PgPool, req: &UpdateHotelRequest) -> Result<Hotel> {
    let hotel: Option<Hotel> = sqlx::query_as(
        r#"
        UPDATE hotels SET
            name = COALESCE($2, name),
            url = COALESCE($3, url),
            total_price = COALESCE($4, total_price),
            per_person = COALESCE($5, per_person),
            includes = COALESCE($6, includes),
            neighborhood = COALESCE($7, neighborhood),
            notes = COALESCE($8, notes)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.patch.name)
    .bind(&req.patch.url)
    .bind(req.patch.total_price)
    .bind(req.patch.per_person)
    .bind(&req.patch.includes)
    .bind(&req.patch.neighborhood)
    .bind(&req.patch.notes)
    .fetch_optional(db)
    .await?;

    let mut hotel = hotel.ok_or_else(|| AppError::NotFound("Hotel not found".to_string()))?;

    let (votes, comments) = children_of(db, ItemType::Hotel, req.id).await?;
    hotel.votes = votes;
    hotel.comments = comments;

    Ok(hotel)
}

// Activities

pub async fn list_activities(db: &PgPool) -> Result<Vec<Activity>> {
    let mut activities: Vec<Activity> =
        sqlx::query_as("SELECT * FROM activities ORDER BY created_at ASC")
            .fetch_all(db)
            .await?;

    let (mut votes, mut comments) = children_for(db, ItemType::Activity).await?;
    for item in activities.iter_mut() {
        if let Some(id) = item.id.as_server() {
            item.votes = votes.remove(&id).unwrap_or_default();
            item.comments = comments.remove(&id).unwrap_or_default();
        }
    }

    Ok(activities)
}

pub async fn create_activity(db: &PgPool, new: &NewActivity) -> Result<Activity> {
    let activity: Activity = sqlx::query_as(
        r#"
        INSERT INTO activities (id, name, url, address, neighborhood, hours, days_closed, price)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.url)
    .bind(&new.address)
    .bind(&new.neighborhood)
    .bind(&new.hours)
    .bind(&new.days_closed)
    .bind(&new.price)
    .fetch_one(db)
    .await?;

    Ok(activity)
}

pub async fn update_activity(db: &PgPool, req: &UpdateActivityRequest) -> Result<Activity> {
    let activity: Option<Activity> = sqlx::query_as(
        r#"
        UPDATE activities SET
            name = COALESCE($2, name),
            url = COALESCE($3, url),
            address = COALESCE($4, address),
            neighborhood = COALESCE($5, neighborhood),
            hours = COALESCE($6, hours),
            days_closed = COALESCE($7, days_closed),
            price = COALESCE($8, price)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.patch.name)
    .bind(&req.patch.url)
    .bind(&req.patch.address)
    .bind(&req.patch.neighborhood)
    .bind(&req.patch.hours)
    .bind(&req.patch.days_closed)
    .bind(&req.patch.price)
    .fetch_optional(db)
    .await?;

    let mut activity =
        activity.ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

    let (votes, comments) = children_of(db, ItemType::Activity, req.id).await?;
    activity.votes = votes;
    activity.comments = comments;

    Ok(activity)
}

// Restaurants

pub async fn list_restaurants(db: &PgPool) -> Result<Vec<Restaurant>> {
    let mut restaurants: Vec<Restaurant> =
        sqlx::query_as("SELECT * FROM restaurants ORDER BY created_at ASC")
            .fetch_all(db)
            .await?;

    let (mut votes, mut comments) = children_for(db, ItemType::Restaurant).await?;
    for item in restaurants.iter_mut() {
        if let Some(id) = item.id.as_server() {
            item.votes = votes.remove(&id).unwrap_or_default();
            item.comments = comments.remove(&id).unwrap_or_default();
        }
    }

    Ok(restaurants)
}

pub async fn create_restaurant(db: &PgPool, new: &NewRestaurant) -> Result<Restaurant> {
    let restaurant: Restaurant = sqlx::query_as(
        r#"
        INSERT INTO restaurants (id, name, url, address, neighborhood, has_cocktails,
                                 cuisine_type, vegan_or_omni, hours, days_closed, price_range)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.url)
    .bind(&new.address)
    .bind(&new.neighborhood)
    .bind(new.has_cocktails)
    .bind(&new.cuisine_type)
    .bind(&new.vegan_or_omni)
    .bind(&new.hours)
    .bind(&new.days_closed)
    .bind(&new.price_range)
    .fetch_one(db)
    .await?;

    Ok(restaurant)
}

pub async fn update_restaurant(db: &PgPool, req: &UpdateRestaurantRequest) -> Result<Restaurant> {
    let restaurant: Option<Restaurant> = sqlx::query_as(
        r#"
        UPDATE restaurants SET
            name = COALESCE($2, name),
            url = COALESCE($3, url),
            address = COALESCE($4, address),
            neighborhood = COALESCE($5, neighborhood),
            has_cocktails = COALESCE($6, has_cocktails),
            cuisine_type = COALESCE($7, cuisine_type),
            vegan_or_omni = COALESCE($8, vegan_or_omni),
            hours = COALESCE($9, hours),
            days_closed = COALESCE($10, days_closed),
            price_range = COALESCE($11, price_range)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(req.id)
    .bind(&req.patch.name)
    .bind(&req.patch.url)
    .bind(&req.patch.address)
    .bind(&req.patch.neighborhood)
    .bind(req.patch.has_cocktails)
    .bind(&req.patch.cuisine_type)
    .bind(&req.patch.vegan_or_omni)
    .bind(&req.patch.hours)
    .bind(&req.patch.days_closed)
    .bind(&req.patch.price_range)
    .fetch_optional(db)
    .await?;

    let mut restaurant =
        restaurant.ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let (votes, comments) = children_of(db, ItemType::Restaurant, req.id).await?;
    restaurant.votes = votes;
    restaurant.comments = comments;

    Ok(restaurant)
}

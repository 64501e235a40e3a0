use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::EntityId;
use super::comment::Comment;
use super::vote::{Vote, score};

/// Discriminator over the four trip item variants. Votes and comments
/// reference their owning item through (ItemType, Uuid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Flight,
    Hotel,
    Activity,
    Restaurant,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Flight,
        ItemType::Hotel,
        ItemType::Activity,
        ItemType::Restaurant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Flight => "flight",
            ItemType::Hotel => "hotel",
            ItemType::Activity => "activity",
            ItemType::Restaurant => "restaurant",
        }
    }

    /// Table name, doubling as the API path segment.
    pub fn table(&self) -> &'static str {
        match self {
            ItemType::Flight => "flights",
            ItemType::Hotel => "hotels",
            ItemType::Activity => "activities",
            ItemType::Restaurant => "restaurants",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ItemType::Flight => 0,
            ItemType::Hotel => 1,
            ItemType::Activity => 2,
            ItemType::Restaurant => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Flight {
    pub id: EntityId,
    pub traveler_name: String,
    pub airline: Option<String>,
    pub price_3_night: Option<f64>,
    pub price_4_night: Option<f64>,
    pub inbound_flight: Option<String>,
    pub outbound_flight: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: EntityId,
    pub name: String,
    pub url: Option<String>,
    pub total_price: f64,
    pub per_person: f64,
    pub includes: Option<String>,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: EntityId,
    pub name: String,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: EntityId,
    pub name: String,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub has_cocktails: bool,
    pub cuisine_type: Option<String>,
    pub vegan_or_omni: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price_range: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

// Create requests
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NewFlight {
    #[validate(length(min = 1, max = 200))]
    pub traveler_name: String,
    pub airline: Option<String>,
    pub price_3_night: Option<f64>,
    pub price_4_night: Option<f64>,
    pub inbound_flight: Option<String>,
    pub outbound_flight: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NewHotel {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub url: Option<String>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub per_person: f64,
    pub includes: Option<String>,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NewActivity {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NewRestaurant {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub has_cocktails: bool,
    pub cuisine_type: Option<String>,
    pub vegan_or_omni: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price_range: Option<String>,
}

// Partial updates: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightPatch {
    pub traveler_name: Option<String>,
    pub airline: Option<String>,
    pub price_3_night: Option<f64>,
    pub price_4_night: Option<f64>,
    pub inbound_flight: Option<String>,
    pub outbound_flight: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub total_price: Option<f64>,
    pub per_person: Option<f64>,
    pub includes: Option<String>,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub has_cocktails: Option<bool>,
    pub cuisine_type: Option<String>,
    pub vegan_or_omni: Option<String>,
    pub hours: Option<String>,
    pub days_closed: Option<String>,
    pub price_range: Option<String>,
}

impl Flight {
    pub fn apply(&mut self, patch: &FlightPatch) {
        if let Some(v) = patch.traveler_name.clone() {
            self.traveler_name = v;
        }
        if patch.airline.is_some() {
            self.airline = patch.airline.clone();
        }
        if patch.price_3_night.is_some() {
            self.price_3_night = patch.price_3_night;
        }
        if patch.price_4_night.is_some() {
            self.price_4_night = patch.price_4_night;
        }
        if patch.inbound_flight.is_some() {
            self.inbound_flight = patch.inbound_flight.clone();
        }
        if patch.outbound_flight.is_some() {
            self.outbound_flight = patch.outbound_flight.clone();
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
    }
}

impl Hotel {
    pub fn apply(&mut self, patch: &HotelPatch) {
        if let Some(v) = patch.name.clone() {
            self.name = v;
        }
        if let Some(v) = patch.total_price {
            self.total_price = v;
        }
        if let Some(v) = patch.per_person {
            self.per_person = v;
        }
        if patch.url.is_some() {
            self.url = patch.url.clone();
        }
        if patch.includes.is_some() {
            self.includes = patch.includes.clone();
        }
        if patch.neighborhood.is_some() {
            self.neighborhood = patch.neighborhood.clone();
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
    }
}

impl Activity {
    pub fn apply(&mut self, patch: &ActivityPatch) {
        if let Some(v) = patch.name.clone() {
            self.name = v;
        }
        if patch.url.is_some() {
            self.url = patch.url.clone();
        }
        if patch.address.is_some() {
            self.address = patch.address.clone();
        }
        if patch.neighborhood.is_some() {
            self.neighborhood = patch.neighborhood.clone();
        }
        if patch.hours.is_some() {
            self.hours = patch.hours.clone();
        }
        if patch.days_closed.is_some() {
            self.days_closed = patch.days_closed.clone();
        }
        if patch.price.is_some() {
            self.price = patch.price.clone();
        }
    }
}

impl Restaurant {
    pub fn apply(&mut self, patch: &RestaurantPatch) {
        if let Some(v) = patch.name.clone() {
            self.name = v;
        }
        if let Some(v) = patch.has_cocktails {
            self.has_cocktails = v;
        }
        if patch.url.is_some() {
            self.url = patch.url.clone();
        }
        if patch.address.is_some() {
            self.address = patch.address.clone();
        }
        if patch.neighborhood.is_some() {
            self.neighborhood = patch.neighborhood.clone();
        }
        if patch.cuisine_type.is_some() {
            self.cuisine_type = patch.cuisine_type.clone();
        }
        if patch.vegan_or_omni.is_some() {
            self.vegan_or_omni = patch.vegan_or_omni.clone();
        }
        if patch.hours.is_some() {
            self.hours = patch.hours.clone();
        }
        if patch.days_closed.is_some() {
            self.days_closed = patch.days_closed.clone();
        }
        if patch.price_range.is_some() {
            self.price_range = patch.price_range.clone();
        }
    }
}

/// Tagged union over the four item variants. This is the unit the client
/// cache stores and the filter/sort layer consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum TripItem {
    Flight(Flight),
    Hotel(Hotel),
    Activity(Activity),
    Restaurant(Restaurant),
}

impl TripItem {
    pub fn kind(&self) -> ItemType {
        match self {
            TripItem::Flight(_) => ItemType::Flight,
            TripItem::Hotel(_) => ItemType::Hotel,
            TripItem::Activity(_) => ItemType::Activity,
            TripItem::Restaurant(_) => ItemType::Restaurant,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            TripItem::Flight(f) => &f.id,
            TripItem::Hotel(h) => &h.id,
            TripItem::Activity(a) => &a.id,
            TripItem::Restaurant(r) => &r.id,
        }
    }

    pub fn votes(&self) -> &[Vote] {
        match self {
            TripItem::Flight(f) => &f.votes,
            TripItem::Hotel(h) => &h.votes,
            TripItem::Activity(a) => &a.votes,
            TripItem::Restaurant(r) => &r.votes,
        }
    }

    pub fn votes_mut(&mut self) -> &mut Vec<Vote> {
        match self {
            TripItem::Flight(f) => &mut f.votes,
            TripItem::Hotel(h) => &mut h.votes,
            TripItem::Activity(a) => &mut a.votes,
            TripItem::Restaurant(r) => &mut r.votes,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        match self {
            TripItem::Flight(f) => &f.comments,
            TripItem::Hotel(h) => &h.comments,
            TripItem::Activity(a) => &a.comments,
            TripItem::Restaurant(r) => &r.comments,
        }
    }

    pub fn comments_mut(&mut self) -> &mut Vec<Comment> {
        match self {
            TripItem::Flight(f) => &mut f.comments,
            TripItem::Hotel(h) => &mut h.comments,
            TripItem::Activity(a) => &mut a.comments,
            TripItem::Restaurant(r) => &mut r.comments,
        }
    }

    pub fn score(&self) -> i64 {
        score(self.votes())
    }

    pub fn neighborhood(&self) -> Option<&str> {
        match self {
            TripItem::Hotel(h) => h.neighborhood.as_deref(),
            TripItem::Activity(a) => a.neighborhood.as_deref(),
            TripItem::Restaurant(r) => r.neighborhood.as_deref(),
            TripItem::Flight(_) => None,
        }
    }

    pub fn cuisine_type(&self) -> Option<&str> {
        match self {
            TripItem::Restaurant(r) => r.cuisine_type.as_deref(),
            _ => None,
        }
    }

    /// Free-text price field fed to the price parser.
    pub fn price_text(&self) -> Option<&str> {
        match self {
            TripItem::Activity(a) => a.price.as_deref(),
            TripItem::Restaurant(r) => r.price_range.as_deref(),
            _ => None,
        }
    }

    /// Materializes an optimistic item: placeholder id, empty children.
    pub fn from_new(new: &NewItem, id: EntityId, created_at: DateTime<Utc>) -> TripItem {
        match new {
            NewItem::Flight(n) => TripItem::Flight(Flight {
                id,
                traveler_name: n.traveler_name.clone(),
                airline: n.airline.clone(),
                price_3_night: n.price_3_night,
                price_4_night: n.price_4_night,
                inbound_flight: n.inbound_flight.clone(),
                outbound_flight: n.outbound_flight.clone(),
                notes: n.notes.clone(),
                created_at,
                votes: Vec::new(),
                comments: Vec::new(),
            }),
            NewItem::Hotel(n) => TripItem::Hotel(Hotel {
                id,
                name: n.name.clone(),
                url: n.url.clone(),
                total_price: n.total_price,
                per_person: n.per_person,
                includes: n.includes.clone(),
                neighborhood: n.neighborhood.clone(),
                notes: n.notes.clone(),
                created_at,
                votes: Vec::new(),
                comments: Vec::new(),
            }),
            NewItem::Activity(n) => TripItem::Activity(Activity {
                id,
                name: n.name.clone(),
                url: n.url.clone(),
                address: n.address.clone(),
                neighborhood: n.neighborhood.clone(),
                hours: n.hours.clone(),
                days_closed: n.days_closed.clone(),
                price: n.price.clone(),
                created_at,
                votes: Vec::new(),
                comments: Vec::new(),
            }),
            NewItem::Restaurant(n) => TripItem::Restaurant(Restaurant {
                id,
                name: n.name.clone(),
                url: n.url.clone(),
                address: n.address.clone(),
                neighborhood: n.neighborhood.clone(),
                has_cocktails: n.has_cocktails,
                cuisine_type: n.cuisine_type.clone(),
                vegan_or_omni: n.vegan_or_omni.clone(),
                hours: n.hours.clone(),
                days_closed: n.days_closed.clone(),
                price_range: n.price_range.clone(),
                created_at,
                votes: Vec::new(),
                comments: Vec::new(),
            }),
        }
    }

    /// Shallow-merges a same-kind patch; a mismatched kind is a no-op.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        match (self, patch) {
            (TripItem::Flight(f), ItemPatch::Flight(p)) => f.apply(p),
            (TripItem::Hotel(h), ItemPatch::Hotel(p)) => h.apply(p),
            (TripItem::Activity(a), ItemPatch::Activity(p)) => a.apply(p),
            (TripItem::Restaurant(r), ItemPatch::Restaurant(p)) => r.apply(p),
            _ => {}
        }
    }
}

/// Creation payload for any collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NewItem {
    Flight(NewFlight),
    Hotel(NewHotel),
    Activity(NewActivity),
    Restaurant(NewRestaurant),
}

impl NewItem {
    pub fn kind(&self) -> ItemType {
        match self {
            NewItem::Flight(_) => ItemType::Flight,
            NewItem::Hotel(_) => ItemType::Hotel,
            NewItem::Activity(_) => ItemType::Activity,
            NewItem::Restaurant(_) => ItemType::Restaurant,
        }
    }
}

/// Partial-update payload for any collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemPatch {
    Flight(FlightPatch),
    Hotel(HotelPatch),
    Activity(ActivityPatch),
    Restaurant(RestaurantPatch),
}

impl ItemPatch {
    pub fn kind(&self) -> ItemType {
        match self {
            ItemPatch::Flight(_) => ItemType::Flight,
            ItemPatch::Hotel(_) => ItemType::Hotel,
            ItemPatch::Activity(_) => ItemType::Activity,
            ItemPatch::Restaurant(_) => ItemType::Restaurant,
        }
    }
}

// Server-side update requests: `{id, ...optional fields}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFlightRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: FlightPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHotelRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: HotelPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: ActivityPatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: RestaurantPatch,
}

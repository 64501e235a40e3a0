pub mod comment;
pub mod id;
pub mod item;
pub mod presence;
pub mod user;
pub mod vote;

pub use comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
pub use id::EntityId;
pub use item::{
    Activity, ActivityPatch, Flight, FlightPatch, Hotel, HotelPatch, ItemPatch, ItemType, NewActivity,
    NewFlight, NewHotel, NewItem, NewRestaurant, Restaurant, RestaurantPatch, TripItem,
    UpdateActivityRequest, UpdateFlightRequest, UpdateHotelRequest, UpdateRestaurantRequest,
};
pub use presence::{HeartbeatRequest, ONLINE_WINDOW_SECS, OnlineUser};
pub use user::{LoginRequest, LoginResponse, User, UserSummary};
pub use vote::{Vote, VoteAction, VoteOutcome, VoteRequest, VoteType, score};

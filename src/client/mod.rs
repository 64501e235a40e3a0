//! Client side of the app: an HTTP API client plus the optimistic
//! mutation cache the UI reads from. Writes go through [`TripCache`],
//! which applies the expected effect locally before the round trip and
//! reconciles with server truth afterwards.

pub mod cache;
pub mod controller;
pub mod http;
pub mod optimistic;

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Comment, CreateCommentRequest, ItemPatch, ItemType, NewItem, TripItem, UpdateCommentRequest,
    VoteOutcome, VoteRequest,
};

pub use controller::TripCache;
pub use http::ApiClient;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
}

/// The server operations the mutation cache coordinates. [`ApiClient`]
/// is the real implementation; tests drive the controller through an
/// in-memory fake.
pub trait TripApi: Send + Sync {
    fn fetch_items(
        &self,
        kind: ItemType,
    ) -> impl Future<Output = Result<Vec<TripItem>, ClientError>> + Send;

    fn create_item(
        &self,
        new: &NewItem,
    ) -> impl Future<Output = Result<TripItem, ClientError>> + Send;

    fn update_item(
        &self,
        id: Uuid,
        patch: &ItemPatch,
    ) -> impl Future<Output = Result<TripItem, ClientError>> + Send;

    fn delete_item(
        &self,
        kind: ItemType,
        id: Uuid,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn toggle_vote(
        &self,
        req: &VoteRequest,
    ) -> impl Future<Output = Result<VoteOutcome, ClientError>> + Send;

    fn create_comment(
        &self,
        req: &CreateCommentRequest,
    ) -> impl Future<Output = Result<Comment, ClientError>> + Send;

    fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> impl Future<Output = Result<Comment, ClientError>> + Send;

    fn delete_comment(
        &self,
        id: Uuid,
        username: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

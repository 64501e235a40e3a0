//! The mutation cache controller: lets the UI see a write immediately
//! while guaranteeing the cache converges on server truth.
//!
//! Every mutation runs the same three phases against its collection:
//! begin (cancel in-flight refetches, snapshot, apply the speculative
//! effect), then on success invalidate so the next read refetches, or on
//! failure restore the snapshot and surface the error. No retry; callers
//! re-trigger manually.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures::future::try_join_all;
use uuid::Uuid;

use super::cache::TripStore;
use super::{ClientError, TripApi, optimistic};
use crate::models::{
    Comment, CreateCommentRequest, EntityId, ItemPatch, ItemType, NewItem, TripItem,
    UpdateCommentRequest, VoteOutcome, VoteRequest,
};

pub struct TripCache<A: TripApi> {
    api: A,
    store: TripStore,
    next_local: AtomicU64,
}

impl<A: TripApi> TripCache<A> {
    pub fn new(api: A) -> Self {
        TripCache {
            api,
            store: TripStore::new(),
            next_local: AtomicU64::new(1),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn next_placeholder(&self) -> EntityId {
        EntityId::Local(self.next_local.fetch_add(1, Ordering::Relaxed))
    }

    // Reads

    /// Cached value if present, otherwise a fetch.
    pub async fn items(&self, kind: ItemType) -> Result<Vec<TripItem>, ClientError> {
        if let Some(items) = self.store.cached(kind) {
            return Ok(items);
        }

        self.refetch(kind).await
    }

    pub async fn refetch(&self, kind: ItemType) -> Result<Vec<TripItem>, ClientError> {
        let epoch = self.store.refetch_epoch(kind);
        let items = self.api.fetch_items(kind).await?;

        if self.store.complete_refetch(kind, epoch, items.clone()) {
            Ok(items)
        } else {
            // A mutation began while this fetch was in flight; its
            // speculative state wins until it settles.
            Ok(self.store.cached(kind).unwrap_or(items))
        }
    }

    pub async fn refetch_all(&self) -> Result<(), ClientError> {
        try_join_all(ItemType::ALL.iter().map(|kind| self.refetch(*kind))).await?;
        Ok(())
    }

    // The three-phase protocol shared by every mutation kind. `request`
    // is lazy; it only hits the network after the speculative effect is
    // installed.
    async fn run_mutation<T>(
        &self,
        kind: ItemType,
        apply: impl FnOnce(&mut Vec<TripItem>),
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        let _permit = self.store.mutation_permit(kind).await;

        let snapshot = self.store.begin_mutation(kind, apply);

        match request.await {
            Ok(value) => {
                self.store.invalidate(kind);
                Ok(value)
            }
            Err(error) => {
                self.store.restore(snapshot);
                Err(error)
            }
        }
    }

    // Mutations

    pub async fn toggle_vote(&self, req: &VoteRequest) -> Result<VoteOutcome, ClientError> {
        let placeholder = self.next_placeholder();
        let now = Utc::now();

        self.run_mutation(
            req.item_type,
            |items| {
                optimistic::toggle_vote_effect(items, req, placeholder, now);
            },
            self.api.toggle_vote(req),
        )
        .await
    }

    pub async fn add_comment(&self, req: &CreateCommentRequest) -> Result<Comment, ClientError> {
        let placeholder = self.next_placeholder();
        let now = Utc::now();

        self.run_mutation(
            req.item_type,
            |items| optimistic::add_comment_effect(items, req, placeholder, now),
            self.api.create_comment(req),
        )
        .await
    }

    /// `kind` names the collection holding the comment's owner; the exact
    /// item is found by scanning.
    pub async fn edit_comment(
        &self,
        kind: ItemType,
        req: &UpdateCommentRequest,
    ) -> Result<Comment, ClientError> {
        self.run_mutation(
            kind,
            |items| optimistic::edit_comment_effect(items, req.id, &req.content),
            self.api.update_comment(req),
        )
        .await
    }

    pub async fn delete_comment(
        &self,
        kind: ItemType,
        id: Uuid,
        username: &str,
    ) -> Result<(), ClientError> {
        self.run_mutation(
            kind,
            |items| optimistic::delete_comment_effect(items, id),
            self.api.delete_comment(id, username),
        )
        .await
    }

    pub async fn add_item(&self, new: &NewItem) -> Result<TripItem, ClientError> {
        let placeholder = self.next_placeholder();
        let now = Utc::now();

        self.run_mutation(
            new.kind(),
            |items| optimistic::add_item_effect(items, new, placeholder, now),
            self.api.create_item(new),
        )
        .await
    }

    pub async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<TripItem, ClientError> {
        self.run_mutation(
            patch.kind(),
            |items| optimistic::update_item_effect(items, id, patch),
            self.api.update_item(id, patch),
        )
        .await
    }

    pub async fn delete_item(&self, kind: ItemType, id: Uuid) -> Result<(), ClientError> {
        self.run_mutation(
            kind,
            |items| optimistic::delete_item_effect(items, id),
            self.api.delete_item(kind, id),
        )
        .await
    }

    /// Current cached value without touching the network; `None` when the
    /// collection was invalidated or never loaded.
    pub fn peek(&self, kind: ItemType) -> Option<Vec<TripItem>> {
        self.store.cached(kind)
    }
}

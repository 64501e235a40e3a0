//! Mutation cache controller tests, driven through an in-memory fake of
//! the trip API. Covers the three-phase protocol: speculative state is
//! visible while a request is in flight, failures restore the exact
//! pre-mutation snapshot, and successes reconcile to server truth with no
//! placeholder ids left behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::Semaphore;
use uuid::Uuid;

use tripboard::client::{ClientError, TripApi, TripCache};
use tripboard::models::{
    Comment, CreateCommentRequest, EntityId, Hotel, ItemPatch, ItemType, NewItem, TripItem,
    UpdateCommentRequest, Vote, VoteAction, VoteOutcome, VoteRequest, score,
};

struct FakeInner {
    collections: Mutex<[Vec<TripItem>; 4]>,
    /// When set, the next mutating call fails with a server error before
    /// touching state, then the flag clears.
    fail_next: AtomicBool,
    /// When gated, every mutating call waits for a permit, letting tests
    /// observe in-flight speculative state.
    gated: AtomicBool,
    gate: Semaphore,
}

#[derive(Clone)]
struct FakeApi {
    inner: Arc<FakeInner>,
}

impl FakeApi {
    fn new() -> Self {
        FakeApi {
            inner: Arc::new(FakeInner {
                collections: Mutex::new(std::array::from_fn(|_| Vec::new())),
                fail_next: AtomicBool::new(false),
                gated: AtomicBool::new(false),
                gate: Semaphore::new(0),
            }),
        }
    }

    fn insert(&self, item: TripItem) {
        let mut collections = self.inner.collections.lock().unwrap();
        collections[item.kind().index()].push(item);
    }

    fn fail_next(&self) {
        self.inner.fail_next.store(true, Ordering::SeqCst);
    }

    fn gate_on(&self) {
        self.inner.gated.store(true, Ordering::SeqCst);
    }

    fn release_one(&self) {
        self.inner.gate.add_permits(1);
    }

    async fn mutating_call(&self) -> Result<(), ClientError> {
        if self.inner.gated.load(Ordering::SeqCst) {
            self.inner
                .gate
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }

        if self.inner.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }

        Ok(())
    }
}

impl TripApi for FakeApi {
    async fn fetch_items(&self, kind: ItemType) -> Result<Vec<TripItem>, ClientError> {
        let collections = self.inner.collections.lock().unwrap();
        Ok(collections[kind.index()].clone())
    }

    async fn create_item(&self, new: &NewItem) -> Result<TripItem, ClientError> {
        self.mutating_call().await?;

        let item = TripItem::from_new(new, EntityId::Server(Uuid::new_v4()), Utc::now());
        let mut collections = self.inner.collections.lock().unwrap();
        collections[new.kind().index()].push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<TripItem, ClientError> {
        self.mutating_call().await?;

        let target = EntityId::Server(id);
        let mut collections = self.inner.collections.lock().unwrap();
        let item = collections[patch.kind().index()]
            .iter_mut()
            .find(|item| *item.id() == target)
            .ok_or(ClientError::Api {
                status: 404,
                message: "not found".to_string(),
            })?;
        item.apply_patch(patch);
        Ok(item.clone())
    }

    async fn delete_item(&self, kind: ItemType, id: Uuid) -> Result<(), ClientError> {
        self.mutating_call().await?;

        let target = EntityId::Server(id);
        let mut collections = self.inner.collections.lock().unwrap();
        collections[kind.index()].retain(|item| *item.id() != target);
        Ok(())
    }

    async fn toggle_vote(&self, req: &VoteRequest) -> Result<VoteOutcome, ClientError> {
        self.mutating_call().await?;

        let target = EntityId::Server(req.item_id);
        let mut collections = self.inner.collections.lock().unwrap();
        let item = collections[req.item_type.index()]
            .iter_mut()
            .find(|item| *item.id() == target)
            .ok_or(ClientError::Api {
                status: 404,
                message: "not found".to_string(),
            })?;

        let votes = item.votes_mut();
        let action = match votes.iter().position(|v| v.username == req.username) {
            Some(pos) if votes[pos].vote_type == req.vote_type => {
                votes.remove(pos);
                VoteAction::Removed
            }
            Some(pos) => {
                votes[pos].vote_type = req.vote_type;
                VoteAction::Updated
            }
            None => {
                votes.push(Vote {
                    id: EntityId::Server(Uuid::new_v4()),
                    username: req.username.clone(),
                    vote_type: req.vote_type,
                    item_type: req.item_type,
                    item_id: req.item_id,
                    created_at: Utc::now(),
                });
                VoteAction::Created
            }
        };

        Ok(VoteOutcome { action })
    }

    async fn create_comment(&self, req: &CreateCommentRequest) -> Result<Comment, ClientError> {
        self.mutating_call().await?;

        let comment = Comment {
            id: EntityId::Server(Uuid::new_v4()),
            username: req.username.clone(),
            content: req.content.clone(),
            item_type: req.item_type,
            item_id: req.item_id,
            created_at: Utc::now(),
        };

        let target = EntityId::Server(req.item_id);
        let mut collections = self.inner.collections.lock().unwrap();
        let item = collections[req.item_type.index()]
            .iter_mut()
            .find(|item| *item.id() == target)
            .ok_or(ClientError::Api {
                status: 404,
                message: "not found".to_string(),
            })?;
        item.comments_mut().push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, req: &UpdateCommentRequest) -> Result<Comment, ClientError> {
        self.mutating_call().await?;

        let target = EntityId::Server(req.id);
        let mut collections = self.inner.collections.lock().unwrap();
        for collection in collections.iter_mut() {
            for item in collection.iter_mut() {
                if let Some(comment) = item.comments_mut().iter_mut().find(|c| c.id == target) {
                    if comment.username != req.username {
                        return Err(ClientError::Api {
                            status: 403,
                            message: "You can only edit your own comments".to_string(),
                        });
                    }
                    comment.content = req.content.clone();
                    return Ok(comment.clone());
                }
            }
        }

        Err(ClientError::Api {
            status: 404,
            message: "Comment not found".to_string(),
        })
    }

    async fn delete_comment(&self, id: Uuid, username: &str) -> Result<(), ClientError> {
        self.mutating_call().await?;

        let target = EntityId::Server(id);
        let mut collections = self.inner.collections.lock().unwrap();
        for collection in collections.iter_mut() {
            for item in collection.iter_mut() {
                let comments = item.comments_mut();
                if let Some(pos) = comments.iter().position(|c| c.id == target) {
                    if comments[pos].username != username {
                        return Err(ClientError::Api {
                            status: 403,
                            message: "You can only delete your own comments".to_string(),
                        });
                    }
                    comments.remove(pos);
                    return Ok(());
                }
            }
        }

        Err(ClientError::Api {
            status: 404,
            message: "Comment not found".to_string(),
        })
    }
}

fn hotel(name: &str) -> (Uuid, TripItem) {
    let id = Uuid::new_v4();
    let item = TripItem::Hotel(Hotel {
        id: EntityId::Server(id),
        name: name.to_string(),
        url: None,
        total_price: 500.0,
        per_person: 250.0,
        includes: None,
        neighborhood: Some("Soho".to_string()),
        notes: None,
        created_at: Utc::now(),
        votes: Vec::new(),
        comments: Vec::new(),
    });
    (id, item)
}

fn upvote(username: &str, item_id: Uuid) -> VoteRequest {
    VoteRequest {
        username: username.to_string(),
        vote_type: tripboard::models::VoteType::Upvote,
        item_type: ItemType::Hotel,
        item_id,
    }
}

fn downvote(username: &str, item_id: Uuid) -> VoteRequest {
    VoteRequest {
        username: username.to_string(),
        vote_type: tripboard::models::VoteType::Downvote,
        item_type: ItemType::Hotel,
        item_id,
    }
}

/// Lets spawned tasks run up to their next suspension point.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn no_local_ids(items: &[TripItem]) -> bool {
    items.iter().all(|item| {
        !item.id().is_local()
            && item.votes().iter().all(|v| !v.id.is_local())
            && item.comments().iter().all(|c| !c.id.is_local())
    })
}

#[tokio::test]
async fn failed_mutation_restores_the_snapshot() {
    let api = FakeApi::new();
    let (id, item) = hotel("Gild Hall");
    api.insert(item);

    let cache = TripCache::new(api.clone());
    let before = cache.items(ItemType::Hotel).await.unwrap();

    api.fail_next();
    let result = cache.toggle_vote(&upvote("Taylor", id)).await;
    assert!(result.is_err());

    // Exactly the pre-mutation value: no speculative vote, no partial merge.
    assert_eq!(cache.peek(ItemType::Hotel), Some(before));
}

#[tokio::test]
async fn successful_mutation_reconciles_to_server_truth() {
    let api = FakeApi::new();
    let (id, item) = hotel("Hotel Hugo");
    api.insert(item);

    let cache = TripCache::new(api.clone());
    cache.items(ItemType::Hotel).await.unwrap();

    let outcome = cache.toggle_vote(&upvote("Taylor", id)).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Created);

    // Success invalidates the entry; the next read refetches.
    assert_eq!(cache.peek(ItemType::Hotel), None);

    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), 1);
    assert!(no_local_ids(&items));
}

#[tokio::test]
async fn speculative_state_is_visible_while_in_flight() {
    let api = FakeApi::new();
    let (id, item) = hotel("The Bowery");
    api.insert(item);

    let cache = Arc::new(TripCache::new(api.clone()));
    cache.items(ItemType::Hotel).await.unwrap();

    api.gate_on();

    let task = {
        let cache = Arc::clone(&cache);
        let req = upvote("Taylor", id);
        tokio::spawn(async move { cache.toggle_vote(&req).await })
    };

    // Give the mutation a chance to install its speculative state.
    settle().await;

    let speculative = cache.peek(ItemType::Hotel).expect("cache should hold a value");
    assert_eq!(score(speculative[0].votes()), 1);
    assert!(speculative[0].votes()[0].id.is_local());

    api.release_one();
    task.await.unwrap().unwrap();

    // Settled: speculative value superseded.
    assert_eq!(cache.peek(ItemType::Hotel), None);
}

#[tokio::test]
async fn vote_scenario_end_to_end() {
    let api = FakeApi::new();
    let (id, item) = hotel("Arlo");
    api.insert(item);

    let cache = TripCache::new(api.clone());

    // A upvotes: 0 -> 1
    let outcome = cache.toggle_vote(&upvote("A", id)).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Created);
    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), 1);

    // B downvotes: 1 -> 0
    let outcome = cache.toggle_vote(&downvote("B", id)).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Created);
    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), 0);

    // A switches to downvote: 0 -> -1
    let outcome = cache.toggle_vote(&downvote("A", id)).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Updated);
    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), -1);

    // A downvotes again, removing the vote: -1 -> 0
    let outcome = cache.toggle_vote(&downvote("A", id)).await.unwrap();
    assert_eq!(outcome.action, VoteAction::Removed);
    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), 0);
    assert_eq!(items[0].votes().len(), 1);
}

#[tokio::test]
async fn comment_add_reconciles_placeholder_away() {
    let api = FakeApi::new();
    let (id, item) = hotel("Walker");
    api.insert(item);

    let cache = TripCache::new(api.clone());
    cache.items(ItemType::Hotel).await.unwrap();

    cache
        .add_comment(&CreateCommentRequest {
            username: "Taylor".to_string(),
            content: "rooftop bar!".to_string(),
            item_type: ItemType::Hotel,
            item_id: id,
        })
        .await
        .unwrap();

    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(items[0].comments().len(), 1);
    assert_eq!(items[0].comments()[0].content, "rooftop bar!");
    assert!(no_local_ids(&items));
}

#[tokio::test]
async fn unauthorized_comment_edit_rolls_back() {
    let api = FakeApi::new();
    let (id, item) = hotel("Ludlow");
    api.insert(item);

    let cache = TripCache::new(api.clone());
    cache.items(ItemType::Hotel).await.unwrap();

    let comment = cache
        .add_comment(&CreateCommentRequest {
            username: "Taylor".to_string(),
            content: "original".to_string(),
            item_type: ItemType::Hotel,
            item_id: id,
        })
        .await
        .unwrap();

    let comment_id = comment.id.as_server().unwrap();
    let before = cache.items(ItemType::Hotel).await.unwrap();

    // Someone else tries to edit it.
    let result = cache
        .edit_comment(
            ItemType::Hotel,
            &UpdateCommentRequest {
                id: comment_id,
                username: "Scarlett".to_string(),
                content: "hijacked".to_string(),
            },
        )
        .await;

    match result {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 403),
        other => panic!("expected authorization failure, got {:?}", other.map(|_| ())),
    }

    // Rejection rolled back; nothing changed.
    assert_eq!(cache.peek(ItemType::Hotel), Some(before.clone()));
    assert_eq!(before[0].comments()[0].content, "original");

    // Same for delete.
    let result = cache
        .delete_comment(ItemType::Hotel, comment_id, "Scarlett")
        .await;
    assert!(result.is_err());
    assert_eq!(cache.peek(ItemType::Hotel), Some(before));
}

#[tokio::test]
async fn mutations_on_the_same_collection_are_serialized() {
    let api = FakeApi::new();
    let (id, item) = hotel("Moxy");
    api.insert(item);

    let cache = Arc::new(TripCache::new(api.clone()));
    cache.items(ItemType::Hotel).await.unwrap();

    api.gate_on();

    // A starts and parks inside its request.
    let task_a = {
        let cache = Arc::clone(&cache);
        let req = upvote("A", id);
        tokio::spawn(async move { cache.toggle_vote(&req).await })
    };
    settle().await;

    // B queues behind A's mutation permit; its speculative state must not
    // appear while A is still pending.
    let task_b = {
        let cache = Arc::clone(&cache);
        let req = upvote("B", id);
        tokio::spawn(async move { cache.toggle_vote(&req).await })
    };
    settle().await;

    let mid_flight = cache.peek(ItemType::Hotel).expect("cache should hold a value");
    assert_eq!(mid_flight[0].votes().len(), 1);
    assert_eq!(mid_flight[0].votes()[0].username, "A");

    api.release_one();
    api.release_one();
    task_a.await.unwrap().unwrap();
    task_b.await.unwrap().unwrap();

    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(score(items[0].votes()), 2);
}

#[tokio::test]
async fn item_crud_round_trip() {
    let api = FakeApi::new();
    let cache = TripCache::new(api.clone());

    cache.items(ItemType::Hotel).await.unwrap();

    let created = cache
        .add_item(&NewItem::Hotel(tripboard::models::NewHotel {
            name: "Nine Orchard".to_string(),
            url: None,
            total_price: 900.0,
            per_person: 450.0,
            includes: None,
            neighborhood: Some("Lower East Side".to_string()),
            notes: None,
        }))
        .await
        .unwrap();

    let id = created.id().as_server().unwrap();

    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(no_local_ids(&items));

    cache
        .update_item(
            id,
            &ItemPatch::Hotel(tripboard::models::HotelPatch {
                notes: Some("splurge option".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

    let items = cache.items(ItemType::Hotel).await.unwrap();
    match &items[0] {
        TripItem::Hotel(h) => {
            assert_eq!(h.notes.as_deref(), Some("splurge option"));
            assert_eq!(h.name, "Nine Orchard");
        }
        other => panic!("unexpected variant: {:?}", other),
    }

    cache.delete_item(ItemType::Hotel, id).await.unwrap();
    let items = cache.items(ItemType::Hotel).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn failed_delete_restores_item() {
    let api = FakeApi::new();
    let (id, item) = hotel("Public");
    api.insert(item);

    let cache = TripCache::new(api.clone());
    let before = cache.items(ItemType::Hotel).await.unwrap();

    api.fail_next();
    assert!(cache.delete_item(ItemType::Hotel, id).await.is_err());

    assert_eq!(cache.peek(ItemType::Hotel), Some(before));
}

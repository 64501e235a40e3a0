//! Speculative effect rules: how each mutation kind is expected to change
//! a cached collection before the server answers. Pure functions over the
//! in-memory items so the controller can apply them synchronously.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Comment, CreateCommentRequest, EntityId, ItemPatch, NewItem, TripItem, Vote, VoteAction,
    VoteRequest,
};

/// Mirrors the server's toggle protocol on the target item's votes.
/// Returns the action the server is expected to report, or `None` when the
/// item is not in the cached collection.
pub fn toggle_vote_effect(
    items: &mut [TripItem],
    req: &VoteRequest,
    placeholder: EntityId,
    now: DateTime<Utc>,
) -> Option<VoteAction> {
    let target = EntityId::Server(req.item_id);
    let item = items.iter_mut().find(|item| *item.id() == target)?;
    let votes = item.votes_mut();

    // Votes inside an item are already scoped to it; the username is the key.
    match votes.iter().position(|v| v.username == req.username) {
        Some(pos) if votes[pos].vote_type == req.vote_type => {
            votes.remove(pos);
            Some(VoteAction::Removed)
        }
        Some(pos) => {
            votes[pos].vote_type = req.vote_type;
            Some(VoteAction::Updated)
        }
        None => {
            votes.push(Vote {
                id: placeholder,
                username: req.username.clone(),
                vote_type: req.vote_type,
                item_type: req.item_type,
                item_id: req.item_id,
                created_at: now,
            });
            Some(VoteAction::Created)
        }
    }
}

pub fn add_comment_effect(
    items: &mut [TripItem],
    req: &CreateCommentRequest,
    placeholder: EntityId,
    now: DateTime<Utc>,
) {
    let target = EntityId::Server(req.item_id);
    if let Some(item) = items.iter_mut().find(|item| *item.id() == target) {
        item.comments_mut().push(Comment {
            id: placeholder,
            username: req.username.clone(),
            content: req.content.clone(),
            item_type: req.item_type,
            item_id: req.item_id,
            created_at: now,
        });
    }
}

/// The owning item is not known up front; scan the collection for it.
pub fn edit_comment_effect(items: &mut [TripItem], comment_id: Uuid, content: &str) {
    let target = EntityId::Server(comment_id);
    for item in items.iter_mut() {
        if let Some(comment) = item.comments_mut().iter_mut().find(|c| c.id == target) {
            comment.content = content.to_string();
            return;
        }
    }
}

pub fn delete_comment_effect(items: &mut [TripItem], comment_id: Uuid) {
    let target = EntityId::Server(comment_id);
    for item in items.iter_mut() {
        let comments = item.comments_mut();
        if let Some(pos) = comments.iter().position(|c| c.id == target) {
            comments.remove(pos);
            return;
        }
    }
}

pub fn add_item_effect(
    items: &mut Vec<TripItem>,
    new: &NewItem,
    placeholder: EntityId,
    now: DateTime<Utc>,
) {
    items.push(TripItem::from_new(new, placeholder, now));
}

pub fn update_item_effect(items: &mut [TripItem], id: Uuid, patch: &ItemPatch) {
    let target = EntityId::Server(id);
    if let Some(item) = items.iter_mut().find(|item| *item.id() == target) {
        item.apply_patch(patch);
    }
}

pub fn delete_item_effect(items: &mut Vec<TripItem>, id: Uuid) {
    let target = EntityId::Server(id);
    items.retain(|item| *item.id() != target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, ItemType, NewHotel, VoteType, score};

    fn hotel(name: &str) -> (Uuid, TripItem) {
        let id = Uuid::new_v4();
        let item = TripItem::Hotel(Hotel {
            id: EntityId::Server(id),
            name: name.to_string(),
            url: None,
            total_price: 100.0,
            per_person: 50.0,
            includes: None,
            neighborhood: None,
            notes: None,
            created_at: Utc::now(),
            votes: Vec::new(),
            comments: Vec::new(),
        });
        (id, item)
    }

    fn vote_req(username: &str, item_id: Uuid, vote_type: VoteType) -> VoteRequest {
        VoteRequest {
            username: username.to_string(),
            vote_type,
            item_type: ItemType::Hotel,
            item_id,
        }
    }

    #[test]
    fn toggle_creates_then_removes() {
        let (id, item) = hotel("H");
        let mut items = vec![item];

        let action = toggle_vote_effect(
            &mut items,
            &vote_req("a", id, VoteType::Upvote),
            EntityId::Local(1),
            Utc::now(),
        );
        assert_eq!(action, Some(VoteAction::Created));
        assert_eq!(score(items[0].votes()), 1);
        assert!(items[0].votes()[0].id.is_local());

        // Same type again toggles off
        let action = toggle_vote_effect(
            &mut items,
            &vote_req("a", id, VoteType::Upvote),
            EntityId::Local(2),
            Utc::now(),
        );
        assert_eq!(action, Some(VoteAction::Removed));
        assert_eq!(score(items[0].votes()), 0);
        assert!(items[0].votes().is_empty());
    }

    #[test]
    fn toggle_switches_vote_type() {
        let (id, item) = hotel("H");
        let mut items = vec![item];

        toggle_vote_effect(
            &mut items,
            &vote_req("a", id, VoteType::Upvote),
            EntityId::Local(1),
            Utc::now(),
        );
        let action = toggle_vote_effect(
            &mut items,
            &vote_req("a", id, VoteType::Downvote),
            EntityId::Local(2),
            Utc::now(),
        );

        assert_eq!(action, Some(VoteAction::Updated));
        assert_eq!(items[0].votes().len(), 1);
        assert_eq!(items[0].votes()[0].vote_type, VoteType::Downvote);
        assert_eq!(score(items[0].votes()), -1);
    }

    #[test]
    fn toggle_never_duplicates_a_users_vote() {
        let (id, item) = hotel("H");
        let mut items = vec![item];

        for (i, vt) in [
            VoteType::Upvote,
            VoteType::Downvote,
            VoteType::Downvote,
            VoteType::Upvote,
        ]
        .iter()
        .enumerate()
        {
            toggle_vote_effect(
                &mut items,
                &vote_req("a", id, *vt),
                EntityId::Local(i as u64),
                Utc::now(),
            );
            assert!(items[0].votes().len() <= 1);
        }
    }

    #[test]
    fn toggle_on_unknown_item_is_noop() {
        let (_, item) = hotel("H");
        let mut items = vec![item];

        let action = toggle_vote_effect(
            &mut items,
            &vote_req("a", Uuid::new_v4(), VoteType::Upvote),
            EntityId::Local(1),
            Utc::now(),
        );
        assert_eq!(action, None);
        assert!(items[0].votes().is_empty());
    }

    #[test]
    fn comment_add_edit_delete_round() {
        let (id, item) = hotel("H");
        let mut items = vec![item];

        add_comment_effect(
            &mut items,
            &CreateCommentRequest {
                username: "a".to_string(),
                content: "looks nice".to_string(),
                item_type: ItemType::Hotel,
                item_id: id,
            },
            EntityId::Local(1),
            Utc::now(),
        );
        assert_eq!(items[0].comments().len(), 1);
        assert!(items[0].comments()[0].id.is_local());

        // Edits and deletes target server-issued ids; simulate a
        // reconciled comment.
        let server_id = Uuid::new_v4();
        items[0].comments_mut()[0].id = EntityId::Server(server_id);

        edit_comment_effect(&mut items, server_id, "changed my mind");
        assert_eq!(items[0].comments()[0].content, "changed my mind");

        delete_comment_effect(&mut items, server_id);
        assert!(items[0].comments().is_empty());
    }

    #[test]
    fn item_add_update_delete_round() {
        let (id, item) = hotel("H");
        let mut items = vec![item];

        add_item_effect(
            &mut items,
            &NewItem::Hotel(NewHotel {
                name: "New place".to_string(),
                url: None,
                total_price: 200.0,
                per_person: 100.0,
                includes: None,
                neighborhood: None,
                notes: None,
            }),
            EntityId::Local(1),
            Utc::now(),
        );
        assert_eq!(items.len(), 2);
        assert!(items[1].id().is_local());
        assert!(items[1].votes().is_empty());
        assert!(items[1].comments().is_empty());

        update_item_effect(
            &mut items,
            id,
            &ItemPatch::Hotel(crate::models::HotelPatch {
                name: Some("Renamed".to_string()),
                ..Default::default()
            }),
        );
        match &items[0] {
            TripItem::Hotel(h) => {
                assert_eq!(h.name, "Renamed");
                // untouched fields keep their value
                assert_eq!(h.total_price, 100.0);
            }
            other => panic!("unexpected variant: {:?}", other),
        }

        delete_item_effect(&mut items, id);
        assert_eq!(items.len(), 1);
        assert!(items[0].id().is_local());
    }
}

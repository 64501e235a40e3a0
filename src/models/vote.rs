use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::EntityId;
use super::item::ItemType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vote_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub id: EntityId,
    pub username: String,
    pub vote_type: VoteType,
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Vote toggle request
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct VoteRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    pub vote_type: VoteType,
    pub item_type: ItemType,
    pub item_id: Uuid,
}

/// Which branch of the toggle protocol ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Created,
    Updated,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub action: VoteAction,
}

/// Net score: upvotes minus downvotes. Order-independent, unweighted.
pub fn score(votes: &[Vote]) -> i64 {
    votes.iter().fold(0, |acc, v| match v.vote_type {
        VoteType::Upvote => acc + 1,
        VoteType::Downvote => acc - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(username: &str, vote_type: VoteType) -> Vote {
        Vote {
            id: EntityId::Server(Uuid::new_v4()),
            username: username.to_string(),
            vote_type,
            item_type: ItemType::Hotel,
            item_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn score_is_up_minus_down() {
        let votes = vec![
            vote("a", VoteType::Upvote),
            vote("b", VoteType::Upvote),
            vote("c", VoteType::Downvote),
        ];
        assert_eq!(score(&votes), 1);
    }

    #[test]
    fn score_is_order_independent() {
        let mut votes = vec![
            vote("a", VoteType::Downvote),
            vote("b", VoteType::Upvote),
            vote("c", VoteType::Downvote),
            vote("d", VoteType::Upvote),
        ];
        let forward = score(&votes);
        votes.reverse();
        assert_eq!(score(&votes), forward);
        assert_eq!(forward, 0);
    }

    #[test]
    fn empty_scores_zero() {
        assert_eq!(score(&[]), 0);
    }
}

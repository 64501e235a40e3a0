//! Derived list views: score ordering and the activity/restaurant filters.
//! Everything here is recomputed from the latest cached collection; nothing
//! is stored.

use crate::models::TripItem;
use crate::pricing;

/// Active filter selections. Dimensions combine with AND; an unset
/// dimension passes everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilters {
    pub neighborhood: Option<String>,
    /// Multi-select OR; empty means no cuisine constraint.
    pub cuisine_types: Vec<String>,
    pub price_range: Option<(i64, i64)>,
}

impl ItemFilters {
    pub fn matches(&self, item: &TripItem) -> bool {
        if let Some(neighborhood) = &self.neighborhood {
            if item.neighborhood() != Some(neighborhood.as_str()) {
                return false;
            }
        }

        if !self.cuisine_types.is_empty() {
            match item.cuisine_type() {
                Some(cuisine) if self.cuisine_types.iter().any(|c| c == cuisine) => {}
                _ => return false,
            }
        }

        if let Some((min, max)) = self.price_range {
            if !pricing::price_in_range(item.price_text(), min, max) {
                return false;
            }
        }

        true
    }
}

pub fn filter_items<'a>(items: &'a [TripItem], filters: &ItemFilters) -> Vec<&'a TripItem> {
    items.iter().filter(|item| filters.matches(item)).collect()
}

/// Descending net score; ties keep whatever relative order sorting gives.
pub fn sort_by_score(items: &mut [TripItem]) {
    items.sort_by(|a, b| b.score().cmp(&a.score()));
}

/// Price slider bounds for a collection.
pub fn price_bounds_of(items: &[TripItem]) -> (i64, i64) {
    pricing::price_bounds(items.iter().map(|item| item.price_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, EntityId, ItemType, Restaurant, TripItem, Vote, VoteType};
    use chrono::Utc;
    use uuid::Uuid;

    fn restaurant(name: &str, neighborhood: Option<&str>, cuisine: Option<&str>, price: Option<&str>) -> TripItem {
        TripItem::Restaurant(Restaurant {
            id: EntityId::Server(Uuid::new_v4()),
            name: name.to_string(),
            url: None,
            address: None,
            neighborhood: neighborhood.map(String::from),
            has_cocktails: false,
            cuisine_type: cuisine.map(String::from),
            vegan_or_omni: None,
            hours: None,
            days_closed: None,
            price_range: price.map(String::from),
            created_at: Utc::now(),
            votes: Vec::new(),
            comments: Vec::new(),
        })
    }

    fn activity_with_votes(name: &str, vote_types: &[VoteType]) -> TripItem {
        let item_id = Uuid::new_v4();
        let votes = vote_types
            .iter()
            .enumerate()
            .map(|(i, vt)| Vote {
                id: EntityId::Server(Uuid::new_v4()),
                username: format!("user{}", i),
                vote_type: *vt,
                item_type: ItemType::Activity,
                item_id,
                created_at: Utc::now(),
            })
            .collect();

        TripItem::Activity(Activity {
            id: EntityId::Server(item_id),
            name: name.to_string(),
            url: None,
            address: None,
            neighborhood: None,
            hours: None,
            days_closed: None,
            price: None,
            created_at: Utc::now(),
            votes,
            comments: Vec::new(),
        })
    }

    #[test]
    fn dimensions_combine_with_and() {
        let items = vec![
            restaurant("a", Some("Soho"), Some("Italian"), Some("$$")),
            restaurant("b", Some("Soho"), Some("Thai"), Some("$$")),
            restaurant("c", Some("Chelsea"), Some("Italian"), Some("$$")),
        ];

        let filters = ItemFilters {
            neighborhood: Some("Soho".to_string()),
            cuisine_types: vec!["Italian".to_string()],
            price_range: Some((1, 4)),
        };

        let matched = filter_items(&items, &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].neighborhood(), Some("Soho"));
        assert_eq!(matched[0].cuisine_type(), Some("Italian"));
    }

    #[test]
    fn empty_cuisine_selection_passes_everything() {
        let items = vec![
            restaurant("a", None, Some("Italian"), None),
            restaurant("b", None, None, None),
        ];

        let filters = ItemFilters::default();
        assert_eq!(filter_items(&items, &filters).len(), 2);
    }

    #[test]
    fn cuisine_selection_is_or_semantics() {
        let items = vec![
            restaurant("a", None, Some("Italian"), None),
            restaurant("b", None, Some("Thai"), None),
            restaurant("c", None, Some("French"), None),
            restaurant("d", None, None, None),
        ];

        let filters = ItemFilters {
            cuisine_types: vec!["Italian".to_string(), "Thai".to_string()],
            ..Default::default()
        };

        let matched = filter_items(&items, &filters);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn missing_price_is_never_filtered_out() {
        let items = vec![
            restaurant("priced", None, None, Some("$30")),
            restaurant("unpriced", None, None, None),
        ];

        let filters = ItemFilters {
            price_range: Some((1, 4)),
            ..Default::default()
        };

        let matched = filter_items(&items, &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].price_text(), None);
    }

    #[test]
    fn sorts_by_descending_score() {
        let mut items = vec![
            activity_with_votes("low", &[VoteType::Downvote]),
            activity_with_votes("high", &[VoteType::Upvote, VoteType::Upvote]),
            activity_with_votes("mid", &[VoteType::Upvote]),
        ];

        sort_by_score(&mut items);

        let scores: Vec<i64> = items.iter().map(|i| i.score()).collect();
        assert_eq!(scores, vec![2, 1, -1]);
    }

    #[test]
    fn bounds_come_from_parseable_prices() {
        let items = vec![
            restaurant("a", None, None, Some("$$")),
            restaurant("b", None, None, Some("$45")),
            restaurant("c", None, None, None),
        ];
        assert_eq!(price_bounds_of(&items), (2, 45));
    }
}

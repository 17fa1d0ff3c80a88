//! Projection of resolved records into display-ready cards

use crate::types::{CardDescriptor, SubscriptionRecord};

/// Project the accumulated records into one card per record, in state
/// order. Pure: same input, same output, no side effects.
pub fn card_descriptors(records: &[SubscriptionRecord]) -> Vec<CardDescriptor> {
    records
        .iter()
        .map(|record| CardDescriptor {
            title: record.name.clone(),
        })
        .collect()
}

/// Indices of the cards matching the search query, exact-case matches
/// ranked first. An empty query keeps every card in place.
pub fn filter_card_indices(cards: &[CardDescriptor], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..cards.len()).collect();
    }
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(usize, u8)> = cards
        .iter()
        .enumerate()
        .filter_map(|(i, card)| {
            if card.title.contains(query) {
                Some((i, 0))
            } else if card.title.to_lowercase().contains(&query_lower) {
                Some((i, 1))
            } else {
                None
            }
        })
        .collect();
    scored.sort_by_key(|(_, rank)| *rank);
    scored.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<SubscriptionRecord> {
        names
            .iter()
            .copied()
            .map(SubscriptionRecord::named)
            .collect()
    }

    #[test]
    fn one_card_per_record_in_state_order() {
        let state = records(&["Beta", "Alpha"]);
        let cards = card_descriptors(&state);
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Beta", "Alpha"]);
    }

    #[test]
    fn projection_is_deterministic() {
        let state = records(&["a", "b", "c"]);
        assert_eq!(card_descriptors(&state), card_descriptors(&state));
    }

    #[test]
    fn empty_state_projects_to_empty_sequence() {
        assert!(card_descriptors(&[]).is_empty());
    }

    #[test]
    fn empty_query_keeps_every_card() {
        let cards = card_descriptors(&records(&["x", "y"]));
        assert_eq!(filter_card_indices(&cards, "  "), [0, 1]);
    }

    #[test]
    fn exact_case_matches_rank_first() {
        let cards = card_descriptors(&records(&["amber", "Amber lights", "quartz"]));
        assert_eq!(filter_card_indices(&cards, "Amber"), [1, 0]);
    }

    #[test]
    fn non_matching_cards_are_dropped() {
        let cards = card_descriptors(&records(&["one", "two"]));
        assert!(filter_card_indices(&cards, "three").is_empty());
    }
}

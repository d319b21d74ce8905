//! Initiative ordering: descending by the active card's comparison key.

use shared::domain::Card;

/// Participants without an active card sort below every real card.
const NO_CARD_KEY: (i8, i8) = (-1, -1);

pub fn initiative_key(active: Option<Card>) -> (i8, i8) {
    active.map(Card::sort_key).unwrap_or(NO_CARD_KEY)
}

/// Stable descending sort by active card. Stability matters: participants
/// who have not drawn yet all share the sentinel key and must keep their
/// prior relative order.
pub fn sort_by_initiative<T, F>(items: &mut [T], active: F)
where
    F: Fn(&T) -> Option<Card>,
{
    items.sort_by(|a, b| initiative_key(active(b)).cmp(&initiative_key(active(a))));
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{Rank, Suit};

    #[test]
    fn sorts_high_cards_first_and_cardless_last() {
        let mut rows = vec![
            ("none", None),
            ("ace", Some(Card::new(Rank::Ace, Suit::Clubs))),
            ("joker", Some(Card::Joker)),
            ("two", Some(Card::new(Rank::Two, Suit::Spades))),
        ];
        sort_by_initiative(&mut rows, |r| r.1);
        let names: Vec<&str> = rows.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["joker", "ace", "two", "none"]);
    }

    #[test]
    fn suit_breaks_equal_rank_values() {
        let mut rows = vec![
            ("hearts", Some(Card::new(Rank::Ten, Suit::Hearts))),
            ("spades", Some(Card::new(Rank::Ten, Suit::Spades))),
        ];
        sort_by_initiative(&mut rows, |r| r.1);
        assert_eq!(rows[0].0, "spades");
    }

    #[test]
    fn cardless_participants_keep_their_relative_order() {
        let mut rows = vec![
            ("first", None::<Card>),
            ("second", None),
            ("drawn", Some(Card::new(Rank::Five, Suit::Clubs))),
            ("third", None),
        ];
        sort_by_initiative(&mut rows, |r| r.1);
        let names: Vec<&str> = rows.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["drawn", "first", "second", "third"]);
    }
}

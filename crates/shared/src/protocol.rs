use serde::{Deserialize, Serialize};

use crate::domain::{Card, Trait};

/// Wire form of a card. `rank`/`suit` are display labels ("Q", "Hearts");
/// jokers carry rank "Joker" and an empty suit. `value`/`suit_value` repeat
/// the comparison key so clients can highlight ordering without re-deriving
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub rank: String,
    pub suit: String,
    pub display: String,
    pub value: i8,
    pub suit_value: i8,
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        let (rank, suit) = match card {
            Card::Suited { rank, suit } => (rank.to_string(), suit.to_string()),
            Card::Joker => ("Joker".to_string(), String::new()),
        };
        Self {
            rank,
            suit,
            display: card.to_string(),
            value: card.value(),
            suit_value: card.suit_order(),
        }
    }
}

/// One participant as observers see them. `cards` is the full hand in draw
/// order (initial draw followed by any additional draws); `additional_cards`
/// repeats the additional ones so the client can tell them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub name: String,
    pub traits: Vec<Trait>,
    pub trait_display: String,
    pub has_drawn: bool,
    pub cards: Vec<CardView>,
    pub additional_cards: Vec<CardView>,
    pub active_card: Option<CardView>,
}

/// The complete state pushed to every observer after each committed
/// mutation. Always sent whole; there is no delta format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub participants: Vec<ParticipantEntry>,
    pub deck_remaining: usize,
}

/// Name/trait pair accepted by roster-building operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAuthResponse {
    pub is_gm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckInfoResponse {
    pub remaining: usize,
}

#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    #[serde(default)]
    pub participants: Vec<ParticipantSpec>,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct DealInRequest {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNameRequest {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTraitsRequest {
    pub index: usize,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceholderRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rank, Suit};

    #[test]
    fn suited_card_view_round_trips_labels() {
        let view = CardView::from(Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!(view.rank, "10");
        assert_eq!(view.suit, "Diamonds");
        assert_eq!(view.display, "10 of Diamonds");
        assert_eq!(view.value, 10);
        assert_eq!(view.suit_value, 1);
    }

    #[test]
    fn joker_view_has_empty_suit() {
        let view = CardView::from(Card::Joker);
        assert_eq!(view.rank, "Joker");
        assert_eq!(view.suit, "");
        assert_eq!(view.value, 14);
        assert_eq!(view.suit_value, 4);
    }

    #[test]
    fn traits_deserialize_from_snake_case() {
        let spec: ParticipantSpec =
            serde_json::from_str(r#"{"name":"Zara","traits":["improved_level_headed","quick"]}"#)
                .expect("spec");
        assert_eq!(
            spec.traits,
            vec![Trait::ImprovedLevelHeaded, Trait::Quick]
        );
    }

    #[test]
    fn snapshot_serializes_expected_fields() {
        let snapshot = Snapshot {
            participants: vec![ParticipantEntry {
                name: "Gert".into(),
                traits: vec![Trait::Hesitant],
                trait_display: "Hesitant".into(),
                has_drawn: true,
                cards: vec![CardView::from(Card::Joker)],
                additional_cards: vec![],
                active_card: Some(CardView::from(Card::Joker)),
            }],
            deck_remaining: 53,
        };
        let value = serde_json::to_value(&snapshot).expect("json");
        assert_eq!(value["deck_remaining"], 53);
        assert_eq!(value["participants"][0]["name"], "Gert");
        assert_eq!(value["participants"][0]["active_card"]["rank"], "Joker");
    }
}

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity for a participant, assigned at creation. Names are a
/// mutable display attribute; this id survives renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Tie-break order: Clubs lowest, Spades highest.
    pub const fn order(self) -> i8 {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value used for ordering. Ten and Jack share 10, matching the
    /// tracker's table (J=10, Q=11, K=12, A=13).
    pub const fn value(self) -> i8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 10,
            Rank::Queen => 11,
            Rank::King => 12,
            Rank::Ace => 13,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        f.write_str(label)
    }
}

/// A card from the 54-card initiative deck: 52 suited cards plus two jokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Suited { rank: Rank, suit: Suit },
    Joker,
}

pub const JOKER_VALUE: i8 = 14;
pub const JOKER_SUIT_ORDER: i8 = 4;

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Suited { rank, suit }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Card::Joker)
    }

    pub const fn value(self) -> i8 {
        match self {
            Card::Suited { rank, .. } => rank.value(),
            Card::Joker => JOKER_VALUE,
        }
    }

    pub const fn suit_order(self) -> i8 {
        match self {
            Card::Suited { suit, .. } => suit.order(),
            Card::Joker => JOKER_SUIT_ORDER,
        }
    }

    /// The two-part comparison key used everywhere cards are ranked against
    /// each other: rank value first, suit as tie-break. Higher is better.
    pub const fn sort_key(self) -> (i8, i8) {
        (self.value(), self.suit_order())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited { rank, suit } => write!(f, "{rank} of {suit}"),
            Card::Joker => f.write_str("Joker"),
        }
    }
}

/// Initiative-modifying traits. The UI keeps `Hesitant` exclusive with the
/// other three; the engine honors whatever set it is handed and resolves it
/// through the fixed precedence chain in `engine::draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    LevelHeaded,
    ImprovedLevelHeaded,
    Quick,
    Hesitant,
}

impl Trait {
    pub const fn display_name(self) -> &'static str {
        match self {
            Trait::LevelHeaded => "Level Headed",
            Trait::ImprovedLevelHeaded => "Improved Level Headed",
            Trait::Quick => "Quick",
            Trait::Hesitant => "Hesitant",
        }
    }
}

/// Comma-joined display string for a trait list, empty when there are none.
pub fn traits_display(traits: &[Trait]) -> String {
    traits
        .iter()
        .map(|t| t.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::domain::{Card, Rank, Suit};

/// Number of cards in a fresh deck: 52 suited plus two jokers.
pub const DECK_SIZE: usize = 54;

/// The action deck, drawn from the back of the vec (the "top").
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    fn full() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        cards.push(Card::Joker);
        cards.push(Card::Joker);
        Self { cards }
    }

    /// A fresh 54-card deck in a uniform-random order. Not security
    /// sensitive; any unbiased shuffle is fine.
    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::full();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// A deck with a known card order for tests and fixtures. The last card
    /// of `cards` is the top of the deck (drawn first).
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Removes and returns up to `n` cards from the top. Returns fewer than
    /// `n` (possibly none) once the deck is exhausted; never an error.
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let mut drawn = Vec::with_capacity(take);
        for _ in 0..take {
            match self.cards.pop() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::shuffled(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_54_cards_with_two_jokers() {
        let deck = Deck::full();
        assert_eq!(deck.remaining(), DECK_SIZE);
        let jokers = deck.cards.iter().filter(|c| c.is_joker()).count();
        assert_eq!(jokers, 2);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let a = Deck::shuffled_with_seed(7);
        let b = Deck::shuffled_with_seed(7);
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn draw_removes_from_the_top() {
        let mut deck = Deck::from_cards(vec![
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Spades),
        ]);
        let drawn = deck.draw(1);
        assert_eq!(drawn, vec![Card::new(Rank::Ace, Suit::Spades)]);
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn overdraw_returns_what_remains() {
        let mut deck = Deck::shuffled_with_seed(1);
        deck.draw(51);
        let last = deck.draw(10);
        assert_eq!(last.len(), 3);
        assert_eq!(deck.remaining(), 0);
        assert!(deck.draw(1).is_empty());
    }
}

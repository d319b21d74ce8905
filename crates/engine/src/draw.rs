//! Trait-conditioned draw rules: how many cards a participant takes and
//! which card in the hand governs their turn.

use shared::domain::{Card, Trait};

use crate::deck::Deck;

/// Highest rank value that lets a Quick participant redraw (ranks 2-5).
pub const QUICK_REDRAW_MAX: i8 = 5;

fn has(traits: &[Trait], wanted: Trait) -> bool {
    traits.contains(&wanted)
}

/// Base draw count. First matching trait wins; traits never add up.
pub fn base_draw_count(traits: &[Trait]) -> usize {
    if has(traits, Trait::ImprovedLevelHeaded) {
        3
    } else if has(traits, Trait::LevelHeaded) {
        2
    } else if has(traits, Trait::Hesitant) {
        2
    } else {
        1
    }
}

fn quick_bonus_applies(traits: &[Trait], first: Card) -> bool {
    has(traits, Trait::Quick) && !first.is_joker() && first.value() <= QUICK_REDRAW_MAX
}

/// Draws a participant's initial hand: the trait-determined base draw, plus
/// one bonus card when Quick fires on the first card drawn.
pub fn initial_draw(deck: &mut Deck, traits: &[Trait]) -> Vec<Card> {
    let mut cards = deck.draw(base_draw_count(traits));
    if let Some(&first) = cards.first() {
        if quick_bonus_applies(traits, first) {
            cards.extend(deck.draw(1));
        }
    }
    cards
}

/// Picks the governing card from the initial hand alone.
///
/// Precedence: a joker always wins (the first one, if both were drawn);
/// level-headed of either grade takes the best card; hesitant takes the
/// worst; Quick takes the better of its two cards when the redraw fired;
/// everyone else keeps the first card drawn. An empty hand (deck ran out)
/// has no governing card.
pub fn active_from_initial(cards: &[Card], traits: &[Trait]) -> Option<Card> {
    if cards.is_empty() {
        return None;
    }
    if let Some(joker) = cards.iter().copied().find(|c| c.is_joker()) {
        return Some(joker);
    }
    if has(traits, Trait::LevelHeaded) || has(traits, Trait::ImprovedLevelHeaded) {
        return cards.iter().copied().max_by_key(|c| c.sort_key());
    }
    if has(traits, Trait::Hesitant) {
        return cards.iter().copied().min_by_key(|c| c.sort_key());
    }
    if has(traits, Trait::Quick) {
        if cards.len() == 2 && quick_bonus_applies(traits, cards[0]) {
            return cards.iter().copied().max_by_key(|c| c.sort_key());
        }
        return cards.first().copied();
    }
    cards.first().copied()
}

/// Reconciles the initial hand with cards drawn later via "draw additional":
/// the would-be active card of the initial hand is compared against the
/// single best additional card, and the higher of the two governs.
pub fn resolve_active(initial: &[Card], additional: &[Card], traits: &[Trait]) -> Option<Card> {
    let from_initial = active_from_initial(initial, traits);
    let best_additional = additional.iter().copied().max_by_key(|c| c.sort_key());
    match (from_initial, best_additional) {
        (Some(a), Some(b)) => Some(if b.sort_key() > a.sort_key() { b } else { a }),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn improved_level_headed_draws_three_regardless_of_other_traits() {
        assert_eq!(
            base_draw_count(&[Trait::ImprovedLevelHeaded, Trait::LevelHeaded, Trait::Quick]),
            3
        );
    }

    #[test]
    fn level_headed_and_hesitant_draw_two_others_draw_one() {
        assert_eq!(base_draw_count(&[Trait::LevelHeaded]), 2);
        assert_eq!(base_draw_count(&[Trait::Hesitant]), 2);
        assert_eq!(base_draw_count(&[Trait::Quick]), 1);
        assert_eq!(base_draw_count(&[]), 1);
    }

    #[test]
    fn quick_bonus_fires_only_on_low_non_joker_first_card() {
        // Top of deck is the end of the vec: 3C drawn first, then AS.
        let mut deck = Deck::from_cards(vec![
            card(Rank::Ace, Suit::Spades),
            card(Rank::Three, Suit::Clubs),
        ]);
        let hand = initial_draw(&mut deck, &[Trait::Quick]);
        assert_eq!(hand.len(), 2);

        let mut deck = Deck::from_cards(vec![
            card(Rank::Ace, Suit::Spades),
            card(Rank::King, Suit::Hearts),
        ]);
        let hand = initial_draw(&mut deck, &[Trait::Quick]);
        assert_eq!(hand.len(), 1);

        // Jack counts 10, so no redraw despite the face value confusion.
        let mut deck = Deck::from_cards(vec![
            card(Rank::Ace, Suit::Spades),
            card(Rank::Jack, Suit::Clubs),
        ]);
        let hand = initial_draw(&mut deck, &[Trait::Quick]);
        assert_eq!(hand.len(), 1);

        let mut deck = Deck::from_cards(vec![card(Rank::Ace, Suit::Spades), Card::Joker]);
        let hand = initial_draw(&mut deck, &[Trait::Quick]);
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn joker_governs_any_hand() {
        let hand = [card(Rank::Two, Suit::Clubs), Card::Joker];
        assert_eq!(active_from_initial(&hand, &[Trait::Hesitant]), Some(Card::Joker));
        assert_eq!(active_from_initial(&hand, &[Trait::LevelHeaded]), Some(Card::Joker));
        assert_eq!(active_from_initial(&hand, &[]), Some(Card::Joker));
    }

    #[test]
    fn level_headed_takes_best_hesitant_takes_worst() {
        let hand = [
            card(Rank::Five, Suit::Hearts),
            card(Rank::King, Suit::Clubs),
            card(Rank::Five, Suit::Spades),
        ];
        assert_eq!(
            active_from_initial(&hand, &[Trait::ImprovedLevelHeaded]),
            Some(card(Rank::King, Suit::Clubs))
        );
        assert_eq!(
            active_from_initial(&hand, &[Trait::Hesitant]),
            Some(card(Rank::Five, Suit::Hearts))
        );
    }

    #[test]
    fn quick_keeps_better_of_two_after_redraw() {
        let hand = [card(Rank::Four, Suit::Clubs), card(Rank::Nine, Suit::Hearts)];
        assert_eq!(
            active_from_initial(&hand, &[Trait::Quick]),
            Some(card(Rank::Nine, Suit::Hearts))
        );
        // No redraw happened: first card governs.
        let hand = [card(Rank::Nine, Suit::Hearts)];
        assert_eq!(
            active_from_initial(&hand, &[Trait::Quick]),
            Some(card(Rank::Nine, Suit::Hearts))
        );
    }

    #[test]
    fn untraited_hand_keeps_first_card() {
        let hand = [card(Rank::Two, Suit::Clubs)];
        assert_eq!(active_from_initial(&hand, &[]), Some(card(Rank::Two, Suit::Clubs)));
        assert_eq!(active_from_initial(&[], &[]), None);
    }

    #[test]
    fn additional_card_governs_only_when_it_beats_the_initial_pick() {
        let initial = [card(Rank::Eight, Suit::Spades)];
        let additional = [card(Rank::Four, Suit::Clubs), card(Rank::Queen, Suit::Diamonds)];
        assert_eq!(
            resolve_active(&initial, &additional, &[]),
            Some(card(Rank::Queen, Suit::Diamonds))
        );

        let additional = [card(Rank::Four, Suit::Clubs)];
        assert_eq!(
            resolve_active(&initial, &additional, &[]),
            Some(card(Rank::Eight, Suit::Spades))
        );
    }

    #[test]
    fn additional_alone_governs_an_empty_initial_hand() {
        let additional = [card(Rank::Six, Suit::Hearts)];
        assert_eq!(
            resolve_active(&[], &additional, &[]),
            Some(card(Rank::Six, Suit::Hearts))
        );
    }
}

//! The single authoritative session record and its mutating operations.
//!
//! One instance lives behind a mutex in the server; every operation here
//! either commits fully or returns an error having touched nothing.

use shared::domain::{traits_display, Card, ParticipantId, Trait};
use shared::protocol::{CardView, ParticipantEntry, ParticipantSpec, Snapshot};
use thiserror::Error;
use tracing::debug;

use crate::deck::Deck;
use crate::{draw, order};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("participant name required")]
    NameRequired,
    #[error("a participant named '{0}' already exists")]
    DuplicateName(String),
    #[error("no participant at index {0}")]
    IndexOutOfRange(usize),
    #[error("'{0}' has already been dealt in")]
    AlreadyDealtIn(String),
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub traits: Vec<Trait>,
    /// Initial draw for the round, in draw order.
    pub cards: Vec<Card>,
    /// Cards drawn later through "draw additional".
    pub additional_cards: Vec<Card>,
    pub active_card: Option<Card>,
    pub has_drawn: bool,
}

impl Participant {
    fn undrawn(name: String, traits: Vec<Trait>) -> Self {
        Self {
            id: ParticipantId::new(),
            name,
            traits,
            cards: Vec::new(),
            additional_cards: Vec::new(),
            active_card: None,
            has_drawn: false,
        }
    }

    fn clear_hand(&mut self) {
        self.cards.clear();
        self.additional_cards.clear();
        self.active_card = None;
        self.has_drawn = false;
    }
}

#[derive(Debug)]
pub struct SessionState {
    deck: Deck,
    /// Kept sorted descending by active card after every committed mutation;
    /// the vec order IS the initiative order.
    participants: Vec<Participant>,
    joker_drawn: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_deck(Deck::default())
    }

    /// Starts from a known deck; used by tests that need a scripted order.
    pub fn with_deck(deck: Deck) -> Self {
        Self {
            deck,
            participants: Vec::new(),
            joker_drawn: false,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn joker_drawn(&self) -> bool {
        self.joker_drawn
    }

    /// Replaces the roster from the given specs, all hands empty, and issues
    /// a fresh deck. Nothing is drawn until the first round.
    pub fn new_encounter(&mut self, specs: &[ParticipantSpec]) -> Result<(), SessionError> {
        let roster = build_roster(specs)?;
        self.deck = Deck::default();
        self.joker_drawn = false;
        self.participants = roster;
        Ok(())
    }

    /// Full re-draw for everyone currently at the table. A joker drawn last
    /// round forces a fresh deck first.
    pub fn next_round(&mut self) {
        if self.joker_drawn {
            debug!("joker was drawn last round, issuing a fresh deck");
            self.deck = Deck::default();
            self.joker_drawn = false;
        }
        for i in 0..self.participants.len() {
            self.participants[i].clear_hand();
            let traits = self.participants[i].traits.clone();
            let (cards, active) = self.draw_initial_hand(&traits);
            let p = &mut self.participants[i];
            p.cards = cards;
            p.active_card = active;
            p.has_drawn = true;
        }
        self.sort();
    }

    /// Fresh deck and cleared hands. With specs the roster is rebuilt from
    /// them; without, the current names and traits stay. Either way no
    /// participant is removed by a reset.
    pub fn reset_deck(&mut self, specs: &[ParticipantSpec]) -> Result<(), SessionError> {
        if !specs.is_empty() {
            self.participants = build_roster(specs)?;
        } else {
            for p in &mut self.participants {
                p.clear_hand();
            }
        }
        self.deck = Deck::default();
        self.joker_drawn = false;
        Ok(())
    }

    /// Wipes the table: no participants, fresh deck.
    pub fn clear(&mut self) {
        self.deck = Deck::default();
        self.participants.clear();
        self.joker_drawn = false;
    }

    /// Draws a late arrival into the current round. Re-dealing someone who
    /// already drew this round is a conflict and changes nothing.
    pub fn deal_in(&mut self, name: &str, traits: Vec<Trait>) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        if let Some(pos) = self.position_by_name(&name) {
            if self.participants[pos].has_drawn {
                return Err(SessionError::AlreadyDealtIn(name));
            }
            let (cards, active) = self.draw_initial_hand(&traits);
            let p = &mut self.participants[pos];
            p.traits = traits;
            p.cards = cards;
            p.active_card = active;
            p.has_drawn = true;
        } else {
            let mut p = Participant::undrawn(name, traits.clone());
            let (cards, active) = self.draw_initial_hand(&traits);
            p.cards = cards;
            p.active_card = active;
            p.has_drawn = true;
            self.participants.push(p);
        }
        self.sort();
        Ok(())
    }

    /// Draws one more card for the participant. An exhausted deck draws
    /// nothing and the hand is left as it was; that is still a committed
    /// (broadcastable) operation.
    pub fn draw_additional(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        if let Some(card) = self.deck.draw(1).pop() {
            if card.is_joker() {
                self.joker_drawn = true;
            }
            let p = &mut self.participants[index];
            p.additional_cards.push(card);
            p.active_card = draw::resolve_active(&p.cards, &p.additional_cards, &p.traits);
            p.has_drawn = true;
        }
        self.sort();
        Ok(())
    }

    /// Swaps the trait set. An existing hand is re-resolved under the new
    /// traits; no cards are drawn or returned.
    pub fn update_traits(&mut self, index: usize, traits: Vec<Trait>) -> Result<(), SessionError> {
        self.check_index(index)?;
        let p = &mut self.participants[index];
        p.traits = traits;
        if !p.cards.is_empty() || !p.additional_cards.is_empty() {
            p.active_card = draw::resolve_active(&p.cards, &p.additional_cards, &p.traits);
        }
        self.sort();
        Ok(())
    }

    pub fn update_name(&mut self, index: usize, name: &str) -> Result<(), SessionError> {
        self.check_index(index)?;
        let name = valid_name(name)?;
        if let Some(other) = self.position_by_name(&name) {
            if other != index {
                return Err(SessionError::DuplicateName(name));
            }
        }
        self.participants[index].name = name;
        Ok(())
    }

    /// Removes the participant. Relative order of the rest is untouched, so
    /// no re-sort is needed.
    pub fn remove(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.participants.remove(index);
        Ok(())
    }

    /// Adds an un-drawn participant row; they sort last until dealt in.
    pub fn add_placeholder(&mut self, name: &str, traits: Vec<Trait>) -> Result<(), SessionError> {
        let name = valid_name(name)?;
        if self.position_by_name(&name).is_some() {
            return Err(SessionError::DuplicateName(name));
        }
        self.participants.push(Participant::undrawn(name, traits));
        Ok(())
    }

    /// The complete observer-facing state. `cards` on the wire is the full
    /// hand, initial draw followed by additional draws.
    pub fn snapshot(&self) -> Snapshot {
        let participants = self
            .participants
            .iter()
            .map(|p| ParticipantEntry {
                name: p.name.clone(),
                traits: p.traits.clone(),
                trait_display: traits_display(&p.traits),
                has_drawn: p.has_drawn,
                cards: p
                    .cards
                    .iter()
                    .chain(p.additional_cards.iter())
                    .map(|c| CardView::from(*c))
                    .collect(),
                additional_cards: p
                    .additional_cards
                    .iter()
                    .map(|c| CardView::from(*c))
                    .collect(),
                active_card: p.active_card.map(CardView::from),
            })
            .collect();
        Snapshot {
            participants,
            deck_remaining: self.deck.remaining(),
        }
    }

    fn draw_initial_hand(&mut self, traits: &[Trait]) -> (Vec<Card>, Option<Card>) {
        let cards = draw::initial_draw(&mut self.deck, traits);
        if cards.iter().any(|c| c.is_joker()) {
            self.joker_drawn = true;
        }
        let active = draw::active_from_initial(&cards, traits);
        (cards, active)
    }

    fn sort(&mut self) {
        order::sort_by_initiative(&mut self.participants, |p| p.active_card);
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.name == name)
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.participants.len() {
            Ok(())
        } else {
            Err(SessionError::IndexOutOfRange(index))
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_name(name: &str) -> Result<String, SessionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SessionError::NameRequired);
    }
    Ok(name.to_string())
}

fn build_roster(specs: &[ParticipantSpec]) -> Result<Vec<Participant>, SessionError> {
    let mut roster: Vec<Participant> = Vec::with_capacity(specs.len());
    for spec in specs {
        let name = valid_name(&spec.name)?;
        if roster.iter().any(|p| p.name == name) {
            return Err(SessionError::DuplicateName(name));
        }
        roster.push(Participant::undrawn(name, spec.traits.clone()));
    }
    Ok(roster)
}

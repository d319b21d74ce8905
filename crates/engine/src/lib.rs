pub mod deck;
pub mod draw;
pub mod order;
pub mod session;

pub use deck::Deck;
pub use session::{Participant, SessionError, SessionState};

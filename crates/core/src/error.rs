use crate::Card;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeldError {
    #[error("invalid card: {0}")]
    InvalidCard(String),
    #[error("duplicate card in hand: {0}")]
    DuplicateCard(Card),
    #[error("invalid hand: {0}")]
    InvalidHand(String),
    #[error("invalid group: {0}")]
    InvalidGroup(String),
    #[error("search budget exceeded after {0} nodes")]
    SearchBudgetExceeded(u64),
}

use crate::{Card, Hand, MeldError, Rank, Suit, CARD_COUNT};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[derive(Debug, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut draw = Vec::with_capacity(CARD_COUNT);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                draw.push(Card::new(suit, rank));
            }
        }
        Self { draw }
    }

    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::standard52();
        let mut rng = StdRng::seed_from_u64(seed);
        deck.draw.shuffle(&mut rng);
        deck
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn deal_hand(&mut self, count: usize) -> Result<Hand, MeldError> {
        if count > self.draw.len() {
            return Err(MeldError::InvalidHand(format!(
                "cannot deal {count} cards from a deck of {}",
                self.draw.len()
            )));
        }
        let split = self.draw.len() - count;
        let mut cards = self.draw.split_off(split);
        cards.reverse();
        Hand::new(cards)
    }
}

/// Deals `size` distinct cards from a deck shuffled with `seed`.
pub fn random_hand(seed: u64, size: usize) -> Result<Hand, MeldError> {
    Deck::shuffled(seed).deal_hand(size)
}

use crate::{Card, MeldError};
use serde::{Deserialize, Serialize};

/// Ordered set of distinct cards. The engine only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Result<Self, MeldError> {
        let mut seen: u64 = 0;
        for card in &cards {
            if seen & card.mask() != 0 {
                return Err(MeldError::DuplicateCard(*card));
            }
            seen |= card.mask();
        }
        Ok(Self { cards })
    }

    pub fn from_ids(ids: &[u8]) -> Result<Self, MeldError> {
        let cards = ids
            .iter()
            .map(|id| Card::from_id(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(cards)
    }

    pub fn parse(labels: &str) -> Result<Self, MeldError> {
        let cards = labels
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Card>, _>>()?;
        Self::new(cards)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn score(&self) -> u32 {
        self.cards.iter().map(Card::score).sum()
    }

    pub fn ids(&self) -> Vec<u8> {
        self.cards.iter().map(Card::id).collect()
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = MeldError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Self::new(cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    #[test]
    fn duplicate_cards_are_refused() {
        let card = Card::new(Suit::Clubs, Rank::Nine);
        let err = Hand::new(vec![card, Card::new(Suit::Clubs, Rank::Ten), card]).unwrap_err();
        assert_eq!(err, MeldError::DuplicateCard(card));
        assert!(matches!(
            Hand::from_ids(&[3, 17, 3]),
            Err(MeldError::DuplicateCard(_))
        ));
    }

    #[test]
    fn invalid_ids_are_refused() {
        assert!(matches!(
            Hand::from_ids(&[0, 52]),
            Err(MeldError::InvalidCard(_))
        ));
    }

    #[test]
    fn keeps_caller_order() {
        let hand = Hand::from_ids(&[26, 1, 17]).unwrap();
        assert_eq!(hand.ids(), vec![26, 1, 17]);
        assert_eq!(hand.len(), 3);
    }

    #[test]
    fn parses_labels() {
        let hand = Hand::parse("AS, 2S 3s").unwrap();
        assert_eq!(hand.ids(), vec![0, 1, 2]);
        assert_eq!(hand.score(), 6);
        assert!(Hand::parse("AS,AS").is_err());
    }
}

use crate::{Card, MeldError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_GROUP_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Same suit, consecutive ranks.
    Sequence,
    /// Same rank, distinct suits.
    Match,
}

impl GroupKind {
    pub fn id(self) -> &'static str {
        match self {
            GroupKind::Sequence => "sequence",
            GroupKind::Match => "match",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawGroup")]
pub struct Group {
    kind: GroupKind,
    cards: Vec<Card>,
    #[serde(skip)]
    mask: u64,
}

impl Group {
    /// Builds a group after checking its shape.
    pub fn new(kind: GroupKind, cards: Vec<Card>) -> Result<Self, MeldError> {
        if cards.len() < MIN_GROUP_SIZE {
            return Err(MeldError::InvalidGroup(format!(
                "{} needs at least {MIN_GROUP_SIZE} cards, got {}",
                kind.id(),
                cards.len()
            )));
        }
        let shaped = match kind {
            GroupKind::Sequence => cards.windows(2).all(|w| {
                w[0].suit == w[1].suit && w[1].rank.index() == w[0].rank.index() + 1
            }),
            GroupKind::Match => {
                let mut suits = 0u8;
                cards.iter().all(|card| {
                    let bit = 1 << card.suit.index();
                    let fresh = suits & bit == 0;
                    suits |= bit;
                    fresh && card.rank == cards[0].rank
                })
            }
        };
        if !shaped {
            let labels: Vec<String> = cards.iter().map(Card::to_string).collect();
            return Err(MeldError::InvalidGroup(format!(
                "[{}] is not a {}",
                labels.join(" "),
                kind.id()
            )));
        }
        Ok(Self::assemble(kind, cards))
    }

    /// Detectors and the expander only produce well-shaped card lists.
    pub(crate) fn assemble(kind: GroupKind, cards: Vec<Card>) -> Self {
        debug_assert!(cards.len() >= MIN_GROUP_SIZE);
        let mask = cards.iter().fold(0, |acc, card| acc | card.mask());
        Self { kind, cards, mask }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
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

    pub fn score(&self) -> u32 {
        self.cards.iter().map(Card::score).sum()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.mask & card.mask() != 0
    }

    pub fn overlaps(&self, other: &Group) -> bool {
        self.mask & other.mask != 0
    }

    pub(crate) fn mask(&self) -> u64 {
        self.mask
    }
}

#[derive(Deserialize)]
struct RawGroup {
    kind: GroupKind,
    cards: Vec<Card>,
}

impl TryFrom<RawGroup> for Group {
    type Error = MeldError;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.cards)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "{}[{}]", self.kind.id(), labels.join(" "))
    }
}

//! Movement cards. A [`Card`] lets a piece of one type move once as if it was
//! another type. Cards are dealt from a shuffled [`Deck`] into the hands of
//! the [`Player`]s.

use std::fmt;

use rand::Rng;

use crate::chess::core::{Color, PieceType};
use crate::config::CardsConfig;

/// Identifies a card within a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u32);

/// Single-use permission for a piece of `piece_type` to additionally move
/// like `moves_as`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    #[allow(missing_docs)]
    pub id: CardId,
    #[allow(missing_docs)]
    pub piece_type: PieceType,
    #[allow(missing_docs)]
    pub moves_as: PieceType,
    /// Set once the card has been played. Used cards are never resurrected.
    pub used: bool,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.piece_type.as_str().to_ascii_uppercase(),
            self.moves_as.as_str().to_ascii_uppercase()
        )
    }
}

/// Finite pool of cards. The top of the deck is the end of the sequence.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the pool by repeating each card definition `frequency` times and
    /// shuffles it with `rng`.
    pub fn new<R: Rng>(config: &CardsConfig, rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(config.total_cards());
        let mut next_id = 0;
        for definition in &config.cards {
            for _ in 0..definition.frequency {
                cards.push(Card {
                    id: CardId(next_id),
                    piece_type: definition.piece_type,
                    moves_as: definition.moves_as,
                    used: false,
                });
                next_id += 1;
            }
        }
        shuffle(&mut cards, rng);
        Self { cards }
    }

    /// Removes up to `count` cards from the top of the deck. Returns fewer
    /// cards (possibly none) once the deck is exhausted.
    pub fn draw(&mut self, count: usize) -> Vec<Card> {
        let split = self.cards.len().saturating_sub(count);
        let mut drawn = self.cards.split_off(split);
        // Cards come off the top one by one.
        drawn.reverse();
        drawn
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fisher-Yates: every permutation is equally likely.
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// One side of the game and the cards it holds.
#[derive(Clone, Debug)]
pub struct Player {
    color: Color,
    hand: Vec<Card>,
}

impl Player {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            hand: Vec::new(),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Cards currently held. Played cards leave the hand.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Cards that can still be played.
    pub fn unused_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.hand.iter().filter(|card| !card.used)
    }

    pub(crate) fn receive(&mut self, cards: &[Card]) {
        self.hand.extend_from_slice(cards);
    }

    /// Marks the card as played and drops played cards from the hand. Returns
    /// `false` if the card is not in the hand.
    pub(crate) fn consume(&mut self, id: CardId) -> bool {
        let Some(card) = self.hand.iter_mut().find(|card| card.id == id) else {
            return false;
        };
        card.used = true;
        self.hand.retain(|card| !card.used);
        true
    }
}

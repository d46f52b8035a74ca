//! Configuration tables the game is created from: movement patterns, piece
//! definitions, the initial board and the card pool.
//!
//! Tables are read from JSON and validated here, so that [`crate::chess`] only
//! ever sees well-formed input. [`Rules::standard`] provides the classic 8×8
//! set-up embedded into the crate.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::chess::core::{Color, Coordinate, Error, Piece, PieceRole, PieceType};
use crate::chess::pattern::MovePattern;

/// Movement pattern for each piece type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MoveTable(BTreeMap<PieceType, MovePattern>);

impl MoveTable {
    /// Parses the `moves.json` format: an object mapping piece types to
    /// tagged patterns.
    ///
    /// # Errors
    ///
    /// If the input is not a valid movement table.
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        serde_json::from_str(input).context("invalid movement table")
    }

    /// Returns the pattern of the piece type.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPieceType`] if the type has no pattern.
    pub fn get(&self, kind: PieceType) -> Result<&MovePattern, Error> {
        self.0.get(&kind).ok_or(Error::UnknownPieceType(kind))
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn contains(&self, kind: PieceType) -> bool {
        self.0.contains_key(&kind)
    }

    /// Adds or replaces the pattern of a piece type.
    pub fn insert(&mut self, kind: PieceType, pattern: MovePattern) {
        let _ = self.0.insert(kind, pattern);
    }

    /// Patterns in piece type order.
    pub fn iter(&self) -> impl Iterator<Item = (&PieceType, &MovePattern)> + '_ {
        self.0.iter()
    }
}

/// Human-readable description of a piece type and its role in the rules.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PieceDef {
    #[allow(missing_docs)]
    pub name: String,
    #[serde(default)]
    #[allow(missing_docs)]
    pub role: PieceRole,
}

/// Definitions of the piece types. Types without a definition are treated as
/// [`PieceRole::Plain`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PieceTable(BTreeMap<PieceType, PieceDef>);

impl PieceTable {
    /// Parses the `pieces.json` format.
    ///
    /// # Errors
    ///
    /// If the input is not a valid piece table.
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        serde_json::from_str(input).context("invalid piece table")
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn role(&self, kind: PieceType) -> PieceRole {
        self.0.get(&kind).map_or(PieceRole::Plain, |def| def.role)
    }

    /// Display name of the piece type.
    #[must_use]
    pub fn name(&self, kind: PieceType) -> Option<&str> {
        self.0.get(&kind).map(|def| def.name.as_str())
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, kind: PieceType, def: PieceDef) {
        let _ = self.0.insert(kind, def);
    }
}

/// Board dimensions and initial placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    #[allow(missing_docs)]
    pub width: u16,
    #[allow(missing_docs)]
    pub height: u16,
    #[allow(missing_docs)]
    pub pieces: Vec<Piece>,
}

#[derive(Deserialize)]
struct RawBoard {
    width: u16,
    height: u16,
    pieces: Vec<RawPlacement>,
}

#[derive(Deserialize)]
struct RawPlacement {
    t: PieceType,
    c: String,
    pos: String,
}

impl BoardConfig {
    /// Parses the `board.json` format:
    /// `{"width": 8, "height": 8, "pieces": [{"t": "p", "c": "w", "pos": "A7"}]}`.
    ///
    /// # Errors
    ///
    /// If the dimensions are zero, a color is not `w`/`b`, a position is not
    /// in algebraic notation or lies outside of the board.
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        let raw: RawBoard = serde_json::from_str(input).context("invalid board layout")?;
        if raw.width == 0 || raw.height == 0 {
            bail!(
                "board should have positive dimensions, got {}x{}",
                raw.width,
                raw.height
            );
        }
        let pieces = raw
            .pieces
            .into_iter()
            .map(|placement| -> anyhow::Result<Piece> {
                let color = Color::try_from(placement.c.as_str())?;
                let position = Coordinate::try_from(placement.pos.as_str())?;
                if position.x >= i32::from(raw.width) || position.y >= i32::from(raw.height) {
                    bail!("piece out of bounds: {}", placement.pos);
                }
                Ok(Piece::new(placement.t, color, position))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            width: raw.width,
            height: raw.height,
            pieces,
        })
    }
}

/// Template for the cards put into the deck.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CardDef {
    #[serde(rename = "pieceType")]
    #[allow(missing_docs)]
    pub piece_type: PieceType,
    #[serde(rename = "movesAs")]
    #[allow(missing_docs)]
    pub moves_as: PieceType,
    /// Number of copies in the deck.
    pub frequency: u32,
}

/// The card pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CardsConfig {
    #[allow(missing_docs)]
    pub cards: Vec<CardDef>,
}

impl CardsConfig {
    /// Parses the `cards.json` format: `{"cards": [{"pieceType": "p",
    /// "movesAs": "r", "frequency": 2}]}`.
    ///
    /// # Errors
    ///
    /// If the input is not a valid card table.
    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        serde_json::from_str(input).context("invalid card table")
    }

    /// Size of the deck built from this pool.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards
            .iter()
            .map(|card| card.frequency as usize)
            .sum()
    }
}

/// Everything needed to set up a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    #[allow(missing_docs)]
    pub moves: MoveTable,
    #[allow(missing_docs)]
    pub pieces: PieceTable,
    #[allow(missing_docs)]
    pub board: BoardConfig,
    #[allow(missing_docs)]
    pub cards: CardsConfig,
}

const STANDARD_MOVES: &str = include_str!("../data/standard/moves.json");
const STANDARD_PIECES: &str = include_str!("../data/standard/pieces.json");
const STANDARD_BOARD: &str = include_str!("../data/standard/board.json");
const STANDARD_CARDS: &str = include_str!("../data/standard/cards.json");

impl Rules {
    /// Classic chess pieces and starting position with the default card pool.
    ///
    /// # Errors
    ///
    /// Only if the embedded tables are corrupted.
    pub fn standard() -> anyhow::Result<Self> {
        Self::from_json(
            STANDARD_MOVES,
            STANDARD_PIECES,
            STANDARD_BOARD,
            STANDARD_CARDS,
        )
    }

    /// Parses all four tables.
    ///
    /// # Errors
    ///
    /// If any of the tables is invalid.
    pub fn from_json(moves: &str, pieces: &str, board: &str, cards: &str) -> anyhow::Result<Self> {
        Ok(Self {
            moves: MoveTable::from_json(moves)?,
            pieces: PieceTable::from_json(pieces)?,
            board: BoardConfig::from_json(board)?,
            cards: CardsConfig::from_json(cards)?,
        })
    }

    /// Reads `moves.json`, `pieces.json`, `board.json` and `cards.json` from
    /// the directory.
    ///
    /// # Errors
    ///
    /// If a file can not be read or is invalid.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
        };
        Self::from_json(
            &read("moves.json")?,
            &read("pieces.json")?,
            &read("board.json")?,
            &read("cards.json")?,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn standard_rules() {
        let rules = Rules::standard().expect("embedded rules are valid");
        assert_eq!(rules.board.width, 8);
        assert_eq!(rules.board.height, 8);
        assert_eq!(rules.board.pieces.len(), 32);
        for piece in &rules.board.pieces {
            assert!(rules.moves.contains(piece.kind), "{}", piece.kind);
        }
        let king = PieceType::new("k").unwrap();
        assert_eq!(rules.pieces.role(king), PieceRole::King);
        assert_eq!(rules.pieces.name(king), Some("King"));
        assert_eq!(rules.pieces.role(PieceType::new("r").unwrap()), PieceRole::Rook);
        assert!(rules.moves.get(PieceType::new("p").unwrap()).unwrap().is_pawn());
    }

    #[test]
    fn pattern_parsing() {
        let table = MoveTable::from_json(
            r#"{
                "p": {"type": "pawn", "deltas": [[0, -1]], "doubleStart": [6, 1],
                      "captures": [[-1, -1], [1, -1]], "promotions": ["q", "n"]},
                "n": {"type": "leaper", "deltas": [[1, 2], [2, 1]]},
                "k": {"type": "slider", "dirs": [[1, 0]], "range": 1, "castling": true},
                "b": {"type": "slider", "dirs": [[1, 1]]}
            }"#,
        )
        .expect("valid table");
        assert_eq!(
            table.get(PieceType::new("p").unwrap()).unwrap().promotion(),
            Some(PieceType::new("q").unwrap())
        );
        assert_eq!(
            table.get(PieceType::new("b").unwrap()).unwrap(),
            &MovePattern::Slider {
                dirs: vec![(1, 1)],
                range: None,
                castling: false,
            }
        );
        assert_eq!(
            table.get(PieceType::new("x").unwrap()),
            Err(Error::UnknownPieceType(PieceType::new("x").unwrap()))
        );
    }

    #[test]
    fn unknown_pattern_type() {
        assert!(MoveTable::from_json(r#"{"x": {"type": "teleporter", "deltas": []}}"#).is_err());
        assert!(
            MoveTable::from_json(r#"{"p": {"type": "pawn", "deltas": [], "doubleStart": [6],
            "captures": [], "promotions": []}}"#)
            .is_err()
        );
    }

    #[test]
    fn board_validation() {
        let board = BoardConfig::from_json(
            r#"{"width": 5, "height": 6, "pieces": [{"t": "k", "c": "b", "pos": "e6"}]}"#,
        )
        .expect("valid layout");
        assert_eq!(
            board.pieces,
            vec![Piece::new(
                PieceType::new("k").unwrap(),
                Color::Black,
                Coordinate::new(4, 5)
            )]
        );
        let error = BoardConfig::from_json(
            r#"{"width": 5, "height": 6, "pieces": [{"t": "k", "c": "b", "pos": "F1"}]}"#,
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "piece out of bounds: F1");
        let error = BoardConfig::from_json(
            r#"{"width": 5, "height": 6, "pieces": [{"t": "k", "c": "red", "pos": "A1"}]}"#,
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "color should be 'w' or 'b', got 'red'");
        assert!(BoardConfig::from_json(
            r#"{"width": 5, "height": 6, "pieces": [{"t": "k", "c": "w", "pos": "11"}]}"#
        )
        .is_err());
        assert!(BoardConfig::from_json(r#"{"width": 0, "height": 6, "pieces": []}"#).is_err());
        assert!(BoardConfig::from_json(r#"{"width": 5, "height": 6}"#).is_err());
    }

    #[test]
    fn card_pool() {
        let cards = CardsConfig::from_json(
            r#"{"cards": [
                {"pieceType": "p", "movesAs": "r", "frequency": 2},
                {"pieceType": "q", "movesAs": "n", "frequency": 3}
            ]}"#,
        )
        .expect("valid pool");
        assert_eq!(cards.total_cards(), 5);
        assert!(CardsConfig::from_json(r#"{"cards": [{"pieceType": "p", "movesAs": "r"}]}"#)
            .is_err());
        assert!(CardsConfig::from_json(r#"{"deck": []}"#).is_err());
    }
}

//! Primitives commonly used within [`crate::chess`]: board coordinates, piece
//! colors and tags, castle rights and the engine error type.

use std::fmt::{self, Write};

use anyhow::bail;
use arrayvec::ArrayString;
use serde::Deserialize;

/// Number of letters available for the file part of the algebraic notation.
pub const MAX_ALGEBRAIC_FILES: i32 = 26;

/// Errors reported by the engine when its preconditions are violated. These
/// are never expected from a correctly-gated input layer and are not meant to
/// be recovered from: illegal user selections are reported as regular
/// [`crate::chess::game::SelectOutcome`] values instead.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The coordinate lies outside of the board.
    #[error("coordinate {0} is outside of the board")]
    OutOfBounds(Coordinate),
    /// Attempted to move a piece from an empty square.
    #[error("there is no piece to move at {0}")]
    EmptySource(Coordinate),
    /// A placement, card or promotion refers to a piece type without a
    /// movement pattern.
    #[error("piece type '{0}' has no movement pattern")]
    UnknownPieceType(PieceType),
}

/// Position on the grid. Both components are zero-based: `x` is the column
/// (file) and `y` is the row, counted from the top of the board.
///
/// Coordinates can be converted to and from algebraic notation, where the file
/// is a capital letter and the row is a one-based number:
///
/// ```
/// use cardchess::chess::core::Coordinate;
///
/// let coordinate = Coordinate::try_from("C5").unwrap();
/// assert_eq!(coordinate, Coordinate::new(2, 4));
/// assert_eq!(coordinate.algebraic().unwrap(), "C5");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Coordinate {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by `(dx, dy)`. The result may be outside
    /// of the board.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Serializes the coordinate in algebraic notation (e.g. "A1").
    ///
    /// # Errors
    ///
    /// If the file does not fit into `'A'..='Z'` or the row is negative.
    pub fn algebraic(self) -> anyhow::Result<String> {
        if !(0..MAX_ALGEBRAIC_FILES).contains(&self.x) {
            bail!("file index should be within 0..{MAX_ALGEBRAIC_FILES}, got {}", self.x);
        }
        if self.y < 0 {
            bail!("row index should be non-negative, got {}", self.y);
        }
        let file = char::from(b'A' + u8::try_from(self.x)?);
        Ok(format!("{file}{}", self.y + 1))
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl TryFrom<&str> for Coordinate {
    type Error = anyhow::Error;

    /// Parses algebraic notation. Input is case-insensitive and has to match
    /// `[A-Z][1-9][0-9]*`.
    fn try_from(algebraic: &str) -> anyhow::Result<Self> {
        let position = algebraic.trim().to_ascii_uppercase();
        let mut chars = position.chars();
        let file = match chars.next() {
            Some(file @ 'A'..='Z') => file,
            _ => bail!("invalid algebraic position: '{position}'"),
        };
        let row = chars.as_str();
        if !row.starts_with(|c: char| ('1'..='9').contains(&c))
            || !row.chars().all(|c| c.is_ascii_digit())
        {
            bail!("invalid algebraic position: '{position}'");
        }
        let row: i32 = row.parse()?;
        Ok(Self::new(i32::from(file as u8 - b'A'), row - 1))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.algebraic() {
            Ok(algebraic) => f.write_str(&algebraic),
            Err(_) => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// The game is played between two sides: White (having the advantage of the
/// first turn) and Black.
///
/// White starts on the last row of the board and advances towards row 0,
/// Black starts on row 0 and advances towards the last row. Pawn deltas are
/// configured from White's perspective and are mirrored vertically for Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row offset of a single step towards the opponent's side.
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Converts a delta written from White's perspective into this color's
    /// perspective.
    #[must_use]
    pub const fn orient(self, (dx, dy): (i32, i32)) -> (i32, i32) {
        match self {
            Self::White => (dx, dy),
            Self::Black => (dx, -dy),
        }
    }

    /// Row this color starts on (and castles on).
    #[must_use]
    pub const fn home_rank(self, height: i32) -> i32 {
        match self {
            Self::White => height - 1,
            Self::Black => 0,
        }
    }

    /// Row on which this color's pawns promote.
    #[must_use]
    pub const fn far_rank(self, height: i32) -> i32 {
        self.opponent().home_rank(height)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "White",
            Self::Black => "Black",
        })
    }
}

/// Maximum length of a [`PieceType`] tag in bytes.
pub const MAX_PIECE_TYPE_LEN: usize = 16;

/// Short tag identifying a kind of piece (e.g. "p" or "k"). The set of piece
/// types is not fixed: it is defined by the movement table the game is
/// created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct PieceType(ArrayString<MAX_PIECE_TYPE_LEN>);

impl PieceType {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// If the tag is empty or longer than [`MAX_PIECE_TYPE_LEN`] bytes.
    pub fn new(tag: &str) -> anyhow::Result<Self> {
        if tag.is_empty() {
            bail!("piece type should not be empty");
        }
        match ArrayString::from(tag) {
            Ok(tag) => Ok(Self(tag)),
            Err(_) => bail!(
                "piece type should be at most {MAX_PIECE_TYPE_LEN} bytes, got '{tag}'"
            ),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for PieceType {
    type Error = anyhow::Error;

    fn try_from(tag: &str) -> anyhow::Result<Self> {
        Self::new(tag)
    }
}

impl TryFrom<String> for PieceType {
    type Error = anyhow::Error;

    fn try_from(tag: String) -> anyhow::Result<Self> {
        Self::new(&tag)
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Special meaning of a piece type for the game rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceRole {
    /// No special treatment.
    #[default]
    Plain,
    /// Capturing it ends the game. It castles if its pattern allows castling.
    King,
    /// Castling partner of the king.
    Rook,
}

/// A piece placed on the [`crate::chess::board::Board`]. The `position` is
/// only authoritative while the piece is on the board: the board rewrites it
/// whenever the piece is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub kind: PieceType,
    #[allow(missing_docs)]
    pub color: Color,
    #[allow(missing_docs)]
    pub position: Coordinate,
}

impl Piece {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(kind: PieceType, color: Color, position: Coordinate) -> Self {
        Self {
            kind,
            color,
            position,
        }
    }
}

impl fmt::Display for Piece {
    /// White pieces are printed in uppercase, black pieces in lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Color::White => f.write_str(&self.kind.as_str().to_ascii_uppercase()),
            Color::Black => f.write_str(&self.kind.as_str().to_ascii_lowercase()),
        }
    }
}

/// Side of the board the king castles to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastlingSide {
    /// Towards the last file (O-O).
    KingSide,
    /// Towards file 0 (O-O-O).
    QueenSide,
}

bitflags::bitflags! {
    /// Tracks the ability to [castle] each side. When the king moves, its
    /// owner loses the ability to castle both sides. When the rook-equivalent
    /// leaves its corner, its owner loses the ability to castle that side.
    /// Rights are never restored.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const NONE = 0;
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Right to castle a specific side.
    #[must_use]
    pub const fn side(color: Color, side: CastlingSide) -> Self {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => Self::WHITE_SHORT,
            (Color::White, CastlingSide::QueenSide) => Self::WHITE_LONG,
            (Color::Black, CastlingSide::KingSide) => Self::BLACK_SHORT,
            (Color::Black, CastlingSide::QueenSide) => Self::BLACK_LONG,
        }
    }

    /// Rights to castle both sides.
    #[must_use]
    pub const fn both(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_BOTH,
            Color::Black => Self::BLACK_BOTH,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn can_castle(self, color: Color, side: CastlingSide) -> bool {
        self.contains(Self::side(color, side))
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn algebraic_round_trip() {
        for x in 0..MAX_ALGEBRAIC_FILES {
            for y in 0..40 {
                let coordinate = Coordinate::new(x, y);
                let algebraic = coordinate.algebraic().expect("file fits into A..Z");
                assert_eq!(
                    Coordinate::try_from(algebraic.as_str()).expect("valid notation"),
                    coordinate
                );
            }
        }
    }

    #[test]
    fn algebraic_parsing() {
        assert_eq!(Coordinate::try_from("a1").unwrap(), Coordinate::new(0, 0));
        assert_eq!(Coordinate::try_from("H8").unwrap(), Coordinate::new(7, 7));
        assert_eq!(Coordinate::try_from("z12").unwrap(), Coordinate::new(25, 11));
        assert!(Coordinate::try_from("").is_err());
        assert!(Coordinate::try_from("A").is_err());
        assert!(Coordinate::try_from("A0").is_err());
        assert!(Coordinate::try_from("A01").is_err());
        assert!(Coordinate::try_from("1A").is_err());
        assert!(Coordinate::try_from("A1B").is_err());
        assert!(Coordinate::try_from("Ä1").is_err());
    }

    #[test]
    fn algebraic_out_of_range() {
        assert!(Coordinate::new(26, 0).algebraic().is_err());
        assert!(Coordinate::new(-1, 0).algebraic().is_err());
        assert!(Coordinate::new(0, -1).algebraic().is_err());
        assert_eq!(Coordinate::new(-1, 3).to_string(), "(-1, 3)");
        assert_eq!(Coordinate::new(4, 3).to_string(), "E4");
    }

    #[test]
    fn color_orientation() {
        assert_eq!(Color::White.orient((1, -1)), (1, -1));
        assert_eq!(Color::Black.orient((1, -1)), (1, 1));
        assert_eq!(Color::White.home_rank(8), 7);
        assert_eq!(Color::Black.home_rank(8), 0);
        assert_eq!(Color::White.far_rank(10), 0);
        assert_eq!(Color::Black.far_rank(10), 9);
        assert_eq!(Color::try_from("b").unwrap(), Color::Black);
        assert!(Color::try_from("x").is_err());
    }

    #[test]
    fn piece_type_limits() {
        assert_eq!(PieceType::new("archbishop").unwrap().as_str(), "archbishop");
        assert!(PieceType::new("").is_err());
        assert!(PieceType::new("a-very-long-piece-type").is_err());
    }

    #[test]
    fn castle_rights() {
        let mut rights = CastleRights::ALL;
        assert_eq!(rights.to_string(), "KQkq");
        rights.remove(CastleRights::side(Color::White, CastlingSide::QueenSide));
        rights.remove(CastleRights::both(Color::Black));
        assert!(rights.can_castle(Color::White, CastlingSide::KingSide));
        assert!(!rights.can_castle(Color::White, CastlingSide::QueenSide));
        assert!(!rights.can_castle(Color::Black, CastlingSide::KingSide));
        assert_eq!(rights.to_string(), "K");
        rights.remove(CastleRights::WHITE_BOTH);
        assert_eq!(rights.to_string(), "-");
    }
}

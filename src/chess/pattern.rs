//! Data-driven move generation. A [`MovePattern`] describes the geometry of a
//! piece type and [`moves_for`] turns it into the list of reachable squares on
//! a given [`Board`].
//!
//! The same evaluator is used for the piece's own pattern and for the pattern
//! borrowed through a card: [`MoveContext::special_rules`] is what separates
//! the two, since borrowed patterns never grant en passant or castling.

use itertools::Itertools;
use serde::Deserialize;

use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    CastlingSide,
    Color,
    Coordinate,
    Error,
    Piece,
    PieceRole,
    PieceType,
};
use crate::config::PieceTable;

/// Offset on the board: `(dx, dy)`.
pub type Delta = (i32, i32);

/// Movement geometry of a piece type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MovePattern {
    /// Non-capturing advances, capturing diagonals, a double step from the
    /// configured start rank, en passant and promotion. Deltas are written
    /// from White's perspective.
    Pawn {
        #[allow(missing_docs)]
        deltas: Vec<Delta>,
        /// Start rows for the double step: `(white, black)`.
        #[serde(rename = "doubleStart")]
        double_start: (i32, i32),
        #[allow(missing_docs)]
        captures: Vec<Delta>,
        /// Types a pawn can be promoted into. Only the first one is used.
        promotions: Vec<PieceType>,
    },
    /// Fixed-offset jumps that ignore intervening pieces.
    Leaper {
        #[allow(missing_docs)]
        deltas: Vec<Delta>,
    },
    /// Repeated-offset rays.
    Slider {
        #[allow(missing_docs)]
        dirs: Vec<Delta>,
        /// Maximum number of steps along a ray.
        #[serde(default)]
        range: Option<u32>,
        /// Whether this piece type generates castling moves.
        #[serde(default)]
        castling: bool,
    },
}

impl MovePattern {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self, Self::Pawn { .. })
    }

    /// Whether moving `piece` to `to` is the pawn double step: twice one of
    /// the pattern's (oriented) deltas, starting from the color's start rank.
    #[must_use]
    pub fn is_double_step(&self, piece: &Piece, to: Coordinate) -> bool {
        let Self::Pawn {
            deltas,
            double_start,
            ..
        } = self
        else {
            return false;
        };
        let start_rank = match piece.color {
            Color::White => double_start.0,
            Color::Black => double_start.1,
        };
        let from = piece.position;
        from.y == start_rank
            && deltas.iter().any(|&delta| {
                let (dx, dy) = piece.color.orient(delta);
                dy != 0 && from.offset(2 * dx, 2 * dy) == to
            })
    }

    /// The type a pawn turns into on the far rank.
    #[must_use]
    pub fn promotion(&self) -> Option<PieceType> {
        match self {
            Self::Pawn { promotions, .. } => promotions.first().copied(),
            _ => None,
        }
    }
}

/// Game state that move generation depends on besides the board itself.
#[derive(Clone, Copy, Debug)]
pub struct MoveContext<'a> {
    /// The pawn that has just advanced two rows, if any.
    pub last_double_step_pawn: Option<&'a Piece>,
    #[allow(missing_docs)]
    pub castle_rights: CastleRights,
    /// Identifies the rook-equivalents for castling.
    pub pieces: &'a PieceTable,
    /// En passant and castling are only generated when this is set.
    pub special_rules: bool,
}

impl MoveContext<'_> {
    /// Context for a borrowed pattern: same state, no special rules.
    #[must_use]
    pub fn restricted(self) -> Self {
        Self {
            special_rules: false,
            ..self
        }
    }
}

/// Calculates the squares the piece at `from` reaches under `pattern`. The
/// result is in generation order and has no duplicates. An empty square
/// yields no moves.
///
/// # Errors
///
/// [`Error::OutOfBounds`] if `from` is outside of the board.
pub fn moves_for(
    board: &Board,
    from: Coordinate,
    pattern: &MovePattern,
    context: &MoveContext<'_>,
) -> Result<Vec<Coordinate>, Error> {
    let Some(piece) = board.get_piece(from)? else {
        return Ok(Vec::new());
    };
    let mut moves = Vec::new();
    match pattern {
        MovePattern::Pawn {
            deltas,
            double_start,
            captures,
            ..
        } => pawn_moves(board, piece, deltas, *double_start, captures, context, &mut moves),
        MovePattern::Leaper { deltas } => leaper_moves(board, piece, deltas, &mut moves),
        MovePattern::Slider {
            dirs,
            range,
            castling,
        } => {
            slider_moves(board, piece, dirs, *range, &mut moves);
            if *castling && context.special_rules {
                castling_moves(board, piece, context, &mut moves);
            }
        },
    }
    Ok(moves.into_iter().unique().collect())
}

fn is_enemy(board: &Board, square: Coordinate, color: Color) -> bool {
    board
        .occupant(square)
        .is_some_and(|other| other.color != color)
}

fn pawn_moves(
    board: &Board,
    piece: &Piece,
    deltas: &[Delta],
    double_start: (i32, i32),
    captures: &[Delta],
    context: &MoveContext<'_>,
    moves: &mut Vec<Coordinate>,
) {
    let from = piece.position;
    let start_rank = match piece.color {
        Color::White => double_start.0,
        Color::Black => double_start.1,
    };
    for &delta in deltas {
        let (dx, dy) = piece.color.orient(delta);
        let single = from.offset(dx, dy);
        if !board.is_vacant(single) {
            continue;
        }
        moves.push(single);
        let double = single.offset(dx, dy);
        if from.y == start_rank && board.is_vacant(double) {
            moves.push(double);
        }
    }
    for &delta in captures {
        let (dx, dy) = piece.color.orient(delta);
        let target = from.offset(dx, dy);
        if is_enemy(board, target, piece.color) {
            moves.push(target);
        }
    }
    if !context.special_rules {
        return;
    }
    if let Some(passed) = context.last_double_step_pawn {
        if passed.color != piece.color
            && passed.position.y == from.y
            && (passed.position.x - from.x).abs() == 1
        {
            let target = Coordinate::new(passed.position.x, from.y + piece.color.forward());
            if board.is_vacant(target) {
                moves.push(target);
            }
        }
    }
}

fn leaper_moves(board: &Board, piece: &Piece, deltas: &[Delta], moves: &mut Vec<Coordinate>) {
    for &(dx, dy) in deltas {
        let target = piece.position.offset(dx, dy);
        if board.is_vacant(target) || is_enemy(board, target, piece.color) {
            moves.push(target);
        }
    }
}

fn slider_moves(
    board: &Board,
    piece: &Piece,
    dirs: &[Delta],
    range: Option<u32>,
    moves: &mut Vec<Coordinate>,
) {
    let range = range.unwrap_or(u32::MAX);
    for &(dx, dy) in dirs {
        if (dx, dy) == (0, 0) {
            continue;
        }
        let mut target = piece.position.offset(dx, dy);
        let mut steps = 1;
        while steps <= range && board.in_bounds(target) {
            match board.occupant(target) {
                None => moves.push(target),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(target);
                    }
                    break;
                },
            }
            target = target.offset(dx, dy);
            steps += 1;
        }
    }
}

/// King-side castling lands on the second-to-last file and needs the two
/// files before the corner to be empty, queen-side castling lands on file 2
/// and needs files 1 to 3 to be empty. The corner has to hold a same-color
/// rook-equivalent and the corresponding right has to be held.
fn castling_moves(
    board: &Board,
    piece: &Piece,
    context: &MoveContext<'_>,
    moves: &mut Vec<Coordinate>,
) {
    let row = piece.color.home_rank(board.height());
    if piece.position.y != row {
        return;
    }
    let last = board.width() - 1;
    let has_partner = |file: i32| {
        board.occupant(Coordinate::new(file, row)).is_some_and(|partner| {
            partner.color == piece.color && context.pieces.role(partner.kind) == PieceRole::Rook
        })
    };
    let vacant = |files: &[i32]| {
        files
            .iter()
            .all(|&file| board.is_vacant(Coordinate::new(file, row)))
    };
    if context
        .castle_rights
        .can_castle(piece.color, CastlingSide::KingSide)
        && vacant(&[last - 2, last - 1])
        && has_partner(last)
    {
        moves.push(Coordinate::new(last - 1, row));
    }
    if context
        .castle_rights
        .can_castle(piece.color, CastlingSide::QueenSide)
        && vacant(&[1, 2, 3])
        && has_partner(0)
    {
        moves.push(Coordinate::new(2, row));
    }
}

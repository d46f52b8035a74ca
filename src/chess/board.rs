//! Rectangular grid of optional pieces. [`Board`] is the single owner of the
//! pieces in play and the only place that mutates their positions.

use std::fmt;

use crate::chess::core::{Coordinate, Error, Piece, PieceType};
use crate::config::BoardConfig;

/// Piece placement for a game of arbitrary size. Every coordinate-taking
/// accessor fails with [`Error::OutOfBounds`] when given a coordinate outside
/// of the grid.
///
/// Invariant: a piece stored in a cell reports that cell as its `position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major storage, row 0 first.
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width),
            height: i32::from(height),
            cells: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    /// Creates a board and places the configured pieces.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if a placement is outside of the board.
    pub fn from_config(config: &BoardConfig) -> Result<Self, Error> {
        let mut board = Self::new(config.width, config.height);
        for piece in &config.pieces {
            board.set_piece(piece.position, Some(*piece))?;
        }
        Ok(board)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn in_bounds(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= 0
            && coordinate.x < self.width
            && coordinate.y >= 0
            && coordinate.y < self.height
    }

    fn index(&self, coordinate: Coordinate) -> Result<usize, Error> {
        if !self.in_bounds(coordinate) {
            return Err(Error::OutOfBounds(coordinate));
        }
        Ok(row_major(self.width, coordinate))
    }

    /// Returns the piece at the given coordinate, if any.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    pub fn get_piece(&self, coordinate: Coordinate) -> Result<Option<&Piece>, Error> {
        let index = self.index(coordinate)?;
        Ok(self.cells[index].as_ref())
    }

    /// Mutable access to the piece at the given coordinate. Callers may change
    /// the piece type or color (e.g. promotion), the position is owned by the
    /// board.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    fn get_piece_mut(&mut self, coordinate: Coordinate) -> Result<Option<&mut Piece>, Error> {
        let index = self.index(coordinate)?;
        Ok(self.cells[index].as_mut())
    }

    /// Lenient lookup used by move generation: coordinates outside of the
    /// board are treated as empty.
    #[must_use]
    pub fn occupant(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.get_piece(coordinate).ok().flatten()
    }

    /// Returns `true` if the coordinate is on the board and holds no piece.
    #[must_use]
    pub fn is_vacant(&self, coordinate: Coordinate) -> bool {
        matches!(self.get_piece(coordinate), Ok(None))
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    pub fn has_piece(&self, coordinate: Coordinate) -> Result<bool, Error> {
        Ok(self.get_piece(coordinate)?.is_some())
    }

    /// Places a piece (rewriting its position to `coordinate`) or clears the
    /// cell. The previous occupant is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    pub fn set_piece(&mut self, coordinate: Coordinate, piece: Option<Piece>) -> Result<(), Error> {
        let index = self.index(coordinate)?;
        self.cells[index] = piece.map(|mut piece| {
            piece.position = coordinate;
            piece
        });
        Ok(())
    }

    /// Clears the cell and returns the piece that occupied it.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    pub fn remove_piece(&mut self, coordinate: Coordinate) -> Result<Option<Piece>, Error> {
        let index = self.index(coordinate)?;
        Ok(self.cells[index].take())
    }

    /// Relocates the piece from `from` to `to` and clears `from`. Returns the
    /// piece that was replaced on `to`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if either coordinate is outside of the board,
    /// [`Error::EmptySource`] if there is no piece at `from`.
    pub fn move_piece(&mut self, from: Coordinate, to: Coordinate) -> Result<Option<Piece>, Error> {
        let target = self.index(to)?;
        let source = self.index(from)?;
        let Some(mut piece) = self.cells[source].take() else {
            return Err(Error::EmptySource(from));
        };
        piece.position = to;
        Ok(self.cells[target].replace(piece))
    }

    /// Changes the type of the piece at `coordinate` in place. Returns `false`
    /// if the cell is empty.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`].
    pub fn promote(&mut self, coordinate: Coordinate, kind: PieceType) -> Result<bool, Error> {
        Ok(match self.get_piece_mut(coordinate)? {
            Some(piece) => {
                piece.kind = kind;
                true
            },
            None => false,
        })
    }

    /// All placed pieces in row-major order (row 0 first, then by column).
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }
}

/// Cell offset of an in-bounds coordinate. Computed in `usize`: the product
/// of two `u16` dimensions does not fit into `i32`.
#[allow(clippy::cast_sign_loss)]
const fn row_major(width: i32, coordinate: Coordinate) -> usize {
    coordinate.y as usize * width as usize + coordinate.x as usize
}

impl fmt::Display for Board {
    /// Prints the board as a diagram: row 0 on top, files labeled with
    /// letters and rows with their one-based number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = self
            .all_pieces()
            .map(|piece| piece.kind.as_str().len())
            .max()
            .unwrap_or(1);
        let label_width = self.height.to_string().len();
        for (y, row) in (0..self.height).zip(self.cells.chunks(self.width.max(1) as usize)) {
            write!(f, "{:>label_width$} ", y + 1)?;
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                match cell {
                    Some(piece) => write!(f, "{:<cell_width$}", piece.to_string())?,
                    None => write!(f, "{:<cell_width$}", ".")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "{:>label_width$} ", "")?;
        for x in 0..self.width {
            if x > 0 {
                f.write_str(" ")?;
            }
            let file = Coordinate::new(x, 0)
                .algebraic()
                .ok()
                .and_then(|algebraic| algebraic.chars().next())
                .unwrap_or('?');
            write!(f, "{file:<cell_width$}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Color;

    fn piece(kind: &str, color: Color) -> Piece {
        Piece::new(
            PieceType::new(kind).expect("valid tag"),
            color,
            Coordinate::new(0, 0),
        )
    }

    #[test]
    fn set_rewrites_position() {
        let mut board = Board::new(5, 6);
        let target = Coordinate::new(3, 4);
        board
            .set_piece(target, Some(piece("n", Color::White)))
            .expect("in bounds");
        assert_eq!(board.get_piece(target).unwrap().unwrap().position, target);
        assert!(board.has_piece(target).unwrap());
    }

    #[test]
    fn out_of_bounds() {
        let mut board = Board::new(3, 2);
        let outside = Coordinate::new(3, 0);
        assert!(!board.in_bounds(outside));
        assert!(!board.in_bounds(Coordinate::new(0, -1)));
        assert_eq!(board.get_piece(outside), Err(Error::OutOfBounds(outside)));
        assert_eq!(
            board.set_piece(outside, Some(piece("k", Color::Black))),
            Err(Error::OutOfBounds(outside))
        );
        assert_eq!(
            board.move_piece(Coordinate::new(0, 0), outside),
            Err(Error::OutOfBounds(outside))
        );
        assert!(board.occupant(outside).is_none());
        assert!(!board.is_vacant(outside));
    }

    #[test]
    fn move_replaces_target() {
        let mut board = Board::new(4, 4);
        let (from, to) = (Coordinate::new(0, 0), Coordinate::new(3, 3));
        board.set_piece(from, Some(piece("r", Color::White))).unwrap();
        board.set_piece(to, Some(piece("n", Color::Black))).unwrap();
        let replaced = board.move_piece(from, to).unwrap();
        assert_eq!(replaced.map(|piece| piece.color), Some(Color::Black));
        assert_eq!(board.get_piece(from), Ok(None));
        assert_eq!(board.get_piece(to).unwrap().unwrap().position, to);
        assert_eq!(board.all_pieces().count(), 1);
    }

    #[test]
    fn index_of_large_board() {
        let last = Coordinate::new(59_999, 59_999);
        assert_eq!(row_major(60_000, last), 3_599_999_999);
        assert_eq!(row_major(60_000, Coordinate::new(3, 1)), 60_003);
    }

    #[test]
    fn move_from_empty_square() {
        let mut board = Board::new(4, 4);
        let from = Coordinate::new(1, 1);
        assert_eq!(
            board.move_piece(from, Coordinate::new(2, 2)),
            Err(Error::EmptySource(from))
        );
    }

    #[test]
    fn diagram() {
        let mut board = Board::new(3, 2);
        board
            .set_piece(Coordinate::new(0, 0), Some(piece("k", Color::Black)))
            .unwrap();
        board
            .set_piece(Coordinate::new(2, 1), Some(piece("p", Color::White)))
            .unwrap();
        assert_eq!(board.to_string(), "1 k . .\n2 . . P\n  A B C");
    }
}

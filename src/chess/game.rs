//! The turn and selection state machine. [`Game`] owns the board, the deck
//! and both players, computes legal moves (the piece's own pattern plus the
//! patterns borrowed through cards) and applies them together with the
//! special-rule side effects: en passant, promotion and castling.
//!
//! The game ends when a king-type piece is captured. Checks are not tracked:
//! a side is allowed to leave its own king under attack.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chess::board::Board;
use crate::chess::cards::{Card, Deck, Player};
use crate::chess::core::{CastleRights, CastlingSide, Color, Coordinate, Error, Piece, PieceRole};
use crate::chess::pattern::{moves_for, MoveContext};
use crate::config::{MoveTable, PieceTable, Rules};

/// Knobs that are not part of the rule tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOptions {
    /// Cards dealt to each player when the game starts.
    pub initial_hand: usize,
    /// Cards taken by [`Game::draw_cards`].
    pub draw_count: usize,
    /// Seed for the deck shuffle. A fresh seed is taken from the OS when not
    /// set.
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            initial_hand: 3,
            draw_count: 1,
            seed: None,
        }
    }
}

/// Entry of the legal move list of the selected piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveWithCard {
    #[allow(missing_docs)]
    pub target: Coordinate,
    /// The card that has to be played to reach `target`. Not set for squares
    /// reachable with the piece's own pattern.
    pub card: Option<Card>,
}

/// Result of [`Game::select`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A piece of the side to move has been selected and its legal moves
    /// calculated.
    PieceSelected {
        #[allow(missing_docs)]
        piece: Piece,
    },
    /// The square does not hold a piece of the side to move.
    InvalidSelection {
        #[allow(missing_docs)]
        coord: Coordinate,
    },
    /// The selected piece moved.
    LegalMove {
        #[allow(missing_docs)]
        from: Coordinate,
        #[allow(missing_docs)]
        to: Coordinate,
        /// Card played for this move.
        card: Option<Card>,
        /// Piece removed from the board, including the pawn taken en passant.
        captured: Option<Piece>,
        /// Whether this move captured a king-type piece.
        game_over: bool,
    },
    /// The target is not in the legal move list. The selection is dropped.
    IllegalMove {
        #[allow(missing_docs)]
        from: Coordinate,
        #[allow(missing_docs)]
        to: Coordinate,
    },
}

/// A single match.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    moves: MoveTable,
    pieces: PieceTable,
    deck: Deck,
    players: [Player; 2],
    turn: Color,
    selected: Option<Coordinate>,
    legal: Vec<MoveWithCard>,
    last_double_step_pawn: Option<Piece>,
    castle_rights: CastleRights,
    game_over: bool,
    draw_count: usize,
}

impl Game {
    /// Sets up the board, shuffles the deck and deals the initial hands
    /// (White first). White moves first.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPieceType`] if a placement, a card or a promotion
    /// refers to a type without a movement pattern, [`Error::OutOfBounds`] if
    /// a placement is outside of the board.
    pub fn new(rules: Rules, options: &GameOptions) -> Result<Self, Error> {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rules, options, &mut rng)
    }

    /// Same as [`Game::new`] but shuffles the deck with the given generator.
    ///
    /// # Errors
    ///
    /// See [`Game::new`].
    pub fn with_rng<R: rand::Rng>(
        rules: Rules,
        options: &GameOptions,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let Rules {
            moves,
            pieces,
            board,
            cards,
        } = rules;
        for piece in &board.pieces {
            let _ = moves.get(piece.kind)?;
        }
        for card in &cards.cards {
            let _ = moves.get(card.piece_type)?;
            let _ = moves.get(card.moves_as)?;
        }
        for (_, pattern) in moves.iter() {
            if let Some(promotion) = pattern.promotion() {
                let _ = moves.get(promotion)?;
            }
        }
        let mut game = Self {
            board: Board::from_config(&board)?,
            moves,
            pieces,
            deck: Deck::new(&cards, rng),
            players: [Player::new(Color::White), Player::new(Color::Black)],
            turn: Color::White,
            selected: None,
            legal: Vec::new(),
            last_double_step_pawn: None,
            castle_rights: CastleRights::ALL,
            game_over: false,
            draw_count: options.draw_count,
        };
        for color in [Color::White, Color::Black] {
            let dealt = game.deck.draw(options.initial_hand);
            game.players[color.index()].receive(&dealt);
        }
        Ok(game)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn selected(&self) -> Option<Coordinate> {
        self.selected
    }

    /// Legal moves of the selected piece. Empty when nothing is selected.
    #[must_use]
    pub fn legal(&self) -> &[MoveWithCard] {
        &self.legal
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Cards the side to move can play.
    pub fn current_hand(&self) -> impl Iterator<Item = &Card> + '_ {
        self.player(self.turn).unused_cards()
    }

    /// Whether a king-type piece has been captured.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    /// The pawn that advanced two rows on the previous move, if any.
    #[must_use]
    pub const fn last_double_step_pawn(&self) -> Option<&Piece> {
        self.last_double_step_pawn.as_ref()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn pieces(&self) -> &PieceTable {
        &self.pieces
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn moves(&self) -> &MoveTable {
        &self.moves
    }

    /// Handles a click on `coord`. With nothing selected, selects a piece of
    /// the side to move. With a piece selected, moves it if `coord` is one of
    /// its legal targets and drops the selection otherwise.
    ///
    /// After the game is over every selection is invalid.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `coord` is outside of the board.
    pub fn select(&mut self, coord: Coordinate) -> Result<SelectOutcome, Error> {
        if !self.board.in_bounds(coord) {
            return Err(Error::OutOfBounds(coord));
        }
        if self.game_over {
            self.clear_selection();
            return Ok(SelectOutcome::InvalidSelection { coord });
        }
        if let Some(from) = self.selected {
            let chosen = self.legal.iter().find(|entry| entry.target == coord).copied();
            self.clear_selection();
            return Ok(match chosen {
                Some(entry) => {
                    let captured = self.make_move(from, coord, entry.card)?;
                    SelectOutcome::LegalMove {
                        from,
                        to: coord,
                        card: entry.card,
                        captured,
                        game_over: self.game_over,
                    }
                },
                None => SelectOutcome::IllegalMove { from, to: coord },
            });
        }
        match self.board.get_piece(coord)?.copied() {
            Some(piece) if piece.color == self.turn => {
                self.legal = self.generate_moves(coord)?;
                self.selected = Some(coord);
                Ok(SelectOutcome::PieceSelected { piece })
            },
            _ => Ok(SelectOutcome::InvalidSelection { coord }),
        }
    }

    fn context(&self) -> MoveContext<'_> {
        MoveContext {
            last_double_step_pawn: self.last_double_step_pawn.as_ref(),
            castle_rights: self.castle_rights,
            pieces: &self.pieces,
            special_rules: true,
        }
    }

    /// Calculates the legal moves of the piece at `coord`: the targets of its
    /// own pattern first, then the targets only reachable with one of the
    /// unused cards of the side to move. A target is listed once: the piece's
    /// own pattern wins over cards and earlier cards win over later ones.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`], [`Error::UnknownPieceType`].
    pub fn generate_moves(&self, coord: Coordinate) -> Result<Vec<MoveWithCard>, Error> {
        let Some(piece) = self.board.get_piece(coord)? else {
            return Ok(Vec::new());
        };
        let context = self.context();
        let mut legal: Vec<MoveWithCard> =
            moves_for(&self.board, coord, self.moves.get(piece.kind)?, &context)?
                .into_iter()
                .map(|target| MoveWithCard { target, card: None })
                .collect();
        let borrowed = context.restricted();
        for card in self
            .current_hand()
            .filter(|card| card.piece_type == piece.kind)
        {
            let pattern = self.moves.get(card.moves_as)?;
            for target in moves_for(&self.board, coord, pattern, &borrowed)? {
                if legal.iter().all(|entry| entry.target != target) {
                    legal.push(MoveWithCard {
                        target,
                        card: Some(*card),
                    });
                }
            }
        }
        Ok(legal)
    }

    /// Applies a move without checking it against the legal move list and
    /// passes the turn. Returns the captured piece. Nothing happens if there
    /// is no piece at `from`. A played `card` has to be in the hand of the
    /// side to move.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`], [`Error::UnknownPieceType`].
    pub fn make_move(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        card: Option<Card>,
    ) -> Result<Option<Piece>, Error> {
        let Some(moving) = self.board.get_piece(from)?.copied() else {
            return Ok(None);
        };
        let pattern = self.moves.get(moving.kind)?;
        let is_pawn = pattern.is_pawn();
        let promotion = pattern.promotion();
        let double_step = card.is_none() && pattern.is_double_step(&moving, to);
        let role = self.pieces.role(moving.kind);
        let height = self.board.height();
        let width = self.board.width();

        let mut captured = self.board.get_piece(to)?.copied();
        if let Some(target) = captured {
            if self.pieces.role(target.kind) == PieceRole::King {
                self.game_over = true;
            }
            if self.pieces.role(target.kind) == PieceRole::Rook {
                self.revoke_corner(target.color, to);
            }
        }

        if is_pawn && card.is_none() && captured.is_none() {
            if let Some(passed) = self.last_double_step_pawn {
                if passed.color != moving.color
                    && passed.position.y == from.y
                    && to.x == passed.position.x
                    && to.y == from.y + moving.color.forward()
                {
                    captured = self.board.remove_piece(passed.position)?;
                }
            }
        }

        let _ = self.board.move_piece(from, to)?;

        if is_pawn && to.y == moving.color.far_rank(height) {
            if let Some(promotion) = promotion {
                let _ = self.board.promote(to, promotion)?;
            }
        }

        if role == PieceRole::King
            && card.is_none()
            && from.y == moving.color.home_rank(height)
            && to.y == from.y
            && (to.x - from.x).abs() == 2
        {
            let (side, corner, crossed) = if to.x > from.x {
                (CastlingSide::KingSide, width - 1, to.x - 1)
            } else {
                (CastlingSide::QueenSide, 0, to.x + 1)
            };
            let corner = Coordinate::new(corner, to.y);
            let partner = self.board.get_piece(corner)?.is_some_and(|partner| {
                partner.color == moving.color && self.pieces.role(partner.kind) == PieceRole::Rook
            });
            if partner && self.castle_rights.can_castle(moving.color, side) {
                let _ = self.board.move_piece(corner, Coordinate::new(crossed, to.y))?;
            }
        }

        match role {
            PieceRole::King => self.castle_rights.remove(CastleRights::both(moving.color)),
            PieceRole::Rook => self.revoke_corner(moving.color, from),
            PieceRole::Plain => {},
        }

        self.last_double_step_pawn = None;
        if double_step {
            self.last_double_step_pawn = self.board.get_piece(to)?.copied();
        }

        if let Some(card) = card {
            let consumed = self.players[self.turn.index()].consume(card.id);
            debug_assert!(consumed, "card {card} is not in the hand of {}", self.turn);
        }

        self.pass_turn();
        Ok(captured)
    }

    /// Alternative to moving a piece: the side to move draws cards and passes
    /// the turn. Returns the drawn cards, which may be fewer than configured
    /// once the deck runs out. Does nothing after the game is over.
    pub fn draw_cards(&mut self) -> Vec<Card> {
        if self.game_over {
            return Vec::new();
        }
        let drawn = self.deck.draw(self.draw_count);
        self.players[self.turn.index()].receive(&drawn);
        self.pass_turn();
        drawn
    }

    /// A rook-equivalent leaving (or captured on) a corner of its home rank
    /// takes the castling right of that side with it.
    fn revoke_corner(&mut self, color: Color, square: Coordinate) {
        if square.y != color.home_rank(self.board.height()) {
            return;
        }
        if square.x == 0 {
            self.castle_rights
                .remove(CastleRights::side(color, CastlingSide::QueenSide));
        }
        if square.x == self.board.width() - 1 {
            self.castle_rights
                .remove(CastleRights::side(color, CastlingSide::KingSide));
        }
    }

    fn pass_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal.clear();
    }
}

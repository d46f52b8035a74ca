//! The engine drives a [`Game`] from a line-based text protocol: every input
//! line is a command and every outcome is written back as a line of text.
//!
//! [`Engine::run`] is the "main loop" which reads commands from the input
//! stream until `quit` is sent or the stream is closed.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::chess::cards::Card;
use crate::chess::game::{Game, MoveWithCard, SelectOutcome};
use crate::engine::command::Command;

mod command;

/// Connects a [`Game`] with the input and output streams.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine for an already set up game.
    #[must_use]
    pub fn new(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    /// The game being played.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Continuously reads the input stream and executes the commands until
    /// `quit` is sent or the stream is closed.
    ///
    /// Commands that can not be executed (unknown commands, squares outside
    /// of the board) are reported as `error: ...` lines and the loop goes on.
    ///
    /// # Errors
    ///
    /// Fails only if reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::Select(coordinate) => match self.game.select(coordinate) {
                    Ok(outcome) => self.handle_outcome(outcome)?,
                    Err(e) => writeln!(self.output, "error: {e}")?,
                },
                Command::Draw => self.handle_draw()?,
                Command::Board => writeln!(self.output, "{}", self.game.board())?,
                Command::Hand => self.handle_hand()?,
                Command::Legal => self.handle_legal()?,
                Command::Quit => break,
                Command::Empty => {},
                Command::Unknown(command) => {
                    writeln!(self.output, "error: unsupported command: {command}")?;
                },
            }
        }
        Ok(())
    }

    fn handle_outcome(&mut self, outcome: SelectOutcome) -> anyhow::Result<()> {
        match outcome {
            SelectOutcome::PieceSelected { piece } => writeln!(
                self.output,
                "selected {piece} at {}: {}",
                piece.position,
                format_moves(self.game.legal())
            )?,
            SelectOutcome::InvalidSelection { coord } => {
                writeln!(self.output, "invalid selection: {coord}")?;
            },
            SelectOutcome::LegalMove {
                from,
                to,
                card,
                captured,
                game_over,
            } => {
                write!(self.output, "move {from} {to}")?;
                if let Some(card) = card {
                    write!(self.output, " card {card}")?;
                }
                if let Some(captured) = captured {
                    write!(self.output, " captures {captured}")?;
                }
                writeln!(self.output)?;
                if game_over {
                    writeln!(
                        self.output,
                        "game over: {} wins",
                        self.game.turn().opponent()
                    )?;
                }
            },
            SelectOutcome::IllegalMove { from, to } => {
                writeln!(self.output, "illegal move: {from} {to}")?;
            },
        }
        Ok(())
    }

    fn handle_draw(&mut self) -> anyhow::Result<()> {
        if self.game.is_game_over() {
            writeln!(self.output, "error: the game is over")?;
            return Ok(());
        }
        let color = self.game.turn();
        let drawn = self.game.draw_cards();
        writeln!(self.output, "{color} drew: {}", format_cards(&drawn))?;
        Ok(())
    }

    fn handle_hand(&mut self) -> anyhow::Result<()> {
        let color = self.game.turn();
        let hand = format_cards(self.game.player(color).hand());
        writeln!(self.output, "{color} hand: {hand}")?;
        Ok(())
    }

    fn handle_legal(&mut self) -> anyhow::Result<()> {
        match self.game.selected() {
            Some(from) => writeln!(
                self.output,
                "legal from {from}: {}",
                format_moves(self.game.legal())
            )?,
            None => writeln!(self.output, "error: no piece selected")?,
        }
        Ok(())
    }
}

fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards.iter().join(", ")
}

/// Card moves are annotated with the card that grants them: `E3 E4 D3[P -> N]`.
fn format_moves(moves: &[MoveWithCard]) -> String {
    if moves.is_empty() {
        return "-".to_string();
    }
    moves
        .iter()
        .map(|entry| match entry.card {
            Some(card) => format!("{}[{card}]", entry.target),
            None => entry.target.to_string(),
        })
        .join(" ")
}

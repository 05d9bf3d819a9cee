//! Game structure.
//!
//! A Game is the single mutable unit a front end talks to. The input side
//! selects squares and confirms moves, the presentation side reads the board,
//! the current selection with its highlighted destinations, and the game state.

use log::{debug, info, trace};

use crate::boardrepr::Mailbox;
use crate::coretypes::{Color, GameState, Move, MoveInfo, Square};
use crate::error::{self, ErrorKind};
use crate::legality;
use crate::movelist::{MoveHistory, SquareList};
use crate::position::Position;

/// A selected piece and the legal destinations highlighted for it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Selection {
    pub square: Square,
    pub destinations: SquareList,
}

/// Game contains information for an in progress game:
/// The base position the game started from, the sequence of moves that were
/// played, the current position, and whether the game has been decided.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    pub base_position: Position,
    pub moves: MoveHistory,
    position: Position,
    state: GameState,
    selection: Option<Selection>,
}

impl Game {
    /// Create a new Game from a base position and a sequence of moves.
    /// This generates the current position by applying the sequence of moves to the base.
    /// If a move in the move history was illegal, Err is returned.
    pub fn new<I>(base_position: Position, moves: I) -> error::Result<Self>
    where
        I: IntoIterator<Item = Move>,
    {
        let mut game = Self::from(base_position);
        for move_ in moves {
            game.try_move(move_)?;
        }
        Ok(game)
    }

    /// Create a new game in the standard chess start position.
    pub fn start_position() -> Self {
        Self::from(Position::start_position())
    }

    /// Immutable getters for the presentation layer.
    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn mailbox(&self) -> &Mailbox {
        self.position.mailbox()
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }
    pub fn last_move(&self) -> Option<MoveInfo> {
        self.position.last_move()
    }
    pub fn history(&self) -> &[MoveInfo] {
        &self.moves
    }
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Destinations highlighted for the current selection, empty if nothing is selected.
    pub fn highlighted(&self) -> &[Square] {
        match &self.selection {
            Some(selection) => selection.destinations.as_slice(),
            None => &[],
        }
    }

    /// Legal destinations for the piece on square, castling and en passant included.
    pub fn legal_moves(&self, square: Square) -> error::Result<SquareList> {
        self.position.legal_moves(square)
    }

    /// Select the piece on square, if it belongs to the side to move and the game is in progress.
    /// Returns the selected piece's legal destinations. Selecting anything else clears
    /// the selection and returns an empty list.
    pub fn select(&mut self, square: Square) -> error::Result<&[Square]> {
        let square = square.checked()?;
        self.selection = None;

        let is_own_piece = self.mailbox()[square].is_color(self.side_to_move());
        if !self.state.is_over() && is_own_piece {
            let destinations = self.position.legal_moves(square)?;
            trace!("selected {square}, destinations {destinations:?}");
            self.selection = Some(Selection {
                square,
                destinations,
            });
        }
        Ok(self.highlighted())
    }

    /// Clear the current selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Single entry point for a board click.
    /// With nothing selected, this selects square. With a selection, this plays the selected
    /// piece to square if it is a highlighted destination, and always clears the selection.
    /// Returns the applied move, if one was played.
    pub fn click(&mut self, square: Square) -> error::Result<Option<MoveInfo>> {
        let square = square.checked()?;
        let Some(selection) = self.selection.take() else {
            self.select(square)?;
            return Ok(None);
        };

        if selection.destinations.contains(&square) {
            let move_info = self.play(Move::new(selection.square, square));
            Ok(Some(move_info))
        } else {
            trace!("{square} is not a destination of {}, deselected", selection.square);
            Ok(None)
        }
    }

    /// Apply a move after re-deriving its legality.
    /// An illegal move, or any move once the game is over, is rejected without changing the game.
    pub fn try_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        if self.state.is_over() {
            return Err((ErrorKind::GameOver, self.state).into());
        }
        if !self.position.is_legal_move(move_)? {
            return Err((ErrorKind::GameIllegalMove, move_).into());
        }
        self.selection = None;
        Ok(self.play(move_))
    }

    /// Apply a move already known to be legal, then update the game state.
    fn play(&mut self, move_: Move) -> MoveInfo {
        let move_info = self.position.do_move(move_);
        debug!("{} played {move_info}", !self.side_to_move());
        self.moves.push(move_info);
        self.update_state();
        move_info
    }

    /// Set the game state from checkmate detection, White first.
    /// Stalemate leaves the game in progress.
    pub fn update_state(&mut self) {
        let mailbox = self.position.mailbox();
        let state = if legality::is_checkmate(mailbox, Color::White) {
            GameState::BlackWins
        } else if legality::is_checkmate(mailbox, Color::Black) {
            GameState::WhiteWins
        } else {
            GameState::InProgress
        };
        if state != self.state {
            info!("game state changed: {state}");
        }
        self.state = state;
    }
}

/// Convert a position to a Game with no past moves.
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        let mut game = Self {
            base_position: position,
            moves: MoveHistory::new(),
            position,
            state: GameState::InProgress,
            selection: None,
        };
        game.update_state();
        game
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::start_position()
    }
}

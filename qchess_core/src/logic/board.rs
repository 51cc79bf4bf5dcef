use crate::logic::rules;
use crate::logic::{CenterSquare, Material, PieceKind, Position, Side};
use chess::{BoardStatus, ChessMove, Color, File, MoveGen, Piece, Rank, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Chess position backed by the `chess` crate.
///
/// `chess::Board` is an immutable `Copy` value, so make/unmake is a stack of
/// previous boards: `apply` pushes the current board, `revert` pops it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessBoard {
    board: chess::Board,
    undo_stack: Vec<chess::Board>,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessBoard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: chess::Board::default(),
            undo_stack: Vec::with_capacity(64),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let board = chess::Board::from_str(fen).map_err(|e| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self {
            board,
            undo_stack: Vec::with_capacity(64),
        })
    }

    /// Number of moves currently applied on top of the starting board.
    pub fn applied_moves(&self) -> usize {
        self.undo_stack.len()
    }

    /// Forget the undo history, making the current board the new base.
    /// Used by the game loop after a move is committed for good.
    pub fn commit(&mut self) {
        self.undo_stack.clear();
    }
}

pub const fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

pub const fn color_of(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

const fn piece_of(kind: PieceKind) -> Piece {
    match kind {
        PieceKind::Pawn => Piece::Pawn,
        PieceKind::Knight => Piece::Knight,
        PieceKind::Bishop => Piece::Bishop,
        PieceKind::Rook => Piece::Rook,
        PieceKind::Queen => Piece::Queen,
        PieceKind::King => Piece::King,
    }
}

const fn square_of(square: CenterSquare) -> Square {
    match square {
        CenterSquare::D4 => Square::D4,
        CenterSquare::D5 => Square::D5,
        CenterSquare::E4 => Square::E4,
        CenterSquare::E5 => Square::E5,
    }
}

impl Position for ChessBoard {
    type Move = ChessMove;

    fn side_to_move(&self) -> Side {
        side_of(self.board.side_to_move())
    }

    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn apply(&mut self, mv: ChessMove) {
        self.undo_stack.push(self.board);
        self.board = self.board.make_move_new(mv);
    }

    fn revert(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            self.board = previous;
        } else {
            debug_assert!(false, "revert called with no applied move");
        }
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    fn is_insufficient_material(&self) -> bool {
        rules::is_insufficient_material(&self.board)
    }

    fn identity(&self) -> String {
        self.board.to_string()
    }

    fn move_identity(&self, mv: &ChessMove) -> String {
        mv.to_string()
    }
}

impl Material for ChessBoard {
    fn piece_count(&self, kind: PieceKind, side: Side) -> u32 {
        (*self.board.pieces(piece_of(kind)) & *self.board.color_combined(color_of(side))).popcnt()
    }

    fn occupant(&self, square: CenterSquare) -> Option<Side> {
        self.board.color_on(square_of(square)).map(side_of)
    }
}

const fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

impl fmt::Display for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
                let c = match (self.board.piece_on(sq), self.board.color_on(sq)) {
                    (Some(piece), Some(Color::White)) => piece_char(piece).to_ascii_uppercase(),
                    (Some(piece), _) => piece_char(piece),
                    (None, _) => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_has_twenty_moves() {
        let board = ChessBoard::new();
        assert_eq!(board.side_to_move(), Side::White);
        assert_eq!(board.legal_moves().len(), 20);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_apply_revert_restores_board() {
        let mut board = ChessBoard::new();
        let before = board.clone();

        let moves = board.legal_moves();
        for mv in moves {
            board.apply(mv);
            assert_eq!(board.side_to_move(), Side::Black);
            for reply in board.legal_moves().into_iter().take(3) {
                board.apply(reply);
                board.revert();
            }
            board.revert();
        }

        assert_eq!(board, before);
        assert_eq!(board.applied_moves(), 0);
    }

    #[test]
    fn test_identity_is_fen() {
        let board = ChessBoard::new();
        assert!(board
            .identity()
            .starts_with("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"));
    }

    #[test]
    fn test_parse_move_round_trip() {
        let board = ChessBoard::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(board.move_identity(&mv), "e2e4");
        assert!(board.parse_move("e2e5").is_none());
        assert!(board.parse_move("garbage").is_none());
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        let result = ChessBoard::from_fen("not a fen");
        assert!(matches!(result, Err(BoardError::InvalidFen { .. })));
    }

    #[test]
    fn test_material_counts() {
        let board = ChessBoard::new();
        assert_eq!(board.piece_count(PieceKind::Pawn, Side::White), 8);
        assert_eq!(board.piece_count(PieceKind::Knight, Side::Black), 2);
        assert_eq!(board.piece_count(PieceKind::Queen, Side::White), 1);
        assert_eq!(board.occupant(CenterSquare::E4), None);

        let mut board = board;
        let mv = board.parse_move("e2e4").unwrap();
        board.apply(mv);
        assert_eq!(board.occupant(CenterSquare::E4), Some(Side::White));
    }

    #[test]
    fn test_checkmate_and_stalemate_detection() {
        let mated = ChessBoard::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(mated.is_checkmate());
        assert!(mated.is_game_over());
        assert!(mated.legal_moves().is_empty());

        let stalemate = ChessBoard::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
        assert!(stalemate.is_game_over());
    }
}

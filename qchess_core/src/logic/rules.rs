use chess::{BitBoard, Board, Piece, Square};

/// Neither side can ever deliver mate: bare kings, a single minor piece,
/// or any number of bishops that all stand on the same square colour.
pub fn is_insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }

    let knights = board.pieces(Piece::Knight).popcnt();
    let bishops = *board.pieces(Piece::Bishop);

    match (knights, bishops.popcnt()) {
        (0 | 1, 0) | (0, 1) => true,
        (0, _) => bishops_share_colour(bishops),
        _ => false,
    }
}

fn bishops_share_colour(bishops: BitBoard) -> bool {
    let mut colours = bishops.map(square_colour);
    match colours.next() {
        Some(first) => colours.all(|c| c == first),
        None => true,
    }
}

fn square_colour(sq: Square) -> usize {
    (sq.get_rank().to_index() + sq.get_file().to_index()) % 2
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{position::Cell, Board, Color, Move, MoveKind, MoveList, Piece, PieceKind, Square};

impl Board {
    /// Generates every move available to the side to move.
    ///
    /// Moves are legal by mobility: consistent with piece movement rules,
    /// occupancy, castling rights, and the en passant window. Whether a move
    /// exposes its own King is not this board's concern and is not checked.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for from in self.geometry.squares_top_down() {
            if self
                .piece_at(from)
                .is_some_and(|piece| piece.color() == self.side_to_move)
            {
                self.append_moves_from(from, &mut moves);
            }
        }
        moves
    }

    /// Generates every move available to the piece at `from`.
    ///
    /// A square holding no piece yields an empty list, not an error. The
    /// result is a pure function of board state: generating twice without a
    /// mutation in between yields identical lists.
    pub fn moves_from(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        self.append_moves_from(from, &mut moves);
        moves
    }

    /// The squares the piece at `from` can reach, in generation order.
    ///
    /// Each target appears once, even when several promotion choices share it.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let mut targets = self
            .moves_from(from)
            .iter()
            .map(Move::to)
            .collect::<Vec<_>>();
        // Promotion choices generate one move per kind onto the same square.
        targets.dedup();
        targets
    }

    fn append_moves_from(&self, from: Square, moves: &mut MoveList) {
        let Some(piece) = self.piece_at(from) else {
            return;
        };

        match piece.kind() {
            PieceKind::Pawn => self.pawn_moves(from, piece.color(), moves),
            PieceKind::King => {
                self.offset_moves(from, piece, moves);
                self.castling_moves(from, piece.color(), moves);
            }
            _ => self.offset_moves(from, piece, moves),
        }
    }

    /// Walks the hop and slide offset tables of `piece`'s kind.
    ///
    /// Hops land on exactly one cell: empty yields a quiet move, an enemy
    /// yields a capture, a sentinel or friendly piece yields nothing. Slides
    /// repeat their offset while cells stay empty and close with a capture
    /// on the first enemy cell; a sentinel or friendly piece ends the ray
    /// without a move.
    fn offset_moves(&self, from: Square, piece: Piece, moves: &mut MoveList) {
        let kind = piece.kind();

        for &offset in self.mobility.hops(kind) {
            let to = from.offset(offset);
            match self.cells[to.index()] {
                Cell::Empty => moves.push(Move::new(from, to, MoveKind::Quiet)),
                Cell::Occupied(other) if other.color() != piece.color() => {
                    moves.push(Move::new(from, to, MoveKind::Capture));
                }
                _ => {}
            }
        }

        for &offset in self.mobility.slides(kind) {
            let mut to = from.offset(offset);
            loop {
                match self.cells[to.index()] {
                    Cell::Empty => moves.push(Move::new(from, to, MoveKind::Quiet)),
                    Cell::Occupied(other) if other.color() != piece.color() => {
                        moves.push(Move::new(from, to, MoveKind::Capture));
                        break;
                    }
                    _ => break,
                }
                to = to.offset(offset);
            }
        }
    }

    /// Pawn movement is direction- and state-dependent, so it is layered
    /// here instead of the generic offset tables: a single forward push
    /// (never a capture), a double push from the pawn's starting rank, and
    /// diagonal-only captures, including onto the en passant square.
    /// Reaching the last rank turns a move into one promotion per choice.
    fn pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let forward = self.geometry.forward(color);
        let rank = self.geometry.rank_of(from);

        let push = from.offset(forward);
        if self.cells[push.index()] == Cell::Empty {
            self.push_pawn_move(from, push, MoveKind::Quiet, color, moves);

            if rank == self.geometry.pawn_rank(color) {
                let double = push.offset(forward);
                if self.cells[double.index()] == Cell::Empty {
                    moves.push(Move::new(from, double, MoveKind::PawnDoublePush));
                }
            }
        }

        for side in [-1, 1] {
            let to = from.offset(forward + side);
            match self.cells[to.index()] {
                Cell::Occupied(other) if other.color() != color => {
                    self.push_pawn_move(from, to, MoveKind::Capture, color, moves);
                }
                // The en passant victim sits behind the target square; it
                // must be an enemy pawn, not the mover's own double-stepper.
                Cell::Empty if Some(to) == self.ep_square => {
                    let victim = self.piece_at(to.offset(-forward));
                    if victim.is_some_and(|p| p.kind() == PieceKind::Pawn && p.color() != color) {
                        moves.push(Move::new(from, to, MoveKind::EnPassantCapture));
                    }
                }
                _ => {}
            }
        }
    }

    /// Pushes a pawn push or capture, fanning it out into one move per
    /// promotion choice when `to` lies on the last rank.
    fn push_pawn_move(
        &self,
        from: Square,
        to: Square,
        kind: MoveKind,
        color: Color,
        moves: &mut MoveList,
    ) {
        if self.geometry.rank_of(to) == self.geometry.promotion_rank(color) {
            for promotion in PieceKind::PROMOTIONS {
                moves.push(if kind == MoveKind::Capture {
                    Move::new_promotion_capture(from, to, promotion)
                } else {
                    Move::new_promotion(from, to, promotion)
                });
            }
        } else {
            moves.push(Move::new(from, to, kind));
        }
    }

    /// Generates castling candidates for the King at `from`.
    ///
    /// A candidate exists per wing whose rights survive (King and that Rook
    /// have never moved) when every square strictly between King and Rook is
    /// empty. The King moves two files toward the Rook; the Rook's
    /// relocation to the crossed square happens at application time.
    fn castling_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let rights = self.castling_rights[color.index()];

        for (rook_square, kind) in [
            (rights.short, MoveKind::ShortCastle),
            (rights.long, MoveKind::LongCastle),
        ] {
            let Some(rook_square) = rook_square else {
                continue;
            };

            let king_file = self.geometry.file_of(from) as i32;
            let rook_file = self.geometry.file_of(rook_square) as i32;

            // The King needs room to move two files toward the Rook.
            if (rook_file - king_file).abs() < 2 {
                continue;
            }

            let toward = if rook_file > king_file { 1 } else { -1 };
            let gap_clear = (1..(rook_file - king_file).abs())
                .all(|step| self.cells[from.offset(toward * step).index()] == Cell::Empty);

            if gap_clear {
                moves.push(Move::new(from, from.offset(toward * 2), kind));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Geometry;

    /// Helper: an empty 8x8 board holding only the provided pieces.
    fn board_with(pieces: &[(&str, char)]) -> Board {
        let mut board = Board::new(Geometry::new(8, 8).unwrap());
        for (square, piece) in pieces {
            let square = board.geometry().square_from_str(square).unwrap();
            board.place(Piece::from_uci(*piece).unwrap(), square);
        }
        board
    }

    fn targets(board: &Board, square: &str) -> Vec<String> {
        let from = board.geometry().square_from_str(square).unwrap();
        let mut names = board
            .legal_targets(from)
            .into_iter()
            .map(|sq| board.geometry().square_to_string(sq))
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn test_empty_square_yields_no_moves() {
        let board = Board::default();
        let e4 = board.geometry().square_from_str("e4").unwrap();
        assert!(board.moves_from(e4).is_empty());
        assert!(board.legal_targets(e4).is_empty());
    }

    #[test]
    fn test_knight_in_the_corner() {
        let board = board_with(&[("a1", 'N')]);
        assert_eq!(targets(&board, "a1"), ["b3", "c2"]);
    }

    #[test]
    fn test_slide_stops_at_blockers() {
        // Friendly blocker: the ray ends before it.
        let board = board_with(&[("a1", 'R'), ("a4", 'P'), ("d1", 'p')]);
        assert_eq!(targets(&board, "a1"), ["a2", "a3", "b1", "c1", "d1"]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let board = Board::default();
        let g1 = board.geometry().square_from_str("g1").unwrap();
        assert_eq!(board.moves_from(g1), board.moves_from(g1));
        assert_eq!(board.legal_targets(g1), board.legal_targets(g1));
    }

    #[test]
    fn test_pawn_double_push_requires_clear_path() {
        // Blocked on the square directly ahead: no push at all.
        let board = board_with(&[("e2", 'P'), ("e3", 'n')]);
        let e2 = board.geometry().square_from_str("e2").unwrap();
        assert!(board.moves_from(e2).is_empty());

        // Clear first step, blocked second: single push only.
        let board = board_with(&[("e2", 'P'), ("e4", 'n')]);
        assert_eq!(targets(&board, "e2"), ["e3"]);
    }

    #[test]
    fn test_pawn_captures_diagonally_only() {
        let board = board_with(&[("e4", 'P'), ("d5", 'p'), ("e5", 'p'), ("f5", 'P')]);
        // d5 is an enemy, e5 blocks the push, f5 is friendly.
        assert_eq!(targets(&board, "e4"), ["d5"]);
    }

    #[test]
    fn test_king_steps_and_castles() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            targets(&board, "e1"),
            ["c1", "d1", "d2", "e2", "f1", "f2", "g1"]
        );
    }

    #[test]
    fn test_castling_blocked_by_piece_in_gap() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        // The Knight on b1 blocks the long wing only.
        assert_eq!(targets(&board, "e1"), ["d1", "d2", "e2", "f1", "f2", "g1"]);
    }

    #[test]
    fn test_promotion_fans_out_per_choice() {
        let board = board_with(&[("b7", 'P')]);
        let b7 = board.geometry().square_from_str("b7").unwrap();
        let moves = board.moves_from(b7);
        assert_eq!(moves.len(), PieceKind::PROMOTIONS.len());
        assert!(moves.iter().all(|mv| mv.is_promotion()));
        // One target square, many choices.
        assert_eq!(board.legal_targets(b7).len(), 1);
    }
}

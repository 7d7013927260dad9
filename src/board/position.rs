/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{Color, Geometry, Mobility, Move, Piece, PieceKind, Square};
use crate::{FEN_CAPABLANCA_STARTPOS, FEN_STARTPOS};

/// One cell of the padded board array.
///
/// Sentinel cells form the border; offset walks terminate on them without
/// any explicit bounds check.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Cell {
    Sentinel,
    Empty,
    Occupied(Piece),
}

/// Represents the castling rights of a single player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct CastlingRights {
    /// If a right is `Some(square)`, then `square` is the *Rook*'s starting
    /// location; `Some` doubles as "neither King nor that Rook has moved".
    pub(crate) short: Option<Square>,
    pub(crate) long: Option<Square>,
}

impl CastlingRights {
    /// Creates a new [`CastlingRights`] that permits castling with a Rook on
    /// the provided squares.
    #[inline(always)]
    pub const fn new(short: Option<Square>, long: Option<Square>) -> Self {
        Self { short, long }
    }

    /// Returns `true` if castling is permitted on the short (kingside) wing.
    #[inline(always)]
    pub const fn can_castle_short(&self) -> bool {
        self.short.is_some()
    }

    /// Returns `true` if castling is permitted on the long (queenside) wing.
    #[inline(always)]
    pub const fn can_castle_long(&self) -> bool {
        self.long.is_some()
    }
}

/// A named family of starting positions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Variant {
    /// Ordinary 8x8 chess.
    Standard,
    /// Capablanca chess: 10x8, with an Archbishop and a Chancellor per side.
    Capablanca,
}

impl Variant {
    /// The FEN string of this variant's starting position.
    #[inline(always)]
    pub const fn startpos_fen(&self) -> &'static str {
        match self {
            Self::Standard => FEN_STARTPOS,
            Self::Capablanca => FEN_CAPABLANCA_STARTPOS,
        }
    }

    /// Creates a [`Board`] set up with this variant's starting position.
    #[inline(always)]
    pub fn board(&self) -> Board {
        // The startpos FEN constants are known-good.
        Board::from_fen(self.startpos_fen()).unwrap()
    }
}

/// The state of a game: occupancy of the padded grid plus the metadata that
/// static occupancy cannot provide (whose turn it is, whether en passant is
/// available, which castling rights survive).
///
/// Move *generation* ([`Board::moves_from`], [`Board::legal_targets`],
/// [`Board::legal_moves`]) is read-only; move *application*
/// ([`Board::make_move`]) is the only mutation path during play. Boards are
/// cheap to clone for lookahead, and hold no shared state.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Shape of the playable grid and its sentinel border.
    pub(crate) geometry: Geometry,

    /// Offset tables for this geometry's row stride, built once.
    pub(crate) mobility: Mobility,

    /// Flat row-major cell array, border included.
    pub(crate) cells: Vec<Cell>,

    /// The [`Color`] of the current player.
    pub(crate) side_to_move: Color,

    /// Castling rights for each player.
    pub(crate) castling_rights: [CastlingRights; Color::COUNT],

    /// Attack square for en passant, if the previous ply was a double push.
    pub(crate) ep_square: Option<Square>,

    /// Plies since the last capture or pawn move.
    halfmove: usize,

    /// Number of completed turns. Incremented after Black moves.
    fullmove: usize,
}

impl Board {
    /// Creates an empty [`Board`] with the provided [`Geometry`]:
    /// * No pieces on the board
    /// * White moves first
    /// * No castling rights
    /// * No en passant square available
    pub fn new(geometry: Geometry) -> Self {
        let mut cells = vec![Cell::Sentinel; geometry.array_len()];
        for square in geometry.squares_top_down() {
            cells[square.index()] = Cell::Empty;
        }

        Self {
            geometry,
            mobility: Mobility::new(geometry.array_width() as i32),
            cells,
            side_to_move: Color::White,
            castling_rights: [CastlingRights::default(); Color::COUNT],
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Creates a new [`Board`] from the provided FEN string.
    ///
    /// The board's dimensions are inferred from the placement field, so FEN
    /// for variant boards round-trips: `10/10/...` describes a ten-file
    /// board. The castling field refers to the corner Rooks.
    ///
    /// # Example
    /// ```
    /// # use varboard::{Board, FEN_CAPABLANCA_STARTPOS};
    /// let board = Board::from_fen(FEN_CAPABLANCA_STARTPOS).unwrap();
    /// assert_eq!(board.geometry().width(), 10);
    /// assert_eq!(board.to_fen(), FEN_CAPABLANCA_STARTPOS);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.trim().split(' ');
        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;

        let ranks = placements.split('/').collect::<Vec<_>>();
        let height = u8::try_from(ranks.len())
            .map_err(|_| anyhow!("FEN string has too many ranks"))?;
        let width = fen_rank_width(ranks[0])?;
        let geometry = Geometry::new(width, height)?;
        let mut board = Self::new(geometry);

        for (i, rank_str) in ranks.iter().enumerate() {
            if fen_rank_width(rank_str)? != width {
                bail!("FEN ranks must all have the same width. Got {placements:?}");
            }

            let rank = height - 1 - i as u8;
            let mut file = 0u8;
            let mut empties = 0u8;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    empties = empties * 10 + digit as u8;
                } else {
                    file += std::mem::take(&mut empties);
                    let piece = Piece::from_uci(c)?;
                    board.place(piece, geometry.square(file, rank));
                    file += 1;
                }
            }
        }

        let active_color = split.next().unwrap_or("w");
        board.side_to_move = Color::from_str(active_color)?;

        let castling = split.next().unwrap_or("-");
        if castling != "-" {
            for c in castling.chars() {
                let color = Color::from_bits_unchecked(c.is_ascii_lowercase() as u8);
                let first_rank = geometry.first_rank(color);
                let rights = &mut board.castling_rights[color.index()];
                match c.to_ascii_lowercase() {
                    'k' => rights.short = Some(geometry.square(width - 1, first_rank)),
                    'q' => rights.long = Some(geometry.square(0, first_rank)),
                    _ => bail!("Invalid char in FEN castling field: {c:?}"),
                }
            }
        }

        let en_passant_target = split.next().unwrap_or("-");
        board.ep_square = match en_passant_target {
            "-" => None,
            square => Some(geometry.square_from_str(square)?),
        };

        let halfmove = split.next().unwrap_or("0");
        board.halfmove = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        board.fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Ok(board)
    }

    /// Generates a FEN string from this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = String::new();
        for rank in (0..self.geometry.height()).rev() {
            let mut empties = 0;
            for file in 0..self.geometry.width() {
                match self.piece_at(self.geometry.square(file, rank)) {
                    Some(piece) => {
                        if empties > 0 {
                            placements += &empties.to_string();
                            empties = 0;
                        }
                        placements.push(piece.to_uci());
                    }
                    None => empties += 1,
                }
            }
            if empties > 0 {
                placements += &empties.to_string();
            }
            if rank > 0 {
                placements.push('/');
            }
        }

        let mut castling = String::new();
        if self.castling_rights[Color::White.index()].can_castle_short() {
            castling.push('K');
        }
        if self.castling_rights[Color::White.index()].can_castle_long() {
            castling.push('Q');
        }
        if self.castling_rights[Color::Black.index()].can_castle_short() {
            castling.push('k');
        }
        if self.castling_rights[Color::Black.index()].can_castle_long() {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .ep_square
            .map(|sq| self.geometry.square_to_string(sq))
            .unwrap_or(String::from("-"));

        format!(
            "{placements} {} {castling} {ep} {} {}",
            self.side_to_move.to_uci(),
            self.halfmove,
            self.fullmove
        )
    }

    /// Fetch this board's [`Geometry`].
    #[inline(always)]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The row stride of the backing array. See [`Geometry::array_width`].
    #[inline(always)]
    pub const fn array_width(&self) -> usize {
        self.geometry.array_width()
    }

    /// Returns `true` if `square` is a playable cell. See
    /// [`Geometry::is_on_board`].
    #[inline(always)]
    pub fn is_on_board(&self, square: Square) -> bool {
        self.geometry.is_on_board(square)
    }

    /// Fetches the [`Piece`] at `square`, if one is there.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        match self.cells.get(square.index()) {
            Some(Cell::Occupied(piece)) => Some(*piece),
            _ => None,
        }
    }

    /// Returns `true` if there is a piece at `square`.
    #[inline(always)]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// The [`Color`] of the current player.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The square a pawn could capture onto en passant, if the previous ply
    /// was a double push.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// The castling rights of `color`.
    #[inline(always)]
    pub const fn castling_rights(&self, color: Color) -> &CastlingRights {
        &self.castling_rights[color.index()]
    }

    /// Plies since the last capture or pawn move.
    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    /// Number of completed turns.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Places `piece` at `square`, replacing whatever was there.
    ///
    /// `square` must be a playable cell.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        debug_assert!(
            self.geometry.is_on_board(square),
            "Cannot place a piece on a border cell"
        );
        self.cells[square.index()] = Cell::Occupied(piece);
    }

    /// Removes and returns the piece at `square`, if one is there.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        match self.cells.get(square.index()) {
            Some(Cell::Occupied(piece)) => {
                let piece = *piece;
                self.cells[square.index()] = Cell::Empty;
                Some(piece)
            }
            _ => None,
        }
    }

    /// Flips the side-to-move. Equivalent to playing a nullmove.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Applies the move, if it is reachable by the generator from its source
    /// square. If it is not, returns an `Err` explaining why and leaves the
    /// board untouched.
    ///
    /// Downstream state (check detection, adjudication) depends on the board
    /// only ever reflecting legal moves, so an unreachable move is rejected
    /// loudly rather than silently applied.
    pub fn make_move(&mut self, mv: Move) -> Result<()> {
        let from = mv.from();
        let Some(piece) = self.piece_at(from) else {
            bail!(
                "Cannot apply move: no piece at {}",
                self.geometry.square_to_string(from)
            );
        };
        if piece.color() != self.side_to_move {
            bail!("Cannot apply move: it is not {}'s turn", piece.color().name());
        }
        if !self.moves_from(from).contains(&mv) {
            bail!(
                "Move {} is not reachable in this position",
                self.move_to_string(mv)
            );
        }

        self.apply_unchecked(mv);
        Ok(())
    }

    /// Converts the provided string to a [`Move`], if possible, and applies
    /// it to the board.
    ///
    /// Equivalent to calling [`Board::move_from_str`] and [`Board::make_move`].
    #[inline(always)]
    pub fn make_move_str(&mut self, mv_str: &str) -> Result<()> {
        let mv = self.move_from_str(mv_str)?;
        self.make_move(mv)
    }

    /// Applies the move without checking that it is reachable.
    ///
    /// The caller must have established reachability already; this is the
    /// shared tail of [`Board::make_move`].
    pub(crate) fn apply_unchecked(&mut self, mv: Move) {
        // Remove the piece from its previous location, exiting early if there is no piece there
        let Some(mut piece) = self.take(mv.from()) else {
            return;
        };

        let color = piece.color();
        let from = mv.from();
        let to = mv.to();

        // The en passant window closes after every ply; a double push below re-opens it.
        self.ep_square = None;

        // Increment move counters
        self.halfmove += 1; // This is reset if a capture occurs or a pawn moves
        self.fullmove += self.side_to_move.index();

        // First, deal with special cases like captures and castling
        if mv.is_capture() {
            // If this move was en passant, the piece we captured isn't at `to`,
            // it's one rank behind it, on the rank the mover departed from.
            let victim_square = if mv.is_en_passant() {
                to.offset(-self.geometry.forward(color))
            } else {
                to
            };

            if let Some(victim) = self.take(victim_square) {
                // If the capture was on a rook's starting square, disable that side's castling.
                let rights = &mut self.castling_rights[victim.color().index()];
                if rights.short == Some(victim_square) {
                    rights.short = None;
                } else if rights.long == Some(victim_square) {
                    rights.long = None;
                }
            }

            self.halfmove = 0;
        } else if mv.is_pawn_double_push() {
            // Double pawn push, so set the EP square to the crossed cell
            self.ep_square = Some(from.offset(self.geometry.forward(color)));
        } else if mv.is_castle() {
            let rights = self.castling_rights[color.index()];
            let rook_square = if mv.is_short_castle() {
                rights.short
            } else {
                rights.long
            };

            // The rook lands on the square the king crosses.
            if let Some(rook_square) = rook_square {
                if let Some(rook) = self.take(rook_square) {
                    let toward = if self.geometry.file_of(to) > self.geometry.file_of(from) {
                        1
                    } else {
                        -1
                    };
                    self.place(rook, from.offset(toward));
                }
            }

            // Disable castling
            self.castling_rights[color.index()] = CastlingRights::default();
        }

        // Next, handle special cases for Pawn (halfmove), Rook, and King (castling)
        match piece.kind() {
            PieceKind::Pawn => self.halfmove = 0,

            // Disable castling on a wing if its rook leaves its starting square
            PieceKind::Rook => {
                let rights = &mut self.castling_rights[color.index()];
                if rights.short == Some(from) {
                    rights.short = None;
                } else if rights.long == Some(from) {
                    rights.long = None;
                }
            }

            PieceKind::King => self.castling_rights[color.index()] = CastlingRights::default(),

            _ => {}
        }

        // Now we check for promotions, since all special cases for Pawns have been dealt with
        if let Some(promotion) = mv.promotion() {
            piece = piece.promoted(promotion);
        }

        // Place the piece in its new position
        self.place(piece, to);

        // Next player's turn
        self.toggle_side_to_move();
    }

    /// Builds the [`Move`] from `from` to `to` (promoting to `promotion`,
    /// if provided), resolved against the current position.
    ///
    /// The returned move is one the generator produces, with its kind
    /// (capture, castle, en passant, ...) already assigned, so the caller
    /// never needs to know kinds to construct a move. Naming an unreachable
    /// move is an error.
    pub fn resolve_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move> {
        self.moves_from(from)
            .iter()
            .copied()
            .find(|mv| mv.to() == to && mv.promotion() == promotion)
            .ok_or(anyhow!(
                "Move {}{} is not reachable in this position",
                self.geometry.square_to_string(from),
                self.geometry.square_to_string(to)
            ))
    }

    /// Parses a move from long algebraic notation like `e2e4` or `b7c8q`,
    /// resolved against the current position via [`Board::resolve_move`].
    ///
    /// Castling is written as the King's own two-file move, e.g. `e1g1`.
    pub fn move_from_str(&self, s: &str) -> Result<Move> {
        let s = s.trim();
        let (from, rest) = self.split_square(s)?;
        let (to, rest) = self.split_square(rest)?;

        let promotion = match rest {
            "" => None,
            _ => Some(PieceKind::from_str(rest)?),
        };

        self.resolve_move(from, to, promotion)
    }

    /// Formats a move in long algebraic notation, e.g. `e2e4`, `b7c8q`.
    pub fn move_to_string(&self, mv: Move) -> String {
        let mut s = format!(
            "{}{}",
            self.geometry.square_to_string(mv.from()),
            self.geometry.square_to_string(mv.to())
        );
        if let Some(promotion) = mv.promotion() {
            s.push(promotion.to_uci());
        }
        s
    }

    /// Splits one leading square token (a file letter plus rank digits) off
    /// `s`, returning the parsed square and the remainder.
    fn split_square<'a>(&self, s: &'a str) -> Result<(Square, &'a str)> {
        let bytes = s.as_bytes();
        if !bytes.first().is_some_and(|b| b.is_ascii_lowercase()) {
            bail!("Expected a square at the start of {s:?}");
        }

        let mut end = 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }

        let square = self.geometry.square_from_str(&s[..end])?;
        Ok((square, &s[end..]))
    }
}

impl Default for Board {
    /// A "default" board is the starting position of standard chess.
    fn default() -> Self {
        Variant::Standard.board()
    }
}

impl fmt::Display for Board {
    /// Draws the playable area as an ASCII diagram, from Black's home rank
    /// down to White's, followed by the side to move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..self.geometry.height()).rev() {
            write!(f, "{:>2} |", rank + 1)?;
            for file in 0..self.geometry.width() {
                match self.piece_at(self.geometry.square(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "   +")?;
        for _ in 0..self.geometry.width() {
            write!(f, "--")?;
        }
        writeln!(f)?;

        write!(f, "    ")?;
        for file in 0..self.geometry.width() {
            write!(f, "{} ", (b'a' + file) as char)?;
        }
        writeln!(f)?;

        write!(f, "{} to move", self.side_to_move.name())
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::from_fen(s)
    }
}

/// Number of files described by one rank of a FEN placement field, with
/// digit runs (`10`) expanded.
fn fen_rank_width(rank: &str) -> Result<u8> {
    let mut width = 0u32;
    let mut empties = 0u32;
    for c in rank.chars() {
        if let Some(digit) = c.to_digit(10) {
            empties = empties * 10 + digit;
            if empties > u8::MAX as u32 {
                bail!("FEN rank {rank:?} is too wide");
            }
        } else if c.is_ascii_alphabetic() {
            width += std::mem::take(&mut empties) + 1;
        } else {
            bail!("Invalid char in FEN rank {rank:?}: {c:?}");
        }
    }
    u8::try_from(width + empties).map_err(|_| anyhow!("FEN rank {rank:?} is too wide"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FEN_KIWIPETE;

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            FEN_STARTPOS,
            FEN_CAPABLANCA_STARTPOS,
            FEN_KIWIPETE,
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen, "FEN did not round-trip");
        }
    }

    #[test]
    fn test_fen_geometry_inference() {
        let board = Board::from_fen(FEN_CAPABLANCA_STARTPOS).unwrap();
        assert_eq!(board.geometry().width(), 10);
        assert_eq!(board.geometry().height(), 8);
        assert_eq!(board.array_width(), 14);

        let tiny = Board::from_fen("3k/4/4/K3 w - - 0 1").unwrap();
        assert_eq!(tiny.geometry().width(), 4);
        assert_eq!(tiny.geometry().height(), 4);
    }

    #[test]
    fn test_invalid_fens_rejected() {
        // Ragged ranks
        assert!(Board::from_fen("8/8/7/8/8/8/8/8 w - - 0 1").is_err());
        // Unknown piece letter
        assert!(Board::from_fen("8/8/8/8/8/8/8/7z w - - 0 1").is_err());
        // Bad counters
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w - - x 1").is_err());
    }

    #[test]
    fn test_startpos_metadata() {
        let board = Board::default();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.ep_square(), None);
        assert!(board.castling_rights(Color::White).can_castle_short());
        assert!(board.castling_rights(Color::Black).can_castle_long());
        assert_eq!(board.halfmove(), 0);
        assert_eq!(board.fullmove(), 1);
    }

    #[test]
    fn test_place_and_take() {
        let mut board = Board::new(Geometry::new(8, 8).unwrap());
        let e4 = board.geometry().square_from_str("e4").unwrap();
        let knight = Piece::new(Color::White, PieceKind::Knight);

        assert_eq!(board.piece_at(e4), None);
        board.place(knight, e4);
        assert_eq!(board.piece_at(e4), Some(knight));
        assert_eq!(board.take(e4), Some(knight));
        assert_eq!(board.piece_at(e4), None);
        assert_eq!(board.take(e4), None);
    }

    #[test]
    fn test_make_move_rejects_contract_violations() {
        let mut board = Board::default();

        // No piece on the source square
        assert!(board.make_move_str("e4e5").is_err());
        // Not the mover's turn
        assert!(board.make_move_str("e7e5").is_err());
        // Not reachable for the piece
        assert!(board.make_move_str("a1a5").is_err());

        // The board is untouched afterwards
        assert_eq!(board.to_fen(), FEN_STARTPOS);
    }

    #[test]
    fn test_make_move_updates_counters() {
        let mut board = Board::default();
        board.make_move_str("g1f3").unwrap();
        assert_eq!(board.halfmove(), 1);
        assert_eq!(board.fullmove(), 1);
        board.make_move_str("d7d5").unwrap();
        assert_eq!(board.halfmove(), 0); // pawn move resets
        assert_eq!(board.fullmove(), 2); // Black completed a turn
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn test_move_string_round_trip() {
        let board = Board::default();
        let mv = board.move_from_str("e2e4").unwrap();
        assert!(mv.is_pawn_double_push());
        assert_eq!(board.move_to_string(mv), "e2e4");
    }
}

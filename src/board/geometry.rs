/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{anyhow, bail, Result};

use super::{Color, Square};

/// Width of the sentinel border on each edge of the padded array.
///
/// Two cells per edge is enough for every offset in use: the longest single
/// step any piece takes is a knight leap of two files or two ranks.
pub(crate) const BORDER: usize = 2;

/// Largest supported value for either board dimension.
const MAX_DIM: u8 = 16;

/// The shape of a board: a logical `width x height` grid embedded in a flat
/// row-major array with a sentinel border on all four edges.
///
/// Keeping the border inside the same array means a move generator never
/// needs separate file/rank bounds checks: stepping off the playable area
/// always lands on a cell that exists and is marked as a sentinel.
///
/// All offset arithmetic is scaled by [`Geometry::array_width`] (the row
/// stride), which is what lets one set of piece definitions serve boards of
/// different sizes.
///
/// [`Geometry`] is a read-only description of shape; occupancy lives on
/// [`Board`](crate::Board).
///
/// Files are numbered from 0 starting at White's left (`a`-file); ranks are
/// numbered from 0 starting at White's home rank. Internally, cells are
/// stored top-down, so lower indices are nearer Black's home rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Geometry {
    width: u8,
    height: u8,
}

impl Geometry {
    /// Creates a [`Geometry`] for a `width x height` board.
    ///
    /// Fails if either dimension is zero or exceeds the supported maximum of
    /// 16; no partial geometry is produced.
    ///
    /// # Example
    /// ```
    /// # use varboard::Geometry;
    /// let standard = Geometry::new(8, 8).unwrap();
    /// assert_eq!(standard.array_width(), 12);
    ///
    /// assert!(Geometry::new(0, 8).is_err());
    /// ```
    pub fn new(width: u8, height: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Board dimensions must be positive. Got {width}x{height}");
        }
        if width > MAX_DIM || height > MAX_DIM {
            bail!("Board dimensions must be at most {MAX_DIM}x{MAX_DIM}. Got {width}x{height}");
        }

        Ok(Self { width, height })
    }

    /// Number of files on the playable board.
    #[inline(always)]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Number of ranks on the playable board.
    #[inline(always)]
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// The row stride of the backing array: playable width plus the border
    /// on both sides.
    ///
    /// Every rank-wise offset is a multiple of this value.
    #[inline(always)]
    pub const fn array_width(&self) -> usize {
        self.width as usize + 2 * BORDER
    }

    /// Number of rows in the backing array, border included.
    #[inline(always)]
    pub const fn array_height(&self) -> usize {
        self.height as usize + 2 * BORDER
    }

    /// Total number of cells in the backing array.
    #[inline(always)]
    pub const fn array_len(&self) -> usize {
        self.array_width() * self.array_height()
    }

    /// Fetches the [`Square`] at the provided file and rank.
    ///
    /// # Example
    /// ```
    /// # use varboard::Geometry;
    /// let geometry = Geometry::new(8, 8).unwrap();
    /// let e4 = geometry.square(4, 3);
    /// assert_eq!(geometry.file_of(e4), 4);
    /// assert_eq!(geometry.rank_of(e4), 3);
    /// ```
    #[inline(always)]
    pub fn square(&self, file: u8, rank: u8) -> Square {
        debug_assert!(file < self.width && rank < self.height);
        let row = BORDER + (self.height - 1 - rank) as usize;
        let col = BORDER + file as usize;
        Square::new((row * self.array_width() + col) as u16)
    }

    /// The file of `square`, numbered from 0 at White's left.
    #[inline(always)]
    pub fn file_of(&self, square: Square) -> u8 {
        (square.index() % self.array_width() - BORDER) as u8
    }

    /// The rank of `square`, numbered from 0 at White's home rank.
    #[inline(always)]
    pub fn rank_of(&self, square: Square) -> u8 {
        self.height - 1 - (square.index() / self.array_width() - BORDER) as u8
    }

    /// Returns `true` if `square` is a real, playable cell rather than part
    /// of the sentinel border.
    #[inline(always)]
    pub fn is_on_board(&self, square: Square) -> bool {
        if square.index() >= self.array_len() {
            return false;
        }
        let row = square.index() / self.array_width();
        let col = square.index() % self.array_width();
        (BORDER..BORDER + self.width as usize).contains(&col)
            && (BORDER..BORDER + self.height as usize).contains(&row)
    }

    /// The offset that advances one rank in `color`'s forward direction.
    ///
    /// White moves toward Black's home rank, which is stored at lower
    /// indices, so White's forward offset is negative.
    #[inline(always)]
    pub const fn forward(&self, color: Color) -> i32 {
        match color {
            Color::White => -(self.array_width() as i32),
            Color::Black => self.array_width() as i32,
        }
    }

    /// The rank `color`'s pieces start on, where its King sits before castling.
    #[inline(always)]
    pub const fn first_rank(&self, color: Color) -> u8 {
        match color {
            Color::White => 0,
            Color::Black => self.height - 1,
        }
    }

    /// The rank `color`'s pawns start on, from which a double-step is allowed.
    #[inline(always)]
    pub const fn pawn_rank(&self, color: Color) -> u8 {
        match color {
            Color::White => 1,
            Color::Black => self.height - 2,
        }
    }

    /// The last rank from `color`'s point of view, where its pawns promote.
    #[inline(always)]
    pub const fn promotion_rank(&self, color: Color) -> u8 {
        match color {
            Color::White => self.height - 1,
            Color::Black => 0,
        }
    }

    /// Iterates over all playable squares, from Black's home rank down to
    /// White's, each rank left to right.
    ///
    /// This is the order FEN placements are written in.
    pub fn squares_top_down(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.height)
            .rev()
            .flat_map(move |rank| (0..self.width).map(move |file| self.square(file, rank)))
    }

    /// Parses a square from coordinate notation like `e4` or `j10`.
    ///
    /// # Example
    /// ```
    /// # use varboard::Geometry;
    /// let geometry = Geometry::new(10, 8).unwrap();
    /// let j8 = geometry.square_from_str("j8").unwrap();
    /// assert_eq!(geometry.square_to_string(j8), "j8");
    ///
    /// assert!(geometry.square_from_str("z1").is_err());
    /// ```
    pub fn square_from_str(&self, s: &str) -> Result<Square> {
        let mut chars = s.chars();
        let file_char = chars
            .next()
            .ok_or(anyhow!("Cannot parse a square from an empty string"))?;

        if !file_char.is_ascii_lowercase() {
            bail!("Square must start with a file letter. Got {s:?}");
        }
        let file = file_char as u8 - b'a';
        if file >= self.width {
            bail!("File {file_char:?} is off the board; this board has {} files", self.width);
        }

        let rank: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| anyhow!("Square must end with a rank number. Got {s:?}"))?;
        if rank == 0 || rank > self.height {
            bail!("Rank {rank} is off the board; this board has {} ranks", self.height);
        }

        Ok(self.square(file, rank - 1))
    }

    /// Formats a square in coordinate notation like `e4`.
    pub fn square_to_string(&self, square: Square) -> String {
        format!(
            "{}{}",
            (b'a' + self.file_of(square)) as char,
            self.rank_of(square) + 1
        )
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(Geometry::new(0, 8).is_err());
        assert!(Geometry::new(8, 0).is_err());
        assert!(Geometry::new(17, 8).is_err());
    }

    #[test]
    fn test_stride_includes_border() {
        let geometry = Geometry::new(8, 8).unwrap();
        assert_eq!(geometry.array_width(), 12);
        assert_eq!(geometry.array_len(), 144);

        let capablanca = Geometry::new(10, 8).unwrap();
        assert_eq!(capablanca.array_width(), 14);
    }

    #[test]
    fn test_square_round_trip() {
        let geometry = Geometry::new(10, 8).unwrap();
        for rank in 0..8 {
            for file in 0..10 {
                let square = geometry.square(file, rank);
                assert!(geometry.is_on_board(square));
                assert_eq!(geometry.file_of(square), file);
                assert_eq!(geometry.rank_of(square), rank);
            }
        }
    }

    #[test]
    fn test_border_is_off_board() {
        let geometry = Geometry::new(8, 8).unwrap();
        // Index 0 is the top-left corner of the border.
        assert!(!geometry.is_on_board(Square::new(0)));
        // One step left of a1 is a border cell.
        let a1 = geometry.square(0, 0);
        assert!(!geometry.is_on_board(a1.offset(-1)));
        // A knight leap from a playable square never leaves the array.
        let h8 = geometry.square(7, 7);
        let leap = h8.offset(-2 * geometry.array_width() as i32 + 1);
        assert!(leap.index() < geometry.array_len());
        assert!(!geometry.is_on_board(leap));
    }

    #[test]
    fn test_square_parsing() {
        let geometry = Geometry::new(8, 8).unwrap();
        let e4 = geometry.square_from_str("e4").unwrap();
        assert_eq!(geometry.file_of(e4), 4);
        assert_eq!(geometry.rank_of(e4), 3);

        assert!(geometry.square_from_str("").is_err());
        assert!(geometry.square_from_str("e9").is_err());
        assert!(geometry.square_from_str("e0").is_err());
        assert!(geometry.square_from_str("i1").is_err());

        let wide = Geometry::new(10, 8).unwrap();
        assert!(wide.square_from_str("i1").is_ok());
    }

    #[test]
    fn test_forward_direction() {
        let geometry = Geometry::new(8, 8).unwrap();
        let e2 = geometry.square_from_str("e2").unwrap();
        let e3 = e2.offset(geometry.forward(Color::White));
        assert_eq!(geometry.square_to_string(e3), "e3");

        let e7 = geometry.square_from_str("e7").unwrap();
        let e6 = e7.offset(geometry.forward(Color::Black));
        assert_eq!(geometry.square_to_string(e6), "e6");
    }
}

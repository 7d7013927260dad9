/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Neg, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a player, piece, square, etc. within a chess board.
///
/// White traditionally moves first, and therefore [`Color`] defaults to
/// [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Creates a new [`Color`] from a set of bits, ignoring safety checks.
    ///
    /// `bits` must be `[0,1]`.
    #[inline(always)]
    pub const fn from_bits_unchecked(bits: u8) -> Self {
        debug_assert!(
            bits <= 1,
            "Invalid bits for Color: Bits must be between [0,1]"
        );

        // Safety: Since `Color` is a `repr(u8)` enum, we can cast safely here.
        unsafe { std::mem::transmute(bits) }
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use varboard::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        Self::from_bits_unchecked(*self as u8 ^ 1)
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    ///
    /// Will be `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a [`Color`] from a `char`, according to the
    /// [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color}"),
        }
    }

    /// Converts this [`Color`] to a char, according to the
    /// [Universal Chess Interface](https://en.wikipedia.org//wiki/Universal_Chess_Interface) notation.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    /// Negating [`Color::White`] yields [`Color::Black`] and vice versa.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.chars().next() {
            Some(c) => Self::from_uci(c),
            None => bail!("Cannot parse Color from empty string"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Represents the movement rule of a chess piece, not an instance of one.
///
/// The two compound kinds are fairy pieces: a [`PieceKind::Chancellor`] moves
/// as a Rook or a Knight, and a [`PieceKind::Archbishop`] moves as a Bishop
/// or a Knight. They have no [`Color`] associated with them; see [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Chancellor,
    Archbishop,
}

impl PieceKind {
    /// Number of piece kind variants.
    pub const COUNT: usize = 8;

    /// Every kind a Pawn may promote to: anything that is neither royal nor
    /// a Pawn itself.
    pub const PROMOTIONS: [Self; 6] = [
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::Chancellor,
        Self::Archbishop,
    ];

    /// An array of all 8 [`PieceKind`]s.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
            Self::Chancellor,
            Self::Archbishop,
        ]
    }

    /// Creates a new [`PieceKind`] from a set of bits, ignoring safety checks.
    ///
    /// `bits` must be `[0,7]`.
    #[inline(always)]
    pub const fn from_bits_unchecked(bits: u8) -> Self {
        debug_assert!(
            bits <= 7,
            "Invalid bits for PieceKind: Bits must be between [0,7]"
        );

        // Safety: Since `PieceKind` is a `repr(u8)` enum with 8 variants, we can cast safely here.
        unsafe { std::mem::transmute(bits) }
    }

    /// Returns this [`PieceKind`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a [`PieceKind`] from a `char`, case-insensitively.
    ///
    /// The compound kinds use the letters of Capablanca chess:
    /// `c` for Chancellor and `a` for Archbishop.
    ///
    /// # Example
    /// ```
    /// # use varboard::PieceKind;
    /// assert_eq!(PieceKind::from_uci('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_uci('C').unwrap(), PieceKind::Chancellor);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            'c' => Ok(Self::Chancellor),
            'a' => Ok(Self::Archbishop),
            _ => bail!("Invalid char for PieceKind: {kind:?}"),
        }
    }

    /// Converts this [`PieceKind`] to its lowercase char.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
            Self::Chancellor => 'c',
            Self::Archbishop => 'a',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
            Self::Chancellor => "chancellor",
            Self::Archbishop => "archbishop",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.chars().next() {
            Some(c) => Self::from_uci(c),
            None => bail!("Cannot parse PieceKind from empty string"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Represents a chess piece: a [`Color`] and a [`PieceKind`], packed into a
/// single byte.
///
/// Internally, the kind occupies the low 3 bits and the color bit sits above
/// them:
/// ```text
///     0000 X KKK
///          |  |
///          |  +- PieceKind
///          +- Color
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// Mask for the [`PieceKind`] bits.
    const KIND_MASK: u8 = 0b0000_0111;
    /// Start index of the [`Color`] bit.
    const COLOR_BITS: u8 = 3;

    /// Creates a new [`Piece`] from the provided [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use varboard::{Color, Piece, PieceKind};
    /// let knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(knight.to_uci(), 'N');
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self((color as u8) << Self::COLOR_BITS | kind as u8)
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        Color::from_bits_unchecked(self.0 >> Self::COLOR_BITS)
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        PieceKind::from_bits_unchecked(self.0 & Self::KIND_MASK)
    }

    /// Returns `true` if this piece is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        self.0 & Self::KIND_MASK == PieceKind::Pawn as u8
    }

    /// Returns `true` if this piece is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        self.0 & Self::KIND_MASK == PieceKind::King as u8
    }

    /// Returns a copy of this [`Piece`] whose kind has been changed to
    /// `promotion`, keeping its [`Color`].
    ///
    /// # Example
    /// ```
    /// # use varboard::{Color, Piece, PieceKind};
    /// let pawn = Piece::new(Color::Black, PieceKind::Pawn);
    /// let queen = pawn.promoted(PieceKind::Queen);
    /// assert_eq!(queen.kind(), PieceKind::Queen);
    /// assert_eq!(queen.color(), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn promoted(self, promotion: PieceKind) -> Self {
        Self::new(self.color(), promotion)
    }

    /// Creates a [`Piece`] from a `char`, with uppercase being White and
    /// lowercase being Black.
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = Color::from_bits_unchecked(piece.is_ascii_lowercase() as u8);
        Ok(Self::new(color, kind))
    }

    /// Converts this [`Piece`] to a `char`, with uppercase being White and
    /// lowercase being Black.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        let c = self.kind().to_uci();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Fetches a human-readable name for this [`Piece`], like `"white knight"`.
    pub fn name(&self) -> String {
        format!("{} {}", self.color().name(), self.kind().name())
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.chars().next() {
            Some(c) => Self::from_uci(c),
            None => bail!("Cannot parse Piece from empty string"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_uci(), self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_piece_uci_round_trip() {
        for color in Color::all() {
            for kind in PieceKind::all() {
                let piece = Piece::new(color, kind);
                let parsed = Piece::from_uci(piece.to_uci()).unwrap();
                assert_eq!(parsed, piece);
                assert_eq!(parsed.color(), color);
                assert_eq!(parsed.kind(), kind);
            }
        }
    }

    #[test]
    fn test_piece_promotion_changes_kind_only() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        for promotion in PieceKind::PROMOTIONS {
            let promoted = pawn.promoted(promotion);
            assert_eq!(promoted.kind(), promotion);
            assert_eq!(promoted.color(), Color::White);
        }
    }

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(-Color::Black, Color::White);
    }
}

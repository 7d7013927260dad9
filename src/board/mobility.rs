/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::PieceKind;

/// The offset tables of every [`PieceKind`] for one board geometry.
///
/// Each kind owns two lists:
/// - *hop offsets* are applied exactly once from the source square (knight
///   leaps, king steps);
/// - *slide offsets* are directions applied repeatedly until blocked (rook
///   and bishop rays).
///
/// Offsets are linear combinations of `±1` (one file) and `±stride` (one
/// rank, where `stride` is the geometry's
/// [`array_width`](crate::Geometry::array_width)), so the same construction
/// serves boards of any width.
///
/// Compound fairy pieces need no generator support of their own: a
/// Chancellor is simply a Knight's hop list unioned with a Rook's slide
/// list, and an Archbishop a Knight's hops with a Bishop's slides. Adding a
/// new variant piece means adding one more union here and nothing else.
///
/// Pawns do not appear in these tables; their movement is direction- and
/// state-dependent (double steps, diagonal-only captures, en passant) and is
/// layered separately in the generator.
///
/// Tables are built once when a board is created and are immutable afterward.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mobility {
    hops: [Vec<i32>; PieceKind::COUNT],
    slides: [Vec<i32>; PieceKind::COUNT],
}

impl Mobility {
    /// Builds the offset tables for a board whose row stride is `stride`.
    pub fn new(stride: i32) -> Self {
        let knight_hops = vec![
            -stride * 2 - 1,
            -stride * 2 + 1,
            -stride - 2,
            -stride + 2,
            stride - 2,
            stride + 2,
            stride * 2 - 1,
            stride * 2 + 1,
        ];
        let king_hops = vec![
            -stride - 1,
            -stride,
            -stride + 1,
            -1,
            1,
            stride - 1,
            stride,
            stride + 1,
        ];
        let rook_slides = vec![-stride, -1, 1, stride];
        let bishop_slides = vec![-stride - 1, -stride + 1, stride - 1, stride + 1];
        let queen_slides = [rook_slides.as_slice(), bishop_slides.as_slice()].concat();

        let mut hops: [Vec<i32>; PieceKind::COUNT] = Default::default();
        let mut slides: [Vec<i32>; PieceKind::COUNT] = Default::default();

        hops[PieceKind::Knight.index()] = knight_hops.clone();
        hops[PieceKind::King.index()] = king_hops;

        slides[PieceKind::Bishop.index()] = bishop_slides.clone();
        slides[PieceKind::Rook.index()] = rook_slides.clone();
        slides[PieceKind::Queen.index()] = queen_slides;

        // Compounds: union of the donor tables.
        hops[PieceKind::Chancellor.index()] = knight_hops.clone();
        slides[PieceKind::Chancellor.index()] = rook_slides;
        hops[PieceKind::Archbishop.index()] = knight_hops;
        slides[PieceKind::Archbishop.index()] = bishop_slides;

        Self { hops, slides }
    }

    /// The hop offsets of `kind`: deltas applied exactly once.
    #[inline(always)]
    pub fn hops(&self, kind: PieceKind) -> &[i32] {
        &self.hops[kind.index()]
    }

    /// The slide offsets of `kind`: directions applied repeatedly until
    /// blocked.
    #[inline(always)]
    pub fn slides(&self, kind: PieceKind) -> &[i32] {
        &self.slides[kind.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Offsets of leaping pieces come in positive/negative pairs.
    fn assert_closed_under_negation(offsets: &[i32]) {
        for delta in offsets {
            assert!(
                offsets.contains(&-delta),
                "offset set {offsets:?} is missing {}",
                -delta
            );
        }
    }

    #[test]
    fn test_hop_offsets_symmetric() {
        let mobility = Mobility::new(12);
        for kind in PieceKind::all() {
            assert_closed_under_negation(mobility.hops(kind));
            assert_closed_under_negation(mobility.slides(kind));
        }
    }

    #[test]
    fn test_chancellor_is_knight_plus_rook() {
        let mobility = Mobility::new(12);
        assert_eq!(
            mobility.hops(PieceKind::Chancellor),
            mobility.hops(PieceKind::Knight)
        );
        assert_eq!(
            mobility.slides(PieceKind::Chancellor),
            mobility.slides(PieceKind::Rook)
        );
    }

    #[test]
    fn test_archbishop_is_knight_plus_bishop() {
        let mobility = Mobility::new(12);
        assert_eq!(
            mobility.hops(PieceKind::Archbishop),
            mobility.hops(PieceKind::Knight)
        );
        assert_eq!(
            mobility.slides(PieceKind::Archbishop),
            mobility.slides(PieceKind::Bishop)
        );
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let mobility = Mobility::new(14);
        let mut expected = mobility.slides(PieceKind::Rook).to_vec();
        expected.extend_from_slice(mobility.slides(PieceKind::Bishop));
        assert_eq!(mobility.slides(PieceKind::Queen), expected);
    }

    #[test]
    fn test_offsets_scale_with_stride() {
        // The same piece definitions must serve boards of different widths.
        for stride in [12, 14, 20] {
            let mobility = Mobility::new(stride);
            assert!(mobility.hops(PieceKind::Knight).contains(&(-stride * 2 - 1)));
            assert!(mobility.slides(PieceKind::Rook).contains(&-stride));
        }
    }

    #[test]
    fn test_pawn_has_no_generic_tables() {
        let mobility = Mobility::new(12);
        assert!(mobility.hops(PieceKind::Pawn).is_empty());
        assert!(mobility.slides(PieceKind::Pawn).is_empty());
    }
}

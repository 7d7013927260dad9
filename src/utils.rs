/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the starting position of standard chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN string for the starting position of Capablanca chess (10x8, with
/// Archbishops on the c-file and Chancellors on the h-file).
pub const FEN_CAPABLANCA_STARTPOS: &str =
    "rnabqkbcnr/pppppppppp/10/10/10/10/PPPPPPPPPP/RNABQKBCNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Maximum number of moves a single position is assumed to contain.
///
/// Standard chess tops out at 218; compound pieces, wider boards, and the
/// larger promotion fan-out all push that up, so this is rounded up
/// generously.
pub const MAX_NUM_MOVES: usize = 512;

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{builder::PossibleValue, Parser, ValueEnum};

use crate::Variant;

/// A command to be sent to the inspection shell.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND>")
)]
pub enum ShellCommand {
    /// Change the variant whose starting position is set up, or display the
    /// current board's size.
    #[command(aliases = ["variant", "v"])]
    ChangeVariant {
        /// The variant to switch to.
        variant: Option<Variant>,
    },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Quit the shell.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Set up the position described by a FEN string, replacing the board.
    ///
    /// The board's dimensions are taken from the FEN itself.
    #[command(alias = "load")]
    LoadFen { fen: Vec<String> },

    /// Apply the provided move to the board, if it is reachable.
    MakeMove { mv_string: String },

    /// Shows all reachable moves in the current position, or for the piece
    /// on a specific square.
    Moves {
        square: Option<String>,

        /// If set, moves will be printed using their debug formatter, which
        /// displays what kind of move it is (quiet, en passant, etc.).
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are printed in generation order.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Place a piece on the provided square.
    Place { piece: String, square: String },

    /// Remove the piece at the provided square.
    Take { square: String },
}

impl FromStr for ShellCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`ShellCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

impl ValueEnum for Variant {
    fn value_variants<'a>() -> &'a [Self] {
        &[Variant::Standard, Variant::Capablanca]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        // By default, possible values are the variant's name (case-insensitive)
        let name = format!("{self:?}");
        let mut value = PossibleValue::new(&name).alias(name.to_ascii_lowercase());

        // Some variants have additional aliases
        match self {
            Variant::Standard => {}
            Variant::Capablanca => value = value.aliases(["capa", "10x8"]),
        }

        Some(value)
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use varboard::{Board, Piece, ShellCommand};

fn main() -> Result<()> {
    let mut board = Board::default();

    // A command on the command line runs one-shot instead of starting the shell.
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        match ShellCommand::try_parse_from(&args) {
            Ok(cmd) => run_command(&mut board, cmd)?,
            Err(e) => eprintln!("{e}"),
        }
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Exit) => break,
            Ok(cmd) => {
                if let Err(e) = run_command(&mut board, cmd) {
                    eprintln!("{e}");
                }
            }

            // Edge case: `--help` and `--version` are both "error" cases according to Clap
            Err(e)
                if matches!(e.kind(), ErrorKind::DisplayHelp)
                    || matches!(e.kind(), ErrorKind::DisplayVersion) =>
            {
                println!("{e}");
            }

            Err(e) => eprintln!("{e}"),
        }
    }

    Ok(())
}

fn run_command(board: &mut Board, cmd: ShellCommand) -> Result<()> {
    match cmd {
        ShellCommand::ChangeVariant { variant } => match variant {
            Some(variant) => *board = variant.board(),
            None => println!("current board is {}", board.geometry()),
        },

        ShellCommand::Display => println!("{board}"),

        ShellCommand::Exit => {}

        ShellCommand::Fen => println!("{}", board.to_fen()),

        ShellCommand::LoadFen { fen } => *board = Board::from_fen(&fen.join(" "))?,

        ShellCommand::MakeMove { mv_string } => board.make_move_str(&mv_string)?,

        ShellCommand::Moves {
            square,
            debug,
            sort,
        } => {
            let moves = match square {
                Some(square) => board.moves_from(board.geometry().square_from_str(&square)?),
                None => board.legal_moves(),
            };

            let mut names = moves
                .iter()
                .map(|&mv| {
                    if debug {
                        format!("{} ({})", board.move_to_string(mv), mv.kind())
                    } else {
                        board.move_to_string(mv)
                    }
                })
                .collect::<Vec<_>>();
            if sort {
                names.sort();
            }
            println!("{}", names.join(" "));
        }

        ShellCommand::Place { piece, square } => {
            let piece = piece.parse::<Piece>()?;
            let square = board.geometry().square_from_str(&square)?;
            board.place(piece, square);
        }

        ShellCommand::Take { square } => {
            let square = board.geometry().square_from_str(&square)?;
            board.take(square);
        }
    }

    Ok(())
}

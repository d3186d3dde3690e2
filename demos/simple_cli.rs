// Simple command-line application to play chess against random moves

use rand::seq::SliceRandom;
use rookery::{
    validator, Board, Color, Execution, Game, MoveError, MoveSource, PieceKind, PrettyStyle,
    Proposal, UciMove,
};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

struct RandomMover;

impl MoveSource for RandomMover {
    fn propose(&mut self, board: &Board) -> Option<Proposal> {
        let moves = validator::legal_moves(board);
        moves
            .as_slice()
            .choose(&mut rand::thread_rng())
            .map(|mv| Proposal::from(*mv))
    }
}

fn human_move(game: &mut Game, input: &mut impl BufRead, s: &str) -> Result<(), MoveError> {
    let uci: UciMove = match s.parse() {
        Ok(uci) => uci,
        Err(e) => {
            println!("Bad move: {}", e);
            return Ok(());
        }
    };
    if let Execution::PromotionPending(sq) = game.execute(uci.src, uci.dst)? {
        let mut choice = uci.promote;
        loop {
            // The pawn is already moved, so we must ask until the promotion is completed.
            let kind = match choice.take() {
                Some(kind) => kind,
                None => {
                    print!("Promote on {} to (q/r/b/n): ", sq);
                    io::stdout().flush().unwrap();
                    let mut s = String::new();
                    input.read_line(&mut s).unwrap();
                    s.trim().parse().unwrap_or(PieceKind::Queen)
                }
            };
            match game.complete_promotion(kind) {
                Ok(_) => break,
                Err(e) => println!("Bad promotion: {}", e),
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut stdin = io::stdin().lock();
    let mut game = Game::new();
    let mut engine = RandomMover;

    loop {
        if game.is_over() {
            println!("{}", game.board().pretty(PrettyStyle::Utf8));
            match game.winner() {
                Some(color) => println!("Game finished: {} ({} wins)", game.state(), color.name()),
                None => println!("Game finished: {}", game.state()),
            }
            println!("Notation:");
            println!("{}", game.move_log());
            break;
        }

        if game.board().side() == Color::Black {
            match game.play_from(&mut engine) {
                Ok(Some(mv)) => println!("Black plays {}", mv),
                Ok(None) => break,
                Err(e) => println!("Engine move rejected: {}", e),
            }
            continue;
        }

        println!("{}", game.board().pretty(PrettyStyle::Utf8));
        print!(
            "White move ({}, or \"undo\"): ",
            game.board().fullmove_number()
        );
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        if s == "undo" {
            // Take back both the engine reply and our move
            for _ in 0..2 {
                if let Err(e) = game.undo_last_move() {
                    println!("Cannot undo: {}", e);
                }
            }
            println!();
            continue;
        }

        if let Err(e) = human_move(&mut game, &mut stdin, s) {
            println!("Bad move: {}", e);
        }
        println!();
    }
}

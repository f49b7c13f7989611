use std::env;
use std::process::exit;

use gridlock::Board;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 1 {
        eprintln!("usage: gridlock DESC");
        eprintln!("DESC is a board description, rows separated by newlines,");
        eprintln!("or a single line for a square board");
        exit(2);
    }

    let mut board: Board = match args[0].parse() {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid board: {}", err);
            exit(1);
        }
    };
    println!("{}", board);
    println!();

    let solution = match board.solve() {
        Ok(solution) => solution,
        Err(err) => {
            eprintln!("invalid board: {}", err);
            exit(1);
        }
    };
    if !solution.solvable {
        println!(
            "not solvable (depth {}, {} states, {} memo hits)",
            solution.depth, solution.memo_size, solution.memo_hits
        );
        exit(1);
    }

    let moves: Vec<String> = solution.moves.iter().map(|mv| mv.to_string()).collect();
    println!("{}", moves.join(" "));
    println!(
        "{} moves, {} steps (depth {}, {} states, {} memo hits)",
        solution.num_moves, solution.num_steps, solution.depth, solution.memo_size, solution.memo_hits
    );
}

use std::{env::args, process::exit};

pub use utils::Pos;
mod utils;

pub use board::{Board, BoardError, Cell};
pub mod board;

pub mod store;

pub use sim::{Sim, SimHandle};
mod sim;

pub use view::View;
mod view;

const DEFAULT_WIDTH: usize = 64;
const DEFAULT_HEIGHT: usize = 32;
const DEFAULT_SAVE_PATH: &str = "life.sav";

fn parse_dim(arg: Option<String>, default: usize) -> usize {
    match arg {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("[error] dimensions must be positive integers");
            exit(1);
        }),
        None => default,
    }
}

pub fn main() {
    let width = parse_dim(args().nth(1), DEFAULT_WIDTH);
    let height = parse_dim(args().nth(2), DEFAULT_HEIGHT);
    let save_path = args().nth(3).unwrap_or_else(|| DEFAULT_SAVE_PATH.to_string());

    let board = Board::new(width, height).unwrap_or_else(|err| {
        eprintln!("[error] {err}");
        exit(1);
    });

    let simulation = Sim::spawn(board);
    let view = View::spawn(simulation.handle(), save_path.into());

    simulation.join();
    view.join();
}

use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
    time::{Duration, SystemTime},
};

use crate::{Board, Cell, Pos};

/// State handed to collaborators on each snapshot request.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub generation: u64,
    pub running: bool,
}

pub enum SimCmd {
    Snapshot(mpsc::Sender<Snapshot>),
    Set(Pos, Cell),
    Step,
    SetRunning(bool),
    Restore(Vec<Cell>),
}

pub struct SimHandle {
    sender: mpsc::Sender<SimCmd>,
}

impl SimHandle {
    pub fn new(sender: mpsc::Sender<SimCmd>) -> Self {
        Self { sender }
    }

    pub fn snapshot(&self) -> Snapshot {
        let (sender, receiver) = mpsc::channel();
        self.sender.send(SimCmd::Snapshot(sender)).unwrap();
        receiver.recv().unwrap()
    }

    pub fn set(&self, pos: Pos, cell: Cell) {
        self.sender.send(SimCmd::Set(pos, cell)).unwrap()
    }

    pub fn step(&self) {
        self.sender.send(SimCmd::Step).unwrap()
    }

    pub fn set_running(&self, running: bool) {
        self.sender.send(SimCmd::SetRunning(running)).unwrap()
    }

    /// Replaces the whole board content, e.g. from a decoded save. The cell
    /// count must match the board dimensions.
    pub fn restore(&self, cells: Vec<Cell>) {
        self.sender.send(SimCmd::Restore(cells)).unwrap()
    }
}

#[derive(Debug)]
pub struct Sim {
    thread: JoinHandle<()>,
    sender: mpsc::Sender<SimCmd>,
}

impl Sim {
    pub fn spawn(board: Board) -> Self {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, board));

        Self { sender, thread }
    }

    pub fn handle(&self) -> SimHandle {
        let sender = self.sender.clone();
        SimHandle { sender }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

const EVT_CHECK_TIMEOUT: Duration = Duration::from_millis(10);
const SIM_TICK_INTERVAL: Duration = Duration::from_millis(200);

fn sim_loop(receiver: mpsc::Receiver<SimCmd>, board: Board) {
    let mut board = board;
    let mut generation: u64 = 0;
    let mut running = false;
    let mut last_update = SystemTime::now();

    loop {
        while let Ok(cmd) = receiver.try_recv() {
            match cmd {
                SimCmd::Snapshot(sender) => {
                    let snapshot = Snapshot {
                        board: board.clone(),
                        generation,
                        running,
                    };
                    sender.send(snapshot).unwrap()
                }
                SimCmd::Set(pos, cell) => {
                    if board.contains(pos) {
                        board.set(pos, cell)
                    }
                }
                SimCmd::Step => {
                    board.advance().unwrap();
                    generation += 1;
                }
                SimCmd::SetRunning(state) => running = state,
                SimCmd::Restore(cells) => {
                    board.write_all(&cells).unwrap();
                    generation = 0;
                }
            }
        }

        if running && SystemTime::now().duration_since(last_update).unwrap() > SIM_TICK_INTERVAL {
            board.advance().unwrap();
            generation += 1;
            last_update = SystemTime::now();
        }

        thread::sleep(EVT_CHECK_TIMEOUT);
    }
}

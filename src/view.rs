use std::{
    io::{stdin, stdout},
    path::PathBuf,
    process::exit,
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use termion::{event::Key, input::TermRead, raw::IntoRawMode};

use crate::{pos, sim::Snapshot, store, Cell, Pos, SimHandle};

pub use canvas::Canvas;
mod canvas;

pub struct View {
    thread: JoinHandle<()>,
}

impl View {
    pub fn spawn(handle: SimHandle, save_path: PathBuf) -> Self {
        let thread = thread::spawn(|| view_loop(handle, save_path));
        Self { thread }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

#[derive(Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    Draw,
    Erase,
    Step,
    ToggleRun,
    Save,
    Restore,
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    let stdout = stdout().into_raw_mode().unwrap();
    for c in stdin().keys() {
        let command = match c.unwrap() {
            Key::Char('q') => InputCmd::Exit,
            Key::Up => InputCmd::Move(Dir::Up),
            Key::Down => InputCmd::Move(Dir::Down),
            Key::Left => InputCmd::Move(Dir::Left),
            Key::Right => InputCmd::Move(Dir::Right),
            Key::Char(' ') => InputCmd::Draw,
            Key::Char('x') => InputCmd::Erase,
            Key::Char('n') => InputCmd::Step,
            Key::Char('r') => InputCmd::ToggleRun,
            Key::Char('s') => InputCmd::Save,
            Key::Char('l') => InputCmd::Restore,
            _ => continue,
        };

        sender.send(command).unwrap();
    }
    drop(stdout);
}

const VIEW_REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const HELP: &str = "arrows move, space draws, x erases, n steps, r runs, s saves, l loads, q quits";

struct ViewState {
    handle: SimHandle,
    save_path: PathBuf,
    width: usize,
    height: usize,
    cursor: Pos,
    running: bool,
    status: String,
}

fn view_loop(handle: SimHandle, save_path: PathBuf) {
    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(|| input_loop(sender));

    let first = handle.snapshot();
    let mut state = ViewState {
        width: first.board.width(),
        height: first.board.height(),
        cursor: pos!(0, 0),
        running: first.running,
        status: HELP.to_string(),
        handle,
        save_path,
    };

    loop {
        state.handle_inputs(&receiver);
        let snapshot = state.handle.snapshot();
        display(&snapshot, state.cursor, &state.status);
        thread::sleep(VIEW_REFRESH_INTERVAL);
    }
}

impl ViewState {
    fn handle_inputs(&mut self, receiver: &mpsc::Receiver<InputCmd>) {
        while let Ok(cmd) = receiver.try_recv() {
            match cmd {
                InputCmd::Exit => exit(0),
                InputCmd::Move(direction) => {
                    let offset = match direction {
                        Dir::Up => pos!(0, -1),
                        Dir::Down => pos!(0, 1),
                        Dir::Left => pos!(-1, 0),
                        Dir::Right => pos!(1, 0),
                    };
                    self.cursor = (self.cursor + offset).clamped(self.width, self.height);
                }
                InputCmd::Draw => self.handle.set(self.cursor, Cell::alive()),
                InputCmd::Erase => self.handle.set(self.cursor, Cell::dead()),
                InputCmd::Step => self.handle.step(),
                InputCmd::ToggleRun => {
                    self.running = !self.running;
                    self.handle.set_running(self.running);
                }
                InputCmd::Save => self.save(),
                InputCmd::Restore => self.restore(),
            }
        }
    }

    fn save(&mut self) {
        let snapshot = self.handle.snapshot();
        self.status = match store::save(&snapshot.board, &self.save_path) {
            Ok(()) => format!("saved {}", self.save_path.display()),
            Err(err) => format!("save failed: {err}"),
        };
    }

    fn restore(&mut self) {
        self.status = match store::load(&self.save_path, self.width * self.height) {
            Ok(cells) => {
                self.handle.restore(cells);
                format!("restored {}", self.save_path.display())
            }
            Err(err) => format!("restore failed: {err}"),
        };
    }
}

fn display(snapshot: &Snapshot, cursor: Pos, status: &str) {
    let mut canvas = Canvas::from_screen();
    let board = &snapshot.board;
    let frame_right = board.width() as i32 + 1;
    let frame_bottom = board.height() as i32 + 1;

    // the board sits inside a one-character frame at the top left
    canvas.layer(|pos| {
        let inner = pos + pos!(-1, -1);
        if board.contains(inner) {
            return Some(if board.get(inner).is_alive() { '#' } else { ' ' });
        }
        if !(0..=frame_right).contains(&pos.x) || !(0..=frame_bottom).contains(&pos.y) {
            return None;
        }
        match (
            pos.x == 0 || pos.x == frame_right,
            pos.y == 0 || pos.y == frame_bottom,
        ) {
            (true, true) => Some('+'),
            (true, false) => Some('|'),
            (false, true) => Some('-'),
            (false, false) => None,
        }
    });

    canvas.layer(|pos| {
        (pos == cursor + pos!(1, 1)).then(|| if board.get(cursor).is_alive() { '@' } else { '+' })
    });

    let mode = if snapshot.running { "running" } else { "paused" };
    let line = format!("gen {:>4} [{mode}] {status}", snapshot.generation);
    let chars: Vec<char> = line.chars().collect();
    let status_row = frame_bottom + 1;
    canvas.layer(|pos| {
        if pos.y != status_row {
            return None;
        }
        chars.get(pos.x as usize).copied()
    });

    canvas.display();
}

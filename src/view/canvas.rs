use std::io::{stdout, Write};

use crate::{pos, Pos};

/// Character back buffer sized to the terminal, painted in layers and
/// flushed in one write.
pub struct Canvas {
    rows: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn from_screen() -> Self {
        let (width, height) = termion::terminal_size().unwrap();
        Self::new(width as usize, (height - 1) as usize)
    }

    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![' '; width]).collect();
        Self {
            rows,
            width,
            height,
        }
    }

    /// Paints every position the painter returns a character for, leaving
    /// the rest of the buffer as previous layers left it.
    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<char>) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(char) = f(pos!(x as i32, y as i32)) {
                    self.rows[y][x] = char;
                }
            }
        }
    }

    pub fn display(&self) {
        let clear = termion::clear::All;
        print!("{clear}");
        for (index, row) in self.rows.iter().enumerate() {
            let goto = termion::cursor::Goto(1, index as u16 + 1);
            let line: String = row.iter().collect();
            print!("{goto}{line}");
        }
        stdout().flush().unwrap();
    }
}

#[test]
fn test_layer_keeps_unpainted_cells() {
    let mut canvas = Canvas::new(3, 2);
    canvas.layer(|pos| (pos.y == 0).then_some('a'));
    canvas.layer(|pos| (pos == pos!(1, 0)).then_some('b'));
    assert_eq!(canvas.rows[0], ['a', 'b', 'a']);
    assert_eq!(canvas.rows[1], [' ', ' ', ' ']);
}

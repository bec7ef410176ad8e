use std::{fs, io, path::Path};

use thiserror::Error;

use crate::{Board, Cell};

const DEAD_BYTE: u8 = 0;
const ALIVE_BYTE: u8 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save holds {actual} cells, board needs {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("byte {offset} has value {value}, expected 0 or 1")]
    InvalidByte { offset: usize, value: u8 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Encodes cells one byte each, row-major, 1 alive and 0 dead. No header.
pub fn encode(cells: &[Cell]) -> Vec<u8> {
    cells
        .iter()
        .map(|cell| if cell.is_alive() { ALIVE_BYTE } else { DEAD_BYTE })
        .collect()
}

/// Decodes a byte stream produced by [`encode`].
///
/// The whole stream is validated before any cell is produced, so a corrupt
/// save never yields a partial board.
pub fn decode(bytes: &[u8], expected: usize) -> Result<Vec<Cell>, StoreError> {
    if bytes.len() != expected {
        return Err(StoreError::WrongLength {
            expected,
            actual: bytes.len(),
        });
    }
    bytes
        .iter()
        .enumerate()
        .map(|(offset, value)| match *value {
            DEAD_BYTE => Ok(Cell::dead()),
            ALIVE_BYTE => Ok(Cell::alive()),
            value => Err(StoreError::InvalidByte { offset, value }),
        })
        .collect()
}

pub fn save(board: &Board, path: &Path) -> Result<(), StoreError> {
    fs::write(path, encode(board.cells()))?;
    Ok(())
}

pub fn load(path: &Path, expected: usize) -> Result<Vec<Cell>, StoreError> {
    let bytes = fs::read(path)?;
    decode(&bytes, expected)
}

#[test]
fn test_encode_decode_round_trip() {
    let cells = vec![Cell::dead(), Cell::alive(), Cell::dead(), Cell::alive()];
    let bytes = encode(&cells);
    assert_eq!(bytes, [0, 1, 0, 1]);
    assert_eq!(decode(&bytes, 4).unwrap(), cells);
}

#[test]
fn test_decode_rejects_bad_byte() {
    let err = decode(&[0, 1, 2, 0], 4).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidByte {
            offset: 2,
            value: 2
        }
    ));
}

#[test]
fn test_decode_rejects_wrong_length() {
    let err = decode(&[0, 1, 0], 4).unwrap_err();
    assert!(matches!(
        err,
        StoreError::WrongLength {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn test_save_load_round_trip() {
    let mut board = Board::new(2, 2).unwrap();
    board.write_all(&decode(&[1, 0, 0, 1], 4).unwrap()).unwrap();

    let path = std::env::temp_dir().join("gridlife-store-test.sav");
    save(&board, &path).unwrap();
    let cells = load(&path, 4).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(cells.as_slice(), board.cells());
}

//! Save/load of the live-cell set
//!
//! Format: a flat byte stream of `(x, y)` pairs, one signed byte per
//! component, written in pre-order so that reloading by sequential insertion
//! rebuilds the same tree shape. Loading is all-or-nothing.

use std::fs;
use std::path::Path;

use crate::error::{LifeError, Result};
use crate::sim::{CellTree, Component, Coord};

/// Bytes per stored cell
pub const RECORD_LEN: usize = 2;

/// Serialize `cells` in pre-order
pub fn encode(cells: &CellTree) -> Vec<u8> {
    let mut out = Vec::with_capacity(cells.len() * RECORD_LEN);
    for coord in cells.iter_pre_order() {
        out.push(coord.x as u8);
        out.push(coord.y as u8);
    }
    out
}

/// Rebuild a tree from `bytes`.
///
/// Odd-length input and repeated coordinates are rejected before any tree is
/// returned.
pub fn decode(bytes: &[u8]) -> Result<CellTree> {
    if bytes.len() % RECORD_LEN != 0 {
        return Err(LifeError::MalformedPersistedData {
            reason: format!("length {} is not a multiple of {}", bytes.len(), RECORD_LEN),
        });
    }

    let mut cells = CellTree::new();
    for (index, pair) in bytes.chunks_exact(RECORD_LEN).enumerate() {
        let coord = Coord::new(pair[0] as Component, pair[1] as Component);
        if cells.contains(coord) {
            return Err(LifeError::MalformedPersistedData {
                reason: format!("cell {} repeated at record {}", coord, index),
            });
        }
        cells.insert(coord)?;
    }
    Ok(cells)
}

pub fn load_file(path: &Path) -> Result<CellTree> {
    let bytes = fs::read(path).map_err(|source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cells = decode(&bytes)?;
    log::info!("loaded {} cells from {}", cells.len(), path.display());
    Ok(cells)
}

pub fn save_file(path: &Path, cells: &CellTree) -> Result<()> {
    fs::write(path, encode(cells)).map_err(|source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {} cells to {}", cells.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn tree(cells: &[(i8, i8)]) -> CellTree {
        CellTree::from_coords(cells.iter().map(|&p| Coord::from(p))).unwrap()
    }

    #[test]
    fn test_encode_is_pre_order() {
        let cells = tree(&[(4, 0), (2, 0), (6, 0), (-1, -1)]);
        assert_eq!(encode(&cells), vec![4, 0, 2, 0, 6, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_decode_preserves_shape() {
        let cells = tree(&[(4, 0), (2, 0), (6, 0), (1, 0), (7, 3)]);
        let loaded = decode(&encode(&cells)).unwrap();
        assert!(cells.iter_pre_order().eq(loaded.iter_pre_order()));
        assert_eq!(loaded.height(), cells.height());
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_odd_length_is_rejected() {
        let err = decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LifeError::MalformedPersistedData { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_repeated_cell_is_rejected() {
        let err = decode(&[1, 2, 3, 4, 1, 2]).unwrap_err();
        assert!(matches!(err, LifeError::MalformedPersistedData { reason } if reason.contains("record 2")));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.cells");
        let cells = tree(&[(0, 0), (-128, 127), (127, -128), (5, 5)]);
        save_file(&path, &cells).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 8);
        let loaded = load_file(&path).unwrap();
        assert!(loaded.iter().eq(cells.iter()));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.cells");
        match load_file(&path) {
            Err(LifeError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn round_trip_preserves_set(coords in prop::collection::btree_set(any::<(i8, i8)>(), 0..300)) {
            let cells = CellTree::from_coords(coords.iter().map(|&p| Coord::from(p))).unwrap();
            let loaded = decode(&encode(&cells)).unwrap();
            let expected: BTreeSet<_> = coords.iter().map(|&p| Coord::from(p).key()).collect();
            let actual: BTreeSet<_> = loaded.iter().map(Coord::key).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(loaded.len(), coords.len());
        }
    }
}

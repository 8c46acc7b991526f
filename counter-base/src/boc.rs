// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reading and writing bags of cells (BOC).
//!
//! Cells are decoded by `tonlib-core`. Before handing untrusted bytes over, the layout is
//! walked once: cell counts must fit in the input, and root and reference indices must
//! point inside the bag.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tonlib_core::cell::{ArcCell, BagOfCells, Cell, TonCellError};

use crate::ensure;

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
const HAS_INDEX: u8 = 0x80;
const SIZE_MASK: u8 = 0x07;
/// The two descriptor bytes every cell starts with.
const MIN_CELL_SIZE: usize = 2;
const MAX_REFERENCES: u8 = 4;
const HAS_HASHES: u8 = 0x10;
/// A stored hash and its depth.
const HASH_ENTRY_SIZE: usize = 32 + 2;

/// Error type for malformed bags of cells.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BocError {
    #[error("invalid bag of cells: {0}")]
    Malformed(&'static str),
    #[error("invalid base64 bag of cells: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Cell(#[from] TonCellError),
}

/// Serializes the tree rooted at `root`, without index nor checksum.
pub fn serialize(root: &Cell) -> Result<Vec<u8>, BocError> {
    Ok(BagOfCells::from_root(root.clone()).serialize(false)?)
}

/// Decodes all the roots of a serialized bag of cells.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<ArcCell>, BocError> {
    check_layout(bytes)?;
    Ok(BagOfCells::parse(bytes)?.roots)
}

/// Decodes the first root of a serialized bag of cells.
pub fn deserialize_first(bytes: &[u8]) -> Result<ArcCell, BocError> {
    deserialize(bytes)?
        .into_iter()
        .next()
        .ok_or(BocError::Malformed("no root cell"))
}

/// Decodes the first root of a base64-encoded bag of cells.
pub fn deserialize_base64(input: &str) -> Result<ArcCell, BocError> {
    deserialize_first(&STANDARD.decode(input.trim())?)
}

/// Walks the header and the cell descriptors without decoding any cell.
fn check_layout(bytes: &[u8]) -> Result<(), BocError> {
    let mut reader = Reader { bytes, position: 0 };
    ensure!(
        reader.take(4)? == BOC_MAGIC,
        BocError::Malformed("unknown magic")
    );
    let flags = reader.byte()?;
    let size_bytes = usize::from(flags & SIZE_MASK);
    ensure!(
        (1..=4).contains(&size_bytes),
        BocError::Malformed("invalid reference size")
    );
    let offset_bytes = usize::from(reader.byte()?);
    ensure!(
        (1..=8).contains(&offset_bytes),
        BocError::Malformed("invalid offset size")
    );
    let cell_count = reader.read_uint(size_bytes)?;
    let root_count = reader.read_uint(size_bytes)?;
    reader.read_uint(size_bytes)?; // absent
    reader.read_uint(offset_bytes)?; // total cells size
    ensure!(
        cell_count <= reader.remaining() / MIN_CELL_SIZE,
        BocError::Malformed("more cells announced than bytes available")
    );
    ensure!(
        (1..=cell_count).contains(&root_count),
        BocError::Malformed("invalid root count")
    );
    for _ in 0..root_count {
        ensure!(
            reader.read_uint(size_bytes)? < cell_count,
            BocError::Malformed("root index out of range")
        );
    }
    if flags & HAS_INDEX != 0 {
        reader.take(cell_count * offset_bytes)?;
    }

    for index in 0..cell_count {
        let d1 = reader.byte()?;
        let d2 = reader.byte()?;
        let reference_count = d1 & 0b111;
        ensure!(
            reference_count <= MAX_REFERENCES,
            BocError::Malformed("too many references")
        );
        if d1 & HAS_HASHES != 0 {
            let hash_count = (d1 >> 5).count_ones() as usize + 1;
            reader.take(hash_count * HASH_ENTRY_SIZE)?;
        }
        reader.take(usize::from(d2).div_ceil(2))?;
        for _ in 0..reference_count {
            let child = reader.read_uint(size_bytes)?;
            ensure!(
                child > index && child < cell_count,
                BocError::Malformed("references must point to later cells")
            );
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], BocError> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(BocError::Malformed("unexpected end of data"))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, BocError> {
        Ok(self.take(1)?[0])
    }

    fn read_uint(&mut self, width: usize) -> Result<usize, BocError> {
        Ok(self
            .take(width)?
            .iter()
            .fold(0usize, |value, byte| (value << 8) | usize::from(*byte)))
    }
}

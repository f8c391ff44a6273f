//! Fixed-size, linearly addressed byte memory.

use crate::logging::{log, LogCategory, LogLevel};
use thiserror::Error;

/// Largest address space a 16-bit program counter can reach.
pub const MAX_MEMORY_SIZE: usize = 0x1_0000;

/// Size of the original machine's address space (32 KB).
pub const DEFAULT_MEMORY_SIZE: usize = 32 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Invalid memory size: {0} bytes (must be 1..=65536)")]
    InvalidSize(usize),
    #[error("Load of {len} bytes at {offset:#06X} does not fit in {size} bytes of memory")]
    LoadOutOfRange { offset: u16, len: usize, size: usize },
}

/// The processor's address space.
///
/// The size is fixed at construction. Addresses past the end wrap modulo the
/// size, so a read or write can never go out of bounds.
#[derive(Debug, Clone)]
pub struct Memory {
    data: Box<[u8]>,
}

impl Memory {
    pub fn new(size: usize) -> Result<Self, MemoryError> {
        if size == 0 || size > MAX_MEMORY_SIZE {
            return Err(MemoryError::InvalidSize(size));
        }
        Ok(Self {
            data: vec![0; size].into_boxed_slice(),
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn index(&self, addr: u16) -> usize {
        addr as usize % self.data.len()
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[self.index(addr)]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, val: u8) {
        let i = self.index(addr);
        self.data[i] = val;
    }

    /// Copy `bytes` into memory starting at `offset`.
    ///
    /// The whole image must fit; nothing is written otherwise.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        let start = offset as usize;
        let end = start.checked_add(bytes.len()).filter(|&e| e <= self.size());
        let Some(end) = end else {
            let err = MemoryError::LoadOutOfRange {
                offset,
                len: bytes.len(),
                size: self.size(),
            };
            log(LogCategory::Memory, LogLevel::Error, || err.to_string());
            return Err(err);
        };
        if bytes.is_empty() {
            return Ok(());
        }
        self.data[start..end].copy_from_slice(bytes);
        log(LogCategory::Memory, LogLevel::Debug, || {
            format!("Loaded {} bytes at {:04X}-{:04X}", bytes.len(), start, end - 1)
        });
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            data: vec![0; DEFAULT_MEMORY_SIZE].into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_oversized() {
        assert_eq!(Memory::new(0).unwrap_err(), MemoryError::InvalidSize(0));
        assert_eq!(
            Memory::new(MAX_MEMORY_SIZE + 1).unwrap_err(),
            MemoryError::InvalidSize(MAX_MEMORY_SIZE + 1)
        );
        assert_eq!(Memory::new(MAX_MEMORY_SIZE).unwrap().size(), MAX_MEMORY_SIZE);
    }

    #[test]
    fn default_is_32k() {
        assert_eq!(Memory::default().size(), 32 * 1024);
    }

    #[test]
    fn read_write_roundtrip() {
        let mut mem = Memory::new(0x100).unwrap();
        mem.write(0x42, 0x99);
        assert_eq!(mem.read(0x42), 0x99);
    }

    #[test]
    fn addresses_past_end_wrap() {
        let mut mem = Memory::new(0x8000).unwrap();
        mem.write(0x0010, 0x55);
        assert_eq!(mem.read(0x8010), 0x55);
        mem.write(0xFFFF, 0xAA);
        assert_eq!(mem.read(0x7FFF), 0xAA);
    }

    #[test]
    fn load_copies_image() {
        let mut mem = Memory::new(0x100).unwrap();
        mem.load(0x10, &[1, 2, 3]).unwrap();
        assert_eq!(&mem.as_slice()[0x10..0x13], &[1, 2, 3]);
    }

    #[test]
    fn load_that_does_not_fit_writes_nothing() {
        let mut mem = Memory::new(0x100).unwrap();
        let err = mem.load(0xFE, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            MemoryError::LoadOutOfRange {
                offset: 0xFE,
                len: 3,
                size: 0x100
            }
        );
        assert!(mem.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_load_is_a_no_op() {
        let mut mem = Memory::new(0x100).unwrap();
        assert_eq!(mem.load(0x00, &[]), Ok(()));
        assert_eq!(mem.load(0xFF, &[]), Ok(()));
        assert!(mem.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn load_can_fill_to_the_last_byte() {
        let mut mem = Memory::new(0x100).unwrap();
        mem.load(0xFE, &[7, 8]).unwrap();
        assert_eq!(mem.read(0xFF), 8);
    }
}

use byteorder::ByteOrder;
use std::{error::Error, fmt};

use crate::{constants, Endian, Word};

/// A memory access touched bytes outside `[0, length)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BadAddress {
    pub address: Word,
    pub length: u32,
}

impl fmt::Display for BadAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}-byte access at {:#010x} is out of range",
            self.length, self.address
        )
    }
}

impl Error for BadAddress {}

/// Byte-addressable storage with little-endian multi-byte access.
///
/// The default methods cover the access sizes the machine needs: single
/// bytes, 32-bit words, and the one- to six-byte instruction encodings.
pub trait Storage {
    /// Total length of the storage in bytes.
    fn length(&self) -> u32;

    /// Whether `[address, address + length)` is addressable.
    fn check_range(&self, address: Word, length: u32) -> bool;

    fn borrow_slice(&self, address: Word, length: u32) -> Result<&[u8], BadAddress>;

    fn borrow_slice_mut(
        &mut self,
        address: Word,
        length: u32,
    ) -> Result<&mut [u8], BadAddress>;

    /// Reads `size` bytes starting at `address` as a little-endian
    /// unsigned integer.
    ///
    /// # Panics
    /// Panics if `size` is zero or greater than [`constants::LONG_BYTES`].
    fn read(&self, address: Word, size: u32) -> Result<u64, BadAddress> {
        assert!(size >= 1 && size <= constants::LONG_BYTES);
        Ok(Endian::read_uint(
            self.borrow_slice(address, size)?,
            size as usize,
        ))
    }

    fn read_word(&self, address: Word) -> Result<Word, BadAddress> {
        Ok(Endian::read_u32(
            self.borrow_slice(address, constants::WORD_BYTES)?,
        ))
    }

    /// Writes the low `size` bytes of `value` at `address`, little-endian.
    ///
    /// # Panics
    /// Panics if `size` is out of range or `value` does not fit in `size`
    /// bytes.
    fn write(&mut self, address: Word, size: u32, value: u64) -> Result<(), BadAddress> {
        assert!(size >= 1 && size <= constants::LONG_BYTES);
        Endian::write_uint(
            self.borrow_slice_mut(address, size)?,
            value,
            size as usize,
        );
        Ok(())
    }

    fn write_word(&mut self, address: Word, value: Word) -> Result<(), BadAddress> {
        Endian::write_u32(
            self.borrow_slice_mut(address, constants::WORD_BYTES)?,
            value,
        );
        Ok(())
    }
}

/// Flat, contiguous memory; the only `Storage` the machine uses.
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Constructs a zeroed memory of the given length.
    pub fn new(length: u32) -> Memory {
        Memory {
            data: vec![0; length as usize],
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }
}

impl Storage for Memory {
    fn length(&self) -> u32 {
        self.data.len() as u32
    }

    fn check_range(&self, address: Word, length: u32) -> bool {
        u64::from(address) + u64::from(length) <= self.data.len() as u64
    }

    fn borrow_slice(&self, address: Word, length: u32) -> Result<&[u8], BadAddress> {
        if self.check_range(address, length) {
            Ok(&self.data[address as usize..(address + length) as usize])
        } else {
            Err(BadAddress { address, length })
        }
    }

    fn borrow_slice_mut(
        &mut self,
        address: Word,
        length: u32,
    ) -> Result<&mut [u8], BadAddress> {
        if self.check_range(address, length) {
            Ok(&mut self.data[address as usize..(address + length) as usize])
        } else {
            Err(BadAddress { address, length })
        }
    }
}

impl<'a> From<&'a [u8]> for Memory {
    fn from(s: &'a [u8]) -> Memory {
        Memory { data: Vec::from(s) }
    }
}

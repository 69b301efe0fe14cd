use std::io;
use std::io::Read;

use crate::error::Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// The full CHIP-8 address space.
pub const RAM_SIZE: usize = 4096;

/// Where programs are loaded and where pc starts.
pub const PROGRAM_ADDR: u16 = 0x200;

/// Base of the built-in font, 16 glyphs of 5 bytes each.
pub const FONT_ADDR: u16 = 0x000;

const FONT_GLYPH_LEN: u16 = 5;

/// The CHIP-8 RAM: a flat 4096-byte array with the hex font baked in at
/// the bottom and program space from 0x200 up.
///
/// Every access is range-checked; running off the end of the address
/// space is an [`Error::OutOfBounds`] rather than a panic.
pub struct Memory {
    bytes: Box<[u8; RAM_SIZE]>,
}

impl Memory {
    /// Fresh RAM: font glyphs at [`FONT_ADDR`], zeroes everywhere else.
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; RAM_SIZE]);
        bytes[FONT_ADDR as usize..FONT_ADDR as usize + CHIP8_FONT.len()]
            .copy_from_slice(&CHIP8_FONT);
        Memory { bytes }
    }

    /// Longest ROM that fits the program area.
    pub fn max_rom_len() -> usize {
        RAM_SIZE - PROGRAM_ADDR as usize
    }

    /// Copy a ROM verbatim into memory starting at [`PROGRAM_ADDR`].
    ///
    /// The source is drained before anything is written, so a short or
    /// failed read leaves memory untouched. Returns the byte count.
    pub fn load_rom(&mut self, reader: &mut impl io::Read) -> Result<usize, Error> {
        let mut rom = Vec::new();
        let len = reader.read_to_end(&mut rom)?;
        if len > Self::max_rom_len() {
            return Err(Error::RomTooLarge {
                size: len,
                max: Self::max_rom_len(),
            });
        }
        self.write(PROGRAM_ADDR, &rom)?;
        Ok(len)
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8, Error> {
        Ok(self.read(addr, 1)?[0])
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Error> {
        self.write(addr, &[value])
    }

    /// The two bytes at `addr`, combined big-endian into one instruction
    /// word.
    pub fn read_word(&self, addr: u16) -> Result<u16, Error> {
        let word = self.read(addr, 2)?;
        Ok((word[0] as u16) << 8 | word[1] as u16)
    }

    /// A read-only view of `len` bytes starting at `addr`.
    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Error> {
        let a = addr as usize;
        self.bytes
            .get(a..a + len)
            .ok_or(Error::OutOfBounds { addr, len })
    }

    /// Copy `data` into memory at `addr`, all or nothing.
    pub fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), Error> {
        let a = addr as usize;
        self.bytes
            .get_mut(a..a + data.len())
            .ok_or(Error::OutOfBounds {
                addr,
                len: data.len(),
            })?
            .copy_from_slice(data);
        Ok(())
    }

    /// Address of the built-in glyph for a hex digit (I = 5 × digit).
    pub fn glyph_addr(digit: u8) -> u16 {
        FONT_ADDR + FONT_GLYPH_LEN * digit as u16
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_baked_in_at_zero() {
        let m = Memory::new();
        // glyph for 0 sits at the very bottom of RAM
        assert_eq!(m.read(0x000, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // glyph for F is the last five font bytes
        assert_eq!(m.read(0x04b, 5).unwrap(), &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_memory_zeroed_above_font() {
        let m = Memory::new();
        assert_eq!(m.read(0x050, RAM_SIZE - 0x50).unwrap(), &[0u8; 0xfb0][..]);
    }

    #[test]
    fn test_glyph_addr() {
        assert_eq!(Memory::glyph_addr(0x0), 0x000);
        assert_eq!(Memory::glyph_addr(0xa), 0x032);
    }

    #[test]
    fn test_load_rom_at_program_addr() -> Result<(), Error> {
        let mut m = Memory::new();
        let mut rom: &[u8] = &[0x12, 0x34];
        assert_eq!(m.load_rom(&mut rom)?, 2);
        assert_eq!(m.read_byte(0x200)?, 0x12);
        assert_eq!(m.read_byte(0x201)?, 0x34);
        assert_eq!(m.read_word(0x200)?, 0x1234);
        Ok(())
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut m = Memory::new();
        let rom = vec![0u8; Memory::max_rom_len() + 1];
        match m.load_rom(&mut rom.as_slice()) {
            Err(Error::RomTooLarge { size, max }) => {
                assert_eq!(size, 3585);
                assert_eq!(max, 3584);
            }
            other => panic!("expected RomTooLarge, got {:?}", other.map(|_| ())),
        }
        // nothing was copied
        assert_eq!(m.read(0x200, 16).unwrap(), &[0u8; 16]);
    }

    #[test]
    fn test_load_rom_exactly_fills_program_area() -> Result<(), Error> {
        let mut m = Memory::new();
        let rom = vec![0xab; Memory::max_rom_len()];
        m.load_rom(&mut rom.as_slice())?;
        assert_eq!(m.read_byte(0x0fff)?, 0xab);
        Ok(())
    }

    #[test]
    fn test_failed_read_leaves_memory_untouched() {
        struct BrokenReader;
        impl io::Read for BrokenReader {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "no rom here"))
            }
        }
        let mut m = Memory::new();
        assert!(matches!(m.load_rom(&mut BrokenReader), Err(Error::Io(_))));
        assert_eq!(m.read(0x200, 16).unwrap(), &[0u8; 16]);
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let m = Memory::new();
        assert!(matches!(
            m.read_word(0x0fff),
            Err(Error::OutOfBounds {
                addr: 0x0fff,
                len: 2
            })
        ));
    }

    #[test]
    fn test_write_past_end_is_all_or_nothing() {
        let mut m = Memory::new();
        assert!(m.write(0x0ffe, &[1, 2, 3]).is_err());
        assert_eq!(m.read(0x0ffe, 2).unwrap(), &[0, 0]);
    }
}

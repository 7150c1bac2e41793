use std::io::{ErrorKind, Read, Result};

use bytemuck::cast_slice;

/// Builds an image file: the origin followed by `words`, all big-endian.
pub fn to_image(origin: u16, words: &[u16]) -> Vec<u8> {
    let be: Vec<u16> = std::iter::once(origin)
        .chain(words.iter().copied())
        .map(u16::to_be)
        .collect();
    cast_slice::<u16, u8>(&be).to_vec()
}

////////////////////////////////////////////////////////////////////////////////

pub trait ReadU16Be {
    // None at end of stream. A dangling odd byte counts as end of stream.
    fn read_u16_be(&mut self) -> Result<Option<u16>>;
}

impl<T: Read> ReadU16Be for T {
    fn read_u16_be(&mut self) -> Result<Option<u16>> {
        let mut buf = [0u8; 2];
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => return Ok(None),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Some(u16::from_be_bytes(buf)))
    }
}

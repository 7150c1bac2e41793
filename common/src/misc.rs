
pub trait SignExtend: Copy {
    /// Treats the low `bit_count` bits as a two's-complement field and widens it to a full word.
    fn sign_extend(self, bit_count: u32) -> u16;
}

impl SignExtend for u16 {
    fn sign_extend(self, bit_count: u32) -> u16 {
        debug_assert!((1..=u16::BITS).contains(&bit_count), "bad field width {bit_count}");
        if bit_count == u16::BITS {
            return self;
        }
        if (self >> (bit_count - 1)) & 0x1 != 0 {
            self | (u16::MAX << bit_count)
        } else {
            self
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

// A panicking version.
pub trait ToU16P {
    fn to_u16p(self) -> u16;
}

impl ToU16P for usize {
    fn to_u16p(self) -> u16 {
        assert!(self <= u16::MAX as Self);
        self as u16
    }
}

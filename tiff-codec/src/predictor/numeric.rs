use crate::sample::ByteOrder;

/// A sample type the horizontal predictor can operate on.
pub(crate) trait Sample: Copy {
    /// The number of bytes of one sample.
    const SIZE: usize;

    /// Read a sample from the start of `bytes`.
    fn read(bytes: &[u8], order: ByteOrder) -> Self;

    /// Write the sample to the start of `bytes`.
    fn write(self, bytes: &mut [u8], order: ByteOrder);

    /// Undo the differencing against the sample of the previous pixel.
    ///
    /// Integers wrap around, floats use plain IEEE addition.
    fn accumulate(self, previous: Self) -> Self;
}

macro_rules! sample {
    ($ty:ty, |$delta:ident, $previous:ident| $add:expr) => {
        impl Sample for $ty {
            const SIZE: usize = size_of::<$ty>();

            #[inline(always)]
            fn read(bytes: &[u8], order: ByteOrder) -> Self {
                let mut raw = [0; size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::SIZE]);

                match order {
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                }
            }

            #[inline(always)]
            fn write(self, bytes: &mut [u8], order: ByteOrder) {
                let raw = match order {
                    ByteOrder::LittleEndian => self.to_le_bytes(),
                    ByteOrder::BigEndian => self.to_be_bytes(),
                };

                bytes[..Self::SIZE].copy_from_slice(&raw);
            }

            #[inline(always)]
            fn accumulate(self, previous: Self) -> Self {
                let ($delta, $previous) = (self, previous);
                $add
            }
        }
    };
}

sample!(u8, |delta, previous| delta.wrapping_add(previous));
sample!(u16, |delta, previous| delta.wrapping_add(previous));
sample!(u32, |delta, previous| delta.wrapping_add(previous));
sample!(u64, |delta, previous| delta.wrapping_add(previous));
sample!(f32, |delta, previous| delta + previous);
sample!(f64, |delta, previous| delta + previous);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let bytes = [0x12, 0x34];
        assert_eq!(u16::read(&bytes, ByteOrder::LittleEndian), 0x3412);
        assert_eq!(u16::read(&bytes, ByteOrder::BigEndian), 0x1234);

        let mut out = [0; 4];
        0x0102_0304_u32.write(&mut out, ByteOrder::BigEndian);
        assert_eq!(out, [1, 2, 3, 4]);
        0x0102_0304_u32.write(&mut out, ByteOrder::LittleEndian);
        assert_eq!(out, [4, 3, 2, 1]);
    }

    #[test]
    fn test_integers_wrap() {
        assert_eq!(200_u8.accumulate(100), 44);
        assert_eq!(u16::MAX.accumulate(2), 1);
        assert_eq!(u32::MAX.accumulate(u32::MAX), u32::MAX - 1);
        assert_eq!(1_u64.accumulate(u64::MAX), 0);
    }

    #[test]
    fn test_floats_accumulate() {
        assert_eq!(1.5_f32.accumulate(-0.25), 1.25);
        assert_eq!((-2.0_f64).accumulate(0.5), -1.5);
        assert_eq!(f64::MAX.accumulate(f64::MAX), f64::INFINITY);
    }
}

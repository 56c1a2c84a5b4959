//! The [`Layout`] trait and its implementations for primitive types.
//!
//! ```text
//! u8 / u16 / u32 / u64 / i64   little-endian, fixed width
//! f64                          IEEE-754 bits, little-endian
//! bool                         one byte, 0 or 1
//! [T; N]                       N elements back to back, no prefix
//! Option<T>                    presence byte (0 | 1), then T when 1
//! Vec<T>                       u32 LE element count, then elements
//! enum                         u8 ordinal in declaration order, then fields
//! ```

use crate::error::LayoutError;
use crate::reader::Reader;
use crate::writer::Writer;

/// Scratch size used by [`encode_to_vec`]. Instruction payloads of the
/// programs this crate targets stay well below it.
pub const SCRATCH_LEN: usize = 1000;

/// A type with a byte-exact binary layout.
pub trait Layout: Sized {
    /// Exact encoded size when every value of the type encodes to the same
    /// number of bytes, `None` for variable-size layouts.
    const SPAN: Option<usize>;

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError>;

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError>;

    /// Decode a value from the start of `data`. Trailing bytes are ignored.
    fn decode(data: &[u8]) -> Result<Self, LayoutError> {
        if let Some(span) = Self::SPAN {
            if data.len() < span {
                return Err(LayoutError::BufferTooShort {
                    needed: span,
                    available: data.len(),
                });
            }
        }
        Self::decode_from(&mut Reader::new(data))
    }

    /// Encode into the front of `buf`, returning the number of bytes written.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, LayoutError> {
        let mut writer = Writer::new(buf);
        self.encode_into(&mut writer)?;
        Ok(writer.len())
    }
}

/// Encode into a [`SCRATCH_LEN`] scratch buffer and keep only the bytes
/// actually written.
pub fn encode_to_vec<T: Layout>(value: &T) -> Result<Vec<u8>, LayoutError> {
    let mut scratch = vec![0u8; SCRATCH_LEN];
    let len = value.encode(&mut scratch)?;
    scratch.truncate(len);
    Ok(scratch)
}

/// Sum of field spans, `None` as soon as one field is variable-size.
pub const fn sum_spans(spans: &[Option<usize>]) -> Option<usize> {
    let mut total = 0;
    let mut i = 0;
    while i < spans.len() {
        match spans[i] {
            Some(span) => total += span,
            None => return None,
        }
        i += 1;
    }
    Some(total)
}

/// Implement [`Layout`] for a struct by laying its fields out in the order
/// given.
///
/// ```ignore
/// impl_struct_layout!(Reward<N: RewardAmount> {
///     mint: Pubkey,
///     reserved: N,
///     available: N,
/// });
/// ```
#[macro_export]
macro_rules! impl_struct_layout {
    ($name:ident $(< $($param:ident : $bound:path),+ >)? {
        $($field:ident : $ty:ty),+ $(,)?
    }) => {
        impl $(< $($param: $bound),+ >)? $crate::Layout for $name $(< $($param),+ >)? {
            const SPAN: Option<usize> =
                $crate::sum_spans(&[$(<$ty as $crate::Layout>::SPAN),+]);

            fn decode_from(
                reader: &mut $crate::Reader<'_>,
            ) -> Result<Self, $crate::LayoutError> {
                Ok(Self {
                    $($field: <$ty as $crate::Layout>::decode_from(reader)?),+
                })
            }

            fn encode_into(
                &self,
                writer: &mut $crate::Writer<'_>,
            ) -> Result<(), $crate::LayoutError> {
                $($crate::Layout::encode_into(&self.$field, writer)?;)+
                Ok(())
            }
        }
    };
}

macro_rules! impl_le_number {
    ($($ty:ty),+) => {
        $(
            impl Layout for $ty {
                const SPAN: Option<usize> = Some(std::mem::size_of::<$ty>());

                fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
                    Ok(<$ty>::from_le_bytes(reader.read_array()?))
                }

                fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
                    writer.write_bytes(&self.to_le_bytes())
                }
            }
        )+
    };
}

impl_le_number!(u8, u16, u32, u64, i64, f64);

impl Layout for bool {
    const SPAN: Option<usize> = Some(1);

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(LayoutError::InvalidBool(other)),
        }
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        writer.write_u8(u8::from(*self))
    }
}

impl<T: Layout, const N: usize> Layout for [T; N] {
    const SPAN: Option<usize> = match T::SPAN {
        Some(span) => Some(span * N),
        None => None,
    };

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode_from(reader)?);
        }
        items.try_into().map_err(|v: Vec<T>| LayoutError::BufferTooShort {
            needed: N,
            available: v.len(),
        })
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        for item in self {
            item.encode_into(writer)?;
        }
        Ok(())
    }
}

impl<T: Layout> Layout for Option<T> {
    const SPAN: Option<usize> = None;

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode_from(reader)?)),
            flag => Err(LayoutError::InvalidOptionFlag(flag)),
        }
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        match self {
            None => writer.write_u8(0),
            Some(inner) => {
                writer.write_u8(1)?;
                inner.encode_into(writer)
            }
        }
    }
}

impl<T: Layout> Layout for Vec<T> {
    const SPAN: Option<usize> = None;

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, LayoutError> {
        let len = u32::decode_from(reader)? as usize;

        // Refuse counts the remaining input cannot possibly hold before
        // allocating for them.
        let min_element = T::SPAN.unwrap_or(1).max(1);
        if len.saturating_mul(min_element) > reader.remaining() {
            return Err(LayoutError::BufferTooShort {
                needed: reader.offset() + len.saturating_mul(min_element),
                available: reader.offset() + reader.remaining(),
            });
        }

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode_from(reader)?);
        }
        Ok(items)
    }

    fn encode_into(&self, writer: &mut Writer<'_>) -> Result<(), LayoutError> {
        let len = u32::try_from(self.len()).map_err(|_| LayoutError::LengthOverflow(self.len()))?;
        len.encode_into(writer)?;
        for item in self {
            item.encode_into(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pair<T> {
        tag: u8,
        value: T,
        end: Option<u64>,
    }

    trait Marker: Layout + Clone {}
    impl Marker for u64 {}
    impl Marker for f64 {}

    impl_struct_layout!(Pair<T: Marker> {
        tag: u8,
        value: T,
        end: Option<u64>,
    });

    #[derive(Debug, Clone, PartialEq)]
    struct Fixed {
        key: [u8; 32],
        amount: u64,
        bump: [u8; 1],
    }

    impl_struct_layout!(Fixed {
        key: [u8; 32],
        amount: u64,
        bump: [u8; 1],
    });

    // -- Primitives ---------------------------------------------------------

    #[test]
    fn u64_is_little_endian() {
        let bytes = encode_to_vec(&0x0102_0304_0506_0708u64).unwrap();
        assert_eq!(bytes, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn f64_uses_ieee_bits() {
        let bytes = encode_to_vec(&1.5f64).unwrap();
        assert_eq!(bytes, 1.5f64.to_le_bytes());
        assert_eq!(f64::decode(&bytes).unwrap(), 1.5);
    }

    #[test]
    fn u64_decode_short_buffer_fails() {
        let err = u64::decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::BufferTooShort {
                needed: 8,
                available: 3
            }
        );
    }

    #[test]
    fn bool_rejects_other_bytes() {
        assert_eq!(bool::decode(&[2]).unwrap_err(), LayoutError::InvalidBool(2));
        assert!(bool::decode(&[1]).unwrap());
    }

    // -- Option -------------------------------------------------------------

    #[test]
    fn option_none_consumes_only_the_flag() {
        // The bytes after the flag are garbage and too short for a u64; they
        // must not be interpreted.
        let data = [0u8, 0xff, 0xff];
        let mut reader = Reader::new(&data);
        let value = Option::<u64>::decode_from(&mut reader).unwrap();
        assert_eq!(value, None);
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn option_some_requires_inner_span() {
        let data = [1u8, 1, 2, 3];
        let err = Option::<u64>::decode(&data).unwrap_err();
        assert!(matches!(err, LayoutError::BufferTooShort { .. }));
    }

    #[test]
    fn option_some_decodes_inner() {
        let mut data = vec![1u8];
        data.extend_from_slice(&42u64.to_le_bytes());
        assert_eq!(Option::<u64>::decode(&data).unwrap(), Some(42));
    }

    #[test]
    fn option_rejects_invalid_flag() {
        assert_eq!(
            Option::<u8>::decode(&[2, 0]).unwrap_err(),
            LayoutError::InvalidOptionFlag(2)
        );
    }

    // -- Vec ----------------------------------------------------------------

    #[test]
    fn vec_has_u32_length_prefix() {
        let bytes = encode_to_vec(&vec![7u8, 8, 9]).unwrap();
        assert_eq!(bytes, [3, 0, 0, 0, 7, 8, 9]);
        assert_eq!(Vec::<u8>::decode(&bytes).unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn vec_with_impossible_length_fails_before_allocating() {
        // Claims u32::MAX u64 elements with only four bytes left.
        let data = [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0];
        let err = Vec::<u64>::decode(&data).unwrap_err();
        assert!(matches!(err, LayoutError::BufferTooShort { .. }));
    }

    // -- Structs ------------------------------------------------------------

    #[test]
    fn struct_span_is_sum_of_fields() {
        assert_eq!(Fixed::SPAN, Some(32 + 8 + 1));
        assert_eq!(<Pair<u64> as Layout>::SPAN, None);
    }

    #[test]
    fn struct_decode_shorter_than_span_fails() {
        let err = Fixed::decode(&[0u8; 40]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::BufferTooShort {
                needed: 41,
                available: 40
            }
        );
    }

    #[test]
    fn struct_fields_follow_declaration_order() {
        let value = Fixed {
            key: [0xAA; 32],
            amount: 5,
            bump: [254],
        };
        let bytes = encode_to_vec(&value).unwrap();
        assert_eq!(bytes.len(), 41);
        assert_eq!(&bytes[..32], &[0xAA; 32]);
        assert_eq!(&bytes[32..40], &5u64.to_le_bytes());
        assert_eq!(bytes[40], 254);
        assert_eq!(Fixed::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn generic_struct_decodes_each_width() {
        let ints = Pair {
            tag: 1,
            value: 9u64,
            end: Some(3),
        };
        let floats = Pair {
            tag: 1,
            value: 0.25f64,
            end: None,
        };
        assert_eq!(Pair::<u64>::decode(&encode_to_vec(&ints).unwrap()).unwrap(), ints);
        assert_eq!(
            Pair::<f64>::decode(&encode_to_vec(&floats).unwrap()).unwrap(),
            floats
        );
    }

    // -- Scratch buffer -----------------------------------------------------

    #[test]
    fn encode_reports_written_length() {
        let mut buf = [0u8; 64];
        let len = 7u32.encode(&mut buf).unwrap();
        assert_eq!(len, 4);
    }

    #[test]
    fn encode_to_vec_rejects_payloads_past_scratch() {
        let big = vec![0u64; SCRATCH_LEN / 8];
        let err = encode_to_vec(&big).unwrap_err();
        assert!(matches!(err, LayoutError::BufferOverflow { .. }));
    }

    #[test]
    fn sum_spans_stops_at_variable_field() {
        assert_eq!(sum_spans(&[Some(1), Some(8)]), Some(9));
        assert_eq!(sum_spans(&[Some(1), None, Some(8)]), None);
        assert_eq!(sum_spans(&[]), Some(0));
    }
}

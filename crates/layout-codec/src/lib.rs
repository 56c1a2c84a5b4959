//! # layout-codec
//!
//! Fixed-layout binary encoding in the Borsh conventions used by on-chain
//! programs: little-endian integers, a presence byte in front of optional
//! values, a u32 length prefix on vectors and a one-byte tag on enums.
//!
//! Layouts are described by implementing [`Layout`] on plain Rust types.
//! Structs compose their fields in declaration order with
//! [`impl_struct_layout!`]; tagged unions read their ordinal with
//! [`Reader::read_variant`].

pub mod error;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::LayoutError;
pub use layout::{encode_to_vec, sum_spans, Layout, SCRATCH_LEN};
pub use reader::Reader;
pub use writer::Writer;

//! Grow, frame, and decode binary packets.
//!
//! # Overview
//!
//! A [`Packet`] is a single contiguous, growable buffer that serializes
//! numbers, booleans, strings, and raw byte blocks behind a fixed-width size
//! header. Fields are read back in append order from one cursor.
//!
//! # Layout
//!
//! Everything a reader needs to agree on is fixed at compile time by a
//! [`Layout`]: byte order, size field width, whether the header counts itself,
//! and the allocation granularity. Presets cover the common cases
//! ([`Standard`], [`Network`], [`Counted`], [`HttpBody`]).
//!
//! # Example
//!
//! ```
//! use galileo_packet::{Packet, Standard};
//!
//! let mut packet = Packet::<Standard>::new();
//! packet.append_number(300u32).unwrap();
//! packet.append_string("hi").unwrap();
//! assert_eq!(packet.size(), 10);
//!
//! assert_eq!(packet.read_number::<u32>().unwrap(), 300);
//! assert_eq!(packet.read_string().unwrap(), "hi");
//!
//! // Nothing left: the read fails and the cursor stays put.
//! let cursor = packet.cursor();
//! assert!(packet.read_number::<u32>().unwrap_err().is_truncated());
//! assert_eq!(packet.cursor(), cursor);
//! ```
//!
//! # Streaming
//!
//! Reads that run out of data fail with [`Error::TruncatedRead`] without
//! consuming anything, so a parser can retry the same read once more bytes
//! have been appended. Complete frames received from elsewhere can be checked
//! with [`frame::frame_len`] and loaded with [`Packet::from_frame`].

pub mod config;
pub mod endian;
pub mod error;
pub mod frame;
pub mod io;
pub mod number;
pub mod packet;

pub use config::{Counted, HttpBody, Layout, Network, RangeCfg, Standard};
pub use endian::{swap_bytes, BigEndian, ByteOrder, LittleEndian, NativeEndian};
pub use error::Error;
pub use io::Body;
pub use number::{Number, SizeField};
pub use packet::Packet;

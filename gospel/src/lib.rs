//! Byte-level cursors for reading and writing binary formats.
//!
//! [`read::Reader`] walks a borrowed slice; [`write::Writer`] builds an owned buffer in which
//! some fields can be left blank and filled in once the positions they depend on are known.

pub mod read;
pub mod write;

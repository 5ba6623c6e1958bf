//! Procyon Digital Sound Element containers (`.swd`, `.smd`, `.sed`).

pub mod chunk;
pub mod convert;
pub mod record;
pub mod meta;
pub mod event;

pub use chunk::{find_next_chunk, ChunkHeader, ChunkId, ChunkIndex, SENTINEL_LEN};
pub use convert::NotImplemented;
pub use meta::{DseMeta, MetaCommon, MetaKind};
pub use record::{DateTime, SampleFormat, SongChunk, WavInfo};

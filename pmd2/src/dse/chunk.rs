use std::collections::HashMap;

use gospel::read::{Reader, Le as _};
use gospel::write::{Writer, Le as _};

/// `datlen` value of chunks whose length field is meaningless.
pub const SENTINEL_LEN: u32 = 0xFFFFFFB0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(num_enum::FromPrimitive, num_enum::IntoPrimitive)]
#[repr(u32)]
pub enum ChunkId {
	Wavi = 0x77617669, // "wavi"
	Prgi = 0x70726769, // "prgi"
	Kgrp = 0x6B677270, // "kgrp"
	Pcmd = 0x70636D64, // "pcmd"
	Song = 0x736F6E67, // "song"
	Trk  = 0x74726B20, // "trk "
	Seq  = 0x73657120, // "seq "
	Bnkl = 0x626E6B6C, // "bnkl"
	Mcrl = 0x6D63726C, // "mcrl"
	Eoc  = 0x656F6320, // "eoc "
	Eod  = 0x656F6420, // "eod "
	#[num_enum(default)]
	Invalid = 0,
}

impl ChunkId {
	pub const ALL: [ChunkId; 11] = [
		ChunkId::Wavi, ChunkId::Prgi, ChunkId::Kgrp, ChunkId::Pcmd,
		ChunkId::Song, ChunkId::Trk, ChunkId::Seq, ChunkId::Bnkl,
		ChunkId::Mcrl, ChunkId::Eoc, ChunkId::Eod,
	];

	pub fn tag(self) -> [u8; 4] {
		u32::from(self).to_be_bytes()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
	/// Chunk tag, stored big-endian so it reads as ASCII.
	pub label: u32,
	pub param1: u32,
	pub param2: u32,
	pub datlen: u32,
}

impl ChunkHeader {
	pub const SIZE: usize = 16;
	pub const DATLEN_OFFSET: usize = 12;

	pub fn chunk_id(&self) -> ChunkId {
		ChunkId::from(self.label)
	}

	pub fn has_length(&self) -> bool {
		self.datlen != SENTINEL_LEN
	}

	pub fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(ChunkHeader {
			label: f.u32_be()?,
			param1: f.u32()?,
			param2: f.u32()?,
			datlen: f.u32()?,
		})
	}

	pub fn write(&self, f: &mut Writer) {
		f.u32_be(self.label);
		f.u32(self.param1);
		f.u32(self.param2);
		f.u32(self.datlen);
	}
}

/// Known chunk IDs, keyed by the first byte of their tag.
///
/// Build one and share it; it never changes after construction.
#[derive(Debug, Clone)]
pub struct ChunkIndex {
	by_high_byte: HashMap<u8, Vec<ChunkId>>,
}

impl Default for ChunkIndex {
	fn default() -> Self {
		Self::new()
	}
}

impl ChunkIndex {
	pub fn new() -> Self {
		let mut by_high_byte = HashMap::<u8, Vec<ChunkId>>::new();
		for id in ChunkId::ALL {
			by_high_byte.entry(id.tag()[0]).or_default().push(id);
		}
		ChunkIndex { by_high_byte }
	}

	pub fn candidates(&self, high_byte: u8) -> &[ChunkId] {
		self.by_high_byte.get(&high_byte).map_or(&[], Vec::as_slice)
	}
}

fn u32_at(data: &[u8], pos: usize, big_endian: bool) -> Option<u32> {
	let bytes = data.get(pos..pos.checked_add(4)?)?.try_into().ok()?;
	Some(if big_endian { u32::from_be_bytes(bytes) } else { u32::from_le_bytes(bytes) })
}

/// Finds the next chunk with id `wanted` at or after `start`, which must be 4-byte aligned.
///
/// Other known chunks found on the way are skipped over whole, unless their length is
/// [`SENTINEL_LEN`], in which case only their header is skipped. Returns `data.len()` if there
/// is no such chunk.
pub fn find_next_chunk(index: &ChunkIndex, data: &[u8], start: usize, wanted: ChunkId) -> usize {
	let end = data.len();
	let mut pos = start;
	while pos < end {
		let mut skip = 4;
		for &candidate in index.candidates(data[pos]) {
			let Some(label) = u32_at(data, pos, true) else { break };
			if label == u32::from(wanted) && wanted != ChunkId::Invalid {
				return pos
			}
			if label == u32::from(candidate) {
				skip = match u32_at(data, pos + ChunkHeader::DATLEN_OFFSET, false) {
					Some(SENTINEL_LEN) => ChunkHeader::SIZE,
					Some(len) => ChunkHeader::SIZE.saturating_add(len as usize),
					None => end - pos,
				};
				break
			}
		}
		// Keep the scan on the 4-byte grid even after skipping an odd-sized body.
		skip = skip.saturating_add(3) & !3;
		pos = pos.saturating_add(skip).min(end);
	}
	end
}

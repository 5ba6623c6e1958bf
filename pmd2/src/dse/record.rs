use gospel::read::{Reader, Le as _};
use gospel::write::{Writer, Le as _};
use crate::util::*;

use super::chunk::ChunkId;

/// Timestamp found in every DSE file header.
///
/// `day` counts from zero. `centsec` is probably hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DateTime {
	pub year: u16,
	pub month: u8,
	pub day: u8,
	pub hour: u8,
	pub minute: u8,
	pub second: u8,
	pub centsec: u8,
}

impl DateTime {
	pub const SIZE: usize = 8;

	pub fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(DateTime {
			year: f.u16()?,
			month: f.u8()?,
			day: f.u8()?,
			hour: f.u8()?,
			minute: f.u8()?,
			second: f.u8()?,
			centsec: f.u8()?,
		})
	}

	pub fn write(&self, f: &mut Writer) {
		f.u16(self.year);
		f.u8(self.month);
		f.u8(self.day);
		f.u8(self.hour);
		f.u8(self.minute);
		f.u8(self.second);
		f.u8(self.centsec);
	}
}

impl std::fmt::Display for DateTime {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}/{}-{}h{}m{}s", self.year, self.month, self.day, self.hour, self.minute, self.second)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[repr(u16)]
pub enum SampleFormat {
	Pcm8 = 0x000,
	Pcm16 = 0x100,
	ImaAdpcm = 0x200,
	Psg = 0x300,
}

/// Sample descriptor from a `wavi` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WavInfo {
	pub unk1: u16,
	pub id: u16,
	/// Pitch offset from the root key, in 1/250 semitone.
	pub pitch_offset: i16,
	pub root_key: i16,
	pub unk4: u16,
	pub unk5: u16,
	pub unk6: u16,
	pub unk7: u16,
	pub version: u16,
	/// See [`SampleFormat`]; kept raw so unknown values survive.
	pub smplfmt: u16,
	pub unk9: u8,
	pub unk14: u8,
	pub unk10: u16,
	pub unk11: u16,
	pub unk12: u16,
	pub unk13: u32,
	pub sample_rate: u32,
	/// Offset of the sample data within the `pcmd` chunk.
	pub sample_pos: u32,
	/// In 32-bit units of the decoded PCM16 stream.
	pub loop_begin: u32,
	pub loop_len: u32,
	pub unk17: u8,
	pub unk18: u8,
	pub unk19: u8,
	pub unk20: u8,
	pub unk21: u16,
	pub unk22: u16,
	pub unk23: u16,
	pub unk24: u16,
	pub unk25: u16,
	pub unk26: u16,
}

impl WavInfo {
	pub const SIZE: usize = 64;

	pub fn sample_format(&self) -> Option<SampleFormat> {
		SampleFormat::try_from(self.smplfmt).ok()
	}

	pub fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(WavInfo {
			unk1: f.u16()?,
			id: f.u16()?,
			pitch_offset: f.i16()?,
			root_key: f.i16()?,
			unk4: f.u16()?,
			unk5: f.u16()?,
			unk6: f.u16()?,
			unk7: f.u16()?,
			version: f.u16()?,
			smplfmt: f.u16()?,
			unk9: f.u8()?,
			unk14: f.u8()?,
			unk10: f.u16()?,
			unk11: f.u16()?,
			unk12: f.u16()?,
			unk13: f.u32()?,
			sample_rate: f.u32()?,
			sample_pos: f.u32()?,
			loop_begin: f.u32()?,
			loop_len: f.u32()?,
			unk17: f.u8()?,
			unk18: f.u8()?,
			unk19: f.u8()?,
			unk20: f.u8()?,
			unk21: f.u16()?,
			unk22: f.u16()?,
			unk23: f.u16()?,
			unk24: f.u16()?,
			unk25: f.u16()?,
			unk26: f.u16()?,
		})
	}

	pub fn write(&self, f: &mut Writer) {
		f.u16(self.unk1);
		f.u16(self.id);
		f.i16(self.pitch_offset);
		f.i16(self.root_key);
		f.u16(self.unk4);
		f.u16(self.unk5);
		f.u16(self.unk6);
		f.u16(self.unk7);
		f.u16(self.version);
		f.u16(self.smplfmt);
		f.u8(self.unk9);
		f.u8(self.unk14);
		f.u16(self.unk10);
		f.u16(self.unk11);
		f.u16(self.unk12);
		f.u32(self.unk13);
		f.u32(self.sample_rate);
		f.u32(self.sample_pos);
		f.u32(self.loop_begin);
		f.u32(self.loop_len);
		f.u8(self.unk17);
		f.u8(self.unk18);
		f.u8(self.unk19);
		f.u8(self.unk20);
		f.u16(self.unk21);
		f.u16(self.unk22);
		f.u16(self.unk23);
		f.u16(self.unk24);
		f.u16(self.unk25);
		f.u16(self.unk26);
	}
}

/// The `song` chunk at the start of a sequence file.
///
/// Only the track and channel counts are known to vary between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongChunk {
	pub unk1: u32,
	pub unk2: u32,
	pub unk3: u32,
	pub unk4: u32,
	pub unk5: u16,
	pub nb_tracks: u8,
	pub nb_channels: u8,
	pub unk6: u32,
	pub unk7: u32,
	pub unk8: u32,
	pub unk9: u32,
	pub unk10: u16,
	pub unk11: u16,
	pub unk12: u32,
	/// Number of `0xFF` bytes following the chunk.
	pub padding: u8,
}

impl SongChunk {
	pub const SIZE: usize = 48;
	pub const MAX_PADDING: usize = 16;

	pub fn size(&self) -> usize {
		Self::SIZE + self.padding as usize
	}

	pub fn read(f: &mut Reader) -> Result<Self, ReadError> {
		let label = f.u32_be()?;
		ensure!(label == u32::from(ChunkId::Song), "expected song chunk, got {label:#010X}");
		let mut song = SongChunk {
			unk1: f.u32()?,
			unk2: f.u32()?,
			unk3: f.u32()?,
			unk4: f.u32()?,
			unk5: f.u16()?,
			nb_tracks: f.u8()?,
			nb_channels: f.u8()?,
			unk6: f.u32()?,
			unk7: f.u32()?,
			unk8: f.u32()?,
			unk9: f.u32()?,
			unk10: f.u16()?,
			unk11: f.u16()?,
			unk12: f.u32()?,
			padding: 0,
		};
		let pad = f.remaining().iter()
			.take(Self::MAX_PADDING)
			.take_while(|&&b| b == 0xFF)
			.count();
		f.slice(pad)?;
		song.padding = cast(pad)?;
		Ok(song)
	}

	pub fn write(&self, f: &mut Writer) -> Result<(), WriteError> {
		ensure!(self.padding as usize <= Self::MAX_PADDING, "song chunk padding {} too long", self.padding);
		f.u32_be(ChunkId::Song.into());
		f.u32(self.unk1);
		f.u32(self.unk2);
		f.u32(self.unk3);
		f.u32(self.unk4);
		f.u16(self.unk5);
		f.u8(self.nb_tracks);
		f.u8(self.nb_channels);
		f.u32(self.unk6);
		f.u32(self.unk7);
		f.u32(self.unk8);
		f.u32(self.unk9);
		f.u16(self.unk10);
		f.u16(self.unk11);
		f.u32(self.unk12);
		f.slice(&[0xFF; Self::MAX_PADDING][..self.padding as usize]);
		Ok(())
	}
}

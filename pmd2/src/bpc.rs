//! Map background tilesets (`.bpc`).
//!
//! Only the container is handled: each layer's tiles and tile mappings are kept compressed.

use gospel::read::{Reader, Le as _};
use gospel::write::{Label, Writer, Le as _};
use crate::util::*;

const HEADER_SIZE: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerInfo {
	/// Number of 8×8 4bpp tiles.
	pub nbtiles: u16,
	pub unk2: u16,
	pub unk3: u16,
	pub unk4: u16,
	pub unk5: u16,
	/// Decompressed size of the tile mapping that follows the tiles.
	pub tmapdeclen: u16,
}

impl LayerInfo {
	fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(LayerInfo {
			nbtiles: f.u16()?,
			unk2: f.u16()?,
			unk3: f.u16()?,
			unk4: f.u16()?,
			unk5: f.u16()?,
			tmapdeclen: f.u16()?,
		})
	}

	fn write(&self, f: &mut Writer) {
		f.u16(self.nbtiles);
		f.u16(self.unk2);
		f.u16(self.unk3);
		f.u16(self.unk4);
		f.u16(self.unk5);
		f.u16(self.tmapdeclen);
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layer {
	pub info: LayerInfo,
	pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bpc {
	pub upper: Layer,
	pub lower: Option<Layer>,
}

#[tracing::instrument(skip_all)]
pub fn read(data: &[u8]) -> Result<Bpc, ReadError> {
	let mut f = Reader::new(data);
	let upper_start = f.u16()? as usize;
	let lower_start = f.u16()? as usize;
	let upper_info = LayerInfo::read(&mut f)?;
	let lower_info = LayerInfo::read(&mut f)?;

	let upper_end = if lower_start == 0 { data.len() } else { lower_start };
	ensure!(
		(HEADER_SIZE..=upper_end).contains(&upper_start) && upper_end <= data.len(),
		"bad layer offsets {upper_start:#X}, {lower_start:#X} in {:#X} bytes", data.len(),
	);
	let upper = Layer {
		info: upper_info,
		data: data[upper_start..upper_end].to_owned(),
	};

	let lower = if lower_start == 0 {
		if lower_info != LayerInfo::default() {
			tracing::warn!(?lower_info, "ignoring info for missing lower layer");
		}
		None
	} else {
		Some(Layer {
			info: lower_info,
			data: data[lower_start..].to_owned(),
		})
	};

	Ok(Bpc { upper, lower })
}

#[tracing::instrument(skip_all)]
pub fn write(bpc: &Bpc) -> Result<Vec<u8>, WriteError> {
	let mut f = Writer::new();
	let upper = Label::new();
	let lower = Label::new();
	f.delay16_le(upper);
	match bpc.lower {
		Some(_) => f.delay16_le(lower),
		None => f.u16(0),
	}
	bpc.upper.info.write(&mut f);
	bpc.lower.as_ref().map(|l| l.info).unwrap_or_default().write(&mut f);

	f.label(upper);
	f.slice(&bpc.upper.data);
	if let Some(l) = &bpc.lower {
		f.label(lower);
		f.slice(&l.data);
	}
	Ok(f.finish()?)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::util::test::*;

	fn info(n: u16) -> LayerInfo {
		LayerInfo { nbtiles: n, unk2: 1, unk3: 2, unk4: 3, unk5: 4, tmapdeclen: n * 2 }
	}

	#[test]
	fn both_layers() -> Result<(), Error> {
		let bpc = Bpc {
			upper: Layer { info: info(10), data: vec![1, 2, 3] },
			lower: Some(Layer { info: info(20), data: vec![4, 5] }),
		};
		let data = write(&bpc)?;
		assert_eq!(&data[..4], &[28, 0, 31, 0]);
		assert_eq!(data.len(), 33);
		let bpc2 = check_roundtrip_strict(&data, read, write)?;
		check_equal(&bpc, &bpc2)?;
		Ok(())
	}

	#[test]
	fn upper_only() -> Result<(), Error> {
		let bpc = Bpc {
			upper: Layer { info: info(3), data: vec![9; 6] },
			lower: None,
		};
		let data = write(&bpc)?;
		assert_eq!(&data[..4], &[28, 0, 0, 0]);
		assert_eq!(&data[16..28], &[0; 12]);
		check_equal(&read(&data)?, &bpc)?;
		Ok(())
	}

	#[test]
	fn bad_offsets() {
		let mut data = vec![0; HEADER_SIZE];
		data[0] = 4;
		assert!(read(&data).is_err());
		data[0] = 28;
		data[2] = 40;
		assert!(read(&data).is_err());
		assert!(read(&data[..10]).is_err());
	}
}

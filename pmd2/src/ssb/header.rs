use gospel::read::{Reader, Le as _};
use gospel::write::{Writer, Label, Le as _};
use pmd2_common::util::WriterExt;
use crate::types::Region;
use crate::util::*;

/// Fields common to every region's file header. Lengths are in words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHeader {
	pub const_count: u16,
	pub string_count: u16,
	/// Data block plus the constant pointer table.
	pub script_len: u16,
	/// Constant string data, without its pointer table.
	pub const_len: u16,
	/// One block per language, each including its pointer table.
	pub string_lens: Vec<u16>,
	pub unk1: u16,
}

impl ScriptHeader {
	pub fn size(region: Region) -> usize {
		match region {
			Region::NorthAmerica | Region::Japan => 12,
			Region::Europe => 18,
		}
	}

	pub fn read(f: &mut Reader, region: Region) -> Result<Self, gospel::read::Error> {
		let const_count = f.u16()?;
		let string_count = f.u16()?;
		let script_len = f.u16()?;
		let const_len = f.u16()?;
		let (string_lens, unk1) = match region {
			Region::NorthAmerica | Region::Japan => {
				let len = f.u16()?;
				(vec![len], f.u16()?)
			}
			Region::Europe => (list(5, || f.u16())?, 0),
		};
		Ok(ScriptHeader { const_count, string_count, script_len, const_len, string_lens, unk1 })
	}

	/// Byte offset of the first string pointer table, `header_len` being [`size`](Self::size).
	pub fn string_start(&self, header_len: usize) -> usize {
		header_len + self.script_len as usize * 2 + self.const_len as usize * 2
	}
}

/// Labels delimiting the spans whose lengths go into a [`ScriptHeader`].
///
/// The script span ends where the constant string data starts.
#[derive(Debug, Clone)]
pub struct HeaderSpans {
	pub data_start: Label,
	pub const_data: (Label, Label),
	pub strings: Vec<(Label, Label)>,
}

impl HeaderSpans {
	pub fn new(region: Region) -> Self {
		HeaderSpans {
			data_start: Label::new(),
			const_data: (Label::new(), Label::new()),
			strings: region.languages().iter().map(|_| (Label::new(), Label::new())).collect(),
		}
	}
}

/// Writes a header whose length fields are filled in from `spans` when `f` is finished.
pub fn write_header(
	f: &mut Writer,
	region: Region,
	const_count: usize,
	string_count: usize,
	unk1: u16,
	spans: &HeaderSpans,
) -> Result<(), WriteError> {
	ensure!(spans.strings.len() == region.languages().len(), "expected {} string blocks", region.languages().len());
	ensure!(region != Region::Europe || unk1 == 0, "European headers have no room for unk1 {unk1:#X}");
	f.u16(cast(const_count)?);
	f.u16(cast(string_count)?);
	f.delay_words(spans.data_start, spans.const_data.0);
	f.delay_words(spans.const_data.0, spans.const_data.1);
	for &(start, end) in &spans.strings {
		f.delay_words(start, end);
	}
	if region != Region::Europe {
		f.u16(unk1);
	}
	Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataHeader {
	/// Words of data header, group table and code.
	pub data_len: u16,
	pub group_count: u16,
}

impl DataHeader {
	pub const SIZE: usize = 4;

	pub fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(DataHeader {
			data_len: f.u16()?,
			group_count: f.u16()?,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupEntry {
	/// Word offset from the start of the data block.
	pub start: u16,
	pub kind: u16,
	pub unk2: u16,
}

impl GroupEntry {
	pub const SIZE: usize = 6;

	pub fn read(f: &mut Reader) -> Result<Self, gospel::read::Error> {
		Ok(GroupEntry {
			start: f.u16()?,
			kind: f.u16()?,
			unk2: f.u16()?,
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use test_case::test_case;

	#[test_case(Region::NorthAmerica, &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0], &[5], 6; "na")]
	#[test_case(Region::Japan, &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0], &[5], 6; "jp")]
	#[test_case(Region::Europe, &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8, 0, 9, 0], &[5, 6, 7, 8, 9], 0; "eu")]
	fn read_header(region: Region, data: &[u8], lens: &[u16], unk1: u16) -> Result<(), ReadError> {
		let mut f = Reader::new(data);
		let h = ScriptHeader::read(&mut f, region)?;
		assert_eq!(f.pos(), ScriptHeader::size(region));
		assert_eq!((h.const_count, h.string_count, h.script_len, h.const_len), (1, 2, 3, 4));
		assert_eq!(h.string_lens, lens);
		assert_eq!(h.unk1, unk1);
		assert_eq!(h.string_start(f.pos()), f.pos() + 6 + 8);
		Ok(())
	}

	#[test]
	fn written_header_resolves_spans() -> Result<(), WriteError> {
		let spans = HeaderSpans::new(Region::NorthAmerica);
		let mut f = Writer::new();
		write_header(&mut f, Region::NorthAmerica, 1, 2, 7, &spans)?;
		f.label(spans.data_start);
		f.u32(0);
		f.label(spans.const_data.0);
		f.u16(0);
		f.label(spans.const_data.1);
		f.label(spans.strings[0].0);
		f.label(spans.strings[0].1);
		let data = f.finish()?;
		assert_eq!(&data[..12], &[1, 0, 2, 0, 2, 0, 1, 0, 0, 0, 7, 0]);
		Ok(())
	}

	#[test]
	fn span_count_must_match_region() {
		let spans = HeaderSpans::new(Region::NorthAmerica);
		assert!(write_header(&mut Writer::new(), Region::Europe, 0, 0, 0, &spans).is_err());
	}

	#[test]
	fn europe_has_no_unk1() {
		let spans = HeaderSpans::new(Region::Europe);
		assert!(write_header(&mut Writer::new(), Region::Europe, 0, 0, 1, &spans).is_err());
	}
}

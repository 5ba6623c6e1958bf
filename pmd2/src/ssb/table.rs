//! Pointer tables followed by NUL-terminated strings.

use gospel::read::{Reader, Le as _};
use gospel::write::{Label, Writer};
use pmd2_common::util::{ReaderExt, WriterExt};
use crate::util::*;

use super::ScriptStr;

/// Reads `count` strings through the pointer table at `table_pos`.
///
/// Each string lives at `base + pointer - correction`.
pub fn read_table(
	f: &Reader,
	table_pos: usize,
	base: usize,
	count: usize,
	correction: usize,
) -> Result<Vec<ScriptStr>, ReadError> {
	if count == 0 {
		return Ok(Vec::new())
	}
	let mut g = f.at(table_pos)?;
	list(count, || {
		let ptr = g.u16()? as usize;
		let pos = (base + ptr).checked_sub(correction)
			.ok_or_else(|| format!("string pointer {ptr:#X} at {:#X} points before the file", g.pos() - 2))?;
		Ok(ScriptStr(f.at(pos)?.cstring()?))
	})
}

/// Writes a pointer table and its strings, padded to a word boundary.
///
/// Each pointer is `bias` plus the distance from the start of the table to its string.
/// `data` is placed between the table and the strings.
/// Returns the size of the string data including padding, excluding the table.
pub fn write_table(f: &mut Writer, strings: &[ScriptStr], bias: usize, data: Label) -> Result<usize, WriteError> {
	let table_pos = f.len();
	let data_start = table_pos + strings.len() * 2;
	let mut pos = data_start;
	for s in strings {
		f.array::<2>(cast::<_, u16>(bias + pos - table_pos)?.to_le_bytes());
		pos += s.0.len() + 1;
	}
	f.label(data);
	for s in strings {
		f.cstring(&s.0)?;
	}
	f.align(2);
	Ok(f.len() - data_start)
}

#[cfg(test)]
mod test {
	use super::*;

	fn strs(s: &[&str]) -> Vec<ScriptStr> {
		s.iter().map(|&s| s.into()).collect()
	}

	#[test]
	fn layout() -> Result<(), WriteError> {
		let mut f = Writer::new();
		f.array([0xEE; 2]);
		let len = write_table(&mut f, &strs(&["ab", "c"]), 10, Label::new())?;
		assert_eq!(len, 6);
		assert_eq!(f.finish()?, [0xEE, 0xEE, 14, 0, 17, 0, b'a', b'b', 0, b'c', 0, 0]);
		Ok(())
	}

	#[test]
	fn read_with_correction() -> Result<(), crate::util::test::Error> {
		let strings = strs(&["hello", "", "world"]);
		let mut f = Writer::new();
		f.array([0; 4]);
		write_table(&mut f, &strings, 6, Label::new())?;
		let data = f.finish().map_err(WriteError::from)?;
		assert_eq!(read_table(&Reader::new(&data), 4, 4, 3, 6)?, strings);
		Ok(())
	}

	#[test]
	fn empty_table() -> Result<(), crate::util::test::Error> {
		let mut f = Writer::new();
		assert_eq!(write_table(&mut f, &[], 0, Label::new())?, 0);
		assert!(f.finish().map_err(WriteError::from)?.is_empty());
		assert!(read_table(&Reader::new(&[]), 0, 0, 0, 0)?.is_empty());
		Ok(())
	}

	#[test]
	fn pointer_before_file() {
		assert!(read_table(&Reader::new(&[0, 0]), 0, 0, 1, 4).is_err());
	}
}

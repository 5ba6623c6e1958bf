use std::collections::BTreeMap;

use gospel::read::Reader;
use crate::util::*;

use super::header::{DataHeader, GroupEntry, ScriptHeader};
use super::{parse, process, table, Game, Script};

#[tracing::instrument(skip_all, fields(region = ?game.region, version = ?game.version))]
pub fn read(game: &Game, data: &[u8]) -> Result<Script, ReadError> {
	let region = game.region;
	let mut f = Reader::new(data);
	let header = ScriptHeader::read(&mut f, region)?;
	let header_len = f.pos();

	let data_header = DataHeader::read(&mut f)?;
	let data_len = data_header.data_len as usize * 2;
	let group_count = data_header.group_count as usize;
	let code_start = DataHeader::SIZE + group_count * GroupEntry::SIZE;
	ensure!(code_start <= data_len, "{group_count} groups do not fit in a data block of {data_len:#X} bytes");
	let entries = list(group_count, || GroupEntry::read(&mut f))?;
	let block = f.at(header_len)?.slice(data_len)?;

	let const_count = header.const_count as usize;
	let string_count = header.string_count as usize;
	if header.script_len as usize != data_len / 2 + const_count {
		tracing::warn!(script_len = header.script_len, data_len = data_header.data_len, const_count, "script length disagrees with data block");
	}

	let const_start = header_len + data_len;
	let string_start = header.string_start(header_len);
	// Constant pointers also count the string pointer table.
	let constants = table::read_table(&f, const_start, const_start, const_count, string_count * 2)?;

	let base = if const_count > 0 { const_start } else { string_start };
	let mut strings = BTreeMap::new();
	let mut offset = 0;
	for (&lang, &len) in region.languages().iter().zip(&header.string_lens) {
		let table = table::read_table(&f, string_start + offset, base + offset, string_count, 0)?;
		strings.insert(lang, table);
		offset += len as usize * 2;
	}

	let code = parse::parse_code(game.opcodes(), block, code_start)?;
	tracing::debug!(instructions = code.instructions.len(), labels = code.labels.len(), "decoded");
	let (groups, raw_targets) = process::process(game.opcodes(), code, &entries, code_start, data_len);

	Ok(Script { groups, constants, strings, raw_targets, unk1: header.unk1 })
}

use std::collections::{BTreeMap, HashMap};

use gospel::write::{Label, Le as _, Writer};
use pmd2_common::util::WriterExt;
use crate::util::*;

use super::header::{write_header, DataHeader, GroupEntry, HeaderSpans};
use super::{process, table, Command, Game, Instruction, LabelId, OpcodeCatalog, ParamCount, Script, ScriptStr};

/// Jump parameters with bit 14 set read back as negative.
const MAX_JUMP: usize = 0x4000;

#[tracing::instrument(skip_all, fields(region = ?game.region, version = ?game.version))]
pub fn write(game: &Game, script: &Script) -> Result<Vec<u8>, WriteError> {
	let region = game.region;
	let opcodes = game.opcodes();

	let languages = region.languages();
	ensure!(
		script.strings.len() == languages.len(),
		"{region:?} scripts have {} string tables, got {:?}", languages.len(), script.strings.keys().collect::<Vec<_>>(),
	);
	let tables = languages.iter().map(|lang| {
		script.strings.get(lang).map(Vec::as_slice).ok_or_else(|| format!("missing {lang:?} string table"))
	}).collect::<Result<Vec<&[ScriptStr]>, _>>()?;
	let string_count = tables.first().map_or(0, |t| t.len());
	ensure!(tables.iter().all(|t| t.len() == string_count), "string tables differ in length");

	let code_start = DataHeader::SIZE + script.groups.len() * GroupEntry::SIZE;
	let targets = label_offsets(opcodes, script, code_start)?;

	let mut f = Writer::new();
	let spans = HeaderSpans::new(region);
	write_header(&mut f, region, script.constants.len(), string_count, script.unk1, &spans)?;

	f.label(spans.data_start);
	let code_end = Label::new();
	f.delay_words(spans.data_start, code_end);
	f.u16(cast(script.groups.len())?);
	let group_starts: Vec<Label> = script.groups.iter().map(|_| Label::new()).collect();
	for (group, &start) in script.groups.iter().zip(&group_starts) {
		f.delay_words(spans.data_start, start);
		f.u16(group.kind);
		f.u16(group.unk2);
	}

	for (group, &start) in script.groups.iter().zip(&group_starts) {
		f.label(start);
		for inst in &group.instructions {
			match inst {
				Instruction::Data(word) => f.u16(*word),
				Instruction::Label(_) => {}
				_ => for command in inst.commands() {
					write_command(&mut f, opcodes, &targets, &script.raw_targets, command)?;
				},
			}
		}
	}
	f.label(code_end);

	let const_len = table::write_table(&mut f, &script.constants, string_count * 2, spans.const_data.0)?;
	f.label(spans.const_data.1);

	let bias = script.constants.len() * 2 + const_len;
	for (strings, &(start, end)) in tables.iter().zip(&spans.strings) {
		f.label(start);
		table::write_table(&mut f, strings, bias, Label::new())?;
		f.label(end);
	}

	Ok(f.finish()?)
}

/// Byte offset within the data block of every label in `script`.
fn label_offsets(opcodes: &dyn OpcodeCatalog, script: &Script, code_start: usize) -> Result<HashMap<LabelId, usize>, WriteError> {
	let mut targets = HashMap::new();
	let mut offset = code_start;
	for inst in script.groups.iter().flat_map(|g| &g.instructions) {
		if let Instruction::Label(label) = inst {
			ensure!(targets.insert(*label, offset).is_none(), "{label:?} is defined twice");
			ensure!(!script.raw_targets.contains_key(label), "{label:?} is both defined and raw");
		}
		offset += process::instruction_len(opcodes, inst);
	}
	Ok(targets)
}

fn write_command(
	f: &mut Writer,
	opcodes: &dyn OpcodeCatalog,
	targets: &HashMap<LabelId, usize>,
	raw_targets: &BTreeMap<LabelId, u16>,
	command: &Command,
) -> Result<(), WriteError> {
	let Some(info) = opcodes.info(command.opcode) else {
		bail!("unknown opcode {:#06X}", command.opcode);
	};
	f.u16(command.opcode);
	match info.params {
		ParamCount::Fixed(n) => ensure!(
			command.params.len() == usize::from(n),
			"{} takes {n} parameters, got {}", info.name, command.params.len(),
		),
		ParamCount::Variadic => {
			ensure!(command.params.len() < MAX_JUMP, "too many parameters for {}", info.name);
			f.u16(cast(command.params.len())?);
		}
	}
	for (i, &param) in command.params.iter().enumerate() {
		if info.param_type(i).is_jump() {
			let label = LabelId(param);
			if let Some(&offset) = targets.get(&label) {
				ensure!(offset / 2 < MAX_JUMP, "jump target {offset:#X} is out of range");
				f.u16(cast(offset / 2)?);
			} else if let Some(&word) = raw_targets.get(&label) {
				f.u16(word);
			} else {
				bail!("{} jumps to undefined label {param}", info.name);
			}
		} else {
			f.u16(param);
		}
	}
	Ok(())
}

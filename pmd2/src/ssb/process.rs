//! Grouping of flat instructions, with labels and folded commands.

use std::collections::{BTreeMap, HashSet};

use super::header::GroupEntry;
use super::parse::RawCode;
use super::{Category, Command, Group, Instruction, LabelId, OpcodeCatalog};

/// Bytes taken by a command on disk, including the count word of variadic opcodes.
pub fn command_len(opcodes: &dyn OpcodeCatalog, command: &Command) -> usize {
	let count_word = opcodes.info(command.opcode).map_or(false, |i| i.is_variadic());
	2 + 2 * command.params.len() + if count_word { 2 } else { 0 }
}

/// Bytes taken by an instruction on disk. Labels take none; folded instructions take as
/// much as the commands they hold.
pub fn instruction_len(opcodes: &dyn OpcodeCatalog, inst: &Instruction) -> usize {
	match inst {
		Instruction::Data(_) => 2,
		Instruction::Label(_) => 0,
		_ => inst.commands().into_iter().map(|c| command_len(opcodes, c)).sum(),
	}
}

/// Splits `code` into the groups described by `entries`, inserting labels and folding commands.
///
/// `start` is the offset of the first instruction within the data block, and `data_len` the
/// length of the block. Also returns the labels that could not be placed, each with the
/// parameter word it was read from.
pub fn process(
	opcodes: &dyn OpcodeCatalog,
	code: RawCode,
	entries: &[GroupEntry],
	start: usize,
	data_len: usize,
) -> (Vec<Group>, BTreeMap<LabelId, u16>) {
	let mut groups: Vec<Group> = entries.iter().map(|e| Group {
		kind: e.kind,
		unk2: e.unk2,
		instructions: Vec::new(),
	}).collect();
	let ends: Vec<usize> = (0..entries.len()).map(|i| match entries.get(i + 1) {
		Some(next) => next.start as usize * 2,
		None => data_len,
	}).collect();

	if groups.is_empty() {
		if !code.instructions.is_empty() {
			tracing::warn!(count = code.instructions.len(), "script has no groups, dropping its instructions");
		}
		return (groups, BTreeMap::new())
	}
	if start < entries[0].start as usize * 2 {
		tracing::warn!("instructions before the first group");
	}

	let RawCode { instructions, labels } = code;
	let mut offset = start;
	let mut located = Vec::with_capacity(instructions.len());
	for inst in instructions {
		let len = instruction_len(opcodes, &inst);
		located.push((inst, offset));
		offset += len;
	}
	let end_offset = offset;

	let mut placed = HashSet::new();
	let mut cur = 0;
	let mut iter = located.into_iter().peekable();
	while let Some((inst, offset)) = iter.next() {
		while offset >= ends[cur] && cur + 1 < ends.len() {
			cur += 1;
		}
		if let Some(label) = labels.get(offset) {
			groups[cur].instructions.push(Instruction::Label(label));
			placed.insert(label);
		}

		let group_end = ends[cur];
		// Commands that are jump targets or start another group must stay at the top level.
		let mut next_of = |cats: &[Category]| iter.next_if(|(i, o)| {
			*o < group_end && labels.get(*o).is_none() && matches!(
				i, Instruction::Command(c) if cats.contains(&opcodes.category(c.opcode))
			)
		});

		let inst = match inst {
			Instruction::Command(c) => match opcodes.category(c.opcode) {
				cat @ (Category::Switch | Category::ProcSpec) => {
					let mut cases = Vec::new();
					while let Some((Instruction::Command(case), _)) = next_of(&[Category::Case, Category::Default]) {
						cases.push(case);
					}
					match (cat, cases.is_empty()) {
						(_, true) => Instruction::Command(c),
						(Category::Switch, false) => Instruction::Switch { switch: c, cases },
						(_, false) => Instruction::ProcSpecRet { command: c, cases },
					}
				}
				Category::EntityAccessor => match next_of(&[Category::EntAttribute]) {
					Some((Instruction::Command(attribute), _)) => Instruction::Accessor { accessor: c, attribute },
					_ => Instruction::Command(c),
				},
				_ => Instruction::Command(c),
			},
			inst => inst,
		};
		groups[cur].instructions.push(inst);
	}

	if let Some(label) = labels.get(end_offset) {
		if let Some(last) = groups.last_mut() {
			last.instructions.push(Instruction::Label(label));
			placed.insert(label);
		}
	}

	let mut raw_targets = BTreeMap::new();
	for (offset, label) in labels.iter() {
		if !placed.contains(&label) {
			tracing::warn!(?label, offset, "jump target is not on an instruction boundary");
			if let Some(word) = labels.word(label) {
				raw_targets.insert(label, word);
			}
		}
	}

	(groups, raw_targets)
}

//! Decoding of the raw word stream into flat instructions.

use std::collections::HashMap;

use gospel::read::{Reader, Le as _};
use crate::util::*;

use super::{Command, Instruction, LabelId, OpcodeCatalog, ParamCount};

/// Decodes a parameter word the way the game's interpreter does.
///
/// Bit 14 is a sign bit. If bit 15 is set, the result is additionally scaled down by 256,
/// rounding toward zero.
pub fn prepare_parameter_value(word: u16) -> i16 {
	let r0 = i32::from(word);
	let r1 = if r0 & 0x4000 != 0 {
		r0 | -0x8000
	} else {
		r0 & 0x3FFF
	};
	let r = if r0 & 0x8000 != 0 {
		let t = r1 >> 7;
		(r1 + ((t as u32) >> 24) as i32) >> 8
	} else {
		r1
	};
	r as i16
}

/// Jump targets seen so far, keyed by byte offset from the start of the data block.
///
/// Ids are handed out densely in the order targets are first seen. Each id also keeps the
/// parameter word it was first read from.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
	by_offset: HashMap<i32, LabelId>,
	words: Vec<u16>,
}

impl LabelTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get_or_insert(&mut self, offset: i32, word: u16) -> LabelId {
		let next = LabelId(self.words.len() as u16);
		let id = *self.by_offset.entry(offset).or_insert(next);
		if id == next {
			self.words.push(word);
		}
		id
	}

	pub fn get(&self, offset: usize) -> Option<LabelId> {
		let offset = i32::try_from(offset).ok()?;
		self.by_offset.get(&offset).copied()
	}

	/// The parameter word `label` was first read from.
	pub fn word(&self, label: LabelId) -> Option<u16> {
		self.words.get(usize::from(label.0)).copied()
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item=(i32, LabelId)> + '_ {
		self.by_offset.iter().map(|(&o, &l)| (o, l))
	}
}

/// The flat decoding of a data block.
#[derive(Debug, Clone, Default)]
pub struct RawCode {
	/// Only `Command` and `Data`.
	pub instructions: Vec<Instruction>,
	pub labels: LabelTable,
}

/// Decodes the words of `block[start..]`, where `block` is the whole data block.
///
/// An instruction cut short by the end of the block is dropped with a warning, which also ends
/// decoding. Opcodes missing from the catalog are an error.
pub fn parse_code(opcodes: &dyn OpcodeCatalog, block: &[u8], start: usize) -> Result<RawCode, ReadError> {
	let mut f = Reader::new(block);
	f.seek(start)?;
	let mut out = RawCode::default();
	while f.remaining().len() >= 2 {
		let pos = f.pos();
		let word = f.u16()?;
		if word >= opcodes.opcode_count() {
			tracing::debug!(pos = %format_args!("{pos:#X}"), "data word {word:#06X}");
			out.instructions.push(Instruction::Data(word));
			continue
		}
		let Some(info) = opcodes.info(word) else {
			bail!("unknown opcode {word:#06X} at {pos:#X}");
		};
		match read_command(&mut f, word, info, &mut out.labels) {
			Some(command) => out.instructions.push(Instruction::Command(command)),
			None => {
				tracing::warn!(pos = %format_args!("{pos:#X}"), "not enough data left for the parameters of {}", info.name);
				break
			}
		}
	}
	if !f.is_empty() {
		tracing::warn!("ignoring trailing byte at end of data block");
	}
	Ok(out)
}

fn read_command(f: &mut Reader, opcode: u16, info: &super::OpcodeInfo, labels: &mut LabelTable) -> Option<Command> {
	let count = match info.params {
		ParamCount::Fixed(n) => usize::from(n),
		ParamCount::Variadic => usize::try_from(prepare_parameter_value(f.u16().ok()?)).ok()?,
	};
	let mut params = Vec::with_capacity(count);
	for _ in 0..count {
		params.push(f.u16().ok()?);
	}
	// Labels are only assigned once the whole command has been read.
	for (i, word) in params.iter_mut().enumerate() {
		if info.param_type(i).is_jump() {
			// Targets are word offsets from the start of the data block.
			let target = i32::from(prepare_parameter_value(*word)) * 2;
			*word = labels.get_or_insert(target, *word).0;
		}
	}
	Some(Command { opcode, params })
}

#[cfg(test)]
mod test {
	use super::*;
	use super::super::opcode::test::*;
	use crate::types::OpcodeVersion;
	use test_case::test_case;

	fn words(w: &[u16]) -> Vec<u8> {
		w.iter().flat_map(|w| w.to_le_bytes()).collect()
	}

	#[test_case(0x0000, 0)]
	#[test_case(0x0123, 0x0123)]
	#[test_case(0x3FFF, 0x3FFF)]
	#[test_case(0x4000, -0x4000)]
	#[test_case(0x7FFF, -1)]
	#[test_case(0x8100, 1)]
	#[test_case(0x80FF, 0)]
	#[test_case(0xC000, -64)]
	#[test_case(0xFFFF, 0)]
	fn parameter_value(word: u16, value: i16) {
		assert_eq!(prepare_parameter_value(word), value);
	}

	#[test]
	fn commands_and_data() -> Result<(), ReadError> {
		let cat = catalog(OpcodeVersion::EoS);
		let block = words(&[0xAAAA, 0xBBBB, NOP, MESSAGE, 7, 0x1234, END]);
		let code = parse_code(&cat, &block, 4)?;
		assert_eq!(code.instructions, [
			Instruction::Command(Command { opcode: NOP, params: vec![] }),
			Instruction::Command(Command { opcode: MESSAGE, params: vec![7] }),
			Instruction::Data(0x1234),
			Instruction::Command(Command { opcode: END, params: vec![] }),
		]);
		assert!(code.labels.is_empty());
		Ok(())
	}

	#[test]
	fn labels_are_dense() -> Result<(), ReadError> {
		let cat = catalog(OpcodeVersion::EoS);
		let block = words(&[JUMP, 8, JUMP, 4, JUMP, 8, END]);
		let code = parse_code(&cat, &block, 0)?;
		let targets: Vec<_> = code.instructions.iter().filter_map(|i| match i {
			Instruction::Command(c) if c.opcode == JUMP => Some(c.params[0]),
			_ => None,
		}).collect();
		assert_eq!(targets, [0, 1, 0]);
		assert_eq!(code.labels.len(), 2);
		assert_eq!(code.labels.get(16), Some(LabelId(0)));
		assert_eq!(code.labels.get(8), Some(LabelId(1)));
		assert_eq!(code.labels.word(LabelId(1)), Some(4));
		Ok(())
	}

	#[test]
	fn negative_target() -> Result<(), ReadError> {
		let cat = catalog(OpcodeVersion::EoS);
		let code = parse_code(&cat, &words(&[JUMP, 0x7FFF, END]), 0)?;
		assert_eq!(code.labels.iter().collect::<Vec<_>>(), [(-2, LabelId(0))]);
		assert_eq!(code.labels.word(LabelId(0)), Some(0x7FFF));
		Ok(())
	}

	#[test]
	fn variadic() -> Result<(), ReadError> {
		let cat = catalog(OpcodeVersion::EoS);
		let block = words(&[CALL, 2, 0x55, 3, CALL, 0, END]);
		let code = parse_code(&cat, &block, 0)?;
		assert_eq!(code.instructions[0], Instruction::Command(Command { opcode: CALL, params: vec![0x55, 0] }));
		assert_eq!(code.instructions[1], Instruction::Command(Command { opcode: CALL, params: vec![] }));
		assert_eq!(code.labels.get(6), Some(LabelId(0)));
		assert_eq!(code.instructions.len(), 3);
		Ok(())
	}

	#[test_case(&[MESSAGE]; "missing parameter")]
	#[test_case(&[CASE, 1]; "partial parameters")]
	#[test_case(&[CALL]; "missing count")]
	#[test_case(&[CALL, 3, 1, 2]; "short variadic")]
	fn short_read_is_dropped(tail: &[u16]) -> Result<(), ReadError> {
		crate::util::test::init_logging();
		let cat = catalog(OpcodeVersion::EoS);
		let mut w = vec![NOP];
		w.extend(tail);
		let code = parse_code(&cat, &words(&w), 0)?;
		assert_eq!(code.instructions, [Instruction::Command(Command { opcode: NOP, params: vec![] })]);
		Ok(())
	}

	#[test]
	fn unknown_opcode() {
		let cat = catalog(OpcodeVersion::EoS);
		let err = parse_code(&cat, &words(&[NOP, UNDEFINED]), 0).unwrap_err();
		assert!(err.to_string().contains("0x000B at 0x2"), "{err}");
	}
}

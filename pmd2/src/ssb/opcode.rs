//! Opcode metadata consumed by the script codec.
//!
//! The real opcode tables live outside this crate; anything implementing [`OpcodeCatalog`] can
//! drive the parser. [`OpcodeTable`] is a plain in-memory catalog.

use std::collections::BTreeMap;

use crate::types::OpcodeVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamCount {
	Fixed(u16),
	/// The first word after the opcode holds the number of parameters.
	Variadic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
	Unknown,
	Integer,
	Constant,
	String,
	/// Word offset of an instruction, from the start of the data block.
	InstructionOffset,
	/// Like `InstructionOffset`, used by case branches.
	CaseJumpOffset,
}

impl ParamType {
	pub fn is_jump(self) -> bool {
		matches!(self, ParamType::InstructionOffset | ParamType::CaseJumpOffset)
	}
}

/// How an opcode takes part in instruction folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
	#[default]
	Other,
	Switch,
	ProcSpec,
	Case,
	Default,
	EntityAccessor,
	EntAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeInfo {
	pub name: String,
	pub params: ParamCount,
	/// Types of the leading parameters. Parameters past the end of this list are untyped.
	pub param_types: Vec<ParamType>,
	pub category: Category,
}

impl OpcodeInfo {
	pub fn new(name: impl Into<String>, params: ParamCount) -> Self {
		OpcodeInfo {
			name: name.into(),
			params,
			param_types: Vec::new(),
			category: Category::Other,
		}
	}

	pub fn with_types(mut self, types: impl IntoIterator<Item=ParamType>) -> Self {
		self.param_types = types.into_iter().collect();
		self
	}

	pub fn with_category(mut self, category: Category) -> Self {
		self.category = category;
		self
	}

	pub fn param_type(&self, index: usize) -> ParamType {
		self.param_types.get(index).copied().unwrap_or(ParamType::Unknown)
	}

	pub fn is_variadic(&self) -> bool {
		self.params == ParamCount::Variadic
	}
}

pub trait OpcodeCatalog: Sync {
	fn version(&self) -> OpcodeVersion;

	/// Words below this value are opcodes, the rest are data.
	fn opcode_count(&self) -> u16;

	fn info(&self, opcode: u16) -> Option<&OpcodeInfo>;

	fn category(&self, opcode: u16) -> Category {
		self.info(opcode).map_or(Category::Other, |i| i.category)
	}
}

#[derive(Debug, Clone)]
pub struct OpcodeTable {
	version: OpcodeVersion,
	count: u16,
	entries: BTreeMap<u16, OpcodeInfo>,
}

impl OpcodeTable {
	pub fn new(version: OpcodeVersion, count: u16) -> Self {
		OpcodeTable { version, count, entries: BTreeMap::new() }
	}

	/// Registers `info` for `opcode`.
	///
	/// # Panics
	/// If `opcode` is not below the table's opcode count.
	pub fn with(mut self, opcode: u16, info: OpcodeInfo) -> Self {
		assert!(opcode < self.count, "opcode {opcode:#06X} out of range");
		self.entries.insert(opcode, info);
		self
	}
}

impl OpcodeCatalog for OpcodeTable {
	fn version(&self) -> OpcodeVersion {
		self.version
	}

	fn opcode_count(&self) -> u16 {
		self.count
	}

	fn info(&self, opcode: u16) -> Option<&OpcodeInfo> {
		self.entries.get(&opcode)
	}
}

#[cfg(test)]
pub(crate) mod test {
	use super::*;

	pub const NOP: u16 = 0x00;
	pub const MESSAGE: u16 = 0x01;
	pub const JUMP: u16 = 0x02;
	pub const SWITCH: u16 = 0x03;
	pub const CASE: u16 = 0x04;
	pub const DEFAULT: u16 = 0x05;
	pub const PROC_SPECIAL: u16 = 0x06;
	pub const ACCESSOR: u16 = 0x07;
	pub const ATTRIBUTE: u16 = 0x08;
	pub const CALL: u16 = 0x09;
	pub const END: u16 = 0x0A;
	pub const UNDEFINED: u16 = 0x0B;

	/// A small catalog shaped like the real ones.
	pub fn catalog(version: OpcodeVersion) -> OpcodeTable {
		use ParamCount::*;
		use ParamType::*;
		OpcodeTable::new(version, 0x10)
			.with(NOP, OpcodeInfo::new("Nop", Fixed(0)))
			.with(MESSAGE, OpcodeInfo::new("Message", Fixed(1)).with_types([String]))
			.with(JUMP, OpcodeInfo::new("Jump", Fixed(1)).with_types([InstructionOffset]))
			.with(SWITCH, OpcodeInfo::new("Switch", Fixed(1)).with_types([Integer]).with_category(Category::Switch))
			.with(CASE, OpcodeInfo::new("Case", Fixed(2)).with_types([Integer, CaseJumpOffset]).with_category(Category::Case))
			.with(DEFAULT, OpcodeInfo::new("CaseDefault", Fixed(1)).with_types([CaseJumpOffset]).with_category(Category::Default))
			.with(PROC_SPECIAL, OpcodeInfo::new("ProcessSpecial", Fixed(3)).with_category(Category::ProcSpec))
			.with(ACCESSOR, OpcodeInfo::new("lives", Fixed(1)).with_types([Integer]).with_category(Category::EntityAccessor))
			.with(ATTRIBUTE, OpcodeInfo::new("SetAnimation", Fixed(1)).with_types([Integer]).with_category(Category::EntAttribute))
			.with(CALL, OpcodeInfo::new("CallCommon", Variadic).with_types([Constant, InstructionOffset]))
			.with(END, OpcodeInfo::new("End", Fixed(0)))
	}

	#[test]
	fn lookups() {
		let cat = catalog(OpcodeVersion::EoS);
		assert_eq!(cat.opcode_count(), 0x10);
		assert_eq!(cat.category(SWITCH), Category::Switch);
		assert_eq!(cat.category(UNDEFINED), Category::Other);
		assert!(cat.info(UNDEFINED).is_none());
		let call = cat.info(CALL).unwrap();
		assert!(call.is_variadic());
		assert!(call.param_type(1).is_jump());
		assert_eq!(call.param_type(5), ParamType::Unknown);
	}

	#[test]
	#[should_panic]
	fn out_of_range_registration() {
		let _ = OpcodeTable::new(OpcodeVersion::EoTD, 4).with(4, OpcodeInfo::new("X", ParamCount::Fixed(0)));
	}
}

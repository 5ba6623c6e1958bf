//! Compiled script sequences (`.ssb`, `.ssa`, `.sss`).
//!
//! A script is a header, a data block of 16-bit words split into groups, a constant string table,
//! and one string table per language. Jump targets are byte offsets on disk; in memory they are
//! replaced by dense [`LabelId`]s, with an [`Instruction::Label`] in front of each target.
//! Switch, process-special and entity-accessor commands are folded together with the commands
//! that belong to them.

use std::collections::BTreeMap;

use pmd2_common::newtype;
use crate::types::{GameVersion, Language, OpcodeVersion, Region};

pub mod opcode;
pub mod header;
pub mod table;
pub mod parse;
pub mod process;
mod read;
mod write;

pub use opcode::{Category, OpcodeCatalog, OpcodeInfo, OpcodeTable, ParamCount, ParamType};
pub use read::read;
pub use write::write;

newtype!(LabelId(u16));

/// Game text, kept as raw bytes since the encoding depends on the release.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScriptStr(pub Vec<u8>);

impl std::fmt::Debug for ScriptStr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", String::from_utf8_lossy(&self.0))
	}
}

impl From<&str> for ScriptStr {
	fn from(s: &str) -> Self {
		ScriptStr(s.as_bytes().to_owned())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
	pub opcode: u16,
	/// Raw parameter words, except that jump parameters hold a [`LabelId`].
	/// The count word of variadic opcodes is not included.
	pub params: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
	Command(Command),
	/// A word that is not an opcode.
	Data(u16),
	Label(LabelId),
	Switch { switch: Command, cases: Vec<Command> },
	ProcSpecRet { command: Command, cases: Vec<Command> },
	Accessor { accessor: Command, attribute: Command },
}

impl Instruction {
	/// The on-disk commands this instruction stands for, in order.
	pub fn commands(&self) -> Vec<&Command> {
		match self {
			Instruction::Command(c) => vec![c],
			Instruction::Data(_) | Instruction::Label(_) => Vec::new(),
			Instruction::Switch { switch: c, cases }
			| Instruction::ProcSpecRet { command: c, cases } => {
				std::iter::once(c).chain(cases).collect()
			}
			Instruction::Accessor { accessor, attribute } => vec![accessor, attribute],
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
	pub kind: u16,
	pub unk2: u16,
	pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
	pub groups: Vec<Group>,
	pub constants: Vec<ScriptStr>,
	/// One table per language of the region, all the same length.
	pub strings: BTreeMap<Language, Vec<ScriptStr>>,
	/// Jump targets that are not on an instruction, with the parameter word to write for them.
	pub raw_targets: BTreeMap<LabelId, u16>,
	/// Last header word of North American and Japanese scripts. Always 0 for Europe.
	pub unk1: u16,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{version:?} uses {expected:?} opcodes, but the catalog is for {got:?}")]
pub struct CatalogMismatch {
	pub version: GameVersion,
	pub expected: OpcodeVersion,
	pub got: OpcodeVersion,
}

/// Which release a script belongs to, and the opcodes it is written in.
#[derive(Clone, Copy)]
pub struct Game<'a> {
	pub region: Region,
	pub version: GameVersion,
	opcodes: &'a dyn OpcodeCatalog,
}

impl std::fmt::Debug for Game<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Game")
			.field("region", &self.region)
			.field("version", &self.version)
			.field("opcodes", &self.opcodes.version())
			.finish()
	}
}

impl<'a> Game<'a> {
	pub fn new(region: Region, version: GameVersion, opcodes: &'a dyn OpcodeCatalog) -> Result<Self, CatalogMismatch> {
		let expected = version.opcode_version();
		if opcodes.version() != expected {
			return Err(CatalogMismatch { version, expected, got: opcodes.version() })
		}
		Ok(Game { region, version, opcodes })
	}

	pub fn opcodes(&self) -> &'a dyn OpcodeCatalog {
		self.opcodes
	}
}

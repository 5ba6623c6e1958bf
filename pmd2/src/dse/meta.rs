use super::record::DateTime;

/// Leftover header data from a parsed DSE file, needed to write it back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DseMeta {
	pub common: MetaCommon,
	pub kind: MetaKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaCommon {
	/// Some kind of ID.
	pub unk1: u8,
	/// Possibly a volume.
	pub unk2: u8,
	/// Internal file name.
	pub fname: Vec<u8>,
	pub created: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
	MusicSeq {
		/// Ticks per quarter note.
		tpqn: u16,
	},
	Bank {
		wavi_slots: u16,
		prgi_slots: u16,
	},
}

impl Default for MetaKind {
	fn default() -> Self {
		MetaKind::MusicSeq { tpqn: 0 }
	}
}

impl DseMeta {
	pub fn tpqn(&self) -> Option<u16> {
		match self.kind {
			MetaKind::MusicSeq { tpqn } => Some(tpqn),
			MetaKind::Bank { .. } => None,
		}
	}

	pub fn slots(&self) -> Option<(u16, u16)> {
		match self.kind {
			MetaKind::Bank { wavi_slots, prgi_slots } => Some((wavi_slots, prgi_slots)),
			MetaKind::MusicSeq { .. } => None,
		}
	}
}

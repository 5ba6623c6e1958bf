#[macro_export]
macro_rules! impl_from_into {
	($outer:ident($inner:ident)) => {
		impl From<$inner> for $outer {
			fn from(v: $inner) -> $outer {
				$outer(v)
			}
		}

		impl From<$outer> for $inner {
			fn from($outer(v): $outer) -> $inner {
				v
			}
		}
	}
}

#[macro_export]
macro_rules! newtype {
	($outer:ident($inner:ident)) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		#[repr(transparent)]
		pub struct $outer(pub $inner);
		$crate::impl_from_into!($outer($inner));
	};
	($outer:ident($inner:ident), $fmt:literal) => {
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		#[repr(transparent)]
		pub struct $outer(pub $inner);
		$crate::impl_from_into!($outer($inner));

		impl ::core::fmt::Debug for $outer {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.debug_tuple(stringify!($outer))
					.field(&format_args!($fmt, &self.0))
					.finish()
			}
		}
	};
}

/// Release territory. Decides the script header shape and which string tables exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
	NorthAmerica,
	Europe,
	Japan,
}

impl Region {
	/// The string tables a script of this region carries, in file order.
	pub fn languages(self) -> &'static [Language] {
		use Language::*;
		match self {
			Region::NorthAmerica => &[English],
			Region::Europe => &[English, French, German, Italian, Spanish],
			Region::Japan => &[Japanese],
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameVersion {
	/// Explorers of Sky.
	EoS,
	/// Explorers of Time.
	EoT,
	/// Explorers of Darkness.
	EoD,
}

/// Which opcode table a game's scripts are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpcodeVersion {
	EoS,
	EoTD,
}

impl GameVersion {
	pub fn opcode_version(self) -> OpcodeVersion {
		match self {
			GameVersion::EoS => OpcodeVersion::EoS,
			GameVersion::EoT | GameVersion::EoD => OpcodeVersion::EoTD,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
	English,
	French,
	German,
	Italian,
	Spanish,
	Japanese,
}

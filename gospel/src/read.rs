#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("out-of-bounds seek to {pos:#X} (size {size:#X})")]
	Seek { pos: usize, size: usize },
	#[error("out-of-bounds read of {pos:#X}+{len} (size {size:#X})")]
	Read { pos: usize, len: usize, size: usize },
	#[error("unterminated string at {pos:#X}")]
	Unterminated { pos: usize },
	#[error("error at {pos:#X}: {source}")]
	Other { pos: usize, #[source] source: Box<dyn std::error::Error + Send + Sync> },
}

pub type Result<T, E=Error> = std::result::Result<T, E>;

impl Error {
	pub fn pos(&self) -> usize {
		match self {
			Error::Seek { pos, .. } => *pos,
			Error::Read { pos, .. } => *pos,
			Error::Unterminated { pos } => *pos,
			Error::Other { pos, .. } => *pos,
		}
	}
}

/// An incremental reader over a byte slice.
///
/// A `Reader` is only a position and a borrowed slice, so helpers that need to look ahead
/// take a clone (or use [`at`](`Self::at`)) rather than sharing one cursor.
#[derive(Clone)]
pub struct Reader<'a> {
	pos: usize,
	data: &'a [u8],
}

impl<'a> std::fmt::Debug for Reader<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Reader")
			.field("pos", &format_args!("{:#X}", self.pos))
			.field("data", &format_args!("[_; {:#X}]", self.data.len()))
			.finish()
	}
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Reader<'a> {
		Self {
			pos: 0,
			data,
		}
	}

	/// Reads a slice of data from the input without copying.
	///
	/// On error the read position is unchanged.
	pub fn slice(&mut self, len: usize) -> Result<&'a [u8]> {
		if len > self.remaining().len() {
			return Err(Error::Read { pos: self.pos(), len, size: self.len() });
		}
		let pos = self.pos;
		self.pos += len;
		Ok(&self.data[pos..pos+len])
	}

	pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut x = [0; N];
		x.copy_from_slice(self.slice(N)?);
		Ok(x)
	}

	/// Reads a NUL-terminated byte string, consuming the terminator but not returning it.
	pub fn cstr(&mut self) -> Result<&'a [u8]> {
		let rest = self.remaining();
		let len = rest.iter().position(|&b| b == 0)
			.ok_or(Error::Unterminated { pos: self.pos() })?;
		self.pos += len + 1;
		Ok(&rest[..len])
	}

	#[must_use]
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Total length of the input, not the number of bytes left.
	#[must_use]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.remaining().is_empty()
	}

	#[must_use]
	pub fn remaining(&self) -> &'a [u8] {
		&self.data[self.pos()..]
	}

	pub fn seek(&mut self, pos: usize) -> Result<()> {
		if pos > self.len() {
			return Err(Error::Seek { pos, size: self.len() })
		}
		self.pos = pos;
		Ok(())
	}

	/// Returns a copy of the reader at the given position.
	pub fn at(&self, pos: usize) -> Result<Self> {
		let mut a = self.clone();
		a.seek(pos)?;
		Ok(a)
	}
}

mod seal { pub trait Sealed: Sized {} }
impl seal::Sealed for Reader<'_> {}

macro_rules! primitives {
	(
		$(#[$trait_attrs:meta])* trait $trait:ident;
		$suf:ident, $conv:ident;
		{ $($type:ident),* }
	) => { paste::paste! {
		#[doc(hidden)]
		impl<'a> Reader<'a> {
			$(pub fn [<$type $suf>](&mut self) -> Result<$type> {
				Ok($type::$conv(self.array()?))
			})*
		}

		$(#[$trait_attrs])*
		pub trait $trait: seal::Sealed {
			$(#[doc(hidden)] fn $type(&mut self) -> Result<$type>;)*
		}

		impl<'a> $trait for Reader<'a> {
			$(#[doc(hidden)] fn $type(&mut self) -> Result<$type> {
				self.[<$type $suf>]()
			})*
		}
	} }
}

primitives!(
	/// Little-endian primitives without the `_le` suffix.
	///
	/// Import as `use gospel::read::Le as _;`.
	trait Le;
	_le, from_le_bytes;
	{ u8, u16, u32, i8, i16, i32 }
);
primitives!(
	/// Big-endian primitives without the `_be` suffix.
	///
	/// Import as `use gospel::read::Be as _;`.
	trait Be;
	_be, from_be_bytes;
	{ u8, u16, u32, i8, i16, i32 }
);

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn mixed_endian() -> Result<()> {
		let mut f = Reader::new(b"wavi\x10\x00\x00\x00");
		assert_eq!(f.u32_be()?, 0x77617669);
		assert_eq!(f.u32_le()?, 0x10);
		assert!(f.is_empty());
		Ok(())
	}

	#[test]
	fn cstr_consumes_terminator() -> Result<()> {
		let mut f = Reader::new(b"ab\0c\0");
		assert_eq!(f.cstr()?, b"ab");
		assert_eq!(f.pos(), 3);
		assert_eq!(f.cstr()?, b"c");
		assert!(matches!(f.clone().cstr(), Err(Error::Unterminated { pos: 5 })));
		Ok(())
	}

	#[test]
	fn failed_read_keeps_position() {
		let mut f = Reader::new(&[1, 0, 2]);
		assert_eq!(f.u16_le().ok(), Some(1));
		assert!(matches!(f.u32_le(), Err(Error::Read { pos: 2, len: 4, size: 3 })));
		assert_eq!(f.pos(), 2);
		assert!(f.at(4).is_err());
	}
}

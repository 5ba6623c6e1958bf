use std::{
	collections::HashMap,
	fmt::Debug,
	ops::Range,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("undefined label {label:?} referenced at {pos:#X}")]
	Label { pos: usize, label: Label },
	#[error("error at {pos:#X}: {source}")]
	Other { pos: usize, #[source] source: BoxError },
}

pub type Result<T, E=Error> = std::result::Result<T, E>;

impl Error {
	pub fn pos(&self) -> usize {
		match self {
			Error::Label { pos, .. } => *pos,
			Error::Other { pos, .. } => *pos,
		}
	}
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("attempted to write {value:#X} as a u{size}")]
pub struct LabelSizeError {
	pub value: usize,
	pub size: usize,
}

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Delayed = Box<dyn FnOnce(&DelayContext, &mut [u8]) -> Result<(), BoxError>>;

/// An incremental writer to a `Vec<u8>`, with support for delayed fields.
///
/// Delayed fields are reserved as zeroes and computed in [`finish`](`Self::finish`), once every
/// label they refer to has been placed. Nothing is returned unless every delay succeeds.
#[derive(Default)]
#[must_use]
pub struct Writer {
	data: Vec<u8>,
	delays: Vec<(Range<usize>, Delayed)>,
	labels: HashMap<Label, usize>,
}

/// Context passed to the delay function.
pub struct DelayContext<'a> {
	pos: usize,
	labels: &'a HashMap<Label, usize>,
}

impl<'a> DelayContext<'a> {
	/// The position where the delayed data will be written.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Looks up the position of a label.
	pub fn label(&self, label: Label) -> Result<usize> {
		self.labels.get(&label).copied()
			.ok_or(Error::Label { pos: self.pos(), label })
	}
}

impl Writer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves all delayed fields and returns the buffer.
	pub fn finish(mut self) -> Result<Vec<u8>> {
		for (range, cb) in self.delays {
			let pos = range.start;
			let res = cb(
				&DelayContext { pos, labels: &self.labels },
				&mut self.data[range],
			);
			if let Err(e) = res {
				return match e.downcast() {
					Ok(e) => Err(*e),
					Err(e) => Err(Error::Other { pos, source: e })
				}
			}
		}
		Ok(self.data)
	}

	pub fn slice(&mut self, data: &[u8]) {
		self.data.extend_from_slice(data)
	}

	pub fn array<const N: usize>(&mut self, data: [u8; N]) {
		self.slice(&data)
	}

	/// Places a label at the current position.
	///
	/// # Panics
	/// If the label was already placed.
	pub fn label(&mut self, label: Label) {
		if let Some(p) = self.labels.insert(label, self.len()) {
			panic!("label already defined at {p:#06X}")
		}
	}

	/// Creates and places a label at the current position.
	pub fn here(&mut self) -> Label {
		let l = Label::new();
		self.label(l);
		l
	}

	/// Reserves `N` bytes to be filled in by `cb` when the writer is finished.
	pub fn delay<const N: usize, F>(&mut self, cb: F) where
		F: FnOnce(&DelayContext) -> Result<[u8; N], BoxError> + 'static,
	{
		let start = self.len();
		self.array([0; N]);
		let end = self.len();
		self.delays.push((start..end, Box::new(move |ctx, slice| {
			slice.copy_from_slice(&cb(ctx)?);
			Ok(())
		})));
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Writes zeroes until the length is a multiple of `size`.
	pub fn align(&mut self, size: usize) {
		self.align_with(size, 0)
	}

	/// Writes `fill` until the length is a multiple of `size`.
	pub fn align_with(&mut self, size: usize, fill: u8) {
		let n = (size-(self.len()%size))%size;
		self.data.resize(self.len() + n, fill);
	}
}

mod seal { pub trait Sealed: Sized {} }
impl seal::Sealed for Writer {}

macro_rules! primitives {
	(
		$(#[$trait_attrs:meta])* trait $trait:ident;
		$suf:ident, $conv:ident;
		{ $($type:ident),* }
		{ $($ptr:tt),* }
	) => { paste::paste! {
		#[doc(hidden)]
		impl Writer {
			$(pub fn [<$type $suf>](&mut self, val: $type) {
				self.array($type::$conv(val));
			})*
			$(pub fn [<delay$ptr $suf>](&mut self, label: Label) {
				self.delay(move |ctx| {
					let value = ctx.label(label)?;
					let value = [<u$ptr>]::try_from(value).map_err(|_| LabelSizeError { value, size: $ptr })?;
					Ok([<u$ptr>]::$conv(value))
				});
			})*
		}

		$(#[$trait_attrs])*
		pub trait $trait: seal::Sealed {
			$(#[doc(hidden)] fn $type(&mut self, val: $type);)*
			$(#[doc(hidden)] fn [<delay$ptr>](&mut self, label: Label);)*
		}

		impl $trait for Writer {
			$(#[doc(hidden)] fn $type(&mut self, val: $type) {
				self.[<$type $suf>](val)
			})*
			$(#[doc(hidden)] fn [<delay$ptr>](&mut self, label: Label) {
				self.[<delay$ptr $suf>](label)
			})*
		}
	} }
}

primitives!(
	/// Little-endian primitives without the `_le` suffix.
	///
	/// Import as `use gospel::write::Le as _;`.
	trait Le;
	_le, to_le_bytes;
	{ u8, u16, u32, i8, i16, i32 }
	{ 16, 32 }
);
primitives!(
	/// Big-endian primitives without the `_be` suffix.
	///
	/// Import as `use gospel::write::Be as _;`.
	trait Be;
	_be, to_be_bytes;
	{ u8, u16, u32, i8, i16, i32 }
	{ 16, 32 }
);

/// A position in a [`Writer`], possibly not yet placed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(u64);

impl Debug for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Label({:#04X})", self.0)
	}
}

impl Label {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Label {
		use std::sync::atomic::{AtomicU64, Ordering};
		static COUNT: AtomicU64 = AtomicU64::new(0);
		Label(COUNT.fetch_add(1, Ordering::Relaxed))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn delayed_pointer() -> Result<()> {
		let mut f = Writer::new();
		let end = Label::new();
		f.delay16_le(end);
		f.u8_le(0xAA);
		f.align_with(4, 0xFF);
		f.label(end);
		assert_eq!(f.finish()?, [4, 0, 0xAA, 0xFF]);
		Ok(())
	}

	#[test]
	fn undefined_label() {
		let mut f = Writer::new();
		f.u16_le(1);
		f.delay32_be(Label::new());
		assert!(matches!(f.finish(), Err(Error::Label { pos: 2, .. })));
	}
}

use gospel::write::{Label, LabelSizeError, Writer};
use super::ensure;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
	#[error("{source}")]
	Write { #[from] source: gospel::write::Error },

	#[error("{source}")]
	Cast { #[from] source: super::CastError },

	#[error("{assertion}")]
	Assert { assertion: Box<str> },
}

impl std::convert::From<String> for WriteError {
	fn from(assertion: String) -> Self {
		Self::Assert {
			assertion: assertion.into(),
		}
	}
}

impl std::convert::From<&str> for WriteError {
	fn from(assertion: &str) -> Self {
		assertion.to_owned().into()
	}
}

impl std::convert::From<std::convert::Infallible> for WriteError {
	fn from(v: std::convert::Infallible) -> Self {
		match v {}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("span {start:#X}..{end:#X} is not a whole number of words")]
pub struct OddSpanError {
	pub start: usize,
	pub end: usize,
}

fn word_count(start: usize, end: usize) -> Result<u16, gospel::write::BoxError> {
	if end < start || (end - start) % 2 != 0 {
		return Err(OddSpanError { start, end }.into())
	}
	let value = (end - start) / 2;
	Ok(u16::try_from(value).map_err(|_| LabelSizeError { value, size: 16 })?)
}

#[extend::ext(name = WriterExt)]
pub impl Writer {
	/// Writes a string followed by a NUL terminator.
	fn cstring(&mut self, s: &[u8]) -> Result<(), WriteError> {
		ensure!(!s.contains(&0), "string {:?} contains a NUL byte", String::from_utf8_lossy(s));
		self.slice(s);
		self.array([0]);
		Ok(())
	}

	/// Delays a little-endian u16 holding the distance from `start` to `end` in words.
	///
	/// Fails at [`finish`](Writer::finish) if the distance is odd or does not fit in 16 bits.
	fn delay_words(&mut self, start: Label, end: Label) {
		self.delay(move |ctx| {
			Ok(word_count(ctx.label(start)?, ctx.label(end)?)?.to_le_bytes())
		});
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use gospel::write::Le as _;

	#[test]
	fn word_length_field() -> Result<(), WriteError> {
		let mut f = Writer::new();
		let start = f.here();
		let end = gospel::write::Label::new();
		f.delay_words(start, end);
		f.u16(7);
		f.cstring(b"a")?;
		f.label(end);
		assert_eq!(f.finish()?, [3, 0, 7, 0, b'a', 0]);
		Ok(())
	}

	#[test]
	fn odd_span_fails() {
		let mut f = Writer::new();
		let start = f.here();
		let end = gospel::write::Label::new();
		f.delay_words(start, end);
		f.u8(1);
		f.label(end);
		assert!(f.finish().is_err());
	}

	#[test]
	fn nul_in_string() {
		assert!(Writer::new().cstring(b"a\0b").is_err());
	}
}

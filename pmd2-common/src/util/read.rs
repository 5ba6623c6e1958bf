use gospel::read::Reader;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
	#[error("{source}")]
	Read { #[from] source: gospel::read::Error },

	#[error("{source}")]
	Cast { #[from] source: super::CastError },

	#[error("{assertion}")]
	Assert { assertion: Box<str> },
}

impl std::convert::From<String> for ReadError {
	fn from(assertion: String) -> Self {
		Self::Assert {
			assertion: assertion.into(),
		}
	}
}

impl std::convert::From<&str> for ReadError {
	fn from(assertion: &str) -> Self {
		assertion.to_owned().into()
	}
}

impl std::convert::From<std::convert::Infallible> for ReadError {
	fn from(v: std::convert::Infallible) -> Self {
		match v {}
	}
}

#[extend::ext(name = ReaderExt)]
pub impl Reader<'_> {
	/// Reads a NUL-terminated string as raw bytes.
	fn cstring(&mut self) -> Result<Vec<u8>, gospel::read::Error> {
		Ok(self.cstr()?.to_owned())
	}
}

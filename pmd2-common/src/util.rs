pub mod read;
pub mod write;

pub use read::*;
pub use write::*;

#[derive(Debug, thiserror::Error)]
#[error("cannot convert {value} into {type_}\n{source}")]
pub struct CastError {
	source: Box<dyn std::error::Error + Sync + Send>,
	type_: &'static str,
	value: String,
}

pub fn cast<A, B>(a: A) -> Result<B, CastError> where
	A: std::fmt::Debug + Clone,
	B: TryFrom<A>,
	B::Error: std::error::Error + Sync + Send + 'static,
{
	a.clone().try_into().map_err(|e| cast_error::<B>(a, e))
}

pub fn cast_error<T>(
	val: impl std::fmt::Debug,
	cause: impl Into<Box<dyn std::error::Error + Sync + Send>>,
) -> CastError {
	CastError {
		type_: std::any::type_name::<T>(),
		value: format!("{:?}", val),
		source: cause.into()
	}
}

#[macro_export]
macro_rules! __ensure {
	($cond:expr, $($t:tt)*) => {
		if !($cond) {
			$crate::util::bail!($($t)*)
		}
	};
}
pub use __ensure as ensure;

#[macro_export]
macro_rules! __bail {
	($str:literal $($arg:tt)*) => {
		return Err(format!($str $($arg)*).into())
	};
	($e:expr) => {
		return Err($e.into())
	}
}
pub use __bail as bail;

pub fn list<V, E>(
	n: usize,
	mut f: impl FnMut() -> Result<V, E>,
) -> Result<Vec<V>, E> {
	let mut a = Vec::with_capacity(n);
	for _ in 0..n {
		a.push(f()?);
	}
	Ok(a)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Read { #[from] source: crate::util::ReadError },

	#[error(transparent)]
	Write { #[from] source: crate::util::WriteError },

	#[error("{assertion}")]
	Assert { assertion: Box<str> },
}

impl std::convert::From<String> for Error {
	fn from(assertion: String) -> Self {
		Self::Assert {
			assertion: assertion.into(),
		}
	}
}

/// Sends log output to the test harness. Safe to call from every test.
pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

pub fn check_equal<T: PartialEq + std::fmt::Debug>(a: &T, b: &T) -> Result<(), Error> {
	if a != b {
		let a = format!("{:#?}", a);
		let b = format!("{:#?}", b);
		let diff = similar::TextDiff::configure().diff_lines(&a, &b);

		for (i, hunk) in diff.unified_diff().iter_hunks().enumerate() {
			if i > 0 {
				println!("\x1B[34m…\x1B[39m");
			}
			for change in hunk.iter_changes() {
				match change.tag() {
					similar::ChangeTag::Delete => print!("\x1B[31m-{change}\x1B[39m"),
					similar::ChangeTag::Insert => print!("\x1B[32m+{change}\x1B[39m"),
					similar::ChangeTag::Equal => print!(" {change}"),
				};
			}
		}
		return Err(format!("{} differs", std::any::type_name::<T>()).into())
	}
	Ok(())
}

pub fn check_roundtrip_strict<T>(
	data: &[u8],
	read: impl Fn(&[u8]) -> Result<T, super::ReadError>,
	write: impl Fn(&T) -> Result<Vec<u8>, super::WriteError>,
) -> Result<T, Error> where
	T: PartialEq + std::fmt::Debug,
{
	let val = read(data)?;
	let data2 = write(&val)?;
	if data != data2 {
		println!("differs! rereading");
		let val2 = read(&data2)?;
		check_equal(&val, &val2)?;

		let diff = similar::capture_diff_slices(similar::Algorithm::Patience, data, &data2);

		for chunk in diff {
			match chunk {
				similar::DiffOp::Equal { old_index, new_index, len } => {
					println!(
						"{:?} = {:?}",
						old_index..old_index+len,
						new_index..new_index+len,
					);
				}
				similar::DiffOp::Delete { old_index, old_len, new_index } => {
					println!(
						"{:?} ⇒ {} ({:02X?} ⇒ [])",
						old_index..old_index+old_len,
						new_index,
						&data[old_index..old_index+old_len],
					);
				}
				similar::DiffOp::Insert { old_index, new_index, new_len } => {
					println!(
						"{} ⇐ {:?} ([] ⇐ {:02X?})",
						old_index,
						new_index..new_index+new_len,
						&data2[new_index..new_index+new_len],
					);
				}
				similar::DiffOp::Replace { old_index, old_len, new_index, new_len } => {
					println!(
						"{:?} ≠ {:?} ({:02X?} ≠ {:02X?})",
						old_index..old_index+old_len,
						new_index..new_index+new_len,
						&data[old_index..old_index+old_len],
						&data2[new_index..new_index+new_len],
					);
				}
			}
		}
		return Err(format!("{} bytes differ", std::any::type_name::<T>()).into())
	}
	Ok(val)
}

#[cfg(test)]
pub mod test;

pub use pmd2_common::util::*;

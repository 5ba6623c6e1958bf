#[doc(inline)]
pub use pmd2_common::types as types;
pub mod util;

pub mod dse;
pub mod ssb;
pub mod bpc;

pub use pmd2_common::util::{ReadError, WriteError};

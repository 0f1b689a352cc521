//! JSON-facing descriptions of effect trees and program options.

pub(crate) mod desc;
pub(crate) mod opts;

pub use desc::{ColorDesc, EffectDesc, MatrixDesc};
pub use opts::ProgramOpts;

mod builtins;
mod error;
mod interp;

pub use error::EvalError;
pub use interp::{Interp, Scoping};

//! Runtime error type for minips evaluation.

use std::io;

/// Every failure aborts the current `run`; the payload names the offending
/// operator or name.
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("undefined name: {0}")]
    Undefined(String),
    #[error("type error in {0}")]
    TypeCheck(&'static str),
    #[error("operand stack underflow in {0}")]
    StackUnderflow(&'static str),
    #[error("range error in {0}")]
    RangeCheck(&'static str),
    #[error("dictionary stack underflow in end")]
    DictStackUnderflow,
    #[error("zero increment in for")]
    InvalidIncrement,
    #[error("cannot execute operand of {0}")]
    CannotExecute(&'static str),
    #[error("output sink error: {0}")]
    Io(#[from] io::Error),
}

// File: src/interpreter/control_flow.rs
//
// Control flow signal for statement evaluation.
//
// A `return` statement has to unwind through any enclosing loops and
// conditionals to the nearest function-call boundary. Statement
// evaluation reports that with a Flow value instead of an error, and
// every block runner propagates Return upward until a call frame (or
// the top level, which treats it as an error) absorbs it.

use super::value::Value;

/// Outcome of evaluating one statement or block.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Flow {
    /// Normal completion; continue with the next statement.
    Normal,
    /// A `return` is unwinding, possibly carrying a value.
    Return(Option<Value>),
}

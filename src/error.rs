// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Errors reported by the engine.
//!
//! Invalid-argument errors leave all state untouched. Compile, link and
//! introspection errors abort the draw that triggered them; nothing broken is
//! ever cached.

use crate::math::MathError;
use crate::shader::Stage;
use crate::transform::MatrixMode;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A raw GL enumerant that is not accepted for this parameter.
    InvalidEnum { what: &'static str, value: u32 },
    /// An argument outside of its permitted range.
    InvalidValue(String),
    /// Degenerate frustum, ortho or singular matrix.
    Math(#[from] MathError),
    StackOverflow { mode: MatrixMode },
    StackUnderflow { mode: MatrixMode },
    Compile {
        stage: Stage,
        program: String,
        log: String,
    },
    Link { program: String, log: String },
    /// The linker kept a uniform the semantic-ID table does not know.
    UnknownUniform { name: String, program: String },
    /// The linker kept an attribute the semantic-ID table does not know.
    UnknownAttribute { name: String, program: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidEnum { what, value } => {
                write!(f, "invalid enum 0x{value:04X} for {what}")
            }
            Error::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            Error::Math(e) => write!(f, "{e}"),
            Error::StackOverflow { mode } => write!(f, "{mode:?} stack overflow"),
            Error::StackUnderflow { mode } => write!(f, "{mode:?} stack underflow"),
            Error::Compile {
                stage,
                program,
                log,
            } => write!(f, "compiling {stage:?} shader of {program} failed:\n{log}"),
            Error::Link { program, log } => write!(f, "linking {program} failed:\n{log}"),
            Error::UnknownUniform { name, program } => {
                write!(f, "unknown uniform {name} in {program}")
            }
            Error::UnknownAttribute { name, program } => {
                write!(f, "unknown attribute {name} in {program}")
            }
        }
    }
}

use std::fmt;

use crate::stage::ShaderStage;

/// What went wrong while splitting a shader source into stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `#type` marker named something other than `vertex` or `fragment`.
    UnknownStage(String),
    /// A `#type` marker with nothing after it.
    MissingStageName,
    /// The same stage was declared twice.
    DuplicateStage(ShaderStage),
    /// The source ended without declaring this stage.
    MissingStage(ShaderStage),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStage(token) => write!(f, "unexpected stage name `{token}`"),
            Self::MissingStageName => f.write_str("`#type` marker without a stage name"),
            Self::DuplicateStage(stage) => write!(f, "{stage} stage declared more than once"),
            Self::MissingStage(stage) => write!(f, "no {stage} stage block"),
        }
    }
}

/// A parse error from a dual-stage shader source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based source line where the error was detected.
    pub line: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader source error at line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

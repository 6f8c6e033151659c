//! Shader programs built from dual-stage `#type` sources.
//!
//! [`ShaderSource`] is a parsed file; [`ShaderSource::compile`] turns it into
//! a linked [`ShaderProgram`]. Failures at every step are [`ShaderError`]s.

mod error;
mod program;
mod source;

pub use error::ShaderError;
pub use program::ShaderProgram;
pub use source::ShaderSource;

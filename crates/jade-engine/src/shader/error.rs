use std::path::PathBuf;

use jade_shader_format::{ParseError, ShaderStage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse shader `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{stage} stage of `{}` failed to compile: {log}", .path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },

    #[error("`{}` failed to link: {log}", .path.display())]
    Link { path: PathBuf, log: String },
}

//! Error types for aedif-lua

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a build script
#[derive(Debug, Error)]
pub enum Error {
    #[error("Lua runtime error: {0}")]
    Runtime(#[from] mlua::Error),

    #[error("Build script not found: {0}")]
    ScriptNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

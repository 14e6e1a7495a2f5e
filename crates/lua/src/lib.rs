//! aedif-lua: the script-facing surface of aedif
//!
//! This crate provides the Lua runtime environment with:
//! - The `aedif` table: `compile`, `restoreSettings`, `execute`,
//!   `ostype`, `isclean`, and the `aedif.os` filesystem helpers
//! - Extraction of the project globals (`LANGUAGE`, `COMPILER`, `STD`,
//!   `OPT_LEVEL`, `WARNINGS`, `ERRORS`, `COMPILE_FLAGS`, `LINK_FLAGS`,
//!   `FLAGS`) and the positional `compile()` arguments into the typed
//!   configuration model, with the shadow-global snapshot behind
//!   `restoreSettings()`

mod error;
mod extract;
mod os;
mod runtime;

pub use error::{Error, Result};
pub use runtime::{Runtime, BUILD_SCRIPT};

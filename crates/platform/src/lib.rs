//! Platform facts and system abstractions for aedif
//!
//! This crate provides the pieces of the build tool that depend on the
//! host system rather than on any particular project:
//! - Toolchain conventions (POSIX cc/ar vs MSVC cl/lib flag rendering)
//! - Operating system detection for the script-facing `ostype` value
//! - Build-directory layout: ownership sentinel, `bin`/`lib`/`obj` tree,
//!   artifact relocation
//! - Path expansion (`~`)

mod error;
mod layout;
mod os;
mod paths;
mod toolchain;

pub use error::PlatformError;
pub use layout::{ensure_build_dir, init_build_dir, is_aedif_dir, move_into, SENTINEL_FILE};
pub use os::os_name;
pub use paths::expand_path;
pub use toolchain::Toolchain;

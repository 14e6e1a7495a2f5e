//! aedif-core: the build-orchestration engine
//!
//! Turns a declarative target description into an ordered sequence of
//! toolchain invocations — one compile per source file followed by one
//! link/archive step — and owns the string construction those command
//! lines are built on:
//! - `CmdBuf`: the growable command buffer
//! - `ProjectConfig` / `TargetConfig`: the typed configuration model
//! - `compose`: pure command composition per artifact kind
//! - `run_build`: the sequential, blocking orchestrator

mod buffer;
mod build;
mod compose;
mod config;
mod error;

pub use buffer::CmdBuf;
pub use build::{run_build, BuildOptions, CommandRunner, Phase, RunStatus, ShellRunner};
pub use compose::{compose, object_path, BuildPlan};
pub use config::{
    BuildKind, ConfigError, Language, OptLevel, ProjectConfig, Standard, TargetConfig,
};
pub use error::BuildError;

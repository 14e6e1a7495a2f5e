//! Build orchestration
//!
//! Drives one target through its phases: ensure the object directory,
//! compose the command sequence, run each command through the process
//! runner (blocking on each child before issuing the next), and relocate
//! the produced artifact into the canonical output tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use aedif_platform::Toolchain;

use crate::compose::compose;
use crate::config::{ProjectConfig, TargetConfig};
use crate::error::BuildError;

/// Exit outcome of one external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl RunStatus {
    /// A successful exit, for runners that do not track codes
    pub const fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }
}

impl From<std::process::ExitStatus> for RunStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// The process-execution collaborator: runs one fully composed command
/// line and blocks until the child exits.
pub trait CommandRunner {
    fn run(&mut self, cmdline: &str) -> io::Result<RunStatus>;
}

/// Runs commands through the system shell, like the scripts expect
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, cmdline: &str) -> io::Result<RunStatus> {
        let status = if cfg!(windows) {
            Command::new("cmd").args(["/C", cmdline]).status()?
        } else {
            Command::new("sh").args(["-c", cmdline]).status()?
        };
        Ok(status.into())
    }
}

/// Orchestration phase of a target build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    DirectoryEnsured,
    Compiling { current: usize, total: usize },
    Linking,
    Relocated,
    Done,
}

/// Where and how a build runs
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub build_dir: PathBuf,
    pub toolchain: Toolchain,
}

impl BuildOptions {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            toolchain: Toolchain::detect(),
        }
    }
}

/// Build one target: N compiles, one link/archive, one relocation.
///
/// Child exit codes are observed and logged but do not stop the
/// sequence; a script that wants fail-fast behavior can inspect the
/// diagnostics. Command spawn failures abort the target.
pub fn run_build<R: CommandRunner + ?Sized>(
    project: &ProjectConfig,
    target: &TargetConfig,
    options: &BuildOptions,
    runner: &mut R,
) -> Result<(), BuildError> {
    let mut phase = Phase::Init;
    debug!(?phase, target = %target.name, "starting target build");

    let obj_dir = options.build_dir.join("obj").join(&target.name);
    fs::create_dir_all(&obj_dir)?;
    phase = Phase::DirectoryEnsured;
    debug!(?phase, dir = %obj_dir.display());

    let plan = compose(project, target, options.toolchain, &options.build_dir);
    let total = plan.compiles.len();

    for (index, cmdline) in plan.compiles.iter().enumerate() {
        phase = Phase::Compiling {
            current: index + 1,
            total,
        };
        debug!(?phase);
        run_command(runner, cmdline, &target.name)?;
    }

    phase = Phase::Linking;
    debug!(?phase);
    run_command(runner, &plan.link, &target.name)?;

    let produced = Path::new(&plan.artifact);
    let dest_dir = options.build_dir.join(plan.dest_subdir);
    if produced.exists() {
        aedif_platform::move_into(produced, &dest_dir)?;
    } else {
        warn!(
            target_name = %target.name,
            artifact = %plan.artifact,
            "link step did not produce the expected artifact; nothing to relocate"
        );
    }
    phase = Phase::Relocated;
    debug!(?phase);

    phase = Phase::Done;
    debug!(?phase, target = %target.name, "target build finished");
    Ok(())
}

/// Echo and execute one command, surfacing non-zero exits as warnings
fn run_command<R: CommandRunner + ?Sized>(
    runner: &mut R,
    cmdline: &str,
    target_name: &str,
) -> Result<(), BuildError> {
    println!("{}", cmdline);
    let status = runner.run(cmdline)?;
    if !status.success {
        warn!(
            target_name,
            code = ?status.code,
            "command exited with a non-zero status"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildKind, Language, OptLevel, Standard};
    use tempfile::tempdir;

    /// Records every command instead of running it
    #[derive(Default)]
    struct RecordingRunner {
        commands: Vec<String>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, cmdline: &str) -> io::Result<RunStatus> {
            self.commands.push(cmdline.to_string());
            Ok(RunStatus::ok())
        }
    }

    fn project() -> ProjectConfig {
        ProjectConfig {
            language: Language::C,
            compiler: "cc".to_string(),
            standard: Standard::CPlain,
            optimization: OptLevel::O0,
            warnings: vec![],
            errors: vec![],
            compile_flags: vec![],
            link_flags: vec![],
            flags: vec![],
        }
    }

    fn target() -> TargetConfig {
        TargetConfig {
            name: "demo".to_string(),
            sources: vec!["a.c".to_string(), "b.c".to_string(), "c.c".to_string()],
            libs: vec![],
            lib_dirs: vec![],
            includes: vec![],
            kind: BuildKind::Binary,
        }
    }

    #[test]
    fn test_runs_compiles_then_link_in_order() {
        let tmp = tempdir().unwrap();
        let options = BuildOptions {
            build_dir: tmp.path().to_path_buf(),
            toolchain: Toolchain::Cc,
        };
        let mut runner = RecordingRunner::default();

        run_build(&project(), &target(), &options, &mut runner).unwrap();

        assert_eq!(runner.commands.len(), 4);
        assert!(runner.commands[0].contains("-c a.c "));
        assert!(runner.commands[1].contains("-c b.c "));
        assert!(runner.commands[2].contains("-c c.c "));
        assert!(runner.commands[3].contains("-o demo "));
    }

    #[test]
    fn test_object_directory_is_created() {
        let tmp = tempdir().unwrap();
        let options = BuildOptions {
            build_dir: tmp.path().to_path_buf(),
            toolchain: Toolchain::Cc,
        };
        let mut runner = RecordingRunner::default();

        run_build(&project(), &target(), &options, &mut runner).unwrap();

        assert!(tmp.path().join("obj").join("demo").is_dir());
    }

    #[test]
    fn test_failing_commands_do_not_stop_the_sequence() {
        struct FailingRunner {
            calls: usize,
        }
        impl CommandRunner for FailingRunner {
            fn run(&mut self, _cmdline: &str) -> io::Result<RunStatus> {
                self.calls += 1;
                Ok(RunStatus {
                    success: false,
                    code: Some(1),
                })
            }
        }

        let tmp = tempdir().unwrap();
        let options = BuildOptions {
            build_dir: tmp.path().to_path_buf(),
            toolchain: Toolchain::Cc,
        };
        let mut runner = FailingRunner { calls: 0 };

        run_build(&project(), &target(), &options, &mut runner).unwrap();
        assert_eq!(runner.calls, 4);
    }

    #[test]
    fn test_spawn_failure_aborts_the_target() {
        struct BrokenRunner;
        impl CommandRunner for BrokenRunner {
            fn run(&mut self, _cmdline: &str) -> io::Result<RunStatus> {
                Err(io::Error::other("no shell available"))
            }
        }

        let tmp = tempdir().unwrap();
        let options = BuildOptions {
            build_dir: tmp.path().to_path_buf(),
            toolchain: Toolchain::Cc,
        };

        let result = run_build(&project(), &target(), &options, &mut BrokenRunner);
        assert!(matches!(result, Err(BuildError::Io(_))));
    }

    #[test]
    fn test_produced_artifact_is_relocated() {
        /// Pretends to be a linker: creates the artifact file named by
        /// the final command.
        struct TouchingRunner {
            artifact: String,
            seen: usize,
            total: usize,
        }
        impl CommandRunner for TouchingRunner {
            fn run(&mut self, _cmdline: &str) -> io::Result<RunStatus> {
                self.seen += 1;
                if self.seen == self.total {
                    fs::write(&self.artifact, b"ELF").unwrap();
                }
                Ok(RunStatus::ok())
            }
        }

        let tmp = tempdir().unwrap();
        let cwd_artifact = "demo";
        let options = BuildOptions {
            build_dir: tmp.path().to_path_buf(),
            toolchain: Toolchain::Cc,
        };
        fs::create_dir_all(tmp.path().join("bin")).unwrap();

        let mut runner = TouchingRunner {
            artifact: cwd_artifact.to_string(),
            seen: 0,
            total: 4,
        };
        run_build(&project(), &target(), &options, &mut runner).unwrap();

        assert!(tmp.path().join("bin").join("demo").is_file());
        assert!(!Path::new(cwd_artifact).exists());
    }
}

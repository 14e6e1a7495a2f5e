//! Command composition
//!
//! Pure string computation from a `(ProjectConfig, TargetConfig)` pair to
//! the ordered toolchain invocations for one target: one compile command
//! per source file followed by one link/archive command. Nothing here
//! touches the filesystem or spawns processes.

use std::path::Path;

use aedif_platform::Toolchain;

use crate::buffer::CmdBuf;
use crate::config::{BuildKind, ProjectConfig, TargetConfig};

/// The composed command sequence for one target
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// One compile command per source, in source order
    pub compiles: Vec<String>,
    /// Derived object paths, parallel to `compiles`
    pub objects: Vec<String>,
    /// The single link or archive command
    pub link: String,
    /// Filename the link step produces in the working directory
    pub artifact: String,
    /// Canonical output subdirectory the artifact relocates to
    pub dest_subdir: &'static str,
}

/// Compose the full command sequence for a target
///
/// The toolchain convention is decided once per build by the caller and
/// threads through every rendered flag.
pub fn compose(
    project: &ProjectConfig,
    target: &TargetConfig,
    toolchain: Toolchain,
    build_dir: &Path,
) -> BuildPlan {
    let build_dir = build_dir.to_string_lossy();
    let premire = compose_premire(project, toolchain);

    // Shared compile prefix: premire, include dirs, and -fpic for
    // dynamic libraries.
    let mut cmdline = premire.clone();
    for include in &target.includes {
        cmdline.push_str(&toolchain.include_flag(include));
        cmdline.push(' ');
    }
    if target.kind == BuildKind::DynamicLib && !toolchain.pic_flag().is_empty() {
        cmdline.push_str(toolchain.pic_flag());
        cmdline.push(' ');
    }

    let mut compiles = Vec::with_capacity(target.sources.len());
    let mut objects = Vec::with_capacity(target.sources.len());

    let prefix_len = cmdline.len();
    for source in &target.sources {
        cmdline.clear_after(prefix_len as isize);
        let object = object_path(&build_dir, toolchain, &target.name, source);
        cmdline.push_str(toolchain.compile_flag());
        cmdline.push(' ');
        cmdline.push_str(source);
        cmdline.push(' ');
        cmdline.push_str(&toolchain.obj_output(&object));
        compiles.push(cmdline.as_str().to_string());
        objects.push(object);
    }

    let (link, artifact, dest_subdir) = match target.kind {
        BuildKind::Binary => link_binary(project, target, &objects, toolchain),
        BuildKind::StaticLib => link_static(target, &objects, toolchain),
        BuildKind::DynamicLib => link_dynamic(premire, target, &objects, toolchain),
    };

    BuildPlan {
        compiles,
        objects,
        link,
        artifact,
        dest_subdir,
    }
}

/// Derive the object path for a source file:
/// `<build_dir>/obj/<target>/<stem>.<ext>`
///
/// The per-target subdirectory keeps same-named sources of different
/// targets from colliding. A source without an extension keeps its whole
/// filename as the stem.
pub fn object_path(
    build_dir: &str,
    toolchain: Toolchain,
    target_name: &str,
    source: &str,
) -> String {
    let mut buf = CmdBuf::from(source);

    if let Some(pos) = buf.find_from_end('/', 1) {
        buf.clear_before(pos as isize + 1);
    }
    if let Some(pos) = buf.find_from_end('.', 1) {
        buf.clear_after(pos as isize);
    }

    buf.push('.');
    buf.push_str(toolchain.object_ext());
    buf.push_front("/");
    buf.push_front(target_name);
    buf.push_front("/obj/");
    buf.push_front(build_dir);
    buf.into_string()
}

/// The shared flag prefix: compiler, standard, optimization, warnings,
/// errors-as-warnings, compile flags, free flags. The left-to-right
/// order is load-bearing: later flags override earlier ones under normal
/// compiler precedence.
fn compose_premire(project: &ProjectConfig, toolchain: Toolchain) -> CmdBuf {
    let mut premire = CmdBuf::from(project.compiler.as_str());
    premire.push(' ');

    let std_flag = project.standard.flag(toolchain);
    if !std_flag.is_empty() {
        premire.push_str(&std_flag);
        premire.push(' ');
    }

    let opt_flag = project.optimization.flag(toolchain);
    if !opt_flag.is_empty() {
        premire.push_str(opt_flag);
        premire.push(' ');
    }

    for warning in &project.warnings {
        premire.push_str(&toolchain.warning_flag(warning));
        premire.push(' ');
    }
    for error in &project.errors {
        premire.push_str(&toolchain.error_flag(error));
        premire.push(' ');
    }

    premire.concat(compose_flags(&project.compile_flags));
    premire.concat(compose_flags(&project.flags));

    premire
}

fn compose_flags(flags: &[String]) -> CmdBuf {
    let mut buf = CmdBuf::new();
    for flag in flags {
        buf.push_str(flag);
        buf.push(' ');
    }
    buf
}

fn link_binary(
    project: &ProjectConfig,
    target: &TargetConfig,
    objects: &[String],
    toolchain: Toolchain,
) -> (String, String, &'static str) {
    let artifact = toolchain.binary_artifact(&target.name);

    let mut cmdline = CmdBuf::from(project.compiler.as_str());
    cmdline.push(' ');
    cmdline.concat(compose_flags(&project.link_flags));
    cmdline.concat(compose_flags(&project.flags));
    cmdline.push_str(&toolchain.exe_output(&artifact));
    cmdline.push(' ');

    for object in objects {
        cmdline.push_str(object);
        cmdline.push(' ');
    }
    for dir in &target.lib_dirs {
        cmdline.push_str(&toolchain.libdir_flag(dir));
        cmdline.push(' ');
    }
    for lib in &target.libs {
        cmdline.push_str(&toolchain.lib_flag(lib));
        cmdline.push(' ');
    }

    (cmdline.into_string(), artifact, "bin")
}

fn link_static(
    target: &TargetConfig,
    objects: &[String],
    toolchain: Toolchain,
) -> (String, String, &'static str) {
    let artifact = toolchain.static_artifact(&target.name);

    let mut cmdline = CmdBuf::from(toolchain.archiver());
    cmdline.push(' ');
    cmdline.push_str(&toolchain.archive_output(&artifact));
    cmdline.push(' ');
    for object in objects {
        cmdline.push_str(object);
        cmdline.push(' ');
    }

    (cmdline.into_string(), artifact, "lib")
}

fn link_dynamic(
    premire: CmdBuf,
    target: &TargetConfig,
    objects: &[String],
    toolchain: Toolchain,
) -> (String, String, &'static str) {
    let artifact = toolchain.dynamic_artifact(&target.name);

    let mut cmdline = premire;
    if !toolchain.shared_flag().is_empty() {
        cmdline.push_str(toolchain.shared_flag());
        cmdline.push(' ');
    }
    for dir in &target.lib_dirs {
        cmdline.push_str(&toolchain.libdir_flag(dir));
        cmdline.push(' ');
    }
    for lib in &target.libs {
        cmdline.push_str(&toolchain.lib_flag(lib));
        cmdline.push(' ');
    }
    for object in objects {
        cmdline.push_str(object);
        cmdline.push(' ');
    }
    cmdline.push_str(&toolchain.exe_output(&artifact));

    (cmdline.into_string(), artifact, "lib")
}

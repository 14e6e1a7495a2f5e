//! Toolchain conventions and command-line flag rendering
//!
//! aedif drives two families of toolchains: POSIX-style `cc`/`ar` and
//! MSVC-style `cl`/`lib`. The convention is chosen once per build and
//! determines how every include, library and output flag is spelled.

use std::fmt;

/// Supported toolchain conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolchain {
    /// POSIX `cc`-style drivers (gcc, clang) with the `ar` archiver
    Cc,
    /// MSVC `cl`-style drivers with the `lib` archiver
    Msvc,
}

impl Toolchain {
    /// Detect the convention for the current platform
    pub const fn detect() -> Self {
        #[cfg(windows)]
        return Toolchain::Msvc;

        #[cfg(not(windows))]
        Toolchain::Cc
    }

    /// Get the convention name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Toolchain::Cc => "cc",
            Toolchain::Msvc => "msvc",
        }
    }

    /// Render an include-directory flag
    pub fn include_flag(&self, dir: &str) -> String {
        match self {
            Toolchain::Cc => format!("-I{}", dir),
            Toolchain::Msvc => format!("/I{}", dir),
        }
    }

    /// Render a library-search-directory flag
    pub fn libdir_flag(&self, dir: &str) -> String {
        match self {
            Toolchain::Cc => format!("-L{}", dir),
            Toolchain::Msvc => format!("/LIBPATH:{}", dir),
        }
    }

    /// Render a link-against-library argument
    ///
    /// `cl` takes the library filename directly instead of an `-l` flag.
    pub fn lib_flag(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("-l{}", name),
            Toolchain::Msvc => format!("{}.lib", name),
        }
    }

    /// Render a warning-enable flag
    pub fn warning_flag(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("-W{}", name),
            Toolchain::Msvc => format!("/W{}", name),
        }
    }

    /// Render a warning-as-error flag
    pub fn error_flag(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("-Werror={}", name),
            Toolchain::Msvc => format!("/we{}", name),
        }
    }

    /// The link-a-shared-library flag; `cl` wants `/LD`, cc-style drivers
    /// pass nothing extra at link time
    pub const fn shared_flag(&self) -> &'static str {
        match self {
            Toolchain::Cc => "",
            Toolchain::Msvc => "/LD",
        }
    }

    /// The compile-only flag
    pub const fn compile_flag(&self) -> &'static str {
        match self {
            Toolchain::Cc => "-c",
            Toolchain::Msvc => "/c",
        }
    }

    /// The position-independent-code flag, empty where the convention
    /// has none
    pub const fn pic_flag(&self) -> &'static str {
        match self {
            Toolchain::Cc => "-fpic",
            Toolchain::Msvc => "",
        }
    }

    /// Render the object-file output argument for a compile step
    pub fn obj_output(&self, path: &str) -> String {
        match self {
            Toolchain::Cc => format!("-o {}", path),
            Toolchain::Msvc => format!("/Fo:{}", path),
        }
    }

    /// Render the artifact output argument for a link step
    pub fn exe_output(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("-o {}", name),
            Toolchain::Msvc => format!("/Fe:{}", name),
        }
    }

    /// The archiver invocation prefix (program plus fixed mode flags)
    pub const fn archiver(&self) -> &'static str {
        match self {
            Toolchain::Cc => "ar rcu",
            Toolchain::Msvc => "lib",
        }
    }

    /// Render the archive output argument
    ///
    /// `ar` takes the archive filename positionally; `lib` wants `/out:`.
    pub fn archive_output(&self, artifact: &str) -> String {
        match self {
            Toolchain::Cc => artifact.to_string(),
            Toolchain::Msvc => format!("/out:{}", artifact),
        }
    }

    /// File extension for compiled object files
    pub const fn object_ext(&self) -> &'static str {
        match self {
            Toolchain::Cc => "o",
            Toolchain::Msvc => "obj",
        }
    }

    /// Synthesized filename for an executable target
    pub fn binary_artifact(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => name.to_string(),
            Toolchain::Msvc => format!("{}.exe", name),
        }
    }

    /// Synthesized filename for a static library target
    pub fn static_artifact(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("lib{}.a", name),
            Toolchain::Msvc => format!("{}.lib", name),
        }
    }

    /// Synthesized filename for a dynamic library target
    pub fn dynamic_artifact(&self, name: &str) -> String {
        match self {
            Toolchain::Cc => format!("lib{}.so", name),
            Toolchain::Msvc => format!("{}.dll", name),
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_as_str() {
        assert_eq!(Toolchain::Cc.as_str(), "cc");
        assert_eq!(Toolchain::Msvc.as_str(), "msvc");
    }

    #[test]
    fn test_cc_path_flags() {
        assert_eq!(Toolchain::Cc.include_flag("src/include"), "-Isrc/include");
        assert_eq!(Toolchain::Cc.libdir_flag("/usr/lib"), "-L/usr/lib");
        assert_eq!(Toolchain::Cc.lib_flag("m"), "-lm");
    }

    #[test]
    fn test_msvc_path_flags() {
        assert_eq!(Toolchain::Msvc.include_flag("include"), "/Iinclude");
        assert_eq!(Toolchain::Msvc.libdir_flag("deps"), "/LIBPATH:deps");
        assert_eq!(Toolchain::Msvc.lib_flag("user32"), "user32.lib");
    }

    #[test]
    fn test_output_flags() {
        assert_eq!(Toolchain::Cc.obj_output("build/obj/a.o"), "-o build/obj/a.o");
        assert_eq!(Toolchain::Msvc.obj_output("a.obj"), "/Fo:a.obj");
        assert_eq!(Toolchain::Cc.exe_output("app"), "-o app");
        assert_eq!(Toolchain::Msvc.exe_output("app.exe"), "/Fe:app.exe");
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(Toolchain::Cc.binary_artifact("app"), "app");
        assert_eq!(Toolchain::Cc.static_artifact("foo"), "libfoo.a");
        assert_eq!(Toolchain::Cc.dynamic_artifact("foo"), "libfoo.so");

        assert_eq!(Toolchain::Msvc.binary_artifact("app"), "app.exe");
        assert_eq!(Toolchain::Msvc.static_artifact("foo"), "foo.lib");
        assert_eq!(Toolchain::Msvc.dynamic_artifact("foo"), "foo.dll");
    }

    #[test]
    fn test_archiver_invocation() {
        assert_eq!(Toolchain::Cc.archiver(), "ar rcu");
        assert_eq!(Toolchain::Cc.archive_output("libfoo.a"), "libfoo.a");
        assert_eq!(Toolchain::Msvc.archiver(), "lib");
        assert_eq!(Toolchain::Msvc.archive_output("foo.lib"), "/out:foo.lib");
    }

    #[test]
    fn test_warning_flags() {
        assert_eq!(Toolchain::Cc.warning_flag("all"), "-Wall");
        assert_eq!(Toolchain::Cc.error_flag("unused"), "-Werror=unused");
        assert_eq!(Toolchain::Msvc.warning_flag("4"), "/W4");
        assert_eq!(Toolchain::Msvc.error_flag("4996"), "/we4996");
    }

    #[test]
    fn test_detect_does_not_panic() {
        let tc = Toolchain::detect();
        assert!(!tc.as_str().is_empty());
    }
}

//! Typed build configuration
//!
//! The script layer turns loosely-typed Lua values into these records;
//! everything below that boundary works with plain Rust types.

use aedif_platform::Toolchain;
use thiserror::Error;

/// Validation failure while converting script values into a typed
/// configuration. Fatal to the current `compile()` call; the script
/// decides whether to retry or abort the whole build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("type mismatch at line {line}: expected {expected}, got '{found}'")]
    TypeMismatch {
        line: i32,
        expected: String,
        found: String,
    },

    #[error("numbers {expected} are expected at line {line}, got {found}")]
    InvalidNumber {
        line: i32,
        expected: &'static str,
        found: i64,
    },

    #[error("{message} (line {line})")]
    InvalidValue { line: i32, message: String },
}

/// Source language of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    /// Parse the `LANGUAGE` global's spelling
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "C" | "c" => Some(Language::C),
            "Cpp" | "cpp" | "C++" | "c++" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// The language's default standard when `STD` is absent
    pub const fn plain_standard(&self) -> Standard {
        match self {
            Language::C => Standard::CPlain,
            Language::Cpp => Standard::CppPlain,
        }
    }
}

/// Language standard revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standard {
    CPlain,
    C99,
    C11,
    C14,
    C17,
    C23,
    CppPlain,
    Cpp11,
    Cpp14,
    Cpp17,
    Cpp20,
    Cpp23,
}

impl Standard {
    /// Look up a standard by its year number within a language.
    /// Returns `None` for unrecognized years; the caller substitutes the
    /// plain standard after warning.
    pub fn from_year(language: Language, year: i64) -> Option<Self> {
        match language {
            Language::C => match year {
                99 => Some(Standard::C99),
                11 => Some(Standard::C11),
                14 => Some(Standard::C14),
                17 => Some(Standard::C17),
                23 => Some(Standard::C23),
                _ => None,
            },
            Language::Cpp => match year {
                11 => Some(Standard::Cpp11),
                14 => Some(Standard::Cpp14),
                17 => Some(Standard::Cpp17),
                20 => Some(Standard::Cpp20),
                23 => Some(Standard::Cpp23),
                _ => None,
            },
        }
    }

    /// The standard's name as spelled in `-std=` flags; empty for the
    /// plain standards
    pub const fn name(&self) -> &'static str {
        match self {
            Standard::CPlain | Standard::CppPlain => "",
            Standard::C99 => "c99",
            Standard::C11 => "c11",
            Standard::C14 => "c14",
            Standard::C17 => "c17",
            Standard::C23 => "c23",
            Standard::Cpp11 => "c++11",
            Standard::Cpp14 => "c++14",
            Standard::Cpp17 => "c++17",
            Standard::Cpp20 => "c++20",
            Standard::Cpp23 => "c++23",
        }
    }

    /// Render the standard-selection flag for a toolchain; empty when
    /// the standard is plain or the toolchain has no spelling for it
    pub fn flag(&self, toolchain: Toolchain) -> String {
        match toolchain {
            Toolchain::Cc => {
                let name = self.name();
                if name.is_empty() {
                    String::new()
                } else {
                    format!("-std={}", name)
                }
            }
            Toolchain::Msvc => match self {
                Standard::C11 => "/std:c11".to_string(),
                Standard::C17 => "/std:c17".to_string(),
                Standard::Cpp14 => "/std:c++14".to_string(),
                Standard::Cpp17 => "/std:c++17".to_string(),
                Standard::Cpp20 => "/std:c++20".to_string(),
                Standard::Cpp23 => "/std:c++latest".to_string(),
                _ => String::new(),
            },
        }
    }
}

/// Optimization level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
    O0,
    O1,
    O2,
    O3,
    Size,
}

impl OptLevel {
    /// Map the numeric `OPT_LEVEL` values; `"s"` is handled separately
    /// at the scripting boundary
    pub fn from_index(level: i64) -> Option<Self> {
        match level {
            0 => Some(OptLevel::O0),
            1 => Some(OptLevel::O1),
            2 => Some(OptLevel::O2),
            3 => Some(OptLevel::O3),
            _ => None,
        }
    }

    /// Render the optimization flag; level 0 emits nothing
    pub const fn flag(&self, toolchain: Toolchain) -> &'static str {
        match toolchain {
            Toolchain::Cc => match self {
                OptLevel::O0 => "",
                OptLevel::O1 => "-O1",
                OptLevel::O2 => "-O2",
                OptLevel::O3 => "-O3",
                OptLevel::Size => "-Os",
            },
            Toolchain::Msvc => match self {
                OptLevel::O0 => "",
                OptLevel::O1 => "/O1",
                OptLevel::O2 => "/O2",
                OptLevel::O3 => "/Ox",
                OptLevel::Size => "/O1",
            },
        }
    }
}

/// Artifact kind of a target; determines the link-step strategy and the
/// synthesized output filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Binary,
    StaticLib,
    DynamicLib,
}

impl BuildKind {
    /// Map the numeric kind values 0..=2
    pub fn from_index(kind: i64) -> Option<Self> {
        match kind {
            0 => Some(BuildKind::Binary),
            1 => Some(BuildKind::StaticLib),
            2 => Some(BuildKind::DynamicLib),
            _ => None,
        }
    }

    /// Match a kind name case-insensitively. `None` means the name is
    /// unrecognized; the caller warns and falls back to `Binary`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "static" | "s" => Some(BuildKind::StaticLib),
            "dynamic" | "d" => Some(BuildKind::DynamicLib),
            "binary" | "bin" | "b" => Some(BuildKind::Binary),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            BuildKind::Binary => "binary",
            BuildKind::StaticLib => "static",
            BuildKind::DynamicLib => "dynamic",
        }
    }
}

/// Project-wide compiler settings, read from the script globals on every
/// `compile()` call
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub language: Language,
    pub compiler: String,
    pub standard: Standard,
    pub optimization: OptLevel,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
    pub flags: Vec<String>,
}

/// Per-target build description, constructed fresh from the arguments of
/// one `compile()` call
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub name: String,
    pub sources: Vec<String>,
    pub libs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub includes: Vec<String>,
    pub kind: BuildKind,
}

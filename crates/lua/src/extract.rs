//! Script-value extraction and validation
//!
//! Converts the loosely-typed Lua surface into the typed configuration
//! model. Three-tier policy: wrong shapes and out-of-enumeration numbers
//! are fatal (`ConfigError` raised to the script with the call-site line
//! number), a few recoverable misconfigurations are warnings with a safe
//! fallback, everything else parses cleanly.

use mlua::{Lua, MultiValue, Table, Value};
use tracing::{info, warn};

use aedif_core::{
    BuildKind, ConfigError, Language, OptLevel, ProjectConfig, Standard, TargetConfig,
};

/// Project-level globals and the shadow names the first successful parse
/// is mirrored into
pub const PROJECT_GLOBALS: [(&str, &str); 9] = [
    ("LANGUAGE", "AEDIF_LANGUAGE"),
    ("COMPILER", "AEDIF_COMPILER"),
    ("STD", "AEDIF_STD"),
    ("OPT_LEVEL", "AEDIF_OPT_LEVEL"),
    ("WARNINGS", "AEDIF_WARNINGS"),
    ("ERRORS", "AEDIF_ERRORS"),
    ("COMPILE_FLAGS", "AEDIF_COMPILE_FLAGS"),
    ("LINK_FLAGS", "AEDIF_LINK_FLAGS"),
    ("FLAGS", "AEDIF_FLAGS"),
];

/// A script argument that may be absent, a single string, or a list of
/// strings. Decoded once at the scripting boundary, then immediately
/// normalized to a plain `Vec<String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqArg {
    Absent,
    Single(String),
    List(Vec<String>),
}

impl SeqArg {
    /// Decode a Lua value; `what` names the argument in diagnostics
    fn from_value(value: &Value, what: &str, line: i32) -> Result<Self, ConfigError> {
        match value {
            Value::Nil => Ok(SeqArg::Absent),
            Value::String(s) => Ok(SeqArg::Single(s.to_string_lossy().to_string())),
            Value::Table(table) => Ok(SeqArg::List(string_elements(table, what, line)?)),
            other => Err(ConfigError::TypeMismatch {
                line,
                expected: "'nil', 'string' or 'table'".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    fn into_vec(self) -> Vec<String> {
        match self {
            SeqArg::Absent => Vec::new(),
            SeqArg::Single(item) => vec![item],
            SeqArg::List(items) => items,
        }
    }
}

/// The script line number of the current call, for diagnostics
pub fn current_line(lua: &Lua) -> i32 {
    lua.inspect_stack(1, |stack| stack.curr_line()).unwrap_or(-1)
}

/// Read the project-level configuration from the script globals
pub fn project_from_globals(lua: &Lua, line: i32) -> mlua::Result<ProjectConfig> {
    let globals = lua.globals();

    let language = match globals.get::<Value>("LANGUAGE")? {
        Value::String(name) => {
            let name = name.to_string_lossy().to_string();
            Language::from_name(&name).ok_or_else(|| {
                fatal(ConfigError::InvalidValue {
                    line,
                    message: format!("invalid LANGUAGE name '{}' is given", name),
                })
            })?
        }
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'string' for LANGUAGE".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    let compiler = match globals.get::<Value>("COMPILER")? {
        Value::String(name) => name.to_string_lossy().to_string(),
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'string' for COMPILER".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    let standard = match globals.get::<Value>("STD")? {
        Value::Nil => language.plain_standard(),
        Value::Integer(year) => standard_from_year(language, year),
        Value::Number(year) => standard_from_year(language, year as i64),
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'nil' or 'number' for STD".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    // OPT_LEVEL is deliberately stricter than STD: anything outside the
    // defined values is fatal, not a warning.
    let optimization = match globals.get::<Value>("OPT_LEVEL")? {
        Value::Nil => OptLevel::O0,
        Value::Integer(level) => opt_from_index(level, line)?,
        Value::Number(level) => opt_from_index(level as i64, line)?,
        Value::String(s) => {
            if s.to_string_lossy() == "s" {
                OptLevel::Size
            } else {
                return Err(fatal(opt_level_error(line)));
            }
        }
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'nil', 'number' or 'string' for OPT_LEVEL".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    let warnings = string_list_global(&globals, "WARNINGS", line)?;
    let errors = string_list_global(&globals, "ERRORS", line)?;
    let compile_flags = string_list_global(&globals, "COMPILE_FLAGS", line)?;
    let link_flags = string_list_global(&globals, "LINK_FLAGS", line)?;
    let flags = string_list_global(&globals, "FLAGS", line)?;

    Ok(ProjectConfig {
        language,
        compiler,
        standard,
        optimization,
        warnings,
        errors,
        compile_flags,
        link_flags,
        flags,
    })
}

/// Read a target description from the positional `compile()` arguments
pub fn target_from_args(args: MultiValue, line: i32) -> mlua::Result<TargetConfig> {
    let args: Vec<Value> = args.into_iter().collect();
    let arg = |index: usize| args.get(index).cloned().unwrap_or(Value::Nil);

    let name = match arg(0) {
        Value::String(name) => name.to_string_lossy().to_string(),
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'string'".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    let sources = match arg(1) {
        Value::String(src) => vec![src.to_string_lossy().to_string()],
        Value::Table(table) => string_elements(&table, "srcs", line).map_err(fatal)?,
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'string' or 'table'".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };
    if sources.is_empty() {
        return Err(fatal(ConfigError::InvalidValue {
            line,
            message: "at least one source file is required".to_string(),
        }));
    }

    let libs = SeqArg::from_value(&arg(2), "libs", line)
        .map_err(fatal)?
        .into_vec();
    let lib_dirs = SeqArg::from_value(&arg(3), "libdirs", line)
        .map_err(fatal)?
        .into_vec();
    let includes = SeqArg::from_value(&arg(4), "includes", line)
        .map_err(fatal)?
        .into_vec();

    let kind = match arg(5) {
        Value::Nil => BuildKind::Binary,
        Value::Integer(kind) => kind_from_index(kind, line)?,
        Value::Number(kind) => kind_from_index(kind as i64, line)?,
        Value::String(name) => {
            let name = name.to_string_lossy().to_string();
            BuildKind::from_name(&name).unwrap_or_else(|| {
                warn!(
                    "invalid build type string '{}'; compiling it with the type 'binary' instead",
                    name
                );
                info!("the possible build types are 'static', 'dynamic' or 'binary'");
                BuildKind::Binary
            })
        }
        other => {
            return Err(fatal(ConfigError::TypeMismatch {
                line,
                expected: "'nil', 'number' or 'string'".to_string(),
                found: other.type_name().to_string(),
            }))
        }
    };

    Ok(TargetConfig {
        name,
        sources,
        libs,
        lib_dirs,
        includes,
        kind,
    })
}

/// Mirror the working globals into their shadow names so that
/// `restoreSettings()` can revert later script mutation
pub fn save_settings(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    for (name, shadow) in PROJECT_GLOBALS {
        let value: Value = globals.get(name)?;
        globals.set(shadow, value)?;
    }
    Ok(())
}

/// Copy the shadow globals back over the working globals
pub fn restore_settings(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    for (name, shadow) in PROJECT_GLOBALS {
        let value: Value = globals.get(shadow)?;
        globals.set(name, value)?;
    }
    Ok(())
}

fn standard_from_year(language: Language, year: i64) -> Standard {
    Standard::from_year(language, year).unwrap_or_else(|| {
        warn!(
            "invalid STD value {}; using the plain {} standard instead",
            year,
            match language {
                Language::C => "C",
                Language::Cpp => "C++",
            }
        );
        language.plain_standard()
    })
}

fn opt_from_index(level: i64, line: i32) -> mlua::Result<OptLevel> {
    OptLevel::from_index(level).ok_or_else(|| fatal(opt_level_error(line)))
}

fn opt_level_error(line: i32) -> ConfigError {
    ConfigError::InvalidValue {
        line,
        message: "OPT_LEVEL can be either 0, 1, 2, 3 or \"s\"".to_string(),
    }
}

fn kind_from_index(kind: i64, line: i32) -> mlua::Result<BuildKind> {
    BuildKind::from_index(kind).ok_or_else(|| {
        fatal(ConfigError::InvalidNumber {
            line,
            expected: "'0, 1 or 2'",
            found: kind,
        })
    })
}

/// Read a project-level list global: absent means empty, a table must
/// hold only strings
fn string_list_global(globals: &Table, name: &str, line: i32) -> mlua::Result<Vec<String>> {
    match globals.get::<Value>(name)? {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => string_elements(&table, name, line).map_err(fatal),
        other => Err(fatal(ConfigError::TypeMismatch {
            line,
            expected: format!("'nil' or 'table' for {}", name),
            found: other.type_name().to_string(),
        })),
    }
}

/// Collect the sequence part of a table, requiring every element to be
/// a string
fn string_elements(table: &Table, what: &str, line: i32) -> Result<Vec<String>, ConfigError> {
    let mut items = Vec::new();
    for value in table.sequence_values::<Value>() {
        let value = value.map_err(|_| ConfigError::TypeMismatch {
            line,
            expected: format!("'string' elements in {}", what),
            found: "unreadable value".to_string(),
        })?;
        match value {
            Value::String(item) => items.push(item.to_string_lossy().to_string()),
            other => {
                return Err(ConfigError::TypeMismatch {
                    line,
                    expected: format!("'string' elements in {}", what),
                    found: other.type_name().to_string(),
                })
            }
        }
    }
    Ok(items)
}

/// Raise a validation failure to the script
fn fatal(error: ConfigError) -> mlua::Error {
    mlua::Error::runtime(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lua_with(chunk: &str) -> Lua {
        let lua = Lua::new();
        lua.load(chunk).exec().unwrap();
        lua
    }

    #[test]
    fn test_minimal_project() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc""#);
        let project = project_from_globals(&lua, 1).unwrap();

        assert_eq!(project.language, Language::C);
        assert_eq!(project.compiler, "gcc");
        assert_eq!(project.standard, Standard::CPlain);
        assert_eq!(project.optimization, OptLevel::O0);
        assert!(project.warnings.is_empty());
    }

    #[test]
    fn test_full_project() {
        let lua = lua_with(
            r#"
            LANGUAGE = "c++"
            COMPILER = "clang++"
            STD = 17
            OPT_LEVEL = 2
            WARNINGS = { "all", "extra" }
            ERRORS = { "unused" }
            FLAGS = { "-g" }
            "#,
        );
        let project = project_from_globals(&lua, 1).unwrap();

        assert_eq!(project.language, Language::Cpp);
        assert_eq!(project.standard, Standard::Cpp17);
        assert_eq!(project.optimization, OptLevel::O2);
        assert_eq!(project.warnings, vec!["all", "extra"]);
        assert_eq!(project.errors, vec!["unused"]);
        assert_eq!(project.flags, vec!["-g"]);
    }

    #[test]
    fn test_missing_language_is_fatal() {
        let lua = lua_with(r#"COMPILER = "gcc""#);
        let err = project_from_globals(&lua, 7).unwrap_err();
        assert!(err.to_string().contains("LANGUAGE"));
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_unknown_std_warns_and_falls_back() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; STD = 42"#);
        let project = project_from_globals(&lua, 1).unwrap();
        assert_eq!(project.standard, Standard::CPlain);
    }

    #[test]
    fn test_out_of_range_opt_level_is_fatal() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; OPT_LEVEL = 5"#);
        let err = project_from_globals(&lua, 3).unwrap_err();
        assert!(err.to_string().contains("OPT_LEVEL"));
    }

    #[test]
    fn test_bogus_opt_level_string_is_fatal() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; OPT_LEVEL = "fast""#);
        assert!(project_from_globals(&lua, 1).is_err());
    }

    #[test]
    fn test_size_opt_level() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; OPT_LEVEL = "s""#);
        let project = project_from_globals(&lua, 1).unwrap();
        assert_eq!(project.optimization, OptLevel::Size);
    }

    #[test]
    fn test_non_string_warning_element_is_fatal() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; WARNINGS = { "all", 3 }"#);
        let err = project_from_globals(&lua, 1).unwrap_err();
        assert!(err.to_string().contains("WARNINGS"));
    }

    #[test]
    fn test_wrong_warnings_shape_is_fatal() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; WARNINGS = "all""#);
        let err = project_from_globals(&lua, 1).unwrap_err();
        assert!(err.to_string().contains("WARNINGS"));
    }

    fn call_args(lua: &Lua, chunk: &str) -> MultiValue {
        lua.load(chunk).eval().unwrap()
    }

    #[test]
    fn test_target_with_single_source() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return "app", "main.c""#);
        let target = target_from_args(args, 1).unwrap();

        assert_eq!(target.name, "app");
        assert_eq!(target.sources, vec!["main.c"]);
        assert_eq!(target.kind, BuildKind::Binary);
        assert!(target.libs.is_empty());
    }

    #[test]
    fn test_target_with_lists_and_kind() {
        let lua = Lua::new();
        let args = call_args(
            &lua,
            r#"return "net", { "a.c", "b.c" }, { "m" }, "deps", { "include" }, "static""#,
        );
        let target = target_from_args(args, 1).unwrap();

        assert_eq!(target.sources, vec!["a.c", "b.c"]);
        assert_eq!(target.libs, vec!["m"]);
        assert_eq!(target.lib_dirs, vec!["deps"]);
        assert_eq!(target.includes, vec!["include"]);
        assert_eq!(target.kind, BuildKind::StaticLib);
    }

    #[test]
    fn test_target_name_must_be_string() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return 42, "main.c""#);
        let err = target_from_args(args, 9).unwrap_err();
        assert!(err.to_string().contains("type mismatch at line 9"));
        assert!(err.to_string().contains("'string'"));
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_empty_source_list_is_fatal() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return "app", {}"#);
        let err = target_from_args(args, 1).unwrap_err();
        assert!(err.to_string().contains("at least one source"));
    }

    #[test]
    fn test_kind_accepts_indices_and_rejects_out_of_range() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return "app", "main.c", nil, nil, nil, 2"#);
        let target = target_from_args(args, 1).unwrap();
        assert_eq!(target.kind, BuildKind::DynamicLib);

        let args = call_args(&lua, r#"return "app", "main.c", nil, nil, nil, 3"#);
        let err = target_from_args(args, 4).unwrap_err();
        assert!(err.to_string().contains("'0, 1 or 2'"));
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn test_unknown_kind_string_falls_back_to_binary() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return "app", "main.c", nil, nil, nil, "foo""#);
        let target = target_from_args(args, 1).unwrap();
        assert_eq!(target.kind, BuildKind::Binary);
    }

    #[test]
    fn test_kind_strings_are_case_insensitive() {
        let lua = Lua::new();
        let args = call_args(&lua, r#"return "app", "main.c", nil, nil, nil, "Static""#);
        let target = target_from_args(args, 1).unwrap();
        assert_eq!(target.kind, BuildKind::StaticLib);
    }

    #[test]
    fn test_save_and_restore_settings() {
        let lua = lua_with(r#"LANGUAGE = "C"; COMPILER = "gcc"; OPT_LEVEL = 2"#);
        save_settings(&lua).unwrap();

        lua.load(r#"OPT_LEVEL = "garbage"; COMPILER = nil"#).exec().unwrap();
        restore_settings(&lua).unwrap();

        let project = project_from_globals(&lua, 1).unwrap();
        assert_eq!(project.compiler, "gcc");
        assert_eq!(project.optimization, OptLevel::O2);
    }
}

//! Lua runtime for aedif build scripts
//!
//! Owns the Lua state, registers the `aedif` table, and evaluates
//! `aedif.lua`. Each `aedif.compile(...)` call extracts the project and
//! target configuration and drives one target build; a fatal validation
//! error aborts that target only, raised back into the script.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use console::style;
use mlua::{Lua, MultiValue, Value};
use tracing::{debug, warn};

use aedif_core::{run_build, BuildOptions, CommandRunner, ShellRunner};

use crate::error::{Error, Result};
use crate::extract;
use crate::os::register_os_table;

/// Canonical build script filename
pub const BUILD_SCRIPT: &str = "aedif.lua";

/// Shared state behind the script-facing callbacks
struct State {
    options: BuildOptions,
    is_clean: bool,
    runner: RefCell<Box<dyn CommandRunner>>,
    settings_saved: Cell<bool>,
}

/// The Lua runtime environment
pub struct Runtime {
    lua: Lua,
    state: Rc<State>,
}

impl Runtime {
    /// Create a runtime that shells out for real
    pub fn new(build_dir: impl Into<PathBuf>, is_clean: bool) -> Result<Self> {
        Self::with_runner(build_dir, is_clean, Box::new(ShellRunner))
    }

    /// Create a runtime with a custom process runner
    pub fn with_runner(
        build_dir: impl Into<PathBuf>,
        is_clean: bool,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self> {
        let lua = Lua::new();
        let state = Rc::new(State {
            options: BuildOptions::new(build_dir),
            is_clean,
            runner: RefCell::new(runner),
            settings_saved: Cell::new(false),
        });

        register_aedif_table(&lua, &state)?;

        Ok(Self { lua, state })
    }

    /// Evaluate a build script
    pub fn run_file(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(Error::ScriptNotFound(path.display().to_string()));
        }
        debug!("evaluating {}", path.display());

        let source = std::fs::read_to_string(path)?;
        self.lua
            .load(&source)
            .set_name(path.to_string_lossy())
            .exec()?;
        Ok(())
    }

    /// The build directory this runtime writes into
    pub fn build_dir(&self) -> &Path {
        &self.state.options.build_dir
    }

    /// Get access to the raw Lua state (for advanced use cases)
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

/// Register the global `aedif` table
fn register_aedif_table(lua: &Lua, state: &Rc<State>) -> mlua::Result<()> {
    let aedif = lua.create_table()?;

    let st = Rc::clone(state);
    let compile = lua.create_function(move |lua, args: MultiValue| {
        let line = extract::current_line(lua);

        let project = extract::project_from_globals(lua, line)?;
        if !st.settings_saved.get() {
            extract::save_settings(lua)?;
            st.settings_saved.set(true);
        }

        let target = extract::target_from_args(args, line)?;

        println!(
            "\n    {}",
            style(format!("Building {}", target.name)).bold().underlined()
        );

        let mut runner = st.runner.borrow_mut();
        run_build(&project, &target, &st.options, runner.as_mut())
            .map_err(|e| mlua::Error::runtime(e.to_string()))?;
        Ok(())
    })?;
    aedif.set("compile", compile)?;

    let restore = lua.create_function(|lua, ()| extract::restore_settings(lua))?;
    aedif.set("restoreSettings", restore)?;

    let st = Rc::clone(state);
    let execute = lua.create_function(move |_, value: Value| {
        // Non-string arguments are silently ignored, like the scripts
        // expect.
        if let Value::String(cmdline) = value {
            let cmdline = cmdline.to_string_lossy().to_string();
            println!("{}", cmdline);
            let status = st
                .runner
                .borrow_mut()
                .run(&cmdline)
                .map_err(mlua::Error::external)?;
            if !status.success {
                warn!(code = ?status.code, "command exited with a non-zero status");
            }
        }
        Ok(())
    })?;
    aedif.set("execute", execute)?;

    aedif.set("ostype", aedif_platform::os_name())?;
    aedif.set("isclean", state.is_clean)?;

    register_os_table(lua, &aedif)?;

    lua.globals().set("aedif", aedif)?;

    Ok(())
}

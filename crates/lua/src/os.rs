//! Filesystem bindings for build scripts: the `aedif.os` table

use std::fs;
use std::path::{Path, PathBuf};

use mlua::{Lua, Table};

/// Register the `aedif.os` table
pub fn register_os_table(lua: &Lua, aedif: &Table) -> mlua::Result<()> {
    let table = lua.create_table()?;

    table.set("mkdir", lua.create_function(os_mkdir)?)?;
    table.set("mkdir_all", lua.create_function(os_mkdir_all)?)?;
    table.set("remove", lua.create_function(os_remove)?)?;
    table.set("rename", lua.create_function(os_rename)?)?;
    table.set("copy", lua.create_function(os_copy)?)?;
    table.set("isdir", lua.create_function(os_isdir)?)?;
    table.set("isfile", lua.create_function(os_isfile)?)?;
    table.set("issym", lua.create_function(os_issym)?)?;
    table.set("concat", lua.create_function(os_concat)?)?;

    aedif.set("os", table)?;

    Ok(())
}

fn os_mkdir(_lua: &Lua, dirname: String) -> mlua::Result<()> {
    Ok(fs::create_dir(dirname)?)
}

fn os_mkdir_all(_lua: &Lua, dirname: String) -> mlua::Result<()> {
    Ok(fs::create_dir_all(dirname)?)
}

fn os_remove(lua: &Lua, (name, kind): (String, String)) -> mlua::Result<()> {
    match kind.as_str() {
        "f" | "file" => fs::remove_file(name)?,
        "d" | "dir" => fs::remove_dir(name)?,
        "r" => fs::remove_dir_all(name)?,
        _ => lua.warning("invalid second parameter. do nothing...", false),
    }

    Ok(())
}

fn os_rename(_lua: &Lua, (from, to): (String, String)) -> mlua::Result<()> {
    Ok(fs::rename(from, to)?)
}

fn os_copy(_lua: &Lua, (from, to): (String, String)) -> mlua::Result<()> {
    fs::copy(from, to)?;
    Ok(())
}

fn os_isdir(_lua: &Lua, path: String) -> mlua::Result<bool> {
    Ok(Path::new(&path).is_dir())
}

fn os_isfile(_lua: &Lua, path: String) -> mlua::Result<bool> {
    Ok(Path::new(&path).is_file())
}

fn os_issym(_lua: &Lua, path: String) -> mlua::Result<bool> {
    Ok(fs::symlink_metadata(&path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false))
}

fn os_concat(_lua: &Lua, paths: Vec<String>) -> mlua::Result<String> {
    let mut output = PathBuf::new();

    for path in paths.iter().map(Path::new) {
        output.push(path);
    }

    Ok(output.to_string_lossy().to_string())
}

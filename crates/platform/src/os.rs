//! Operating system detection

/// Operating system name as exposed to build scripts via `aedif.ostype`
#[cfg(target_os = "windows")]
pub const fn os_name() -> &'static str {
    "windows"
}

#[cfg(target_os = "linux")]
pub const fn os_name() -> &'static str {
    "linux"
}

#[cfg(target_os = "macos")]
pub const fn os_name() -> &'static str {
    "macos"
}

#[cfg(target_os = "freebsd")]
pub const fn os_name() -> &'static str {
    "freeBSD"
}

#[cfg(not(any(
    target_os = "windows",
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd"
)))]
pub const fn os_name() -> &'static str {
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_name_is_known() {
        assert!(["windows", "linux", "macos", "freeBSD", ""].contains(&os_name()));
    }
}

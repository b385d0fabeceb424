//! Wrapper script that sets up the environment before running the real binary

use std::collections::BTreeMap;
use std::path::Path;

use crate::install::error::InstallError;

/// Placeholder for the install path in shim environment values
const INSTALL_PLACEHOLDER: &str = "{install}";

/// Quotes a value for a POSIX shell
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Renders the shim script for `binary`
pub fn render_shim(binary: &Path, env: &BTreeMap<String, String>, install_path: &Path) -> String {
    let install = install_path.to_string_lossy();
    let mut script = String::from("#!/usr/bin/env sh\n");

    for (name, value) in env {
        let value = value.replace(INSTALL_PLACEHOLDER, &install);
        script.push_str(&format!("export {}={}\n", name, shell_quote(&value)));
    }

    script.push_str(&format!(
        "exec {} \"$@\"\n",
        shell_quote(&binary.to_string_lossy())
    ));
    script
}

/// Writes an executable shim at `shim_path`
pub fn write_shim(
    shim_path: &Path,
    binary: &Path,
    env: &BTreeMap<String, String>,
    install_path: &Path,
) -> Result<(), InstallError> {
    if let Some(parent) = shim_path.parent() {
        std::fs::create_dir_all(parent).map_err(InstallError::io(parent))?;
    }

    std::fs::write(shim_path, render_shim(binary, env, install_path))
        .map_err(InstallError::io(shim_path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(shim_path, std::fs::Permissions::from_mode(0o755))
            .map_err(InstallError::io(shim_path))?;
    }

    Ok(())
}

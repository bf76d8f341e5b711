// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process runner and PATH probing for the external programs.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};

use scanbind_core::error::{Result, ScanbindError};
use scanbind_core::BindConfig;
use tracing::{debug, instrument};

use crate::ghostscript::GHOSTSCRIPT;
use crate::ocrmypdf::OCRMYPDF;

/// Whether `program --version` can be run.
pub fn is_on_path(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Fail with [`ScanbindError::ToolMissing`] unless `program` is runnable.
pub fn require(program: &str) -> Result<()> {
    if is_on_path(program) {
        Ok(())
    } else {
        Err(ScanbindError::ToolMissing {
            tool: program.to_string(),
        })
    }
}

/// Check every program a run with `config` will call.
///
/// Ghostscript is always needed for page compression, whichever merge
/// backend is selected.
pub fn preflight(config: &BindConfig) -> Result<()> {
    require(GHOSTSCRIPT)?;
    if config.ocr_enabled() {
        require(OCRMYPDF)?;
    }
    Ok(())
}

/// Run `program` to completion.
///
/// A program that cannot be found becomes [`ScanbindError::ToolMissing`]; any
/// other failure is passed to `failure` with a description including the
/// program's stderr.
#[instrument(skip(args, failure))]
pub(crate) fn run(
    program: &str,
    args: &[OsString],
    failure: impl FnOnce(String) -> ScanbindError,
) -> Result<()> {
    debug!(?args, "Running external program");
    let output = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ScanbindError::ToolMissing {
                tool: program.to_string(),
            });
        }
        Err(err) => return Err(failure(format!("failed to start {program}: {err}"))),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failure(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

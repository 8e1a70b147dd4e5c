//! Publishing run results to the invoking environment.
//!
//! Inside GitHub Actions outputs are appended to the file named by
//! `GITHUB_OUTPUT` and failures are reported with an `::error::` workflow
//! command. Elsewhere outputs are only logged.
use log::*;
use std::{env, fs::OpenOptions, io::Write, path::PathBuf};

use crate::Result;

const DELIMITER_PREFIX: &str = "PR_CHANGELOG_EOF";

#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    path: Option<PathBuf>,
    in_actions: bool,
}

impl ActionOutput {
    pub fn new(path: Option<PathBuf>, in_actions: bool) -> Self {
        Self { path, in_actions }
    }

    pub fn from_env() -> Self {
        let path = env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let in_actions = env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        Self::new(path, in_actions)
    }

    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            info!("output {name}: {value}");
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(format_output(name, value).as_bytes())?;

        debug!("wrote output {name} to {}", path.display());

        Ok(())
    }

    pub fn set_failed(&self, message: &str) {
        if self.in_actions {
            println!("::error::{}", escape_data(message));
        }
    }
}

/// `name=value` for single-line values, heredoc form otherwise.
fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }

    let mut delimiter = DELIMITER_PREFIX.to_string();
    let mut n = 0;
    while value.contains(&delimiter) {
        n += 1;
        delimiter = format!("{DELIMITER_PREFIX}_{n}");
    }

    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

//! # Git Plumbing
//!
//! Shallow-clones upstream documentation repositories using the system git
//! command, which automatically handles credential helpers and proxy
//! configuration from `~/.gitconfig`.
//!
//! An access token (from the `GH_TOKEN` environment variable) is injected
//! into the clone URL as userinfo for private or rate-limited repositories.
//! The token never appears in error messages; failures are reported against
//! the plain `https://github.com/owner/name.git` form.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use url::Url;

use crate::error::{Error, Result};

/// Default time allowed for a single clone before it is treated as failed.
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(300);

/// Build the HTTPS clone URL for an `owner/name` repository reference,
/// injecting the token as userinfo when present.
pub fn clone_url(repo: &str, token: Option<&str>) -> Result<String> {
    let mut url = Url::parse(&format!("https://github.com/{}.git", repo))?;
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        url.set_username(token).map_err(|_| Error::GitClone {
            repo: repo.to_string(),
            message: "cannot apply access token to clone URL".to_string(),
            hint: None,
        })?;
    }
    Ok(url.into())
}

/// Shallow-clone `owner/name` into `target_dir`, replacing any previous
/// checkout there.
///
/// The clone runs with `--depth=1 --quiet` against the repository's default
/// branch. Exceeding `timeout` kills the clone and reports it as a clone
/// failure.
pub fn clone_shallow(
    repo: &str,
    token: Option<&str>,
    target_dir: &Path,
    timeout: Duration,
) -> Result<()> {
    // git won't clone into an existing non-empty directory
    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let url = clone_url(repo, token)?;

    let mut child = Command::new("git")
        .args(["clone", "--depth=1", "--quiet", &url])
        .arg(target_dir)
        // never fall into an interactive credential prompt
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitClone {
            repo: repo.to_string(),
            message: e.to_string(),
            hint: Some("is git installed and on PATH?".to_string()),
        })?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::GitClone {
                        repo: repo.to_string(),
                        message: format!("timed out after {}s", timeout.as_secs()),
                        hint: Some(
                            "raise --clone-timeout or check network access".to_string(),
                        ),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    };

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            use std::io::Read;
            let _ = pipe.read_to_string(&mut stderr);
        }
        let stderr = redact(&stderr, token);

        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("could not read Username")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, set {} to a personal access token.\n\
                Error: {}",
                crate::config::TOKEN_ENV,
                stderr
            )
        } else {
            stderr
        };

        return Err(Error::GitClone {
            repo: repo.to_string(),
            message,
            hint: None,
        });
    }

    Ok(())
}

/// Replace any occurrence of the token in tool output before it reaches an
/// error message or a log line.
fn redact(text: &str, token: Option<&str>) -> String {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => text.replace(token, "***"),
        None => text.to_string(),
    }
}

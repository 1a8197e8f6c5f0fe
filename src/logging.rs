use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DebugLogRotation};

/// Keeps the background log writer alive; drop it last.
#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

/// Initialize logging.
///
/// With `debug` enabled, logs go to `~/.config/rankcheck/rankcheck-debug.log`
/// by default (or `debug_log_path`), rotated per `debug_log_rotation`.
/// Otherwise warnings and errors go to stderr. stdout is never used: it
/// carries the tool protocol. `RUST_LOG` overrides the default filter.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        install(writer, "rankcheck=warn,warn");
        return Ok(Some(LogGuard(guard)));
    }

    let rotation = config.debug_log_rotation.unwrap_or(DebugLogRotation::Session);
    let (writer, log_path, guard) = open_writer(config, rotation)?;
    install(writer, "rankcheck=debug,warn");

    tracing::info!("debug logging enabled");
    tracing::info!(log_file = %log_path.display(), rotation = ?rotation, "writing logs to file");

    Ok(Some(LogGuard(guard)))
}

fn install(writer: NonBlocking, default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.
}

fn open_writer(
    config: &Config,
    rotation: DebugLogRotation,
) -> Result<(NonBlocking, PathBuf, WorkerGuard)> {
    let base = resolve_base_log_path(config.debug_log_path.as_deref())?;
    let keep = config.debug_log_keep;

    match rotation {
        DebugLogRotation::None => {
            let file = open_append(&base)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            Ok((non_blocking, base, guard))
        }
        DebugLogRotation::Daily => {
            let (dir, base_name) = split_dir_and_name(&base)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            // Clean up before opening new writer to keep directory tidy.
            cleanup_rotated_logs(&dir, RotationKind::Daily { base_name: base_name.clone() }, keep)?;

            let appender = tracing_appender::rolling::daily(&dir, &base_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            Ok((non_blocking, base, guard))
        }
        DebugLogRotation::Session => {
            let (dir, base_name) = split_dir_and_name(&base)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            cleanup_rotated_logs(&dir, RotationKind::Session { base_name: base_name.clone() }, keep)?;

            let session_path = build_session_log_path(&dir, &base_name);
            let file = open_append(&session_path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            Ok((non_blocking, session_path, guard))
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn default_log_path() -> Result<PathBuf> {
    let config_path = crate::config::config_path()?;
    Ok(config_path.with_file_name("rankcheck-debug.log"))
}

fn resolve_base_log_path(config_value: Option<&str>) -> Result<PathBuf> {
    let Some(raw) = config_value else {
        return default_log_path();
    };

    let expanded = expand_tilde(raw);
    let path = PathBuf::from(expanded);

    // If it ends with a path separator, treat as directory.
    if raw.ends_with(std::path::MAIN_SEPARATOR) {
        return Ok(path.join("rankcheck-debug.log"));
    }

    // If it exists and is a directory, treat as directory.
    if path.is_dir() {
        return Ok(path.join("rankcheck-debug.log"));
    }

    // If it has an extension, treat as file path. Otherwise also treat as file path.
    Ok(path)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    Ok(())
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid debug_log_path: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

fn build_session_log_path(dir: &Path, base_name: &str) -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let file_name = format!("{base_name}.session-{ts}");
    dir.join(file_name)
}

enum RotationKind {
    Daily { base_name: String },
    Session { base_name: String },
}

fn cleanup_rotated_logs(dir: &Path, kind: RotationKind, keep: Option<usize>) -> Result<()> {
    let keep = keep.unwrap_or(match kind {
        RotationKind::Daily { .. } => 7,
        RotationKind::Session { .. } => 20,
    });

    if keep == 0 {
        return Ok(());
    }

    let prefix = match &kind {
        // tracing_appender::rolling::daily uses: `{base_name}.{YYYY-MM-DD}`
        RotationKind::Daily { base_name } => format!("{base_name}."),
        RotationKind::Session { base_name } => format!("{base_name}.session-"),
    };

    let mut candidates: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else { continue };
        if name.starts_with(&prefix) {
            candidates.push(name.to_string());
        }
    }

    candidates.sort();
    candidates.reverse(); // newest first (lexicographic works for our suffix formats)

    for (idx, name) in candidates.iter().enumerate() {
        if idx < keep {
            continue;
        }
        let path = dir.join(name);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(error = %e, file = %path.display(), "failed to remove old log file");
        }
    }

    Ok(())
}

/// Prefix of Google API keys
const GOOGLE_KEY_PREFIX: &str = "AIza";

/// Best-effort redaction of Google API keys (`AIza...`) before logging.
pub fn redact_secrets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;
    let prefix_len = GOOGLE_KEY_PREFIX.len();

    while i < input.len() {
        if input[i..].starts_with(GOOGLE_KEY_PREFIX) && i + prefix_len < input.len() {
            let mut j = i + prefix_len;
            while j < input.len() {
                match bytes[j] {
                    b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => j += 1,
                    _ => break,
                }
            }

            // Require a minimum length to reduce false positives.
            if j.saturating_sub(i + prefix_len) >= 16 {
                out.push_str(&input[last..i]);
                out.push_str("AIza***REDACTED***");
                last = j;
                i = j;
                continue;
            }
        }

        match input[i..].chars().next() {
            Some(ch) => i += ch.len_utf8(),
            None => break,
        }
    }

    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_google_key() {
        let key = "AIzaSyA1234567890abcdefghijklmnopqrstu";
        let input = format!("request failed: key={}&cx=abc", key);
        let redacted = redact_secrets(&input);
        assert!(!redacted.contains(key));
        assert_eq!(redacted, "request failed: key=AIza***REDACTED***&cx=abc");
    }

    #[test]
    fn test_redact_leaves_short_and_unicode_text() {
        assert_eq!(redact_secrets("AIza short"), "AIza short");
        assert_eq!(redact_secrets("検索 AIza"), "検索 AIza");
        assert_eq!(redact_secrets(""), "");
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/var/log/x.log"), "/var/log/x.log");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), format!("{}/logs", home.display()));
        }
    }

    #[test]
    fn test_cleanup_keeps_newest_session_logs() {
        let dir = tempfile::TempDir::new().unwrap();
        for ts in ["20240101-000000", "20240102-000000", "20240103-000000"] {
            std::fs::write(dir.path().join(format!("rankcheck.log.session-{ts}")), "").unwrap();
        }
        std::fs::write(dir.path().join("unrelated.txt"), "").unwrap();

        cleanup_rotated_logs(
            dir.path(),
            RotationKind::Session {
                base_name: "rankcheck.log".to_string(),
            },
            Some(2),
        )
        .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "rankcheck.log.session-20240102-000000",
                "rankcheck.log.session-20240103-000000",
                "unrelated.txt",
            ]
        );
    }
}

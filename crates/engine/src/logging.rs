//! File-backed logging.
//!
//! The terminal is busy showing frames, so log records go to a file. The file
//! is rotated to `<path>.<unix-seconds>` (plus `.<n>` when that name is taken)
//! once it would grow past `max_size_bytes`.
//!
//! Environment:
//! - `GG_LOG_FILE`: log path (default `gg.log`)
//! - `GG_LOG_LEVEL`: `error`, `warn`, `info`, `debug` or `trace` (default `warn`)
//! - `GG_LOG_MAX_MB`: rotation threshold in MiB (default 10)
//! - `GG_DEBUG`: forces `debug`

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::is_truthy;

const DEFAULT_LOG_FILE: &str = "gg.log";
const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: Level,
    pub max_size_bytes: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
            level: Level::WARN,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let path = get("GG_LOG_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(d.path);
        let mut level = get("GG_LOG_LEVEL")
            .and_then(|s| s.trim().parse::<Level>().ok())
            .unwrap_or(d.level);
        if get("GG_DEBUG").as_deref().is_some_and(is_truthy) && level < Level::DEBUG {
            level = Level::DEBUG;
        }
        let max_size_bytes = get("GG_LOG_MAX_MB")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|mb| *mb > 0)
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(d.max_size_bytes);
        Self {
            path,
            level,
            max_size_bytes,
        }
    }
}

/// Build a dispatch writing plain-text records to the configured file.
///
/// Nothing is installed globally; hand the result to a
/// [`Context`](crate::Context).
pub fn dispatch(config: &LogConfig) -> io::Result<Dispatch> {
    let writer = RotatingFile::open(&config.path, config.max_size_bytes)?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(config.level)
        .with_thread_names(true)
        .finish();
    Ok(Dispatch::new(subscriber))
}

/// Append-only log file that rotates itself by size.
#[derive(Debug, Clone)]
pub struct RotatingFile {
    inner: Arc<Mutex<RotatingState>>,
}

#[derive(Debug)]
struct RotatingState {
    path: PathBuf,
    file: File,
    written: u64,
    max_size_bytes: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_size_bytes: u64) -> io::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = open_append(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingState {
                path: path.to_path_buf(),
                file,
                written,
                max_size_bytes,
            })),
        })
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RotatingState {
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let rotated = free_rotation_path(&self.path, stamp);
        fs::rename(&self.path, &rotated)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

/// `<path>.<stamp>`, or `<path>.<stamp>.<n>` if rotations share a second.
fn free_rotation_path(path: &Path, stamp: u64) -> PathBuf {
    let base = {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".{stamp}"));
        PathBuf::from(name)
    };
    let mut candidate = base.clone();
    let mut n = 1u32;
    while candidate.exists() {
        let mut name = base.clone().into_os_string();
        name.push(format!(".{n}"));
        candidate = PathBuf::from(name);
        n += 1;
    }
    candidate
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        if state.written > 0 && state.written + buf.len() as u64 > state.max_size_bytes {
            state.rotate()?;
        }
        let n = state.file.write(buf)?;
        state.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        assert_eq!(LogConfig::from_lookup(|_| None), LogConfig::default());

        let cfg = LogConfig::from_lookup(|k| match k {
            "GG_LOG_FILE" => Some("logs/game.log".into()),
            "GG_LOG_LEVEL" => Some("info".into()),
            "GG_LOG_MAX_MB" => Some("2".into()),
            _ => None,
        });
        assert_eq!(cfg.path, PathBuf::from("logs/game.log"));
        assert_eq!(cfg.level, Level::INFO);
        assert_eq!(cfg.max_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn debug_flag_raises_level() {
        let cfg = LogConfig::from_lookup(|k| (k == "GG_DEBUG").then(|| "1".to_string()));
        assert_eq!(cfg.level, Level::DEBUG);

        let cfg = LogConfig::from_lookup(|k| match k {
            "GG_DEBUG" => Some("1".into()),
            "GG_LOG_LEVEL" => Some("trace".into()),
            _ => None,
        });
        assert_eq!(cfg.level, Level::TRACE);
    }

    #[test]
    fn rotates_when_size_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gg.log");
        let mut file = RotatingFile::open(&path, 16).unwrap();

        file.write_all(b"0123456789").unwrap();
        file.write_all(b"abcdefghij").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"abcdefghij");
        let rotated: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("gg.log."))
            .collect();
        assert_eq!(rotated.len(), 1);
        assert_eq!(fs::read(rotated[0].path()).unwrap(), b"0123456789");
    }

    #[test]
    fn rotations_within_one_second_keep_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gg.log");
        let mut file = RotatingFile::open(&path, 8).unwrap();

        for chunk in [b"11111111", b"22222222", b"33333333", b"44444444"] {
            file.write_all(chunk).unwrap();
        }
        file.flush().unwrap();

        let mut contents: Vec<Vec<u8>> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| fs::read(e.path()).unwrap())
            .collect();
        contents.sort();
        assert_eq!(
            contents,
            vec![
                b"11111111".to_vec(),
                b"22222222".to_vec(),
                b"33333333".to_vec(),
                b"44444444".to_vec(),
            ]
        );
    }

    #[test]
    fn dispatch_writes_records_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            path: dir.path().join("gg.log"),
            level: Level::INFO,
            ..LogConfig::default()
        };
        let d = dispatch(&config).unwrap();
        tracing::dispatcher::with_default(&d, || {
            tracing::info!(scene = "menu", "entering scene");
            tracing::debug!("filtered out");
        });

        let text = fs::read_to_string(&config.path).unwrap();
        assert!(text.contains("entering scene"));
        assert!(text.contains("scene=\"menu\""));
        assert!(!text.contains("filtered out"));
    }
}

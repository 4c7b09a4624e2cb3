use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

struct Logger {
    game: Mutex<File>,
    error: Mutex<File>,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Opens `log/game.log` and `log/error.log` under `root`. Safe to call more
/// than once; only the first call takes effect. Until it is called, all log
/// functions are no-ops.
pub fn init(root: &Path) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let log_dir = root.join("log");
    std::fs::create_dir_all(&log_dir)
        .map_err(|err| format!("log directory create failed: {}", err))?;

    let game = open_log(&log_dir, "game.log")?;
    let error = open_log(&log_dir, "error.log")?;

    LOGGER
        .set(Logger {
            game: Mutex::new(game),
            error: Mutex::new(error),
        })
        .map_err(|_| "log system already initialized".to_string())?;
    Ok(())
}

fn open_log(dir: &Path, name: &str) -> Result<File, String> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(name))
        .map_err(|err| format!("open log {} failed: {}", name, err))
}

pub fn log_game(message: &str) {
    if let Some(logger) = LOGGER.get() {
        write_line(&logger.game, message);
    }
}

pub fn log_error(message: &str) {
    if let Some(logger) = LOGGER.get() {
        write_line(&logger.error, message);
    }
}

fn write_line(file: &Mutex<File>, message: &str) {
    let timestamp = unix_timestamp();
    if let Ok(mut file) = file.lock() {
        let _ = writeln!(file, "{timestamp} {message}");
        let _ = file.flush();
    }
}

fn unix_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

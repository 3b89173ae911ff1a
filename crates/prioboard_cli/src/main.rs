//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `prioboard_core` linkage with deterministic output.
//! - With a database path argument, print the persisted board as text.
//! - With `--log-dir <dir>`, initialize core rolling-file logging first.
//!
//! # Invariants
//! - Logging is initialized at most once, before the database is opened.
//! - A logging failure is reported on stderr and does not abort the run.

use prioboard_core::db::open_db;
use prioboard_core::{
    default_log_level, init_logging, render, BoardConfig, BoardPersistence,
    SqliteSnapshotRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    db_path: Option<String>,
    log_dir: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--log-dir" {
                let dir = args
                    .next()
                    .ok_or_else(|| "`--log-dir` needs a directory".to_string())?;
                parsed.log_dir = Some(PathBuf::from(dir));
            } else if parsed.db_path.is_none() {
                parsed.db_path = Some(arg);
            } else {
                return Err(format!("unexpected argument `{arg}`"));
            }
        }
        Ok(parsed)
    }
}

fn main() -> ExitCode {
    println!("prioboard_core ping={}", prioboard_core::ping());
    println!("prioboard_core version={}", prioboard_core::core_version());

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: prioboard_cli [--log-dir <dir>] [<db-path>]");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &args.log_dir {
        if let Err(err) = init_logging(default_log_level().as_str(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = args.db_path else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteSnapshotRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("board database is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config = BoardConfig::default();
    let board = BoardPersistence::new(repo, config.storage_key.clone()).load();
    print!("{}", render(&board, &config));
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use std::path::PathBuf;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_smoke_only() {
        assert_eq!(CliArgs::parse(args(&[])).unwrap(), CliArgs::default());
    }

    #[test]
    fn log_dir_flag_is_read_in_any_position() {
        let parsed = CliArgs::parse(args(&["board.db", "--log-dir", "logs"])).unwrap();
        assert_eq!(parsed.db_path.as_deref(), Some("board.db"));
        assert_eq!(parsed.log_dir, Some(PathBuf::from("logs")));

        let parsed = CliArgs::parse(args(&["--log-dir", "logs", "board.db"])).unwrap();
        assert_eq!(parsed.db_path.as_deref(), Some("board.db"));
    }

    #[test]
    fn dangling_flag_and_extra_path_are_rejected() {
        assert!(CliArgs::parse(args(&["--log-dir"])).is_err());
        assert!(CliArgs::parse(args(&["a.db", "b.db"])).is_err());
    }
}

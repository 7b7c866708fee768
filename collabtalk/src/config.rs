use clap::Parser;
use std::path::PathBuf;

/// Log into AI Enhanced CollabTalk from the terminal
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// Which server to log into. May include a path prefix.
    #[clap(long, env = "COLLABTALK_SERVER", default_value = "http://localhost:3000")]
    pub server: String,

    /// Where should we store the session token and logs?
    #[clap(long, env = "COLLABTALK_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "Adley Services", "CollabTalk")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

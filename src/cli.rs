use clap::{Parser, ArgAction};
use std::path::PathBuf;
use shapeio::error::Result;
use shapeio::options::{parse_rate, Direction, FileConfig, Options};

#[derive(Parser, Debug)]
#[command(name = "shapeio")]
#[command(version = "0.1.0")]
#[command(about = "Copy a stream while limiting its average transfer rate", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Print help information (use --help)
    #[arg(long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Source file ("-" or omitted for stdin)
    pub source: Option<String>,

    /// Destination file ("-" or omitted for stdout)
    pub destination: Option<String>,

    // 基本オプション
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error messages
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    // 転送オプション
    /// Limit I/O bandwidth (KiB/s, or with B/K/M/G suffix; 0 = unlimited)
    #[arg(long = "bwlimit")]
    pub bwlimit: Option<String>,

    /// Shape the reading or the writing side (read, write)
    #[arg(long = "direction")]
    pub direction: Option<String>,

    /// Size of each read in bytes
    #[arg(short = 'B', long = "block-size")]
    pub block_size: Option<usize>,

    // 出力・表示オプション
    /// Show progress during transfer
    #[arg(long = "progress")]
    pub progress: bool,

    /// Give some transfer stats
    #[arg(long = "stats")]
    pub stats: bool,

    /// Output numbers in a human-readable format
    #[arg(short = 'h', long = "human-readable")]
    pub human_readable: bool,

    /// Log what we're doing to the specified FILE
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Read defaults from a TOML config FILE
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// CLIからOptionsに変換
    ///
    /// 設定ファイルを先に読み込み、コマンドラインの指定で上書きする。
    pub fn into_options(self) -> Result<Options> {
        let mut options = Options::default();

        if let Some(ref path) = self.config {
            let config = FileConfig::load(path)?;
            options.apply_config(&config)?;
            options.config = Some(path.clone());
        }

        // 基本オプション
        options.verbose = self.verbose;
        options.quiet = self.quiet;

        // 転送オプション
        if let Some(rate) = self.bwlimit {
            options.bwlimit = Some(parse_rate(&rate)?);
        }
        if let Some(direction) = self.direction {
            options.direction = direction.parse::<Direction>()?;
        }
        if let Some(block_size) = self.block_size {
            options.block_size = block_size;
        }

        // 出力・表示オプション
        options.progress |= self.progress;
        options.stats |= self.stats;
        options.human_readable |= self.human_readable;
        if self.log_file.is_some() {
            options.log_file = self.log_file;
        }

        options.validate()?;
        Ok(options)
    }
}

/// "-" は標準入出力
pub fn endpoint(arg: &Option<String>) -> Option<PathBuf> {
    match arg.as_deref() {
        None | Some("-") => None,
        Some(path) => Some(PathBuf::from(path)),
    }
}

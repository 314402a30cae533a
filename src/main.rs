mod cli;

use clap::Parser;
use cli::{endpoint, Cli};
use shapeio::error::Result;
use shapeio::output;
use shapeio::transport::LocalTransport;

fn main() -> Result<()> {
    // コマンドライン引数のパース
    let cli = Cli::parse();

    // ロガーの初期化 (RUST_LOG が優先)
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let source = endpoint(&cli.source);
    let destination = endpoint(&cli.destination);

    // Optionsに変換
    let options = cli.into_options()?;

    // ログファイルの初期化（--log-file オプションが指定されている場合）
    if let Some(ref log_file_path) = options.log_file {
        match output::init_logger(log_file_path) {
            Ok(_) => {
                output::log_with_timestamp("shapeio v0.1.0 started");
                output::log(&format!(
                    "Command: shapeio {} {}",
                    source.as_ref().map_or("-".into(), |p| p.display().to_string()),
                    destination.as_ref().map_or("-".into(), |p| p.display().to_string())
                ));
            }
            Err(e) => {
                eprintln!("Warning: Failed to initialize log file: {}", e);
            }
        }
    }

    if options.verbose > 0 && !options.quiet {
        eprintln!("shapeio v0.1.0");
        if options.rate_limit() > 0.0 {
            eprintln!(
                "Rate limit: {}/s ({:?} side)",
                output::human_readable_size(options.rate_limit() as u64),
                options.direction
            );
        } else {
            eprintln!("Rate limit: unlimited");
        }
    }

    let transport = LocalTransport::new(options.clone());
    let stats = match transport.copy(source.as_deref(), destination.as_deref()) {
        Ok(stats) => stats,
        Err(e) => {
            output::log_with_timestamp(&format!("transfer failed: {}", e));
            return Err(e);
        }
    };

    if options.stats && !options.quiet {
        stats.print(options.human_readable);
    }

    Ok(())
}

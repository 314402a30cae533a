use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::{Result, ShapeError};

/// 帯域制限をかける側
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Read,
    Write,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Read
    }
}

impl std::str::FromStr for Direction {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Direction::Read),
            "write" => Ok(Direction::Write),
            _ => Err(ShapeError::InvalidOption(format!(
                "Invalid direction: {}. Valid options: read, write",
                s
            ))),
        }
    }
}

pub const DEFAULT_BLOCK_SIZE: usize = 32 * 1024;

#[derive(Debug, Clone)]
pub struct Options {
    // 基本オプション
    pub verbose: u8,
    pub quiet: bool,

    // 転送オプション
    pub bwlimit: Option<f64>, // bytes per second
    pub direction: Direction,
    pub block_size: usize,

    // 出力・表示オプション
    pub progress: bool,
    pub stats: bool,
    pub human_readable: bool,
    pub log_file: Option<PathBuf>,

    pub config: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            verbose: 0,
            quiet: false,

            bwlimit: None,
            direction: Direction::Read,
            block_size: DEFAULT_BLOCK_SIZE,

            progress: false,
            stats: false,
            human_readable: false,
            log_file: None,

            config: None,
        }
    }
}

impl Options {
    /// 実際に設定するレート上限。未指定は 0 (制限なし)
    pub fn rate_limit(&self) -> f64 {
        self.bwlimit.unwrap_or(0.0)
    }

    /// 設定ファイルの値を反映する
    pub fn apply_config(&mut self, config: &FileConfig) -> Result<()> {
        if let Some(ref rate) = config.bwlimit {
            self.bwlimit = Some(parse_rate(rate)?);
        }
        if let Some(direction) = config.direction {
            self.direction = direction;
        }
        if let Some(block_size) = config.block_size {
            self.block_size = block_size;
        }
        if let Some(progress) = config.progress {
            self.progress = progress;
        }
        if let Some(stats) = config.stats {
            self.stats = stats;
        }
        if let Some(human_readable) = config.human_readable {
            self.human_readable = human_readable;
        }
        if let Some(ref log_file) = config.log_file {
            self.log_file = Some(log_file.clone());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(ShapeError::InvalidOption(
                "block size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 設定ファイル (TOML)
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bwlimit: Option<String>,
    pub direction: Option<Direction>,
    pub block_size: Option<usize>,
    pub progress: Option<bool>,
    pub stats: Option<bool>,
    pub human_readable: Option<bool>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Ok(toml::from_str(&config_str)?)
    }
}

/// レート指定をパースして bytes/sec を返す
///
/// 単位なしの数値は rsync の `--bwlimit` と同じく KiB/s。
/// `B`, `K`/`KB`/`KiB`, `M`/`MB`/`MiB`, `G`/`GB`/`GiB` を受け付ける (1024 単位)。
pub fn parse_rate(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    if number.is_empty() {
        return Err(ShapeError::InvalidRate(format!("{:?}: missing number", s)));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| ShapeError::InvalidRate(format!("{:?}: not a number", s)))?;

    let multiplier = match unit.trim().to_lowercase().as_str() {
        "b" => 1.0,
        "" | "k" | "kb" | "kib" => 1024.0,
        "m" | "mb" | "mib" => 1024.0 * 1024.0,
        "g" | "gb" | "gib" => 1024.0 * 1024.0 * 1024.0,
        _ => {
            return Err(ShapeError::InvalidRate(format!(
                "{:?}: unknown unit. Valid units: B, K, M, G",
                s
            )))
        }
    };

    let rate = value * multiplier;
    if !rate.is_finite() {
        return Err(ShapeError::InvalidRate(format!("{:?}: out of range", s)));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rate_units() -> Result<()> {
        assert_eq!(parse_rate("100")?, 102_400.0);
        assert_eq!(parse_rate("100K")?, 102_400.0);
        assert_eq!(parse_rate("100kib")?, 102_400.0);
        assert_eq!(parse_rate("512B")?, 512.0);
        assert_eq!(parse_rate("1.5M")?, 1_572_864.0);
        assert_eq!(parse_rate("2 MB")?, 2_097_152.0);
        assert_eq!(parse_rate("1G")?, 1_073_741_824.0);
        assert_eq!(parse_rate("0")?, 0.0);
        Ok(())
    }

    #[test]
    fn test_parse_rate_rejects_garbage() {
        assert!(matches!(parse_rate(""), Err(ShapeError::InvalidRate(_))));
        assert!(matches!(parse_rate("K"), Err(ShapeError::InvalidRate(_))));
        assert!(matches!(parse_rate("-5"), Err(ShapeError::InvalidRate(_))));
        assert!(matches!(parse_rate("10X"), Err(ShapeError::InvalidRate(_))));
        assert!(matches!(parse_rate("1.2.3"), Err(ShapeError::InvalidRate(_))));
    }

    #[test]
    fn test_direction_from_str() -> Result<()> {
        assert_eq!("read".parse::<Direction>()?, Direction::Read);
        assert_eq!("WRITE".parse::<Direction>()?, Direction::Write);
        assert!("both".parse::<Direction>().is_err());
        Ok(())
    }

    #[test]
    fn test_load_config() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "bwlimit = \"1M\"")?;
        writeln!(file, "direction = \"write\"")?;
        writeln!(file, "block_size = 4096")?;
        writeln!(file, "stats = true")?;

        let config = FileConfig::load(file.path())?;
        let mut options = Options::default();
        options.apply_config(&config)?;

        assert_eq!(options.bwlimit, Some(1_048_576.0));
        assert_eq!(options.direction, Direction::Write);
        assert_eq!(options.block_size, 4096);
        assert!(options.stats);
        assert!(!options.progress);
        Ok(())
    }

    #[test]
    fn test_config_rejects_unknown_keys() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "bandwidth = 10")?;

        assert!(matches!(FileConfig::load(file.path()), Err(ShapeError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        let err = FileConfig::load(Path::new("/nonexistent/shapeio.toml")).unwrap_err();
        assert!(matches!(err, ShapeError::Other(_)));
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_validate_block_size() {
        let options = Options {
            block_size: 0,
            ..Options::default()
        };
        assert!(options.validate().is_err());
        assert!(Options::default().validate().is_ok());
    }
}

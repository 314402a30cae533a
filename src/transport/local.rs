use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::algorithm::{BandwidthLimiter, Clock, SystemClock};
use crate::error::Result;
use crate::options::{Direction, Options};
use crate::output::{ProgressDisplay, Stats};
use crate::stream::{ShapedReader, ShapedWriter};
use crate::shape_log_ts;

/// ローカル転送エンジン
///
/// 入力を読み、帯域制限をかけたストリームを通して出力に書き込む。
pub struct LocalTransport {
    options: Options,
}

impl LocalTransport {
    /// 新しいLocalTransportを作成
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// ファイル (None の場合は stdin / stdout) 間でコピーする
    pub fn copy(&self, source: Option<&Path>, destination: Option<&Path>) -> Result<Stats> {
        let (input, total): (Box<dyn Read>, Option<u64>) = match source {
            Some(path) => {
                let file = File::open(path)?;
                let len = file.metadata()?.len();
                (Box::new(file), Some(len))
            }
            None => (Box::new(io::stdin().lock()), None),
        };

        let output: Box<dyn Write> = match destination {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout().lock()),
        };

        log::info!(
            "copying {} -> {}",
            source.map_or("<stdin>".into(), |p| p.display().to_string()),
            destination.map_or("<stdout>".into(), |p| p.display().to_string())
        );
        self.copy_stream(input, output, total)
    }

    pub fn copy_stream<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        total: Option<u64>,
    ) -> Result<Stats> {
        self.copy_with_clock(reader, writer, total, &SystemClock)
    }

    /// `clock` を時刻ソースにしてコピーする
    pub fn copy_with_clock<R: Read, W: Write, C: Clock>(
        &self,
        reader: R,
        mut writer: W,
        total: Option<u64>,
        clock: &C,
    ) -> Result<Stats> {
        let limit = self.options.rate_limit();
        let progress = self.progress(total);
        let started = clock.now();

        shape_log_ts!(
            "transfer started: limit={} bytes/sec direction={:?} block_size={}",
            limit,
            self.options.direction,
            self.options.block_size
        );

        let (transferred, limiter_stats) = match self.options.direction {
            Direction::Read => {
                let mut shaped = ShapedReader::with_clock(reader, clock);
                shaped.set_rate_limit(limit);
                let n = self.pump(&mut shaped, &mut writer, progress.as_ref())?;
                (n, LimiterStats::from(shaped.limiter()))
            }
            Direction::Write => {
                let mut shaped = ShapedWriter::with_clock(writer, clock);
                shaped.set_rate_limit(limit);
                let mut reader = reader;
                let n = self.pump(&mut reader, &mut shaped, progress.as_ref())?;
                (n, LimiterStats::from(shaped.limiter()))
            }
        };

        if let Some(ref progress) = progress {
            progress.finish();
        }

        let stats = Stats {
            transferred_bytes: transferred,
            rate_limit: limit,
            pauses: limiter_stats.pauses,
            paused: limiter_stats.paused,
            execution_time: clock.now().saturating_duration_since(started),
        };

        log::info!(
            "transferred {} bytes in {:?} ({} pauses)",
            stats.transferred_bytes,
            stats.execution_time,
            stats.pauses
        );
        shape_log_ts!(
            "transfer finished: {} bytes in {:.2} seconds ({:.0} bytes/sec)",
            stats.transferred_bytes,
            stats.execution_time.as_secs_f64(),
            stats.total_speed()
        );

        Ok(stats)
    }

    fn progress(&self, total: Option<u64>) -> Option<ProgressDisplay> {
        if self.options.progress && !self.options.quiet {
            Some(ProgressDisplay::new(total))
        } else {
            None
        }
    }

    /// EOF までブロック単位で読み書きする
    fn pump<R: Read + ?Sized, W: Write + ?Sized>(
        &self,
        reader: &mut R,
        writer: &mut W,
        progress: Option<&ProgressDisplay>,
    ) -> Result<u64> {
        let mut buf = vec![0u8; self.options.block_size];
        let mut transferred = 0u64;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            writer.write_all(&buf[..n])?;
            transferred += n as u64;

            if let Some(progress) = progress {
                progress.update(transferred);
            }
        }

        writer.flush()?;
        Ok(transferred)
    }
}

struct LimiterStats {
    pauses: u64,
    paused: std::time::Duration,
}

impl<C: Clock> From<&BandwidthLimiter<C>> for LimiterStats {
    fn from(limiter: &BandwidthLimiter<C>) -> Self {
        LimiterStats {
            pauses: limiter.pauses(),
            paused: limiter.paused(),
        }
    }
}

use std::io::{self, Write};

use crate::algorithm::{BandwidthLimiter, Clock, SystemClock};

/// 書き込みレートを制限する `Write` ラッパー
///
/// 内部のライターに書き込んだ後で帯域制限をかける。`flush` はそのまま転送する。
///
/// ```no_run
/// use std::io::{self, Read};
/// use shapeio::ShapedWriter;
///
/// let file = std::fs::File::create("/tmp/foo")?;
/// let mut writer = ShapedWriter::new(file);
/// writer.set_rate_limit(10.0 * 1024.0); // 10KB/sec
/// io::copy(&mut io::repeat(0).take(32 * 1024), &mut writer)?;
/// # Ok::<(), io::Error>(())
/// ```
#[derive(Debug)]
pub struct ShapedWriter<W, C: Clock = SystemClock> {
    inner: W,
    limiter: BandwidthLimiter<C>,
}

impl<W: Write> ShapedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_clock(inner, SystemClock)
    }
}

impl<W: Write, C: Clock> ShapedWriter<W, C> {
    pub fn with_clock(inner: W, clock: C) -> Self {
        Self {
            inner,
            limiter: BandwidthLimiter::with_clock(clock),
        }
    }

    /// レート上限 (bytes/sec) を設定する。`0` で制限なし
    pub fn set_rate_limit(&mut self, bytes_per_sec: f64) {
        self.limiter.set_rate_limit(bytes_per_sec);
    }

    pub fn rate_limit(&self) -> f64 {
        self.limiter.rate_limit()
    }

    pub fn limiter(&self) -> &BandwidthLimiter<C> {
        &self.limiter
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, C: Clock> Write for ShapedWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.limiter.shape(|| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

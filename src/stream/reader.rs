use std::io::{self, Read};

use crate::algorithm::{BandwidthLimiter, Clock, SystemClock};

/// 読み込みレートを制限する `Read` ラッパー
///
/// 内部のリーダーから読み込んだ後、平均レートが上限を超えていれば
/// その場でスレッドをブロックする。EOF (`Ok(0)`) とエラーは待たずに返す。
///
/// 1 回の `read` で読めるだけ読んでから判定するため、バッファが大きいほど
/// ウィンドウのリセット直後のバーストも大きくなる。
///
/// ```no_run
/// use std::io;
/// use shapeio::ShapedReader;
///
/// let file = std::fs::File::open("big.iso")?;
/// let mut reader = ShapedReader::new(file);
/// reader.set_rate_limit(10.0 * 1024.0); // 10KB/sec
/// io::copy(&mut reader, &mut io::sink())?;
/// # Ok::<(), io::Error>(())
/// ```
#[derive(Debug)]
pub struct ShapedReader<R, C: Clock = SystemClock> {
    inner: R,
    limiter: BandwidthLimiter<C>,
}

impl<R: Read> ShapedReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_clock(inner, SystemClock)
    }
}

impl<R: Read, C: Clock> ShapedReader<R, C> {
    pub fn with_clock(inner: R, clock: C) -> Self {
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

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, C: Clock> Read for ShapedReader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.limiter.shape(|| inner.read(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ManualClock;
    use std::io::Cursor;
    use std::time::Duration;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn test_unlimited_read_is_identical() -> io::Result<()> {
        let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        let clock = ManualClock::new();
        let mut reader = ShapedReader::with_clock(Cursor::new(data.clone()), clock.clone());

        let mut out = Vec::new();
        reader.read_to_end(&mut out)?;

        assert_eq!(out, data);
        assert_eq!(clock.now_calls(), 0);
        Ok(())
    }

    #[test]
    fn test_limited_read_preserves_data() -> io::Result<()> {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let clock = ManualClock::new();
        let mut reader = ShapedReader::with_clock(Cursor::new(data.clone()), clock.clone());
        reader.set_rate_limit(1024.0);

        let mut out = Vec::new();
        let mut buf = [0u8; 512];
        loop {
            clock.advance(Duration::from_millis(1));
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }

        assert_eq!(out, data);
        assert!(clock.total_slept() > Duration::ZERO);
        Ok(())
    }

    #[test]
    fn test_eof_is_immediate() -> io::Result<()> {
        let clock = ManualClock::new();
        let mut reader = ShapedReader::with_clock(Cursor::new(Vec::<u8>::new()), clock.clone());
        reader.set_rate_limit(1.0);

        let mut buf = [0u8; 64];
        assert_eq!(reader.read(&mut buf)?, 0);
        assert_eq!(reader.read(&mut buf)?, 0);
        assert!(clock.sleeps().is_empty());
        assert!(reader.limiter().window_start().is_none());
        Ok(())
    }

    #[test]
    fn test_error_is_forwarded_unchanged() {
        let clock = ManualClock::new();
        let mut reader = ShapedReader::with_clock(FailingReader, clock.clone());
        reader.set_rate_limit(1.0);

        let mut buf = [0u8; 64];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_into_inner_keeps_position() -> io::Result<()> {
        let mut reader = ShapedReader::new(Cursor::new(vec![1u8, 2, 3, 4]));
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;

        let cursor = reader.into_inner();
        assert_eq!(cursor.position(), 2);
        Ok(())
    }
}

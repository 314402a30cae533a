use std::io;
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// 帯域幅リミッタ
///
/// ウィンドウ開始からの累積バイト数 / 経過時間 が `limit` (bytes/sec) を
/// 超えないように、転送後にブロッキングで待機する。待機した後は
/// ウィンドウを現在時刻から張り直し、バイト数を 0 に戻す。
///
/// リセット直後の 1 回の転送は計測前に完了するため、その 1 回分だけ
/// `limit` を超えるバーストが起こりうる。上限は呼び出し側が渡すバッファの
/// 大きさで決まる。
#[derive(Debug)]
pub struct BandwidthLimiter<C: Clock = SystemClock> {
    limit: f64, // bytes per second, 0 = unlimited
    window_start: Option<Instant>,
    window_bytes: u64,
    pauses: u64,
    paused: Duration,
    clock: C,
}

impl BandwidthLimiter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for BandwidthLimiter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> BandwidthLimiter<C> {
    pub fn with_clock(clock: C) -> Self {
        BandwidthLimiter {
            limit: 0.0,
            window_start: None,
            window_bytes: 0,
            pauses: 0,
            paused: Duration::ZERO,
            clock,
        }
    }

    /// レート上限 (bytes/sec) を設定する
    ///
    /// `0` で制限なし。負の値や NaN は呼び出し側の誤りで、制限なしとして扱う。
    /// 現在のウィンドウはリセットしない。
    pub fn set_rate_limit(&mut self, bytes_per_sec: f64) {
        if bytes_per_sec < 0.0 || bytes_per_sec.is_nan() {
            log::warn!("unsupported rate limit {}, shaping disabled", bytes_per_sec);
        } else {
            log::debug!("rate limit set to {} bytes/sec", bytes_per_sec);
        }
        self.limit = bytes_per_sec;
    }

    pub fn rate_limit(&self) -> f64 {
        self.limit
    }

    pub fn is_limited(&self) -> bool {
        self.limit > 0.0
    }

    /// 現在のウィンドウで計上済みのバイト数
    pub fn window_bytes(&self) -> u64 {
        self.window_bytes
    }

    pub fn window_start(&self) -> Option<Instant> {
        self.window_start
    }

    /// 待機した回数
    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    /// 待機した時間の合計
    pub fn paused(&self) -> Duration {
        self.paused
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// 転送処理 `transfer` を実行し、結果に応じて帯域制限をかける
    ///
    /// エラーや 0 バイトの結果は待機せずにそのまま返す。
    pub fn shape<F>(&mut self, transfer: F) -> io::Result<usize>
    where
        F: FnOnce() -> io::Result<usize>,
    {
        if !self.is_limited() {
            return transfer();
        }

        // ウィンドウの開始時刻は転送が始まった時点。確定は転送成功後
        let call_started = match self.window_start {
            Some(_) => None,
            None => Some(self.clock.now()),
        };

        let n = transfer()?;
        if n > 0 {
            self.record(n as u64, call_started);
        }
        Ok(n)
    }

    fn record(&mut self, bytes: u64, call_started: Option<Instant>) {
        let window_start = match (self.window_start, call_started) {
            (Some(start), _) => start,
            (None, Some(start)) => start,
            (None, None) => self.clock.now(),
        };
        self.window_start = Some(window_start);
        self.window_bytes += bytes;

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(window_start);
        if elapsed.is_zero() {
            // 経過時間 0 ではレートが定まらないので次の転送まで計測を持ち越す
            return;
        }

        let rate = self.window_bytes as f64 / elapsed.as_secs_f64();
        if rate < self.limit {
            return;
        }

        let expected = Duration::try_from_secs_f64(self.window_bytes as f64 / self.limit)
            .unwrap_or(Duration::MAX);
        let delay = expected.saturating_sub(elapsed);
        if !delay.is_zero() {
            log::trace!(
                "throttling: {} bytes in {:?} ({:.0} bytes/sec), sleeping {:?}",
                self.window_bytes,
                elapsed,
                rate,
                delay
            );
            self.clock.sleep(delay);
            self.pauses += 1;
            self.paused += delay;
        }

        // ウィンドウをリセット
        self.window_start = Some(self.clock.now());
        self.window_bytes = 0;
    }
}

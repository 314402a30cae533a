use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// 帯域制限が使う時刻ソース
///
/// `now()` で現在時刻を取得し、`sleep()` で呼び出しスレッドをブロックする。
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// `Instant::now()` と `std::thread::sleep` を使う標準の時刻ソース
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// 手動で進める時刻ソース
///
/// `sleep()` は実際には待たずに時刻を進め、待ち時間を記録する。
/// クローンは同じ時刻を共有するので、リミッタに渡した後もテスト側から
/// `advance()` で経過時間を作れる。
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    offset: Duration,
    sleeps: Vec<Duration>,
    now_calls: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    /// 時刻を `duration` だけ進める
    pub fn advance(&self, duration: Duration) {
        self.lock().offset += duration;
    }

    /// 生成からの経過時間
    pub fn elapsed(&self) -> Duration {
        self.lock().offset
    }

    /// これまでに要求された待ち時間
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.lock().sleeps.iter().sum()
    }

    /// `now()` が呼ばれた回数
    pub fn now_calls(&self) -> usize {
        self.lock().now_calls
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        // poisoned でも状態自体は壊れていない
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let mut state = self.lock();
        state.now_calls += 1;
        self.base + state.offset
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.offset += duration;
        state.sleeps.push(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

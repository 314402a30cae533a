use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// プログレス表示
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// 新しいプログレス表示を作成
    ///
    /// 入力サイズが分からない場合 (stdin など) はスピナーになる。
    pub fn new(total_bytes: Option<u64>) -> Self {
        let bar = match total_bytes {
            Some(total) => {
                let bar = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                {
                    bar.set_style(style.progress_chars("#>-"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})")
                {
                    bar.set_style(style);
                }
                bar
            }
        };
        bar.set_draw_target(ProgressDrawTarget::stderr());

        Self { bar }
    }

    /// 進捗を更新
    pub fn update(&self, bytes_transferred: u64) {
        self.bar.set_position(bytes_transferred);
    }

    /// 転送完了
    pub fn finish(&self) {
        self.bar.finish_with_message("Transfer complete");
    }

    /// プログレスバーを非表示にする（テストやクワイエットモード用）
    pub fn hide(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Drop for ProgressDisplay {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

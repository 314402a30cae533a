use std::time::Duration;

/// 転送統計情報
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub transferred_bytes: u64,
    pub rate_limit: f64,
    pub pauses: u64,
    pub paused: Duration,
    pub execution_time: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 実効レート (bytes/sec)
    pub fn total_speed(&self) -> f64 {
        if self.execution_time.as_secs_f64() > 0.0 {
            self.transferred_bytes as f64 / self.execution_time.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn render(&self, human_readable: bool) -> String {
        let size = |bytes: u64| {
            if human_readable {
                human_readable_size(bytes)
            } else {
                format!("{} bytes", bytes)
            }
        };

        let mut out = String::new();
        out.push_str(&format!("Transferred: {}\n", size(self.transferred_bytes)));
        if self.rate_limit > 0.0 {
            out.push_str(&format!("Rate limit: {}/s\n", size(self.rate_limit as u64)));
        } else {
            out.push_str("Rate limit: unlimited\n");
        }
        out.push_str(&format!(
            "Total execution time: {:.2} seconds\n",
            self.execution_time.as_secs_f64()
        ));
        out.push_str(&format!("Total transfer speed: {}/s\n", size(self.total_speed() as u64)));
        out.push_str(&format!(
            "Throttle pauses: {} ({:.2} seconds)\n",
            self.pauses,
            self.paused.as_secs_f64()
        ));
        out
    }

    /// stdout はデータ用なので stderr に出す
    pub fn print(&self, human_readable: bool) {
        eprint!("{}", self.render(human_readable));
    }
}

pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

//! `Read` / `Write` に帯域制限をかけるラッパー
//!
//! どちらも同じ [`BandwidthLimiter`](crate::algorithm::BandwidthLimiter) を
//! 値として所有し、転送の後にだけ制限をかける。

mod reader;
mod writer;

pub use reader::ShapedReader;
pub use writer::ShapedWriter;

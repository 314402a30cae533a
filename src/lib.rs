//! 読み書きの平均レートを制限する `Read` / `Write` ラッパー
//!
//! ```no_run
//! use std::io;
//! use shapeio::ShapedReader;
//!
//! let body = std::net::TcpStream::connect("example.com:80")?;
//! let mut reader = ShapedReader::new(body);
//! reader.set_rate_limit(1024.0 * 10.0); // 10KB/sec
//! io::copy(&mut reader, &mut io::sink())?;
//! # Ok::<(), io::Error>(())
//! ```

pub mod algorithm;
pub mod error;
pub mod options;
pub mod output;
pub mod stream;
pub mod transport;

pub use algorithm::{BandwidthLimiter, Clock, ManualClock, SystemClock};
pub use error::{Result, ShapeError};
pub use stream::{ShapedReader, ShapedWriter};

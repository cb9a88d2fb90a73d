//! # Red Pitaya SDR Driver
//!
//! TCP client driver for a Red Pitaya board running the SDR receiver FPGA
//! image. The board exposes one TCP port (default `192.168.1.100:1001`)
//! that carries both directions of a minimal protocol: the host pushes
//! fixed 40-byte tuning/decimation command frames, and the board streams
//! back interleaved 8-channel complex float32 slots of which channel 0 is
//! the tuned passband.
//!
//! ## Protocol in short
//!
//! - **Commands**: ten 32-bit words, native byte order. Word 0 is zero,
//!   word 1 the decimation code, words 2..9 the integer frequency in Hz,
//!   replicated. Unacknowledged; fire and forget.
//! - **Samples**: continuous stream of 64-byte slots (8 channels x I/Q
//!   float32), no framing. Exact-count reads keep slot alignment; a short
//!   read ends the stream session.
//! - **Lifecycle**: tuning state set before activation is staged locally
//!   and pushed when the stream activates and the connection opens.
//!
//! ## Example
//!
//! ```rust,no_run
//! use redpitaya_sdr::{Direction, IQSample, RedPitayaDriver};
//! use std::time::Duration;
//!
//! let driver = RedPitayaDriver::new();
//! let mut device = driver.create_from_string("addr=192.168.1.100,port=1001").unwrap();
//!
//! device.set_frequency("RF", 7.1e6).unwrap();
//! device.set_sample_rate(192_000.0).unwrap();
//!
//! let stream = device.setup_stream(Direction::Rx, "CF32", &[0]).unwrap();
//! device.activate_stream(&stream).unwrap();
//!
//! let mut buffer = vec![IQSample::default(); 1024];
//! let n = device.read_stream(&stream, &mut buffer, Duration::from_millis(100)).unwrap();
//! println!("read {} samples", n);
//!
//! device.deactivate_stream(&stream).unwrap();
//! ```

pub mod command;
pub mod connection;
pub mod device;
pub mod driver;
pub mod error;
pub mod stream;
pub mod types;

pub use command::ControlCommand;
pub use connection::ControlConnection;
pub use device::{DeviceArgs, RedPitayaDevice};
pub use driver::RedPitayaDriver;
pub use error::{Error, Result};
pub use stream::RxStream;
pub use types::{Direction, IQSample, SampleFormat};

//! # Red Pitaya SDR device
//!
//! Session state and control for the TCP-attached receiver. One struct owns
//! the control connection, the stored tuning state, and the receive path,
//! and exposes the stream and tuning surface consumers drive.
//!
//! The peripheral keeps no readable state: every tuning or rate change
//! pushes a complete command frame, and values set before activation are
//! staged locally and pushed when the connection opens.

use crate::command::ControlCommand;
use crate::connection::ControlConnection;
use crate::error::{Error, Result};
use crate::stream::{RxStream, RxStreamer};
use crate::types::{Direction, IQSample, SampleFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Factory address of the peripheral.
pub const DEFAULT_ADDR: &str = "192.168.1.100";

/// Control/data port the receiver listens on.
pub const DEFAULT_PORT: u16 = 1001;

/// Highest tunable frequency (Hz).
pub const MAX_FREQUENCY: f64 = 30.0e6;

/// Sample rates the decimator supports (Hz), in decimation code order.
pub const SUPPORTED_SAMPLE_RATES: [f64; 4] = [48_000.0, 96_000.0, 192_000.0, 384_000.0];

/// Tunable element name.
pub const TUNER_NAME: &str = "RF";

const DEFAULT_FREQUENCY: f64 = 600_000.0;
const DEFAULT_SAMPLE_RATE: f64 = 192_000.0;
const DEFAULT_RATE_CODE: u32 = 2;

/// Connection arguments for a device session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceArgs {
    /// Peripheral hostname or IP address
    pub addr: String,
    /// TCP port
    pub port: u16,
}

impl Default for DeviceArgs {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// One receiver session.
///
/// All mutating methods take `&mut self`; callers serialize access
/// externally. At most one live socket exists per device, owned here and
/// opened/closed only on the activate/deactivate boundaries.
pub struct RedPitayaDevice {
    conn: ControlConnection,
    rx: RxStreamer,
    /// Center frequency exactly as requested (Hz).
    frequency: f64,
    /// Rounded integer tuning word sent on the wire.
    frequency_word: u32,
    sample_rate: f64,
    rate_code: u32,
}

impl RedPitayaDevice {
    /// Create a device session. No I/O happens until stream activation.
    pub fn new(args: &DeviceArgs) -> Self {
        tracing::debug!("device session for {}:{}", args.addr, args.port);
        Self {
            conn: ControlConnection::new(&args.addr, args.port),
            rx: RxStreamer::new(),
            frequency: DEFAULT_FREQUENCY,
            frequency_word: DEFAULT_FREQUENCY as u32,
            sample_rate: DEFAULT_SAMPLE_RATE,
            rate_code: DEFAULT_RATE_CODE,
        }
    }

    /// Peripheral address this session dials, as `host:port`.
    pub fn target(&self) -> String {
        self.conn.target()
    }

    /// Driver key.
    pub fn driver_key(&self) -> &'static str {
        "redpitaya"
    }

    /// Hardware key.
    pub fn hardware_key(&self) -> &'static str {
        "redpitaya"
    }

    /// Number of channels per direction. Receive only.
    pub fn num_channels(&self, direction: Direction) -> usize {
        match direction {
            Direction::Rx => 1,
            Direction::Tx => 0,
        }
    }

    /// Formats accepted on the stream setup interface.
    pub fn stream_formats(&self) -> Vec<String> {
        vec![SampleFormat::Cf32.name().to_string()]
    }

    /// Native format and its full-scale amplitude.
    pub fn native_stream_format(&self) -> (SampleFormat, f64) {
        (SampleFormat::Cf32, SampleFormat::Cf32.full_scale())
    }

    /// Validate format and channel selection and hand out a stream token.
    ///
    /// Direction is recorded but not checked here; activating a transmit
    /// token is what fails.
    pub fn setup_stream(
        &self,
        direction: Direction,
        format: &str,
        channels: &[usize],
    ) -> Result<RxStream> {
        if SampleFormat::from_name(format).is_none() {
            return Err(Error::Config(format!(
                "unsupported stream format: {}",
                format
            )));
        }
        let channels_ok = channels.is_empty() || (channels.len() == 1 && channels[0] == 0);
        if !channels_ok {
            return Err(Error::Config(format!(
                "unsupported channel selection: {:?}",
                channels
            )));
        }
        Ok(RxStream { direction })
    }

    /// Tear down a stream token, deactivating it first if needed.
    pub fn close_stream(&mut self, stream: RxStream) {
        let _ = self.deactivate_stream(&stream);
    }

    /// Open the connection and push the stored tuning state.
    ///
    /// Idempotent while active. The two command frames sent here carry
    /// identical content, since each frame holds the complete state.
    pub fn activate_stream(&mut self, stream: &RxStream) -> Result<()> {
        if stream.direction() == Direction::Tx {
            return Err(Error::Config(
                "transmit streams are not supported".to_string(),
            ));
        }
        if self.conn.is_open() {
            tracing::debug!("already active");
            return Ok(());
        }
        let frequency = self.frequency;
        let rate = self.sample_rate;
        self.conn.open()?;
        self.set_frequency(TUNER_NAME, frequency)?;
        self.set_sample_rate(rate)?;
        tracing::info!(
            "rx stream activated at {} Hz, {} S/s",
            self.frequency,
            self.sample_rate
        );
        Ok(())
    }

    /// Close the connection. Idempotent; the stored tuning state survives
    /// for the next activation.
    pub fn deactivate_stream(&mut self, stream: &RxStream) -> Result<()> {
        if stream.direction() == Direction::Tx {
            return Ok(());
        }
        if self.conn.is_open() {
            self.conn.close();
            tracing::info!("rx stream deactivated");
        }
        Ok(())
    }

    /// Read channel 0 sample pairs into `out`.
    ///
    /// Returns the number of pairs written, at most
    /// [`MAX_SAMPLES_PER_READ`](crate::stream::MAX_SAMPLES_PER_READ) per
    /// call; callers loop for more. A protocol error here ends the stream
    /// session; deactivate and reactivate to recover.
    pub fn read_stream(
        &mut self,
        stream: &RxStream,
        out: &mut [IQSample],
        timeout: Duration,
    ) -> Result<usize> {
        if stream.direction() == Direction::Tx {
            return Err(Error::Config(
                "transmit streams are not supported".to_string(),
            ));
        }
        self.rx.read(&mut self.conn, out, timeout)
    }

    /// Tunable element names.
    pub fn list_frequencies(&self) -> Vec<String> {
        vec![TUNER_NAME.to_string()]
    }

    /// Usable tuning window at the current sample rate.
    pub fn frequency_range(&self, name: &str) -> Result<(f64, f64)> {
        if name != TUNER_NAME {
            return Err(Error::Config(format!("unknown tunable: {}", name)));
        }
        Ok((self.sample_rate / 2.0, MAX_FREQUENCY))
    }

    /// Tune the receiver.
    ///
    /// Requests outside the usable window are dropped without error or
    /// state change. Accepted values are stored (exact, plus rounded to
    /// integer Hz for the wire) and pushed immediately when the connection
    /// is open.
    pub fn set_frequency(&mut self, name: &str, frequency: f64) -> Result<()> {
        if name != TUNER_NAME {
            return Err(Error::Config(format!("unknown tunable: {}", name)));
        }
        let lo = self.sample_rate / 2.0;
        if frequency < lo || frequency > MAX_FREQUENCY {
            tracing::debug!(
                "frequency {} Hz outside [{}, {}], ignored",
                frequency,
                lo,
                MAX_FREQUENCY
            );
            return Ok(());
        }
        self.frequency_word = (frequency + 0.5).floor() as u32;
        self.frequency = frequency;
        self.conn
            .send_command(&ControlCommand::new(self.rate_code, self.frequency_word))
    }

    /// Current center frequency (Hz), exactly as last accepted.
    pub fn frequency(&self, name: &str) -> Result<f64> {
        if name != TUNER_NAME {
            return Err(Error::Config(format!("unknown tunable: {}", name)));
        }
        Ok(self.frequency)
    }

    /// Rates the decimator supports.
    pub fn supported_sample_rates(&self) -> Vec<f64> {
        SUPPORTED_SAMPLE_RATES.to_vec()
    }

    /// Select the decimation rate.
    ///
    /// Only the four supported rates change the decimation code; any other
    /// value keeps the previous code while the requested rate is still
    /// stored and a command frame still goes out.
    pub fn set_sample_rate(&mut self, rate: f64) -> Result<()> {
        if rate == 48_000.0 {
            self.rate_code = 0;
        } else if rate == 96_000.0 {
            self.rate_code = 1;
        } else if rate == 192_000.0 {
            self.rate_code = 2;
        } else if rate == 384_000.0 {
            self.rate_code = 3;
        } else {
            tracing::warn!(
                "unsupported sample rate {}, decimation code unchanged",
                rate
            );
        }
        self.sample_rate = rate;
        self.conn
            .send_command(&ControlCommand::new(self.rate_code, self.frequency_word))
    }

    /// Current sample rate (Hz), exactly as last requested.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Default for RedPitayaDevice {
    fn default() -> Self {
        Self::new(&DeviceArgs::default())
    }
}

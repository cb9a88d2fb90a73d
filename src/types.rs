//! Core types shared across the driver.

use num_complex::Complex;

/// Single I/Q sample pair as delivered to consumers.
///
/// The receiver streams 32-bit floats natively, so no conversion or
/// rescaling happens between the wire and this type.
pub type IQSample = Complex<f32>;

/// Stream direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Receive stream
    Rx,
    /// Transmit stream
    Tx,
}

/// Sample format on the stream interface.
///
/// The receiver produces complex float32 only; the enum exists so format
/// negotiation reads the same as on multi-format devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// Complex float32 (8 bytes/sample), the device's native format
    #[default]
    Cf32,
}

impl SampleFormat {
    /// Canonical format name used on the stream setup interface.
    pub const fn name(&self) -> &'static str {
        match self {
            SampleFormat::Cf32 => "CF32",
        }
    }

    /// Size of one I/Q sample in bytes (I and Q together).
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::Cf32 => 8,
        }
    }

    /// Full-scale amplitude of the format.
    pub const fn full_scale(&self) -> f64 {
        match self {
            SampleFormat::Cf32 => 1.0,
        }
    }

    /// Parse a format name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CF32" => Some(SampleFormat::Cf32),
            _ => None,
        }
    }
}

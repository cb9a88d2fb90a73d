//! RX sample stream: slot layout and channel extraction.
//!
//! The peripheral interleaves eight receiver channels into fixed 64-byte
//! slots: 8 channels x (I, Q) x f32, native byte order, no framing and no
//! sequence numbers. Only channel 0 carries the tuned passband; the other
//! seven are read off the wire and dropped. Slot boundaries are implied by
//! the fixed size, so lost or extra bytes desynchronize the stream until
//! the connection is reopened.

use crate::connection::ControlConnection;
use crate::error::Result;
use crate::types::{Direction, IQSample};
use std::time::Duration;

/// Channels interleaved in every slot.
pub const SLOT_CHANNELS: usize = 8;

/// Bytes per slot: 8 channels x 2 floats x 4 bytes.
pub const SLOT_BYTES: usize = SLOT_CHANNELS * 2 * 4;

/// Scratch capacity per read call, in bytes.
pub const SCRATCH_BYTES: usize = 65536;

/// Most sample pairs a single read can return.
pub const MAX_SAMPLES_PER_READ: usize = SCRATCH_BYTES / SLOT_BYTES;

/// Stream token returned by stream setup and passed back to the
/// activate/read/deactivate calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxStream {
    pub(crate) direction: Direction,
}

impl RxStream {
    /// Direction recorded at setup.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Receive path state: the scratch buffer raw slots land in before
/// channel 0 is extracted.
#[derive(Debug)]
pub(crate) struct RxStreamer {
    scratch: Vec<u8>,
}

impl RxStreamer {
    pub(crate) fn new() -> Self {
        Self {
            scratch: vec![0u8; SCRATCH_BYTES],
        }
    }

    /// Read one batch of slots and deinterleave channel 0 into `out`.
    ///
    /// Requests larger than the scratch capacity are truncated to
    /// [`MAX_SAMPLES_PER_READ`]; callers loop for more. Returns the number
    /// of sample pairs written.
    pub(crate) fn read(
        &mut self,
        conn: &mut ControlConnection,
        out: &mut [IQSample],
        timeout: Duration,
    ) -> Result<usize> {
        let wanted = (out.len() * SLOT_BYTES).min(SCRATCH_BYTES);
        conn.receive_exact(&mut self.scratch[..wanted], timeout)?;

        let count = wanted / SLOT_BYTES;
        for (i, sample) in out[..count].iter_mut().enumerate() {
            // Channel 0 leads each slot; channels 1-7 stay in scratch.
            let off = i * SLOT_BYTES;
            let re = f32::from_ne_bytes(self.scratch[off..off + 4].try_into().unwrap());
            let im = f32::from_ne_bytes(self.scratch[off + 4..off + 8].try_into().unwrap());
            *sample = IQSample::new(re, im);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use std::net::TcpListener;

    fn open_loopback(write: Vec<u8>) -> (ControlConnection, std::thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(&write).unwrap();
        });

        std::thread::sleep(Duration::from_millis(50));

        let mut conn = ControlConnection::new("127.0.0.1", port);
        conn.open().unwrap();
        (conn, handle)
    }

    /// Build `slots` wire slots where channel 0 of slot k is
    /// (k+1, -(k+1)) and channels 1-7 hold junk.
    fn fake_slots(slots: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(slots * SLOT_BYTES);
        for k in 0..slots {
            for ch in 0..SLOT_CHANNELS {
                let (re, im) = if ch == 0 {
                    ((k + 1) as f32, -((k + 1) as f32))
                } else {
                    (99.0 + ch as f32, -99.0 - ch as f32)
                };
                bytes.extend_from_slice(&re.to_ne_bytes());
                bytes.extend_from_slice(&im.to_ne_bytes());
            }
        }
        bytes
    }

    #[test]
    fn test_slot_geometry() {
        assert_eq!(SLOT_BYTES, 64);
        assert_eq!(MAX_SAMPLES_PER_READ, 1024);
    }

    #[test]
    fn test_deinterleave_channel_zero() {
        let (mut conn, handle) = open_loopback(fake_slots(4));
        let mut streamer = RxStreamer::new();

        let mut out = vec![IQSample::default(); 4];
        let n = streamer
            .read(&mut conn, &mut out, Duration::from_secs(5))
            .unwrap();
        assert_eq!(n, 4);
        for (k, sample) in out.iter().enumerate() {
            assert_eq!(*sample, IQSample::new((k + 1) as f32, -((k + 1) as f32)));
        }

        handle.join().unwrap();
    }

    #[test]
    fn test_large_request_clamps_to_scratch() {
        let (mut conn, handle) = open_loopback(vec![0u8; SCRATCH_BYTES]);
        let mut streamer = RxStreamer::new();

        // 2000 slots would need 128000 bytes; only 65536 are served.
        let mut out = vec![IQSample::new(5.0, 5.0); 2000];
        let n = streamer
            .read(&mut conn, &mut out, Duration::from_secs(5))
            .unwrap();
        assert_eq!(n, MAX_SAMPLES_PER_READ);
        assert_eq!(out[MAX_SAMPLES_PER_READ - 1], IQSample::new(0.0, 0.0));
        // Past the clamp the buffer is untouched.
        assert_eq!(out[MAX_SAMPLES_PER_READ], IQSample::new(5.0, 5.0));

        handle.join().unwrap();
    }

    #[test]
    fn test_fractional_amplitudes_pass_through_unscaled() {
        use approx::assert_relative_eq;

        // Full scale is 1.0 and nothing rescales on the way in.
        let mut slot = Vec::with_capacity(SLOT_BYTES);
        slot.extend_from_slice(&0.4071_f32.to_ne_bytes());
        slot.extend_from_slice(&(-0.9993_f32).to_ne_bytes());
        slot.resize(SLOT_BYTES, 0);

        let (mut conn, handle) = open_loopback(slot);
        let mut streamer = RxStreamer::new();

        let mut out = vec![IQSample::default(); 1];
        let n = streamer
            .read(&mut conn, &mut out, Duration::from_secs(5))
            .unwrap();
        assert_eq!(n, 1);
        assert_relative_eq!(out[0].re, 0.4071, max_relative = 1e-6);
        assert_relative_eq!(out[0].im, -0.9993, max_relative = 1e-6);

        handle.join().unwrap();
    }

    #[test]
    fn test_short_slot_is_protocol_error() {
        // Half a slot, then EOF.
        let (mut conn, handle) = open_loopback(vec![0u8; SLOT_BYTES / 2]);
        let mut streamer = RxStreamer::new();

        let mut out = vec![IQSample::default(); 1];
        let err = streamer.read(&mut conn, &mut out, Duration::from_secs(5));
        assert!(matches!(err, Err(Error::Protocol(_))));

        handle.join().unwrap();
    }

    #[test]
    fn test_read_on_closed_connection_fails() {
        let mut conn = ControlConnection::new("127.0.0.1", 1001);
        let mut streamer = RxStreamer::new();

        let mut out = vec![IQSample::default(); 8];
        let err = streamer.read(&mut conn, &mut out, Duration::from_millis(100));
        assert!(matches!(err, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_empty_read_returns_zero() {
        let (mut conn, handle) = open_loopback(Vec::new());
        let mut streamer = RxStreamer::new();

        // Zero-length request completes without waiting for data.
        let mut out: Vec<IQSample> = Vec::new();
        let n = streamer
            .read(&mut conn, &mut out, Duration::from_millis(100))
            .unwrap();
        assert_eq!(n, 0);

        handle.join().unwrap();
    }

    #[test]
    fn test_stream_token_direction() {
        let stream = RxStream {
            direction: Direction::Rx,
        };
        assert_eq!(stream.direction(), Direction::Rx);
    }
}

//! Driver factory and discovery.
//!
//! The peripheral cannot be probed without configuring it, so discovery is
//! an echo: whatever hints the caller supplies come back as the single
//! result, and the connection itself is attempted only at stream
//! activation.

use crate::device::{DeviceArgs, RedPitayaDevice};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Factory for [`RedPitayaDevice`] sessions.
pub struct RedPitayaDriver;

impl RedPitayaDriver {
    /// Create the driver.
    pub fn new() -> Self {
        Self
    }

    /// Driver name.
    pub fn name(&self) -> &str {
        "redpitaya"
    }

    /// Discovery stub: echoes the caller's hints back as one result.
    pub fn find(&self, args: &HashMap<String, String>) -> Vec<HashMap<String, String>> {
        vec![args.clone()]
    }

    /// Create a device session from parsed arguments.
    pub fn create(&self, args: &DeviceArgs) -> RedPitayaDevice {
        RedPitayaDevice::new(args)
    }

    /// Create a device session from a `key=value,...` argument string.
    ///
    /// Recognized keys are `addr` and `port`; anything else is ignored.
    /// Missing keys fall back to the factory defaults.
    pub fn create_from_string(&self, args: &str) -> Result<RedPitayaDevice> {
        let params = parse_args(args);
        let mut device_args = DeviceArgs::default();
        if let Some(addr) = params.get("addr") {
            device_args.addr = addr.clone();
        }
        if let Some(port) = params.get("port") {
            device_args.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid port: {}", port)))?;
        }
        Ok(self.create(&device_args))
    }
}

impl Default for RedPitayaDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `key1=value1,key2=value2,...` argument string.
pub fn parse_args(args: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for pair in args.split(',') {
        if let Some(pos) = pair.find('=') {
            let key = pair[..pos].trim().to_string();
            let value = pair[pos + 1..].trim().to_string();
            result.insert(key, value);
        }
    }
    result
}

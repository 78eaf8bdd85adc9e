//! The media device: the `MediaTimeline` trait and event vocabulary the
//! controller talks in, plus a rodio-backed implementation.

mod device;
mod sink;
mod thread;
mod types;

pub use device::AudioDevice;
pub use types::{DeviceCmd, DeviceError, Generation, MediaEvent, MediaTimeline};

#[cfg(test)]
pub(crate) mod testing;

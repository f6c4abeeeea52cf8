//! # greenhouse-adapter-virtual
//!
//! Virtual/demo adapter that provides simulated units and sensors for
//! testing and demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | Virtual water unit | `Unit` | Holds an on/off state, records `water` stats |
//! | Virtual fan unit | `Unit` | Holds an on/off state, records `fan` stats |
//! | Virtual thermometer | `Sensor` | Uniform random 20–30 °C |
//! | Virtual hygrometer | `Sensor` | Uniform random 40–90 % |
//!
//! ## Connection string
//!
//! Every virtual device is selected with `mock://fake`.
//!
//! ## Dependency rule
//!
//! Depends on `greenhouse-app` (port traits) and `greenhouse-domain` only.

mod devices;

pub use devices::{VirtualSensor, VirtualUnit};

/// Connection string selecting a virtual device.
pub const CONNECTION: &str = "mock://fake";

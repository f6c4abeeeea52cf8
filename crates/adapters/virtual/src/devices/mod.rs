//! Virtual device implementations — on/off units and random sensors.

mod sensor;
mod unit;

pub use sensor::VirtualSensor;
pub use unit::VirtualUnit;

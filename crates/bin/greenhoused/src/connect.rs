//! Connection-string dispatch — turns configured strings into adapters.

use std::sync::Arc;

use anyhow::{Context, bail};
use greenhouse_adapter_memory::MemoryStorage;
use greenhouse_adapter_virtual::{CONNECTION, VirtualSensor, VirtualUnit};
use greenhouse_app::controller::Controller;

use crate::config::UnitKind;

/// Storage shared by every unit, controller and the monitor.
pub type SharedStorage = Arc<MemoryStorage>;

/// A controller driving a virtual unit.
pub type UnitController = Controller<VirtualUnit<SharedStorage>, SharedStorage>;

const MEMORY_SCHEME: &str = "mock://";

/// Open the storage named by `url`.
pub fn storage(url: &str) -> anyhow::Result<SharedStorage> {
    if url.starts_with(MEMORY_SCHEME) {
        let storage = MemoryStorage::from_url(url).with_context(|| {
            format!("bad fake-storage connection, expected mock://fake/40: {url}")
        })?;
        return Ok(Arc::new(storage));
    }
    bail!("unknown database system: {url}")
}

/// Build the unit of `kind` named by `connection`.
pub fn unit(
    kind: UnitKind,
    connection: &str,
    storage: SharedStorage,
) -> anyhow::Result<VirtualUnit<SharedStorage>> {
    if connection != CONNECTION {
        bail!("unknown {kind} unit: {connection}");
    }
    Ok(match kind {
        UnitKind::Water => VirtualUnit::water(storage),
        UnitKind::Fan => VirtualUnit::fan(storage),
    })
}

pub fn thermometer(connection: &str) -> anyhow::Result<VirtualSensor> {
    if connection != CONNECTION {
        bail!("unknown thermometer: {connection}");
    }
    Ok(VirtualSensor::thermometer())
}

pub fn hygrometer(connection: &str) -> anyhow::Result<VirtualSensor> {
    if connection != CONNECTION {
        bail!("unknown hygrometer: {connection}");
    }
    Ok(VirtualSensor::hygrometer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_app::ports::{Sensor, Unit};
    use greenhouse_domain::stat::StatType;

    #[test]
    fn should_open_memory_storage_with_limit() {
        let storage = storage("mock://fake/12").unwrap();
        assert_eq!(storage.limit(), 12);
    }

    #[test]
    fn should_reject_unknown_database_system() {
        let err = storage("sqlite3:///tmp/greenhouse.db").unwrap_err();
        assert!(err.to_string().contains("unknown database system"));
    }

    #[test]
    fn should_reject_malformed_memory_url() {
        let err = storage("mock://fake").unwrap_err();
        assert!(err.to_string().contains("bad fake-storage connection"));
    }

    #[test]
    fn should_build_named_units() {
        let shared = storage("mock://fake/4").unwrap();
        let water = unit(UnitKind::Water, "mock://fake", Arc::clone(&shared)).unwrap();
        let fan = unit(UnitKind::Fan, "mock://fake", shared).unwrap();
        assert_eq!(water.name(), "water");
        assert_eq!(fan.name(), "fan");
    }

    #[test]
    fn should_reject_unknown_unit_connection() {
        let shared = storage("mock://fake/4").unwrap();
        let Err(err) = unit(UnitKind::Fan, "gpio://17", shared) else {
            panic!("gpio connection should be rejected");
        };
        assert_eq!(err.to_string(), "unknown fan unit: gpio://17");
    }

    #[test]
    fn should_build_sensors() {
        assert_eq!(
            thermometer("mock://fake").unwrap().stat_type(),
            StatType::Temperature
        );
        assert_eq!(hygrometer("mock://fake").unwrap().stat_type(), StatType::Humidity);
        assert!(thermometer("i2c://0x40").is_err());
        assert!(hygrometer("i2c://0x40").is_err());
    }
}

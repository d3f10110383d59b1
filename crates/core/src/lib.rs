pub mod catalog;
pub mod config;
pub mod countdown;
pub mod cycle;
pub mod error;
pub mod hangar;
pub mod ids;
pub mod time;
pub mod vault;

pub use catalog::{
    BoardDef, Catalog, Keycard, PrinterDef, ShipVariantDef, ShipVariantKind, Stage, Zone,
};
pub use config::{HangarConfig, TimerConfig, TrackerConfig, VaultConfig};
pub use countdown::format_remaining;
pub use cycle::{PhasePosition, PhaseSchedule};
pub use error::CoreError;
pub use hangar::{HangarClock, HangarPhase, HangarReading, LED_COUNT};
pub use ids::BoardId;
pub use time::{ManualClock, SystemClock, TimeSource};
pub use vault::{VaultClock, VaultReading};

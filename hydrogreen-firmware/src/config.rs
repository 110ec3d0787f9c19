//! Configuration loading
//!
//! The configuration is validated by the build script and embedded as a
//! postcard blob. Decoding can still fail if the blob and the firmware were
//! built from different versions of the config types.

use defmt::*;

use hydrogreen_core::config::DashboardConfig;

/// Embedded configuration (compiled from dashboard.toml)
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/dashboard_config.bin"));

/// Load the embedded configuration, falling back to defaults
pub fn load() -> DashboardConfig {
    match DashboardConfig::from_postcard(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: {} Hz, expansion board {}",
                config.tick_hz, config.capabilities.expansion_board
            );
            config
        }
        Err(e) => {
            warn!("Embedded config invalid ({:?}), using defaults", e);
            DashboardConfig::default()
        }
    }
}

//! Configuration type definitions
//!
//! All timing is configured in milliseconds and converted to main-cycle
//! ticks once at startup with [`DashboardConfig::ticks`].

use hydrogreen_protocol::{ChecksumPolicy, SyncPolicy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default main-cycle rate
pub const DEFAULT_TICK_HZ: u32 = 1000;

/// Maximum encoded configuration size
pub const MAX_CONFIG_SIZE: usize = 128;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick rate is zero
    ZeroTickRate,
    /// Mode1 refresh interval is zero
    ZeroRefreshInterval,
    /// Link timeout is zero
    ZeroLinkTimeout,
    /// Emergency indicator turns on after the cycle ends
    EmergencyWindow,
    /// Leak alarm turns on after the cycle ends
    LeakWindow,
    /// Speed bar full scale is zero
    ZeroSpeedScale,
    /// Serialized blob could not be encoded or decoded
    Encoding,
}

/// Optional hardware fitted to this dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DashboardCapabilities {
    /// Display has the GPIO expansion board (speed-reset lamp, leak alarm)
    pub expansion_board: bool,
}

/// RS-485 link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LinkConfig {
    /// Telemetry checksum handling
    pub checksum: ChecksumPolicy,
    /// Receive-side resynchronization
    pub sync: SyncPolicy,
    /// Time without an accepted frame before the link reports a timeout
    pub timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            checksum: ChecksumPolicy::Verify,
            sync: SyncPolicy::Realign,
            timeout_ms: 500,
        }
    }
}

/// Page timing in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PageTiming {
    /// Wait after resetting the display before drawing
    pub display_boot_ms: u32,
    /// Splash hold, counted from the end of the boot wait
    pub splash_ms: u32,
    /// Mode1 interval between field writes
    pub refresh_ms: u32,
    /// Hold time of the reset button combo
    pub reset_hold_ms: u32,
    /// Emergency indicator on, from the start of the cycle
    pub emergency_indicator_on_ms: u32,
    /// Emergency cycle length
    pub emergency_cycle_ms: u32,
    /// Leak alarm pin on, from the start of the cycle
    pub leak_alarm_on_ms: u32,
    /// Leak alarm cycle length
    pub leak_cycle_ms: u32,
}

impl Default for PageTiming {
    fn default() -> Self {
        Self {
            display_boot_ms: 150,
            splash_ms: 3000,
            refresh_ms: 5,
            reset_hold_ms: 5000,
            emergency_indicator_on_ms: 1000,
            emergency_cycle_ms: 2000,
            leak_alarm_on_ms: 100,
            leak_cycle_ms: 150,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DashboardConfig {
    /// Main-cycle rate in Hz
    pub tick_hz: u32,
    /// Fitted hardware
    pub capabilities: DashboardCapabilities,
    /// Link settings
    pub link: LinkConfig,
    /// Page timing
    pub timing: PageTiming,
    /// Speed shown as a full progress bar
    pub speed_bar_full_scale: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            capabilities: DashboardCapabilities::default(),
            link: LinkConfig::default(),
            timing: PageTiming::default(),
            speed_bar_full_scale: 50,
        }
    }
}

/// Page timing converted to main-cycle ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickTiming {
    pub display_boot: u32,
    pub splash: u32,
    pub refresh: u32,
    pub reset_hold: u32,
    pub emergency_indicator_on: u32,
    pub emergency_cycle: u32,
    pub leak_alarm_on: u32,
    pub leak_cycle: u32,
    pub link_timeout: u32,
}

impl Default for TickTiming {
    fn default() -> Self {
        DashboardConfig::default().ticks()
    }
}

impl DashboardConfig {
    /// Check the configuration for values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.timing.refresh_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.link.timeout_ms == 0 {
            return Err(ConfigError::ZeroLinkTimeout);
        }
        if self.timing.emergency_indicator_on_ms >= self.timing.emergency_cycle_ms {
            return Err(ConfigError::EmergencyWindow);
        }
        if self.timing.leak_alarm_on_ms >= self.timing.leak_cycle_ms {
            return Err(ConfigError::LeakWindow);
        }
        if self.speed_bar_full_scale == 0 {
            return Err(ConfigError::ZeroSpeedScale);
        }
        Ok(())
    }

    /// Convert a duration to main-cycle ticks
    ///
    /// Non-zero durations shorter than one tick round up to one tick.
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        let ticks = u64::from(ms) * u64::from(self.tick_hz) / 1000;
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        if ms > 0 {
            ticks.max(1)
        } else {
            ticks
        }
    }

    /// All durations in ticks
    pub fn ticks(&self) -> TickTiming {
        let t = &self.timing;
        TickTiming {
            display_boot: self.ms_to_ticks(t.display_boot_ms),
            splash: self.ms_to_ticks(t.splash_ms),
            refresh: self.ms_to_ticks(t.refresh_ms),
            reset_hold: self.ms_to_ticks(t.reset_hold_ms),
            emergency_indicator_on: self.ms_to_ticks(t.emergency_indicator_on_ms),
            emergency_cycle: self.ms_to_ticks(t.emergency_cycle_ms),
            leak_alarm_on: self.ms_to_ticks(t.leak_alarm_on_ms),
            leak_cycle: self.ms_to_ticks(t.leak_cycle_ms),
            link_timeout: self.ms_to_ticks(self.link.timeout_ms),
        }
    }

    /// Decode and validate a postcard blob
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encoding)
    }
}

//! Link status reporting

/// Most recent link condition
///
/// A single last-error code; earlier errors are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkHealth {
    /// Last frame was accepted and the link is live
    Synced,
    /// No accepted frame within the link timeout
    #[default]
    Timeout,
    /// Last receive attempt failed (desync, overflow or checksum)
    FrameError,
}

/// Link diagnostic counters
///
/// All counters saturate. They are informational and never drive page
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Telemetry frames accepted
    pub frames_accepted: u32,
    /// Windows dropped for a missing end marker
    pub desyncs: u32,
    /// Frames rejected for a checksum mismatch
    pub checksum_errors: u32,
    /// Assembly buffer overflows
    pub overflows: u32,
    /// Completed frames replaced before the main cycle took them
    pub frames_dropped: u32,
    /// Control frames fully transmitted
    pub frames_sent: u32,
}

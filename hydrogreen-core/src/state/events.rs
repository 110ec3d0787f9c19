//! Events reported by the page controller

use super::machine::PageId;
use crate::traits::DisplayError;

/// Something the page controller did this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageEvent {
    /// Init sequence finished and chose a first page
    InitComplete(PageId),
    /// Priority rules switched pages
    Transition {
        /// Page before the switch
        from: PageId,
        /// Page after the switch
        to: PageId,
    },
    /// Panel accepted a pending page load
    PageLoaded(PageId),
    /// Reset combo held long enough; init restarts
    DeviceReset,
    /// Emergency indicator finished a blink cycle; page may be left
    EmergencyCycleComplete,
    /// Display refused a field write for a reason other than being busy;
    /// the field was skipped
    WriteRejected(DisplayError),
}

//! Page definitions and priority rules

use hydrogreen_protocol::{ButtonState, TelemetryFrame};

/// Dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageId {
    /// Boot splash and panel setup
    #[default]
    Init,
    /// Driving page with speed, lap time and voltages
    Mode1,
    /// Hydrogen leak warning
    Leak,
    /// Emergency stop warning
    Emergency,
}

impl PageId {
    /// Page number on the panel
    pub fn display_page(self) -> u8 {
        match self {
            PageId::Init => 0,
            PageId::Mode1 => 1,
            PageId::Leak => 3,
            PageId::Emergency => 4,
        }
    }

    /// First page after the init sequence
    pub fn initial(inputs: &PageInputs) -> Self {
        if inputs.leak {
            PageId::Leak
        } else if inputs.emergency {
            PageId::Emergency
        } else {
            PageId::Mode1
        }
    }

    /// Apply the priority rules, returning the page to switch to
    ///
    /// Rules are tried in order and the first match wins. `None` means stay.
    /// The reset combo is not handled here since it depends on how long the
    /// buttons have been held.
    pub fn next(self, inputs: &PageInputs) -> Option<Self> {
        use PageId::*;

        let PageInputs {
            leak,
            emergency,
            mode1_only,
            ..
        } = *inputs;

        match self {
            // Init is driven by its own sequence
            Init => None,
            current if leak && current != Leak => Some(Leak),
            Leak if !leak && !emergency => Some(Mode1),
            current if emergency && !leak && current != Emergency => Some(Emergency),
            Emergency if !emergency && !leak => Some(Mode1),
            current if mode1_only && !leak && !emergency && current != Mode1 => Some(Mode1),
            _ => None,
        }
    }
}

/// Per-cycle inputs to the page rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageInputs {
    /// Hydrogen leak flag asserted
    pub leak: bool,
    /// Emergency button flag asserted
    pub emergency: bool,
    /// Mode1 held without mode2
    pub mode1_only: bool,
    /// Both mode buttons held
    pub reset_combo: bool,
}

impl PageInputs {
    /// Sample telemetry flags and buttons
    pub fn sample(telemetry: &TelemetryFrame, buttons: &ButtonState) -> Self {
        Self {
            leak: telemetry.leak_detected(),
            emergency: telemetry.emergency_pressed(),
            mode1_only: buttons.mode1_only(),
            reset_combo: buttons.reset_combo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PAGES: [PageId; 3] = [PageId::Mode1, PageId::Leak, PageId::Emergency];

    fn inputs(leak: bool, emergency: bool) -> PageInputs {
        PageInputs {
            leak,
            emergency,
            ..Default::default()
        }
    }

    #[test]
    fn test_leak_dominates_emergency() {
        for page in [PageId::Mode1, PageId::Emergency] {
            assert_eq!(page.next(&inputs(true, true)), Some(PageId::Leak));
        }
        assert_eq!(PageId::Leak.next(&inputs(true, true)), None);
    }

    #[test]
    fn test_leak_clears_to_mode1() {
        assert_eq!(PageId::Leak.next(&inputs(false, false)), Some(PageId::Mode1));
    }

    #[test]
    fn test_leak_clears_with_emergency_held() {
        // Rule 2 needs both flags clear, rule 3 then moves to Emergency
        assert_eq!(
            PageId::Leak.next(&inputs(false, true)),
            Some(PageId::Emergency)
        );
    }

    #[test]
    fn test_emergency_and_back() {
        assert_eq!(
            PageId::Mode1.next(&inputs(false, true)),
            Some(PageId::Emergency)
        );
        assert_eq!(PageId::Emergency.next(&inputs(false, true)), None);
        assert_eq!(
            PageId::Emergency.next(&inputs(false, false)),
            Some(PageId::Mode1)
        );
    }

    #[test]
    fn test_mode1_button_blocked_by_warnings() {
        let held = PageInputs {
            leak: true,
            mode1_only: true,
            ..Default::default()
        };
        assert_eq!(PageId::Leak.next(&held), None);

        let held = PageInputs {
            mode1_only: true,
            ..Default::default()
        };
        assert_eq!(PageId::Mode1.next(&held), None);
    }

    #[test]
    fn test_init_never_switches() {
        assert_eq!(PageId::Init.next(&inputs(true, true)), None);
    }

    #[test]
    fn test_initial_page_priority() {
        assert_eq!(PageId::initial(&inputs(true, true)), PageId::Leak);
        assert_eq!(PageId::initial(&inputs(false, true)), PageId::Emergency);
        assert_eq!(PageId::initial(&inputs(false, false)), PageId::Mode1);
    }

    #[test]
    fn test_sample_requires_exact_one() {
        let telemetry = TelemetryFrame {
            h2_leak: 2,
            emergency_button: 1,
            ..Default::default()
        };
        let sampled = PageInputs::sample(&telemetry, &ButtonState::default());
        assert!(!sampled.leak);
        assert!(sampled.emergency);
    }

    #[test]
    fn test_display_page_numbers() {
        assert_eq!(PageId::Init.display_page(), 0);
        assert_eq!(PageId::Mode1.display_page(), 1);
        assert_eq!(PageId::Leak.display_page(), 3);
        assert_eq!(PageId::Emergency.display_page(), 4);
    }

    proptest! {
        #[test]
        fn prop_rules_settle_in_two_steps(
            start in 0usize..3,
            leak: bool,
            emergency: bool,
            mode1_only: bool,
        ) {
            let inputs = PageInputs { leak, emergency, mode1_only, reset_combo: false };
            let mut page = PAGES[start];
            for _ in 0..2 {
                if let Some(next) = page.next(&inputs) {
                    page = next;
                }
            }
            prop_assert_eq!(page.next(&inputs), None);
        }

        #[test]
        fn prop_leak_always_wins(start in 0usize..3, emergency: bool, mode1_only: bool) {
            let inputs = PageInputs { leak: true, emergency, mode1_only, reset_combo: false };
            let page = PAGES[start];
            let settled = page.next(&inputs).unwrap_or(page);
            prop_assert_eq!(settled, PageId::Leak);
        }
    }
}

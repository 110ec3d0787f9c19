//! Init page: panel setup and splash

use crate::config::{DashboardCapabilities, TickTiming};
use crate::state::{PageId, PageInputs};
use crate::traits::{Color, DisplaySurface, GpioMode, Rect};

use super::EXPANSION_GPIO_COUNT;

/// Init sequence steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Send the panel reset
    #[default]
    ResetDisplay,
    /// Wait for the panel to boot
    WaitBoot,
    /// Draw the screen border
    DrawBorder,
    /// Configure the expansion GPIO with this index
    ConfigureGpio(u8),
    /// Hold the splash screen
    Splash,
    /// Pick and load the first page
    Decide,
}

/// Init page updater
#[derive(Debug, Clone, Default)]
pub struct InitPage {
    step: InitStep,
    ticks: u32,
}

impl InitPage {
    /// Current step
    pub fn step(&self) -> InitStep {
        self.step
    }

    /// Ticks counted in the current timed stretch
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Restart from the panel reset
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one cycle, returning the first page once it is loaded
    ///
    /// A step whose display command fails is retried on the next cycle.
    pub fn update<D: DisplaySurface>(
        &mut self,
        display: &mut D,
        timing: &TickTiming,
        capabilities: &DashboardCapabilities,
        inputs: &PageInputs,
    ) -> Option<PageId> {
        self.ticks = self.ticks.saturating_add(1);

        match self.step {
            InitStep::ResetDisplay => {
                if display.reset_device().is_ok() {
                    self.step = InitStep::WaitBoot;
                    self.ticks = 0;
                }
            }
            InitStep::WaitBoot => {
                if self.ticks >= timing.display_boot {
                    self.step = InitStep::DrawBorder;
                    self.ticks = 0;
                }
            }
            InitStep::DrawBorder => {
                if display.draw_rect(Rect::SCREEN, Color::Gray).is_ok() {
                    self.step = if capabilities.expansion_board {
                        InitStep::ConfigureGpio(0)
                    } else {
                        InitStep::Splash
                    };
                }
            }
            InitStep::ConfigureGpio(pin) => {
                if display.configure_gpio(pin, GpioMode::Output, 0).is_ok() {
                    let next = pin + 1;
                    self.step = if next < EXPANSION_GPIO_COUNT {
                        InitStep::ConfigureGpio(next)
                    } else {
                        InitStep::Splash
                    };
                }
            }
            InitStep::Splash => {
                if self.ticks >= timing.splash {
                    self.step = InitStep::Decide;
                }
            }
            InitStep::Decide => {
                let page = PageId::initial(inputs);
                if display.load_page(page.display_page()).is_ok() {
                    return Some(page);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Command, FakeDisplay};

    fn timing() -> TickTiming {
        TickTiming {
            display_boot: 3,
            splash: 10,
            ..Default::default()
        }
    }

    fn run(
        init: &mut InitPage,
        display: &mut FakeDisplay,
        caps: &DashboardCapabilities,
        inputs: &PageInputs,
        cycles: u32,
    ) -> Option<PageId> {
        for _ in 0..cycles {
            if let Some(page) = init.update(display, &timing(), caps, inputs) {
                return Some(page);
            }
        }
        None
    }

    #[test]
    fn test_sequence_without_expansion() {
        let mut init = InitPage::default();
        let mut display = FakeDisplay::new();
        let caps = DashboardCapabilities::default();
        let inputs = PageInputs::default();

        let page = run(&mut init, &mut display, &caps, &inputs, 100);
        assert_eq!(page, Some(PageId::Mode1));
        assert_eq!(
            display.take(),
            vec![
                Command::Reset,
                Command::Rect(Rect::SCREEN, Color::Gray),
                Command::Page(1),
            ]
        );
    }

    #[test]
    fn test_sequence_with_expansion_configures_gpio() {
        let mut init = InitPage::default();
        let mut display = FakeDisplay::new();
        let caps = DashboardCapabilities {
            expansion_board: true,
        };

        run(&mut init, &mut display, &caps, &PageInputs::default(), 100);
        let gpio: Vec<_> = display
            .take()
            .into_iter()
            .filter_map(|c| match c {
                Command::Gpio(pin, GpioMode::Output, 0) => Some(pin),
                _ => None,
            })
            .collect();
        assert_eq!(gpio, (0..EXPANSION_GPIO_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_boot_wait_before_drawing() {
        let mut init = InitPage::default();
        let mut display = FakeDisplay::new();
        let caps = DashboardCapabilities::default();
        let inputs = PageInputs::default();

        // Reset, then two cycles of the boot wait
        run(&mut init, &mut display, &caps, &inputs, 3);
        assert_eq!(init.step(), InitStep::WaitBoot);
        run(&mut init, &mut display, &caps, &inputs, 1);
        assert_eq!(init.step(), InitStep::DrawBorder);
    }

    #[test]
    fn test_splash_counts_from_end_of_boot_wait() {
        let mut init = InitPage::default();
        let mut display = FakeDisplay::new();
        let caps = DashboardCapabilities::default();
        let inputs = PageInputs::default();

        // 1 reset + 3 boot + 1 border + 8 splash cycles
        run(&mut init, &mut display, &caps, &inputs, 13);
        assert_eq!(init.step(), InitStep::Splash);
        run(&mut init, &mut display, &caps, &inputs, 1);
        assert_eq!(init.step(), InitStep::Decide);
    }

    #[test]
    fn test_decides_warning_pages() {
        let caps = DashboardCapabilities::default();
        for (inputs, expected) in [
            (
                PageInputs {
                    leak: true,
                    emergency: true,
                    ..Default::default()
                },
                PageId::Leak,
            ),
            (
                PageInputs {
                    emergency: true,
                    ..Default::default()
                },
                PageId::Emergency,
            ),
        ] {
            let mut init = InitPage::default();
            let mut display = FakeDisplay::new();
            let page = run(&mut init, &mut display, &caps, &inputs, 100);
            assert_eq!(page, Some(expected));
            assert_eq!(
                display.take().last(),
                Some(&Command::Page(expected.display_page()))
            );
        }
    }

    #[test]
    fn test_busy_display_holds_step() {
        let mut init = InitPage::default();
        let mut display = FakeDisplay::new();
        display.busy = true;
        let caps = DashboardCapabilities::default();
        let inputs = PageInputs::default();

        run(&mut init, &mut display, &caps, &inputs, 5);
        assert_eq!(init.step(), InitStep::ResetDisplay);

        display.busy = false;
        run(&mut init, &mut display, &caps, &inputs, 1);
        assert_eq!(init.step(), InitStep::WaitBoot);
        assert_eq!(display.take(), vec![Command::Reset]);
    }
}

//! Per-cycle link scheduling
//!
//! Transmit pacing mirrors what the main controller expects: one control
//! frame byte per cycle, then a quiet gap as long as the frame, then one
//! cycle to encode the next frame from fresh button state.
//!
//! ```text
//! cycle:  0 .. 10 | 11 .. 21 | 22
//!         send    | gap      | encode
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use hydrogreen_hal::ByteTx;
use hydrogreen_protocol::{
    ButtonState, Checksum, ControlFrame, Crc8, FrameError, TelemetryFrame, CONTROL_FRAME_LEN,
};

use super::health::{LinkHealth, LinkStats};
use super::mailbox::FrameMailbox;
use crate::config::LinkConfig;

/// Idle cycles after the last byte of a control frame
pub const INTER_FRAME_GAP: u8 = CONTROL_FRAME_LEN as u8;

/// Where the transmitter is in the pacing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxPhase {
    /// Sending the byte at this index next
    Sending(u8),
    /// Idle; holds the number of gap cycles elapsed
    Gap(u8),
    /// Next cycle encodes a fresh frame
    Encode,
}

/// Receive-side outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Nothing happened
    Idle,
    /// Telemetry frame accepted and stored
    FrameAccepted,
    /// Telemetry frame rejected for its checksum
    ChecksumMismatch {
        received: u8,
        computed: u8,
    },
    /// Telemetry frame rejected for its structure
    FrameRejected(FrameError),
    /// Assembler dropped windows since the last cycle
    Desynced {
        count: u32,
    },
    /// Timeout elapsed without an accepted frame
    TimedOut,
}

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Transmitter refused a byte; it is retried next cycle
    Tx(E),
}

/// Link scheduler context
///
/// Owns the latest accepted telemetry. The frame mailbox is passed in on
/// every step since it is shared with the byte-arrival context.
pub struct LinkScheduler<C: Checksum = Crc8> {
    checksum: C,
    config: LinkConfig,
    timeout_ticks: u32,
    frame: ControlFrame,
    phase: TxPhase,
    telemetry: TelemetryFrame,
    health: LinkHealth,
    stats: LinkStats,
    ticks_since_frame: u32,
}

impl LinkScheduler<Crc8> {
    /// Create a scheduler using the software CRC-8
    pub fn new(config: LinkConfig, timeout_ticks: u32) -> Self {
        Self::with_checksum(Crc8, config, timeout_ticks)
    }
}

impl<C: Checksum> LinkScheduler<C> {
    /// Create a scheduler with a board-supplied checksum primitive
    pub fn with_checksum(checksum: C, config: LinkConfig, timeout_ticks: u32) -> Self {
        let frame = ControlFrame::encode(&ButtonState::default(), &checksum);
        Self {
            checksum,
            config,
            timeout_ticks,
            frame,
            phase: TxPhase::Sending(0),
            telemetry: TelemetryFrame::default(),
            health: LinkHealth::Timeout,
            stats: LinkStats::default(),
            ticks_since_frame: 0,
        }
    }

    /// Latest accepted telemetry
    pub fn telemetry(&self) -> &TelemetryFrame {
        &self.telemetry
    }

    /// Last link condition
    pub fn health(&self) -> LinkHealth {
        self.health
    }

    /// Diagnostic counters
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Transmit pacing position
    pub fn tx_phase(&self) -> TxPhase {
        self.phase
    }

    /// Run one cycle: receive side first, then one transmit step
    pub fn step<T: ByteTx, M: RawMutex>(
        &mut self,
        tx: &mut T,
        buttons: &ButtonState,
        mailbox: &FrameMailbox<M>,
    ) -> Result<LinkEvent, LinkError<T::Error>> {
        let event = self.poll_rx(mailbox);
        self.poll_tx(tx, buttons)?;
        Ok(event)
    }

    /// Drain the mailbox and update telemetry, health and counters
    pub fn poll_rx<M: RawMutex>(&mut self, mailbox: &FrameMailbox<M>) -> LinkEvent {
        let mut event = LinkEvent::Idle;

        let counters = mailbox.take_counters();
        self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(counters.dropped);
        self.stats.overflows = self.stats.overflows.saturating_add(counters.overflows);
        self.stats.desyncs = self.stats.desyncs.saturating_add(counters.desyncs);
        if counters.desyncs > 0 || counters.overflows > 0 {
            self.health = LinkHealth::FrameError;
            event = LinkEvent::Desynced {
                count: counters.desyncs.saturating_add(counters.overflows),
            };
        }

        if let Some(bytes) = mailbox.take_frame() {
            match TelemetryFrame::decode_checked(&bytes, &self.checksum, self.config.checksum) {
                Ok(frame) => {
                    self.telemetry = frame;
                    self.health = LinkHealth::Synced;
                    self.ticks_since_frame = 0;
                    self.stats.frames_accepted = self.stats.frames_accepted.saturating_add(1);
                    return LinkEvent::FrameAccepted;
                }
                Err(FrameError::InvalidChecksum { received, computed }) => {
                    self.health = LinkHealth::FrameError;
                    self.stats.checksum_errors = self.stats.checksum_errors.saturating_add(1);
                    event = LinkEvent::ChecksumMismatch { received, computed };
                }
                Err(err) => {
                    self.health = LinkHealth::FrameError;
                    event = LinkEvent::FrameRejected(err);
                }
            }
        }

        self.ticks_since_frame = self.ticks_since_frame.saturating_add(1);
        if self.ticks_since_frame == self.timeout_ticks {
            self.health = LinkHealth::Timeout;
            if event == LinkEvent::Idle {
                event = LinkEvent::TimedOut;
            }
        }

        event
    }

    /// Advance the transmit pacing by one cycle
    pub fn poll_tx<T: ByteTx>(
        &mut self,
        tx: &mut T,
        buttons: &ButtonState,
    ) -> Result<TxPhase, LinkError<T::Error>> {
        self.phase = match self.phase {
            TxPhase::Sending(index) => {
                let byte = self.frame.as_bytes()[usize::from(index)];
                tx.write_byte(byte).map_err(LinkError::Tx)?;
                let next = index + 1;
                if usize::from(next) < CONTROL_FRAME_LEN {
                    TxPhase::Sending(next)
                } else {
                    self.stats.frames_sent = self.stats.frames_sent.saturating_add(1);
                    TxPhase::Gap(0)
                }
            }
            TxPhase::Gap(elapsed) => {
                let elapsed = elapsed + 1;
                if elapsed < INTER_FRAME_GAP {
                    TxPhase::Gap(elapsed)
                } else {
                    TxPhase::Encode
                }
            }
            TxPhase::Encode => {
                self.frame = ControlFrame::encode(buttons, &self.checksum);
                TxPhase::Sending(0)
            }
        };
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTx, TxFull};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use hydrogreen_protocol::{ChecksumPolicy, SyncPolicy, EOT_BYTE, TELEMETRY_FRAME_LEN};

    const TIMEOUT: u32 = 50;

    fn scheduler(policy: ChecksumPolicy) -> LinkScheduler {
        LinkScheduler::new(
            LinkConfig {
                checksum: policy,
                ..Default::default()
            },
            TIMEOUT,
        )
    }

    fn mailbox() -> FrameMailbox<NoopRawMutex> {
        FrameMailbox::new(SyncPolicy::Realign)
    }

    #[test]
    fn test_pacing_period_is_23_cycles() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mut tx = FakeTx::default();
        let mailbox = mailbox();
        let idle = ButtonState::default();

        for _ in 0..CONTROL_FRAME_LEN {
            link.step(&mut tx, &idle, &mailbox).unwrap();
        }
        assert_eq!(tx.bytes.len(), CONTROL_FRAME_LEN);
        assert_eq!(link.tx_phase(), TxPhase::Gap(0));

        for _ in 0..INTER_FRAME_GAP {
            link.step(&mut tx, &idle, &mailbox).unwrap();
        }
        assert_eq!(tx.bytes.len(), CONTROL_FRAME_LEN);
        assert_eq!(link.tx_phase(), TxPhase::Encode);

        link.step(&mut tx, &idle, &mailbox).unwrap();
        assert_eq!(link.tx_phase(), TxPhase::Sending(0));
        assert_eq!(tx.bytes.len(), CONTROL_FRAME_LEN);

        link.step(&mut tx, &idle, &mailbox).unwrap();
        assert_eq!(tx.bytes.len(), CONTROL_FRAME_LEN + 1);
        assert_eq!(link.stats().frames_sent, 1);
    }

    #[test]
    fn test_buttons_sampled_at_encode_cycle() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mut tx = FakeTx::default();
        let mailbox = mailbox();
        let idle = ButtonState::default();
        let pressed = ButtonState {
            half_gas: true,
            speed_reset: true,
            power_supply: true,
            ..Default::default()
        };

        // First frame carries the initial all-released state
        for _ in 0..CONTROL_FRAME_LEN + usize::from(INTER_FRAME_GAP) {
            link.step(&mut tx, &pressed, &mailbox).unwrap();
        }
        assert_eq!(&tx.bytes[..9], &[0; 9]);

        link.step(&mut tx, &pressed, &mailbox).unwrap();
        tx.bytes.clear();
        for _ in 0..CONTROL_FRAME_LEN {
            link.step(&mut tx, &idle, &mailbox).unwrap();
        }
        let expected = ControlFrame::encode(&pressed, &Crc8);
        assert_eq!(&tx.bytes[..], expected.as_bytes());
        assert_eq!(&tx.bytes[..10], &[1, 0, 0, 1, 1, 0, 0, 0, 0, EOT_BYTE]);
    }

    #[test]
    fn test_tx_error_retries_same_byte() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mut tx = FakeTx {
            fail: true,
            ..Default::default()
        };
        let mailbox = mailbox();
        let idle = ButtonState::default();

        assert_eq!(
            link.step(&mut tx, &idle, &mailbox),
            Err(LinkError::Tx(TxFull))
        );
        assert_eq!(link.tx_phase(), TxPhase::Sending(0));

        tx.fail = false;
        link.step(&mut tx, &idle, &mailbox).unwrap();
        assert_eq!(link.tx_phase(), TxPhase::Sending(1));
        assert_eq!(tx.bytes.len(), 1);
    }

    #[test]
    fn test_accepts_valid_frame() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mailbox = mailbox();
        let frame = TelemetryFrame {
            speed: 33,
            sc_voltage: 48.5,
            ..Default::default()
        };
        mailbox.on_bytes(&frame.encode(&Crc8));

        assert_eq!(link.health(), LinkHealth::Timeout);
        assert_eq!(link.poll_rx(&mailbox), LinkEvent::FrameAccepted);
        assert_eq!(link.telemetry(), &frame);
        assert_eq!(link.health(), LinkHealth::Synced);
        assert_eq!(link.stats().frames_accepted, 1);
    }

    #[test]
    fn test_checksum_policy() {
        let frame = TelemetryFrame {
            h2_leak: 1,
            ..Default::default()
        };
        let mut bytes = frame.encode(&Crc8);
        bytes[TELEMETRY_FRAME_LEN - 2] ^= 0xFF;

        let mut strict = scheduler(ChecksumPolicy::Verify);
        let mailbox = mailbox();
        mailbox.on_bytes(&bytes);
        assert!(matches!(
            strict.poll_rx(&mailbox),
            LinkEvent::ChecksumMismatch { .. }
        ));
        assert_eq!(strict.telemetry(), &TelemetryFrame::default());
        assert_eq!(strict.health(), LinkHealth::FrameError);
        assert_eq!(strict.stats().checksum_errors, 1);

        let mut lenient = scheduler(ChecksumPolicy::Ignore);
        mailbox.on_bytes(&bytes);
        assert_eq!(lenient.poll_rx(&mailbox), LinkEvent::FrameAccepted);
        assert!(lenient.telemetry().leak_detected());
    }

    #[test]
    fn test_rejected_frame_keeps_last_good_telemetry() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mailbox = mailbox();
        let good = TelemetryFrame {
            speed: 20,
            ..Default::default()
        };
        mailbox.on_bytes(&good.encode(&Crc8));
        link.poll_rx(&mailbox);

        let mut bad = TelemetryFrame {
            speed: 99,
            ..Default::default()
        }
        .encode(&Crc8);
        bad[0] ^= 0x01;
        mailbox.on_bytes(&bad);
        link.poll_rx(&mailbox);

        assert_eq!(link.telemetry().speed, 20);
    }

    #[test]
    fn test_desync_reported() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mailbox = FrameMailbox::<NoopRawMutex>::new(SyncPolicy::Discard);
        mailbox.on_bytes(&[0u8; TELEMETRY_FRAME_LEN]);

        assert_eq!(link.poll_rx(&mailbox), LinkEvent::Desynced { count: 1 });
        assert_eq!(link.health(), LinkHealth::FrameError);
        assert_eq!(link.stats().desyncs, 1);
    }

    #[test]
    fn test_timeout_after_silence() {
        let mut link = scheduler(ChecksumPolicy::Verify);
        let mailbox = mailbox();
        mailbox.on_bytes(&TelemetryFrame::default().encode(&Crc8));
        assert_eq!(link.poll_rx(&mailbox), LinkEvent::FrameAccepted);

        for _ in 0..TIMEOUT - 1 {
            assert_eq!(link.poll_rx(&mailbox), LinkEvent::Idle);
        }
        assert_eq!(link.health(), LinkHealth::Synced);
        assert_eq!(link.poll_rx(&mailbox), LinkEvent::TimedOut);
        assert_eq!(link.health(), LinkHealth::Timeout);
        // Reported once
        assert_eq!(link.poll_rx(&mailbox), LinkEvent::Idle);
    }
}

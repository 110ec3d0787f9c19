//! Frame handoff between the byte-arrival context and the main cycle

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use hydrogreen_protocol::{AssemblerEvent, LinkAssembler, SyncPolicy, TELEMETRY_FRAME_LEN};

/// Receive-side error counts since the last drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxCounters {
    pub desyncs: u32,
    pub overflows: u32,
    pub dropped: u32,
}

impl RxCounters {
    /// Check if nothing went wrong
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

struct MailboxState {
    assembler: LinkAssembler<TELEMETRY_FRAME_LEN>,
    pending: Option<[u8; TELEMETRY_FRAME_LEN]>,
    counters: RxCounters,
}

/// Telemetry assembler plus a one-frame slot behind a blocking mutex
///
/// Typically placed in a `static` with `CriticalSectionRawMutex`.
pub struct FrameMailbox<M: RawMutex> {
    inner: Mutex<M, RefCell<MailboxState>>,
}

impl<M: RawMutex> FrameMailbox<M> {
    /// Create an empty mailbox
    pub const fn new(policy: SyncPolicy) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(MailboxState {
                assembler: LinkAssembler::new(policy),
                pending: None,
                counters: RxCounters {
                    desyncs: 0,
                    overflows: 0,
                    dropped: 0,
                },
            })),
        }
    }

    /// Feed one received byte
    ///
    /// A completed frame replaces any frame still waiting in the slot.
    pub fn on_byte(&self, byte: u8) -> AssemblerEvent<TELEMETRY_FRAME_LEN> {
        self.inner.lock(|state| {
            let mut state = state.borrow_mut();
            let event = state.assembler.push(byte);
            match &event {
                AssemblerEvent::Complete(frame) => {
                    if state.pending.replace(*frame).is_some() {
                        state.counters.dropped = state.counters.dropped.saturating_add(1);
                    }
                }
                AssemblerEvent::Desync { .. } => {
                    state.counters.desyncs = state.counters.desyncs.saturating_add(1);
                }
                AssemblerEvent::Overflow => {
                    state.counters.overflows = state.counters.overflows.saturating_add(1);
                }
                AssemblerEvent::Collecting(_) => {}
            }
            event
        })
    }

    /// Feed a run of received bytes
    pub fn on_bytes(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.on_byte(byte);
        }
    }

    /// Take the waiting frame, if any
    pub fn take_frame(&self) -> Option<[u8; TELEMETRY_FRAME_LEN]> {
        self.inner.lock(|state| state.borrow_mut().pending.take())
    }

    /// Take and clear the error counters
    pub fn take_counters(&self) -> RxCounters {
        self.inner
            .lock(|state| core::mem::take(&mut state.borrow_mut().counters))
    }

    /// Switch the resynchronization policy, dropping any partial frame
    pub fn configure(&self, policy: SyncPolicy) {
        self.inner.lock(|state| {
            state.borrow_mut().assembler = LinkAssembler::new(policy);
        });
    }

    /// Drop any partial or waiting frame
    pub fn reset(&self) {
        self.inner.lock(|state| {
            let mut state = state.borrow_mut();
            state.assembler.reset();
            state.pending = None;
        });
    }
}

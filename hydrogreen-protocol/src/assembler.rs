//! Byte-by-byte frame assembly for the receive side of the link.
//!
//! The controller streams fixed-length telemetry frames with no header, so
//! the only way to find a frame boundary is the EOT marker in the last
//! position. [`LinkAssembler`] stores bytes until it holds exactly one frame
//! length, then checks that the final byte is the marker.

use heapless::Vec;

use crate::frame::{EOT_BYTE, TELEMETRY_FRAME_LEN};

/// Assembly buffer capacity in bytes
pub const ASSEMBLY_CAPACITY: usize = 128;

/// Recovery strategy after a frame fails the marker check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncPolicy {
    /// Drop the whole window and start collecting from scratch
    Discard,
    /// Keep the bytes after the last marker seen in the window as the
    /// start of the next frame
    #[default]
    Realign,
}

/// Outcome of feeding one byte to the assembler
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblerEvent<const N: usize> {
    /// Frame incomplete; holds the number of bytes collected so far
    Collecting(usize),
    /// Full frame ending in the EOT marker
    Complete([u8; N]),
    /// Last byte of the window was not the marker; window dropped except
    /// for `kept` bytes carried into the next frame
    Desync {
        /// Bytes retained by [`SyncPolicy::Realign`]
        kept: usize,
    },
    /// Buffer bound hit; collection restarted at this byte
    Overflow,
}

/// Incremental frame collector
///
/// `N` is the fixed frame length, checked at compile time against
/// [`ASSEMBLY_CAPACITY`].
#[derive(Debug, Clone)]
pub struct LinkAssembler<const N: usize = TELEMETRY_FRAME_LEN> {
    buffer: Vec<u8, ASSEMBLY_CAPACITY>,
    policy: SyncPolicy,
}

impl<const N: usize> Default for LinkAssembler<N> {
    fn default() -> Self {
        Self::new(SyncPolicy::default())
    }
}

impl<const N: usize> LinkAssembler<N> {
    /// Frame length this assembler collects
    pub const FRAME_LEN: usize = N;

    const VALID_LEN: () = assert!(
        N >= 2 && N <= ASSEMBLY_CAPACITY,
        "frame length must be between 2 and ASSEMBLY_CAPACITY"
    );

    /// Create an empty assembler
    pub const fn new(policy: SyncPolicy) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_LEN;
        Self {
            buffer: Vec::new(),
            policy,
        }
    }

    /// Resynchronization policy in use
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Number of bytes currently held
    pub fn cursor(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no bytes are held
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed a single received byte
    pub fn push(&mut self, byte: u8) -> AssemblerEvent<N> {
        // The window is cleared or cut below N each time it reaches N bytes,
        // so with N <= ASSEMBLY_CAPACITY this guard does not fire.
        let overflow = self.buffer.is_full();
        if overflow {
            self.buffer.clear();
        }
        // Room is guaranteed by the check above
        let _ = self.buffer.push(byte);
        if overflow {
            return AssemblerEvent::Overflow;
        }

        if self.buffer.len() < N {
            return AssemblerEvent::Collecting(self.buffer.len());
        }

        if byte == EOT_BYTE {
            let mut frame = [0u8; N];
            frame.copy_from_slice(&self.buffer[..N]);
            self.buffer.clear();
            AssemblerEvent::Complete(frame)
        } else {
            let kept = self.resync();
            AssemblerEvent::Desync { kept }
        }
    }

    /// Feed a run of bytes, returning the first complete frame
    ///
    /// Bytes after a complete frame are not consumed.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Option<[u8; N]> {
        for &byte in bytes {
            if let AssemblerEvent::Complete(frame) = self.push(byte) {
                return Some(frame);
            }
        }
        None
    }

    fn resync(&mut self) -> usize {
        let tail_start = match self.policy {
            SyncPolicy::Discard => None,
            SyncPolicy::Realign => self
                .buffer
                .iter()
                .rposition(|&b| b == EOT_BYTE)
                .map(|pos| pos + 1),
        };

        match tail_start {
            Some(start) => {
                let kept = self.buffer.len() - start;
                let mut tail: Vec<u8, ASSEMBLY_CAPACITY> = Vec::new();
                // Tail is a sub-slice of the buffer, so it always fits
                let _ = tail.extend_from_slice(&self.buffer[start..]);
                self.buffer = tail;
                kept
            }
            None => {
                self.buffer.clear();
                0
            }
        }
    }
}

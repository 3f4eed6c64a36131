//! Extraction of file blocks from a model reply.
//!
//! The reply is scanned line by line with a three-state machine:
//!
//! ```text
//! Idle ──FILE: name──▶ AwaitingOpenFence ──```──▶ AwaitingCloseFence ──```──▶ Idle (emit update)
//! ```
//!
//! A `FILE: ` line restarts the machine from any state. Blocks that never
//! reach their closing fence are reported as abandoned and never written.

use sitewright_core::FileUpdate;

pub const FILE_MARKER: &str = "FILE: ";
pub const FENCE: &str = "```";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    AwaitingOpenFence {
        file: String,
    },
    AwaitingCloseFence {
        file: String,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// A `FILE:` marker arrived while the block was still open.
    SupersededByFileMarker,
    /// The file was named but its opening fence never appeared.
    MissingOpenFence,
    /// The reply ended inside the block.
    Unterminated,
}

impl AbandonReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbandonReason::SupersededByFileMarker => "superseded by another FILE: marker",
            AbandonReason::MissingOpenFence => "no opening fence",
            AbandonReason::Unterminated => "no closing fence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Completed(FileUpdate),
    Abandoned { file: String, reason: AbandonReason },
}

/// Everything extracted from one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Completed blocks, in reply order.
    pub updates: Vec<FileUpdate>,
    pub abandoned: Vec<(String, AbandonReason)>,
}

impl ParsedResponse {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.abandoned.is_empty()
    }
}

/// Advance the machine by one line.
pub fn step(state: ScanState, line: &str) -> (ScanState, Option<ScanEvent>) {
    if let Some(rest) = line.strip_prefix(FILE_MARKER) {
        let name = rest.split(FILE_MARKER).next().unwrap_or_default().trim();
        let event = interrupt(state, AbandonReason::SupersededByFileMarker);
        let next = if name.is_empty() {
            ScanState::Idle
        } else {
            ScanState::AwaitingOpenFence {
                file: name.to_string(),
            }
        };
        return (next, event);
    }

    match state {
        ScanState::Idle => (ScanState::Idle, None),
        ScanState::AwaitingOpenFence { file } => {
            if is_fence(line) {
                (
                    ScanState::AwaitingCloseFence {
                        file,
                        lines: Vec::new(),
                    },
                    None,
                )
            } else {
                (ScanState::AwaitingOpenFence { file }, None)
            }
        }
        ScanState::AwaitingCloseFence { file, mut lines } => {
            if is_fence(line) {
                let update = FileUpdate::new(file, lines.join("\n"));
                (ScanState::Idle, Some(ScanEvent::Completed(update)))
            } else {
                lines.push(line.to_string());
                (ScanState::AwaitingCloseFence { file, lines }, None)
            }
        }
    }
}

/// Close out the machine at end of input.
pub fn finish(state: ScanState) -> Option<ScanEvent> {
    interrupt(state, AbandonReason::Unterminated)
}

/// Scan a full reply.
pub fn parse_response(text: &str) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();
    let mut state = ScanState::Idle;

    for line in text.split('\n') {
        let (next, event) = step(state, line);
        state = next;
        if let Some(event) = event {
            parsed.record(event);
        }
    }
    if let Some(event) = finish(state) {
        parsed.record(event);
    }

    parsed
}

impl ParsedResponse {
    fn record(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Completed(update) => self.updates.push(update),
            ScanEvent::Abandoned { file, reason } => self.abandoned.push((file, reason)),
        }
    }
}

/// Only the trimmed line's prefix matters; any language tag is ignored.
fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Abandon whatever file `state` was tracking. `open_block_reason` applies
/// when a block was open; a named file without a block is always
/// [`AbandonReason::MissingOpenFence`].
fn interrupt(state: ScanState, open_block_reason: AbandonReason) -> Option<ScanEvent> {
    match state {
        ScanState::Idle => None,
        ScanState::AwaitingOpenFence { file } => Some(ScanEvent::Abandoned {
            file,
            reason: AbandonReason::MissingOpenFence,
        }),
        ScanState::AwaitingCloseFence { file, .. } => Some(ScanEvent::Abandoned {
            file,
            reason: open_block_reason,
        }),
    }
}

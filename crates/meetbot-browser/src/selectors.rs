//! Meet UI probes.
//!
//! These are heuristics against Google Meet's rendered UI, not a
//! stable API. Each one is best-effort by construction: a probe that
//! cannot be evaluated reports `Unknown` and callers treat that as
//! "signal absent".

use crate::page::SelectorSpec;

/// Positive in-call signal: the leave-call control only exists once
/// the bot is inside the meeting.
pub const IN_CALL: SelectorSpec = SelectorSpec::Css("[aria-label*='Leave call']");

/// Negative signal: still in the lobby waiting for the host.
pub const WAITING: SelectorSpec = SelectorSpec::BodyText("Asking to be let in");

/// The host denied entry.
pub const DENIED: SelectorSpec = SelectorSpec::BodyText("You can't join this call");

/// Informational/consent dialog shown on first visit.
pub const CONSENT_DISMISS: SelectorSpec = SelectorSpec::ButtonText("Got it");

/// Guest name entry on the pre-join screen.
pub const NAME_FIELD: SelectorSpec = SelectorSpec::Css("input[aria-label='Your name']");

/// Request-to-join control when the host gates entry.
pub const ASK_TO_JOIN: SelectorSpec = SelectorSpec::ButtonText("Ask to join");

/// Direct join control when the room is open.
pub const JOIN_NOW: SelectorSpec = SelectorSpec::ButtonText("Join now");

//! # agentrace-timeline
//!
//! Compiles a recorded AI-coding-agent session — a flat log of heterogeneous
//! events (user turns, assistant turns, tool calls, tool results, local shell
//! commands, plan-document operations) — into a structured tree of display
//! blocks, plus the navigation index and permalink mapping used to move
//! around the compiled timeline.
//!
//! The compiler is a pure function: identical input event arrays always
//! produce identical trees, ids included, so permalinks stay valid across
//! recompilation. It never fails; malformed payloads degrade to `unknown`
//! blocks that preserve the raw JSON for fallback rendering.
//!
//! ## Example
//!
//! ```rust
//! use agentrace_timeline::{compile, read_events_from_str};
//!
//! let events = read_events_from_str(
//!     r#"[{"id":"e1","session_id":"s1","event_type":"user",
//!         "payload":{"message":{"role":"user","content":"Fix the login bug"}},
//!         "created_at":"2026-03-01T10:00:00Z"}]"#,
//! )?;
//! let timeline = compile(&events);
//! assert_eq!(timeline.blocks.len(), 1);
//! assert_eq!(timeline.messages[0].preview, "Fix the login bug");
//! # Ok::<(), agentrace_timeline::TimelineError>(())
//! ```

mod block;
mod compile;
mod error;
mod event;
mod expand;
mod group;
mod nav;
mod permalink;
mod plan;
pub(crate) mod schema;
mod source;

pub use block::*;
pub use compile::*;
pub use error::*;
pub use event::*;
pub use expand::*;
pub use group::*;
pub use nav::*;
pub use permalink::*;
pub use plan::*;
pub use source::*;

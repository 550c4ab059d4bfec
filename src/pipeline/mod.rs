//! Pipeline stages for document-assistant requests.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different generation backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ prompts ──▶ client ──▶ tidy
//! (path/URL) (lopdf)    (render)  (retrying    (whitespace)
//!                                  backend)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to PDF bytes
//! 2. [`extract`] — page-ordered text extraction, pure Rust
//! 3. [`backend`] — the outbound seam: trait + Gemini implementation; the
//!    only stage with network I/O
//! 4. [`client`]  — retry/backoff decorator; the single call-site for the
//!    backend
//! 5. [`tidy`]    — deterministic whitespace cleanup of generated outputs

pub mod backend;
pub mod client;
pub mod extract;
pub mod input;
pub mod tidy;

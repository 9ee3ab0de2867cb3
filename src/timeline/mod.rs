//! Route + settings resolved into a fixed, sampled timeline.
//!
//! [`precalc::precalculate`] is the only place the timeline is computed. Everything downstream
//! (preview, export, the CLI) reads from the resulting [`precalc::PreCalculatedAnimation`].

pub mod fingerprint;
pub mod interp;
pub mod precalc;
pub mod settings;

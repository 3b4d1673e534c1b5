//! racesim - a tick-based horse race simulator.
//!
//! * `core` - horses, the per-tick transition, the simulator and its tick driver
//! * `pre` - command line options and parameter files
//! * `post` - final ranking board and result export
//! * `interfaces` - snapshots handed to the presentation layer

pub mod core;
pub mod error;
pub mod interfaces;
pub mod post;
pub mod pre;

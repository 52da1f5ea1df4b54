/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Lychee MSO clock/reset generator model.

--*/

mod clock_gate;
mod config;
mod crg;
mod domain;
mod error;
mod handshake;
mod pll;
mod por;
mod reset_sync;
mod sequencer;
mod signal;
mod soc;
mod timebase;

pub use clock_gate::{ClockDivider, ClockGate, DIVIDER_RATIOS};
pub use config::CrgConfig;
pub use crg::{Crg, Step};
pub use domain::{ClockDomain, ClockStatus, DomainState};
pub use error::CrgError;
pub use handshake::{Calibration, DramPhyInit, HandshakeLines, HandshakePort, ScriptedPhyInit};
pub use pll::{Pll, PllConfig};
pub use por::{PorState, PowerOnReset};
pub use reset_sync::{AsyncResetSynchronizer, ResetSources};
pub use sequencer::{Sequencer, States as SequencerState, Transition};
pub use signal::{Signal, SignalView};
pub use soc::Soc;
pub use timebase::{ClockSource, EdgeScheduler, Edges, Timebase};

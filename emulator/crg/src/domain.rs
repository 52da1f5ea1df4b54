// Licensed under the Apache-2.0 license

use strum_macros::{Display, EnumIter, EnumString};

/// Clock domains exported by the clock/reset generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ClockDomain {
    /// Reference clock, free running, no reset.
    Por,
    /// Reference clock, reset until the PLL is enabled.
    Init,
    /// Raw PLL output.
    #[strum(serialize = "sys2x_i")]
    Sys2xI,
    /// PLL output after the stall gate.
    #[strum(serialize = "sys2x")]
    Sys2x,
    /// Divided system clock.
    Sys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClockStatus {
    /// Source is toggling and reaches the domain.
    Running,
    /// Source is toggling but held by the gate.
    Gated,
    /// No source clock.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainState {
    pub clock: ClockStatus,
    pub reset: bool,
    pub edges: u64,
}

impl DomainState {
    pub(crate) fn new(reset: bool) -> Self {
        Self {
            clock: ClockStatus::Stopped,
            reset,
            edges: 0,
        }
    }

    /// Clocked and out of reset.
    pub fn is_usable(&self) -> bool {
        self.clock == ClockStatus::Running && !self.reset
    }
}

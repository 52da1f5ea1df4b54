// Licensed under the Apache-2.0 license

//! Asynchronous-assert, synchronous-release reset synchronizer.
//!
//! Two flops clocked by the destination domain. Any active source sets both
//! flops at once. With every source clear, each destination edge shifts a zero
//! through the chain, so the output releases on the second edge.

use crate::signal::{Signal, SignalView};
use bitflags::bitflags;

bitflags! {
    /// Reset sources OR'd into a domain reset. Ordering between sources is
    /// irrelevant, they are sampled together once per evaluation step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResetSources: u8 {
        /// The PLL is not locked.
        const LOCK_LOSS = 1 << 0;
        /// Board-level manual reset.
        const MANUAL = 1 << 1;
        /// Reset request routed by the bring-up sequencer.
        const REQUEST = 1 << 2;
    }
}

#[derive(Debug)]
pub struct AsyncResetSynchronizer {
    meta: bool,
    rst: Signal<bool>,
    sources: ResetSources,
}

impl AsyncResetSynchronizer {
    /// Comes out of power-up asserted.
    pub fn new(name: &'static str) -> Self {
        Self {
            meta: true,
            rst: Signal::new(name, true),
            sources: ResetSources::all(),
        }
    }

    /// Updates the source set. Assertion is immediate.
    pub fn drive(&mut self, sources: ResetSources) {
        self.sources = sources;
        if !sources.is_empty() {
            self.meta = true;
            if !self.rst.get() {
                log::debug!("{}: asserted by {:?}", self.rst.name(), sources);
            }
            self.rst.set(true);
        }
    }

    /// One destination clock edge.
    pub fn clock(&mut self) {
        if !self.sources.is_empty() {
            return;
        }
        let was = self.rst.get();
        self.rst.set(self.meta);
        self.meta = false;
        if was && !self.rst.get() {
            log::debug!("{}: released", self.rst.name());
        }
    }

    pub fn is_asserted(&self) -> bool {
        self.rst.get()
    }

    pub fn sources(&self) -> ResetSources {
        self.sources
    }

    pub fn output(&self) -> SignalView<bool> {
        self.rst.view()
    }
}

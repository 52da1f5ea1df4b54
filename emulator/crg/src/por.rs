// Licensed under the Apache-2.0 license

//! Power-on reset timer.
//!
//! A one-shot countdown clocked by the reference clock. The counter loads its
//! maximum value on power-up, decrements once per reference tick and holds at
//! zero. `power_stable` is driven high on the tick the counter reaches zero.

use crate::error::CrgError;
use crate::signal::{Signal, SignalView};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PorState {
    Counting,
    Done,
}

#[derive(Debug)]
pub struct PowerOnReset {
    width: u32,
    counter: u32,
    state: PorState,
    power_stable: Signal<bool>,
}

impl PowerOnReset {
    pub fn new(width: u32) -> Result<Self, CrgError> {
        if !(1..=32).contains(&width) {
            Err(CrgError::InvalidPorWidth(width))?;
        }
        let mut por = Self {
            width,
            counter: 0,
            state: PorState::Counting,
            power_stable: Signal::new("power_stable", false),
        };
        por.reload();
        Ok(por)
    }

    /// Counter value loaded on power-up, 2^W - 1.
    pub fn max(&self) -> u32 {
        u32::MAX >> (32 - self.width)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn state(&self) -> PorState {
        self.state
    }

    pub fn power_stable(&self) -> SignalView<bool> {
        self.power_stable.view()
    }

    /// One reference clock tick.
    pub fn tick(&mut self) {
        if self.state == PorState::Done {
            return;
        }
        self.counter -= 1;
        if self.counter == 0 {
            self.state = PorState::Done;
            self.power_stable.set(true);
            log::debug!("por: power stable");
        }
    }

    /// Device-level reset. Only a power cycle reloads the counter.
    pub fn reload(&mut self) {
        self.counter = self.max();
        self.state = PorState::Counting;
        self.power_stable.set(false);
    }
}

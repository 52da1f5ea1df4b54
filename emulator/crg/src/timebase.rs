/*++

Licensed under the Apache-2.0 license.

File Name:

    timebase.rs

Abstract:

    File contains the exact edge scheduler for the reference and PLL clocks.

--*/

use crate::pll::PllConfig;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Integer timebase shared by the reference clock and the PLL output.
///
/// The PLL runs at `f_ref * FBDIV / IDIV`, so choosing one reference period
/// as `FBDIV / g` units and one PLL period as `IDIV / g` units (`g` being
/// their gcd) keeps every edge on an exact integer instant. Coincident
/// edges are therefore reported together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timebase {
    ref_freq: f64,
    ref_period: u64,
    pll_period: u64,
}

impl Timebase {
    pub fn new(ref_freq: f64, pll: &PllConfig) -> Self {
        let fbdiv = pll.fbdiv as u64;
        let idiv = pll.idiv as u64;
        let g = gcd(fbdiv, idiv);
        Self {
            ref_freq,
            ref_period: fbdiv / g,
            pll_period: idiv / g,
        }
    }

    /// Reference clock period in timebase units.
    pub fn ref_period(&self) -> u64 {
        self.ref_period
    }

    /// PLL output period in timebase units.
    pub fn pll_period(&self) -> u64 {
        self.pll_period
    }

    pub fn units_per_second(&self) -> f64 {
        self.ref_freq * self.ref_period as f64
    }

    pub fn to_seconds(&self, units: u64) -> f64 {
        units as f64 / self.units_per_second()
    }

    pub fn to_micros(&self, units: u64) -> f64 {
        self.to_seconds(units) * 1e6
    }

    pub fn from_seconds(&self, seconds: f64) -> u64 {
        (seconds * self.units_per_second()).round() as u64
    }

    pub fn from_micros(&self, micros: f64) -> u64 {
        self.from_seconds(micros * 1e-6)
    }

    pub fn ref_cycles(&self, cycles: u64) -> u64 {
        cycles * self.ref_period
    }

    pub fn pll_cycles(&self, cycles: u64) -> u64 {
        cycles * self.pll_period
    }
}

/// A free-running clock that can be started and stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSource {
    period: u64,
    next_edge: Option<u64>,
}

impl ClockSource {
    pub fn new(period: u64) -> Self {
        Self {
            period,
            next_edge: None,
        }
    }

    pub fn start_at(&mut self, first_edge: u64) {
        self.next_edge = Some(first_edge);
    }

    pub fn stop(&mut self) {
        self.next_edge = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_edge.is_some()
    }

    pub fn next_edge(&self) -> Option<u64> {
        self.next_edge
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    fn advance(&mut self) {
        if let Some(edge) = self.next_edge {
            self.next_edge = Some(edge + self.period);
        }
    }
}

/// Rising edges that happen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    pub time: u64,
    pub reference: bool,
    pub pll: bool,
}

#[derive(Debug, Clone)]
pub struct EdgeScheduler {
    now: u64,
    pub reference: ClockSource,
    pub pll: ClockSource,
}

impl EdgeScheduler {
    /// The reference clock starts running one period after power-on. The PLL
    /// output is stopped until lock.
    pub fn new(timebase: &Timebase) -> Self {
        let mut reference = ClockSource::new(timebase.ref_period());
        reference.start_at(timebase.ref_period());
        Self {
            now: 0,
            reference,
            pll: ClockSource::new(timebase.pll_period()),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Instant of the next edge, if any clock is running.
    pub fn peek(&self) -> Option<u64> {
        match (self.reference.next_edge(), self.pll.next_edge()) {
            (None, None) => None,
            (Some(r), None) => Some(r),
            (None, Some(p)) => Some(p),
            (Some(r), Some(p)) => Some(r.min(p)),
        }
    }

    /// Advances to the next edge instant.
    pub fn next(&mut self) -> Option<Edges> {
        let time = self.peek()?;
        let reference = self.reference.next_edge() == Some(time);
        let pll = self.pll.next_edge() == Some(time);
        if reference {
            self.reference.advance();
        }
        if pll {
            self.pll.advance();
        }
        self.now = time;
        Some(Edges {
            time,
            reference,
            pll,
        })
    }

    /// Moves time forward without producing edges. Used when every clock is
    /// stopped.
    pub fn idle_until(&mut self, time: u64) {
        self.now = self.now.max(time);
    }
}

// Licensed under the Apache-2.0 license

//! Platform description of the Sipeed Tang Primer 20K core board mounted on
//! the Lychee MSO dock.

pub mod connector;
mod error;
pub mod io;

pub use connector::{Connector, CARD1};
pub use error::BoardError;
pub use io::{IoResource, IoStandard, Signals, Subsignal};

use std::fmt;
use std::str::FromStr;

pub const DEVICE: &str = "GW2A-LV18PG256C8/I7";
pub const DEVICE_NAME: &str = "GW2A-18C";
pub const DEFAULT_CLK_NAME: &str = "clk27";
pub const DEFAULT_CLK_FREQ: f64 = 27e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dock {
    #[default]
    Standard,
    Lite,
}

impl FromStr for Dock {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Dock::Standard),
            "lite" => Ok(Dock::Lite),
            other => Err(BoardError::UnsupportedDock(other.to_string())),
        }
    }
}

/// Gowin toolchain options set by the platform. Dual-purpose configuration
/// pins are released as GPIO since the dock routes signals to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainOptions {
    pub use_mspi_as_gpio: bool,
    pub use_jtag_as_gpio: bool,
    pub use_sspi_as_gpio: bool,
    pub use_ready_as_gpio: bool,
    pub use_done_as_gpio: bool,
    pub rw_check_on_ram: bool,
}

impl Default for ToolchainOptions {
    fn default() -> Self {
        Self {
            use_mspi_as_gpio: true,
            use_jtag_as_gpio: true,
            use_sspi_as_gpio: true,
            use_ready_as_gpio: true,
            use_done_as_gpio: true,
            rw_check_on_ram: true,
        }
    }
}

/// One resolved signal of a requested resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSignal {
    /// `None` for single-signal resources.
    pub name: Option<&'static str>,
    pub balls: Vec<&'static str>,
    pub io_standard: Option<IoStandard>,
    pub misc: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub name: &'static str,
    pub number: u32,
    pub signals: Vec<ResolvedSignal>,
}

impl fmt::Display for ResolvedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:{}", self.name, self.number)?;
        for signal in &self.signals {
            let std = signal
                .io_standard
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "  {:<10} {:<9} {}",
                signal.name.unwrap_or(self.name),
                std,
                signal.balls.join(" ")
            )?;
        }
        Ok(())
    }
}

pub struct Platform {
    pub dock: Dock,
    pub toolchain: ToolchainOptions,
    connectors: Vec<Connector>,
    resources: Vec<IoResource>,
}

impl Platform {
    pub fn new(dock: Dock) -> Result<Self, BoardError> {
        // Only the standard dock has a pinout.
        if dock != Dock::Standard {
            return Err(BoardError::UnsupportedDock("lite".to_string()));
        }
        let mut resources = io::CORE_IO.to_vec();
        resources.extend_from_slice(io::DOCK_IO);
        Ok(Self {
            dock,
            toolchain: ToolchainOptions::default(),
            connectors: vec![CARD1],
            resources,
        })
    }

    /// Default clock period in nanoseconds.
    pub fn default_clk_period(&self) -> f64 {
        1e9 / DEFAULT_CLK_FREQ
    }

    pub fn resources(&self) -> impl Iterator<Item = &IoResource> {
        self.resources.iter()
    }

    pub fn connector(&self, name: &str) -> Result<&Connector, BoardError> {
        self.connectors
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| BoardError::UnknownConnector(name.to_string()))
    }

    /// Resolves a single pin. Plain balls are returned unchanged,
    /// `CONNECTOR:PIN` references are looked up in the connector map.
    pub fn lookup_pin(&self, pin: &'static str) -> Result<&'static str, BoardError> {
        let Some((connector, number)) = pin.split_once(':') else {
            return Ok(pin);
        };
        let connector = self.connector(connector.trim())?;
        let number = number
            .trim()
            .parse::<usize>()
            .map_err(|_| BoardError::PinOutOfRange {
                connector: connector.name.to_string(),
                pin: number.to_string(),
            })?;
        connector.ball(number)
    }

    fn resolve_pins(&self, pins: &'static str) -> Result<Vec<&'static str>, BoardError> {
        pins.split_whitespace()
            .map(|pin| self.lookup_pin(pin))
            .collect()
    }

    fn resolve(&self, resource: &IoResource) -> Result<ResolvedResource, BoardError> {
        let signals = match resource.signals {
            Signals::Pins(pins) => vec![ResolvedSignal {
                name: None,
                balls: self.resolve_pins(pins)?,
                io_standard: resource.io_standard,
                misc: resource.misc.to_vec(),
            }],
            Signals::Subsignals(subs) => subs
                .iter()
                .map(|sub| {
                    let mut misc = resource.misc.to_vec();
                    misc.extend_from_slice(sub.misc);
                    Ok(ResolvedSignal {
                        name: Some(sub.name),
                        balls: self.resolve_pins(sub.pins)?,
                        io_standard: sub.io_standard.or(resource.io_standard),
                        misc,
                    })
                })
                .collect::<Result<Vec<_>, BoardError>>()?,
        };
        Ok(ResolvedResource {
            name: resource.name,
            number: resource.number,
            signals,
        })
    }

    /// Requests one resource by name and number.
    pub fn request(&self, name: &str, number: u32) -> Result<ResolvedResource, BoardError> {
        let resource = self
            .resources
            .iter()
            .find(|r| r.name == name && r.number == number)
            .ok_or_else(|| BoardError::UnknownResource {
                name: name.to_string(),
                number,
            })?;
        self.resolve(resource)
    }

    /// Requests every resource with the given name, ordered by number.
    pub fn request_all(&self, name: &str) -> Result<Vec<ResolvedResource>, BoardError> {
        let mut found: Vec<&IoResource> =
            self.resources.iter().filter(|r| r.name == name).collect();
        if found.is_empty() {
            return Err(BoardError::UnknownResource {
                name: name.to_string(),
                number: 0,
            });
        }
        found.sort_by_key(|r| r.number);
        found.into_iter().map(|r| self.resolve(r)).collect()
    }
}

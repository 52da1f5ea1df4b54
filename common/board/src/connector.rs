// Licensed under the Apache-2.0 license

//! Dock connectors.
//!
//! Connector maps are written the way the schematic reads: rows of ten
//! whitespace separated balls, index 0 first. `---` marks a connector pin that
//! is not routed to the FPGA (ground, supplies, NC).

use crate::error::BoardError;

const UNCONNECTED: &str = "---";

#[derive(Debug, Clone, Copy)]
pub struct Connector {
    pub name: &'static str,
    rows: &'static [&'static str],
}

impl Connector {
    pub const fn new(name: &'static str, rows: &'static [&'static str]) -> Self {
        Self { name, rows }
    }

    /// Number of positions, including the unused index 0.
    pub fn len(&self) -> usize {
        self.positions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn positions(&self) -> impl Iterator<Item = &'static str> {
        self.rows.iter().flat_map(|row| row.split_whitespace())
    }

    /// Resolves a connector pin number to the FPGA ball it is routed to.
    pub fn ball(&self, pin: usize) -> Result<&'static str, BoardError> {
        match self.positions().nth(pin) {
            Some(UNCONNECTED) => Err(BoardError::UnconnectedPin {
                connector: self.name.to_string(),
                pin,
            }),
            Some(ball) => Ok(ball),
            None => Err(BoardError::PinOutOfRange {
                connector: self.name.to_string(),
                pin: pin.to_string(),
            }),
        }
    }

    /// All routed pins as `(pin, ball)` pairs.
    pub fn routed(&self) -> impl Iterator<Item = (usize, &'static str)> {
        self.positions()
            .enumerate()
            .filter(|(_, ball)| *ball != UNCONNECTED)
    }
}

/// Dock 204 pins SODIMM connector.
pub const CARD1: Connector = Connector::new(
    "CARD1",
    &[
        // A.
        "---", // 0
        //     GND GND  5V  5V  5V  5V GND GND  NC   ( 1-10).
        " T13 --- --- --- --- --- --- --- --- ---",
        //      NC GND GND      NC  NC  NC GND GND   (11-20).
        " M11 --- --- --- T10 --- --- --- --- ---",
        //  NC 3V3  NC 3V3 GND GND                   (21-30).
        " --- --- --- --- --- ---  T6 R16  P6 P15",
        // GND GND                 GND GND           (31-40).
        " --- ---  T7 P16  R8 N15 --- ---  T8 N16",
        //         GND                 GND GND       (41-50).
        "  M6 N14 --- L16  T9 L14  P9 --- --- K15",
        //             GND GND                 GND   (51-60).
        " P11 K14 T11 --- --- K16 R11 J15 T12 ---",
        // GND                 GND                   (61-70).
        " --- H16 R12 H14 P13 --- R13 G16 T14 H15",
        // GND GND                                   (71-72).
        " --- ---",
        // B.
        //                                      NC   (73-82).
        " M15 L13 M14 K11 F13 K12 G12 K13 T15 ---",
        //                  NC  NC                   (83-92).
        " J16 H13 J14 J12 --- --- G14 H12 G15 G11",
        //  NC  NC                  NC  NC      NC  (93-102).
        " --- --- F14 B10 F16 A13 --- --- E15 ---",
        //      NC  NC  NC      NC      NC  NC  NC  (103-112).
        " D15 --- --- --- A15 --- B14 --- --- ---",
        //      NC      NC  NC  NC      NC      NC  (113-122).
        " A14 --- B13 --- --- --- C12 --- B12 ---",
        //      NC      NC GND GND                  (123-132).
        " A12 --- C11 --- --- --- B11 E16 A11 F15",
        // GND GND          NC GND GND      NC      (133-142).
        " --- --- C10 C13 --- --- --- D16 --- E14",
        //     GND GND                 GND GND      (143-152).
        "  B8 --- ---  C9  C6  A9  A7 --- --- L12",
        //         GND GND                 GND GND  (153-162).
        "  A6 J11 --- ---  C7  E9  D7  E8 --- ---",
        //     VCC     VCC GND GND     VCC     GND  (163-172).
        "  T2 ---  T3 --- --- ---  T4 ---  T5 ---",
        // GND VCC             GND GND              (173-182).
        " --- ---  N6 F10  N7 --- --- D11  N9 D10",
        //     GND GND      NC  NC GND GND          (183-192).
        "  R9 --- --- E10 --- --- --- ---  N8 R7",
        //         GND GND  NC      NC      NC  NC  (193-202).
        "  L9  P7 --- --- ---  M6 ---  L8 --- ---",
        //  NC  NC                                  (203-204).
        " --- ---",
    ],
);

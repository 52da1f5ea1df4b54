// Licensed under the Apache-2.0 license

//! IO resource tables for the Tang Primer 20K core board and the Lychee MSO
//! dock.
//!
//! Pins are written as on the schematic: whitespace separated FPGA balls, or
//! `CONNECTOR:PIN` references that are resolved against the dock connector.

use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum IoStandard {
    #[strum(serialize = "LVCMOS33")]
    Lvcmos33,
    #[strum(serialize = "LVCMOS18")]
    Lvcmos18,
    #[strum(serialize = "LVCMOS15")]
    Lvcmos15,
    #[strum(serialize = "SSTL15")]
    Sstl15,
    #[strum(serialize = "SSTL15D")]
    Sstl15D,
}

#[derive(Debug, Clone, Copy)]
pub struct Subsignal {
    pub name: &'static str,
    pub pins: &'static str,
    pub io_standard: Option<IoStandard>,
    pub misc: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub enum Signals {
    Pins(&'static str),
    Subsignals(&'static [Subsignal]),
}

#[derive(Debug, Clone, Copy)]
pub struct IoResource {
    pub name: &'static str,
    pub number: u32,
    pub signals: Signals,
    pub io_standard: Option<IoStandard>,
    pub misc: &'static [&'static str],
}

const fn sub(name: &'static str, pins: &'static str) -> Subsignal {
    Subsignal {
        name,
        pins,
        io_standard: None,
        misc: &[],
    }
}

const fn sub_std(name: &'static str, pins: &'static str, io_standard: IoStandard) -> Subsignal {
    Subsignal {
        name,
        pins,
        io_standard: Some(io_standard),
        misc: &[],
    }
}

const fn pin(
    name: &'static str,
    number: u32,
    pins: &'static str,
    io_standard: IoStandard,
) -> IoResource {
    IoResource {
        name,
        number,
        signals: Signals::Pins(pins),
        io_standard: Some(io_standard),
        misc: &[],
    }
}

const fn group(
    name: &'static str,
    number: u32,
    subsignals: &'static [Subsignal],
    io_standard: Option<IoStandard>,
    misc: &'static [&'static str],
) -> IoResource {
    IoResource {
        name,
        number,
        signals: Signals::Subsignals(subsignals),
        io_standard,
        misc,
    }
}

use IoStandard::*;

// IOs ---------------------------------------------------------------------------------------------

pub const CORE_IO: &[IoResource] = &[
    // Clk / Rst.
    pin("clk27", 0, "H11", Lvcmos33),
    // Serial.
    group(
        "serial",
        0,
        &[sub("rx", "T13"), sub("tx", "M11")],
        Some(Lvcmos33),
        &[],
    ),
    // SPIFlash.
    group(
        "spiflash",
        0,
        &[
            sub_std("cs_n", "M9", Lvcmos33),
            sub_std("clk", "L10", Lvcmos33),
            sub_std("miso", "P10", Lvcmos33),
            sub_std("mosi", "R10", Lvcmos33),
        ],
        None,
        &[],
    ),
    // SDCard.
    group(
        "spisdcard",
        0,
        &[
            sub("clk", "N10"),
            sub("mosi", "R14"),
            sub("cs_n", "N11"),
            sub("miso", "M8"),
        ],
        Some(Lvcmos33),
        &[],
    ),
    group(
        "sdcard",
        0,
        &[
            sub("data", "M8 M7 M10 N11"),
            sub("cmd", "R14"),
            sub("clk", "N10"),
            sub("cd", "D15"),
        ],
        Some(Lvcmos33),
        &[],
    ),
    // DDR3 SDRAM IMD128M16R39CG8GNF-125.
    group(
        "ddram",
        0,
        &[
            sub_std("a", "F7 A4 D6 F8 C4 E6 B1 D8 A5 F9 K3 B7 A3 C8", Sstl15),
            sub_std("ba", "H4 D3 H5", Sstl15),
            sub_std("ras_n", "R4", Sstl15),
            sub_std("cas_n", "R6", Sstl15),
            sub_std("we_n", "L2", Sstl15),
            sub_std("cs_n", "P5", Sstl15),
            sub_std("dm", "G1 K5", Sstl15),
            Subsignal {
                name: "dq",
                pins: "G5 F5 F4 F3 E2 C1 E1 B3 M3 K4 N2 L1 P4 H3 R1 M2",
                io_standard: Some(Sstl15),
                misc: &["VREF=INTERNAL"],
            },
            sub_std("dqs_p", "G2 J5", Sstl15D),
            sub_std("dqs_n", "G3 K6", Sstl15D),
            sub_std("clk_p", "J1", Sstl15D),
            sub_std("clk_n", "J3", Sstl15D),
            sub_std("cke", "J2", Sstl15),
            sub_std("odt", "R3", Sstl15),
            sub_std("reset_n", "B9", Sstl15),
        ],
        None,
        &[],
    ),
];

// Dock IOs ----------------------------------------------------------------------------------------

// fGen 0/1/4 and logicAnalyzer 0/1/8 sit on configuration pins
// (RECONFIG_N, READY, DONE) or share the serial port and are left out.
pub const DOCK_IO: &[IoResource] = &[
    // Function generator.
    pin("fGen", 2, "F15", Lvcmos33),
    pin("fGen", 3, "E15", Lvcmos33),
    pin("fGen", 5, "D16", Lvcmos33),
    pin("fGen", 6, "E14", Lvcmos33),
    pin("fGen", 7, "C9", Lvcmos33),
    pin("fGen", 8, "H14", Lvcmos33),
    pin("fGen", 9, "G16", Lvcmos33),
    pin("fGen", 10, "A9", Lvcmos33),
    // Logic analyzer.
    pin("logicAnalyzer", 2, "T7", Lvcmos33),
    pin("logicAnalyzer", 3, "R8", Lvcmos33),
    pin("logicAnalyzer", 4, "M6", Lvcmos33),
    pin("logicAnalyzer", 5, "P9", Lvcmos33),
    pin("logicAnalyzer", 6, "T11", Lvcmos33),
    pin("logicAnalyzer", 7, "T12", Lvcmos33),
    pin("logicAnalyzer", 9, "T6", Lvcmos33),
    pin("logicAnalyzer", 10, "P6", Lvcmos33),
    pin("logicAnalyzer", 11, "T8", Lvcmos33),
    pin("logicAnalyzer", 12, "T9", Lvcmos33),
    pin("logicAnalyzer", 13, "P11", Lvcmos33),
    pin("logicAnalyzer", 14, "R11", Lvcmos33),
    pin("logicAnalyzer", 15, "H15", Lvcmos33),
    // Leds. 0-3 are wired to a 1.8V bank on the dock.
    pin("led", 0, "CARD1:44", Lvcmos18),
    pin("led", 1, "CARD1:46", Lvcmos18),
    pin("led", 2, "CARD1:42", Lvcmos18),
    pin("led", 3, "CARD1:40", Lvcmos18),
    pin("led", 4, "CARD1:98", Lvcmos33),
    pin("led", 5, "CARD1:136", Lvcmos33),
    // Arbitrary waveform generator.
    group(
        "AWG",
        0,
        &[
            sub("data_0", "L12"),
            sub("data_1", "J11"),
            sub("data_2", "N6"),
            sub("data_3", "N7"),
            sub("data_4", "N9"),
            sub("data_5", "R9"),
            sub("data_6", "D11"),
            sub("data_7", "D10"),
            sub("data_8", "N8"),
            sub("data_9", "L9"),
            sub("data_10", "R7"),
            sub("data_11", "P7"),
            sub("data_12", "M7"),
            sub("data_13", "L8"),
            sub("clk", "E10"),
        ],
        None,
        &["PULL_MODE=NONE"],
    ),
    // RGB led.
    pin("rgb_led", 0, "CARD1:45", Lvcmos18),
    // Buttons.
    pin("btn_n", 0, "CARD1:15", Lvcmos33),
    pin("btn_n", 1, "CARD1:165", Lvcmos15),
    pin("btn_n", 2, "CARD1:163", Lvcmos15),
    pin("btn_n", 3, "CARD1:159", Lvcmos15),
    pin("btn_n", 4, "CARD1:157", Lvcmos15),
    // HDMI.
    group(
        "hdmi",
        0,
        &[
            sub("clk_p", "CARD1:68"),
            sub("clk_n", "CARD1:70"),
            sub("data0_p", "CARD1:64"),
            sub("data0_n", "CARD1:62"),
            sub("data1_p", "CARD1:58"),
            sub("data1_n", "CARD1:56"),
            sub("data2_p", "CARD1:52"),
            sub("data2_n", "CARD1:50"),
            sub_std("hdp", "CARD1:154", Lvcmos18),
            sub_std("cec", "CARD1:152", Lvcmos18),
            sub_std("sda", "CARD1:95", Lvcmos18),
            sub_std("scl", "CARD1:97", Lvcmos18),
        ],
        None,
        &["PULL_MODE=NONE"],
    ),
    // LCD.
    group(
        "lcd",
        0,
        &[
            // Control.
            sub("rst", "CARD1:123"),
            sub("bl", "CARD1:186"),
            sub("sda", "CARD1:95"),
            sub("scl", "CARD1:97"),
            sub("int", "CARD1:125"),
            // Video.
            sub("clk", "CARD1:183"),
            sub("de", "CARD1:101"),
            sub("hsync", "CARD1:107"),
            sub("vsync", "CARD1:103"),
            sub("r", "CARD1:193 CARD1:191 CARD1:181 CARD1:177 CARD1:175"),
            sub(
                "g",
                "CARD1:180 CARD1:131 CARD1:129 CARD1:194 CARD1:192 CARD1:182",
            ),
            sub("b", "CARD1:121 CARD1:119 CARD1:115 CARD1:113 CARD1:109"),
        ],
        Some(Lvcmos18),
        &[],
    ),
];

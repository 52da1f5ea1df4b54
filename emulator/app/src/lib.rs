/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Library interface for the Lychee MSO clock/reset emulator.

--*/

pub mod emulator;
pub mod pins;

pub use emulator::{Cli, Commands, Emulator, PllArgs, Report, RunArgs};

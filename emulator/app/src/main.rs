/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the Lychee MSO clock/reset emulator.

--*/

use clap::Parser;
use emulator::emulator::pll_report;
use emulator::pins::pins;
use emulator::{Cli, Commands, Emulator};
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(LevelFilter::from(cli.log_level))
        .init()?;

    match cli.command {
        Commands::Run(args) => {
            let report = Emulator::from_args(&args)?.run();
            print!("{report}");
        }
        Commands::Pll(args) => print!("{}", pll_report(&args)?),
        Commands::Pins { resource, number } => print!("{}", pins(resource.as_deref(), number)?),
    }
    Ok(())
}

// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while resolving board resources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("no resource {name}:{number} on this platform")]
    UnknownResource { name: String, number: u32 },
    #[error("no connector named {0}")]
    UnknownConnector(String),
    #[error("connector pin {connector}:{pin} does not exist")]
    PinOutOfRange { connector: String, pin: String },
    #[error("connector pin {connector}:{pin} is not connected to the FPGA")]
    UnconnectedPin { connector: String, pin: usize },
    #[error("dock {0} is not supported")]
    UnsupportedDock(String),
}

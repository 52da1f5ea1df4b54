// Licensed under the Apache-2.0 license

use lychee_board::{BoardError, Dock, Platform, DEFAULT_CLK_FREQ, DEFAULT_CLK_NAME, DEVICE};
use std::fmt::Write;

/// Renders the pin assignments of one resource, every resource with a given
/// name, or the whole platform.
pub fn pins(resource: Option<&str>, number: Option<u32>) -> Result<String, BoardError> {
    let platform = Platform::new(Dock::Standard)?;
    let resolved = match (resource, number) {
        (Some(name), Some(number)) => vec![platform.request(name, number)?],
        (Some(name), None) => platform.request_all(name)?,
        (None, _) => platform
            .resources()
            .map(|r| platform.request(r.name, r.number))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut out = String::new();
    if resource.is_none() {
        let _ = writeln!(
            out,
            "{DEVICE}, {DEFAULT_CLK_NAME} @ {} MHz",
            DEFAULT_CLK_FREQ / 1e6
        );
    }
    for r in resolved {
        out.push_str(&r.to_string());
    }
    Ok(out)
}

// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::registry::{Pin, SourceCode};
use anyhow::{Context, Result};
use gpiocdev::chip::is_chip;
use std::path::PathBuf;
use std::time::Duration;

// common helper functions

pub fn chip_path_from_id(id: &str) -> PathBuf {
    if id.chars().all(char::is_numeric) {
        // from number
        return format!("/dev/gpiochip{id}").into();
    }
    if !id.chars().any(|x| x == '/') {
        // from name
        let mut p: PathBuf = "/dev".into();
        p.push(id);
        return p;
    }
    // from raw path
    id.into()
}

pub fn chip_lookup_from_id(id: &str) -> Result<PathBuf> {
    is_chip(chip_path_from_id(id))
        .with_context(|| format!("cannot find GPIO chip character device '{id}'"))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
    #[error("'{0}' is too long")]
    Overflow(String),
}

pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let t = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let t = num
                .parse::<u64>()
                .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
            let scale = match units {
                "us" => 1000,
                "ms" => 1000000,
                "s" => 1000000000,
                _ => return Err(ParseDurationError::Units(s.into())),
            };
            t.checked_mul(scale)
        }
        None => s
            .parse::<u64>()
            .map_err(|e| ParseDurationError::ParseDigits(s.into(), e))?
            .checked_mul(1000000),
    }
    .ok_or_else(|| ParseDurationError::Overflow(s.into()))?;
    Ok(Duration::from_nanos(t))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseBindingError {
    #[error("'{0}' is not a binding - use PIN=SOURCE")]
    Form(String),
    #[error("'{0}' is not a pin number")]
    Pin(String),
    #[error("'{0}' is not a source code - use decimal or 0x prefixed hex in 0..=255")]
    Source(String),
}

/// Parse a source code given as decimal or `0x` prefixed hex.
pub fn parse_source_code(s: &str) -> std::result::Result<SourceCode, ParseBindingError> {
    let v = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    v.map(SourceCode).map_err(|_| ParseBindingError::Source(s.into()))
}

/// Parse a `PIN=SOURCE` binding, e.g. `37=0x0f`.
pub fn parse_binding(s: &str) -> std::result::Result<(Pin, SourceCode), ParseBindingError> {
    let (pin, source) = s
        .split_once('=')
        .ok_or_else(|| ParseBindingError::Form(s.into()))?;
    let pin = pin
        .trim()
        .parse::<Pin>()
        .map_err(|_| ParseBindingError::Pin(pin.into()))?;
    Ok((pin, parse_source_code(source.trim())?))
}

pub fn format_error(verbose: bool, e: &anyhow::Error) -> String {
    if verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

/// Errors returned by srcsel functions.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    #[error("no pins are bound to sources")]
    NoBindings,

    #[error("pin {0} is bound more than once")]
    DuplicatePin(Pin),

    #[error("pin {0} is not a GPIO pin on the header")]
    NotGpioPin(Pin),

    #[error("queue depth must be at least 1")]
    ZeroQueueDepth,
}

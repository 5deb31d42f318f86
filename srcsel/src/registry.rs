// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::board;
use crate::common::Error;
use gpiocdev::line::Offset;
use std::collections::HashMap;
use std::fmt;

/// A physical header pin number.
pub type Pin = u32;

/// The zero-based identifier of a button.
///
/// The switch identifier is the position of its binding in the table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Switch(pub usize);

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An MCCS Input Select (VCP 0x60) value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SourceCode(pub u8);

impl fmt::Display for SourceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// The reference wiring, as (header pin, source code) in switch order.
pub const DEFAULT_BINDINGS: [(Pin, SourceCode); 4] = [
    (33, SourceCode(0x11)),
    (31, SourceCode(0x12)),
    (37, SourceCode(0x0f)),
    (35, SourceCode(0x13)),
];

/// Everything known about a bound button.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Binding {
    pub switch: Switch,
    pub pin: Pin,
    pub offset: Offset,
    pub source: SourceCode,
}

/// The immutable mapping from pins to their bindings.
#[derive(Clone, Debug)]
pub struct Registry {
    bindings: Vec<Binding>,
    by_pin: HashMap<Pin, usize>,
}

impl Registry {
    /// Build the registry from (pin, source) pairs given in switch order.
    pub fn new(table: &[(Pin, SourceCode)]) -> Result<Registry, Error> {
        if table.is_empty() {
            return Err(Error::NoBindings);
        }
        let mut bindings = Vec::with_capacity(table.len());
        let mut by_pin = HashMap::with_capacity(table.len());
        for (idx, (pin, source)) in table.iter().enumerate() {
            let offset = board::offset(*pin)?;
            if by_pin.insert(*pin, idx).is_some() {
                return Err(Error::DuplicatePin(*pin));
            }
            bindings.push(Binding {
                switch: Switch(idx),
                pin: *pin,
                offset,
                source: *source,
            });
        }
        Ok(Registry { bindings, by_pin })
    }

    /// The binding for the pin, or None if the pin is not bound.
    pub fn resolve(&self, pin: Pin) -> Option<&Binding> {
        self.by_pin.get(&pin).map(|idx| &self.bindings[*idx])
    }

    pub fn binding(&self, switch: Switch) -> Option<&Binding> {
        self.bindings.get(switch.0)
    }

    /// The bindings in switch order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The line offsets to request, in switch order.
    pub fn offsets(&self) -> Vec<Offset> {
        self.bindings.iter().map(|b| b.offset).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_by_position() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        assert_eq!(r.bindings().len(), DEFAULT_BINDINGS.len());
        for (idx, (pin, source)) in DEFAULT_BINDINGS.iter().enumerate() {
            let b = r.resolve(*pin).expect("pin should be bound");
            assert_eq!(b.switch, Switch(idx));
            assert_eq!(b.source, *source);
            assert_eq!(b.pin, *pin);
        }
    }

    #[test]
    fn resolve_unbound() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        assert_eq!(r.resolve(99), None);
        assert_eq!(r.resolve(0), None);
        // a GPIO pin, but not one with a button
        assert_eq!(r.resolve(11), None);
    }

    #[test]
    fn binding_by_switch() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        assert_eq!(
            r.binding(Switch(0)).map(|b| b.source),
            Some(SourceCode(0x11))
        );
        assert_eq!(
            r.binding(Switch(2)).map(|b| b.source),
            Some(SourceCode(0x0f))
        );
        assert_eq!(r.binding(Switch(4)), None);
    }

    #[test]
    fn reference_offsets() {
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        assert_eq!(r.offsets(), vec![13, 6, 26, 19]);
    }

    #[test]
    fn new_errors() {
        assert_eq!(Registry::new(&[]).unwrap_err(), Error::NoBindings);
        assert_eq!(
            Registry::new(&[(33, SourceCode(0x11)), (33, SourceCode(0x12))]).unwrap_err(),
            Error::DuplicatePin(33)
        );
        assert_eq!(
            Registry::new(&[(33, SourceCode(0x11)), (39, SourceCode(0x12))]).unwrap_err(),
            Error::NotGpioPin(39)
        );
    }

    #[test]
    fn source_code_display() {
        assert_eq!(SourceCode(0x0f).to_string(), "0x0f");
        assert_eq!(SourceCode(0x11).to_string(), "0x11");
    }
}

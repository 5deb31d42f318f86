// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical header pin numbering for the Raspberry Pi 40-pin header.
//!
//! Buttons are wired and configured by header pin, while the GPIO character
//! device identifies lines by their offset on the chip, which on the Pi is
//! the BCM GPIO number.

use crate::common::Error;
use crate::registry::Pin;
use gpiocdev::line::Offset;

/// The (header pin, line offset) pairs for the GPIO pins on the header.
///
/// All other header pins are power, ground or the ID EEPROM pins.
const HEADER: [(Pin, Offset); 26] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// The line offset wired to a header pin.
pub fn offset(pin: Pin) -> Result<Offset, Error> {
    HEADER
        .iter()
        .find(|(p, _)| *p == pin)
        .map(|(_, o)| *o)
        .ok_or(Error::NotGpioPin(pin))
}

/// The header pin a line offset is wired to, if any.
pub fn pin(offset: Offset) -> Option<Pin> {
    HEADER.iter().find(|(_, o)| *o == offset).map(|(p, _)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pins() {
        assert_eq!(offset(33), Ok(13));
        assert_eq!(offset(31), Ok(6));
        assert_eq!(offset(37), Ok(26));
        assert_eq!(offset(35), Ok(19));
    }

    #[test]
    fn non_gpio_pins() {
        for p in [0, 1, 2, 4, 6, 9, 14, 17, 20, 25, 27, 28, 30, 34, 39, 41, 99] {
            assert_eq!(offset(p), Err(Error::NotGpioPin(p)), "pin {p}");
        }
    }

    #[test]
    fn offset_to_pin() {
        for (p, o) in HEADER {
            assert_eq!(pin(o), Some(p));
        }
        assert_eq!(pin(0), None);
        assert_eq!(pin(28), None);
    }
}

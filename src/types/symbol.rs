//! Line levels and Manchester symbols.

use serde::{Deserialize, Serialize};

/// Logical level of the bus line at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineLevel {
    Low,
    High,
}

impl LineLevel {
    /// The opposite level.
    pub fn inverted(self) -> Self {
        match self {
            LineLevel::Low => LineLevel::High,
            LineLevel::High => LineLevel::Low,
        }
    }

    pub fn is_high(self) -> bool {
        self == LineLevel::High
    }
}

/// One decoded Manchester II symbol (IEC 61375-3-1 3.3.1.2 / 3.3.1.3).
///
/// `Bit0` and `Bit1` are the two data bits, distinguished by the direction of
/// the mid-cell transition. `Nh` and `Nl` are the non-data violations (a whole
/// bit cell held HIGH or LOW) that only occur inside delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    /// LOW first half, HIGH second half.
    Bit0,
    /// HIGH first half, LOW second half.
    Bit1,
    /// Held HIGH for the whole cell.
    Nh,
    /// Held LOW for the whole cell.
    Nl,
}

impl Symbol {
    /// Whether this symbol carries a data bit.
    pub fn is_data(self) -> bool {
        matches!(self, Symbol::Bit0 | Symbol::Bit1)
    }

    /// The bit value of a data symbol, `None` for the non-data violations.
    pub fn bit_value(self) -> Option<u8> {
        match self {
            Symbol::Bit0 => Some(0),
            Symbol::Bit1 => Some(1),
            Symbol::Nh | Symbol::Nl => None,
        }
    }

    /// Short name used in traces and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Bit0 => "0",
            Symbol::Bit1 => "1",
            Symbol::Nh => "NH",
            Symbol::Nl => "NL",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_symbols_carry_bits() {
        assert_eq!(Symbol::Bit0.bit_value(), Some(0));
        assert_eq!(Symbol::Bit1.bit_value(), Some(1));
        assert_eq!(Symbol::Nh.bit_value(), None);
        assert_eq!(Symbol::Nl.bit_value(), None);
        assert!(Symbol::Bit0.is_data());
        assert!(!Symbol::Nl.is_data());
    }

    #[test]
    fn level_inversion() {
        assert_eq!(LineLevel::High.inverted(), LineLevel::Low);
        assert_eq!(LineLevel::Low.inverted(), LineLevel::High);
    }
}

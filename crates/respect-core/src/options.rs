use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Policies that change how a comparison treats patterns.
    ///
    /// The empty set selects every default: unordered subset matching of
    /// sequences, extra elements allowed, zero values in the pattern ignored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Options: u32 {
        /// Sequence elements are compared position by position.
        const ORDER_MATTERS = 1 << 0;
        /// An actual sequence longer than the pattern is a divergence.
        const LENGTH_MATTERS = 1 << 1;
        /// Zero values in the pattern are asserted instead of ignored.
        const ZERO_VALUE_MATTERS = 1 << 2;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::empty()
    }
}

impl Options {
    /// OR together any number of option sets.
    pub fn combine(options: impl IntoIterator<Item = Options>) -> Self {
        options.into_iter().fold(Self::empty(), |acc, o| acc | o)
    }

    pub fn order_matters(self) -> bool {
        self.contains(Self::ORDER_MATTERS)
    }

    pub fn length_matters(self) -> bool {
        self.contains(Self::LENGTH_MATTERS)
    }

    pub fn zero_value_matters(self) -> bool {
        self.contains(Self::ZERO_VALUE_MATTERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_stable() {
        assert_eq!(Options::ORDER_MATTERS.bits(), 1);
        assert_eq!(Options::LENGTH_MATTERS.bits(), 2);
        assert_eq!(Options::ZERO_VALUE_MATTERS.bits(), 4);
        assert_eq!(Options::default(), Options::empty());
    }

    #[test]
    fn combine_ors_all_sets() {
        let options = Options::combine([Options::ORDER_MATTERS, Options::LENGTH_MATTERS]);
        assert!(options.order_matters());
        assert!(options.length_matters());
        assert!(!options.zero_value_matters());
        assert_eq!(Options::combine([]), Options::empty());
    }
}

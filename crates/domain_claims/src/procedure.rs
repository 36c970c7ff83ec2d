//! Billed procedure lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// A single billed procedure on a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    /// CDT procedure code (e.g. "D2140")
    pub code: String,
    /// Description as billed
    pub description: String,
    /// Fee per unit
    pub fee: Money,
    /// Tooth number, required for tooth-specific and surgical codes
    pub tooth: Option<String>,
    /// Tooth surface
    pub surface: Option<String>,
    /// Unit count, defaults to 1 when absent
    pub quantity: Option<u32>,
}

impl Procedure {
    /// Creates a procedure with just a code and fee
    pub fn new(code: impl Into<String>, fee: Money) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
            fee,
            tooth: None,
            surface: None,
            quantity: None,
        }
    }

    /// Fee times quantity (quantity defaults to 1)
    pub fn extended_charge(&self) -> Money {
        self.fee * Decimal::from(self.quantity.unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_extended_charge_defaults_quantity_to_one() {
        let proc = Procedure::new("D2140", Money::new(dec!(150)));
        assert_eq!(proc.extended_charge(), Money::new(dec!(150)));
    }

    #[test]
    fn test_extended_charge_multiplies_quantity() {
        let mut proc = Procedure::new("D1110", Money::new(dec!(45.50)));
        proc.quantity = Some(3);
        assert_eq!(proc.extended_charge(), Money::new(dec!(136.50)));
    }
}

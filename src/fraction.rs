use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Marketplace fee ratio. Kept as an explicit pair instead of `Decimal` so
/// fee math stays in integer space with `multiply_ratio`.
#[cw_serde]
#[derive(Copy)]
pub struct Fraction {
    pub nom: Uint128,
    pub denom: Uint128,
}

/// 3% unless instantiated with something else.
pub const DEFAULT_FEE: Fraction = Fraction {
    nom: Uint128::new(3),
    denom: Uint128::new(100),
};

impl Fraction {
    /// A usable fee has a non-zero denominator and stays below 1.
    pub fn is_valid(&self) -> bool {
        !self.denom.is_zero() && self.nom < self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.nom.is_zero()
    }

    /// The fee cut taken out of `amount`, rounded down.
    pub fn of(&self, amount: Uint128) -> Uint128 {
        amount.multiply_ratio(self.nom, self.denom)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.nom, self.denom)
    }
}

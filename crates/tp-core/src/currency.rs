//! Display currencies and the static rate table.
//!
//! Costs are always stored in the canonical currency. Converting for display
//! is a pure lookup in [`CURRENCY_TABLE`]; supporting another currency means
//! adding a variant and a table row.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A currency amounts can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Gbp,
    Usd,
}

/// One row of the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub currency: Currency,
    pub code: &'static str,
    pub symbol: &'static str,
    /// Units of this currency per canonical unit.
    pub rate: Decimal,
}

/// The currency costs are stored in.
pub const CANONICAL_CURRENCY: Currency = Currency::Eur;

/// Rate table, indexed by the `Currency` discriminant.
pub static CURRENCY_TABLE: [CurrencyInfo; 3] = [
    CurrencyInfo {
        currency: Currency::Eur,
        code: "EUR",
        symbol: "€",
        rate: Decimal::ONE,
    },
    CurrencyInfo {
        currency: Currency::Gbp,
        code: "GBP",
        symbol: "£",
        rate: Decimal::from_parts(85, 0, 0, false, 2),
    },
    CurrencyInfo {
        currency: Currency::Usd,
        code: "USD",
        symbol: "$",
        rate: Decimal::from_parts(108, 0, 0, false, 2),
    },
];

impl Currency {
    pub fn info(self) -> &'static CurrencyInfo {
        &CURRENCY_TABLE[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn rate(self) -> Decimal {
        self.info().rate
    }

    /// Converts a canonical amount into this currency, rounded to cents.
    pub fn convert(self, canonical_amount: Decimal) -> Decimal {
        (canonical_amount * self.rate() / CANONICAL_CURRENCY.rate())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Converts and renders an amount with its symbol, e.g. `£30.18`.
    pub fn display(self, canonical_amount: Decimal) -> String {
        format!("{}{:.2}", self.symbol(), self.convert(canonical_amount))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CURRENCY_TABLE
            .iter()
            .find(|info| info.code.eq_ignore_ascii_case(s.trim()))
            .map(|info| info.currency)
            .ok_or_else(|| InputError::unknown("currency", s))
    }
}

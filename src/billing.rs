use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(self, quantity: Decimal) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        write!(f, "${:.2}", rounded)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ServiceLine {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Money,
}

impl ServiceLine {
    pub fn new(description: &str, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.to_string(),
            quantity,
            unit_price: Money::new(unit_price),
        }
    }

    pub fn amount(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }

    /// Quantity as shown on the invoice, without trailing zeros
    pub fn quantity_display(&self) -> String {
        self.quantity.normalize().to_string()
    }
}

impl fmt::Display for ServiceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}",
            self.description,
            self.quantity_display(),
            self.unit_price
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceTotal {
    pub lines: Vec<Money>,
    pub total: Money,
}

impl InvoiceTotal {
    /// Exact sum of every line's quantity times unit price. `None` when
    /// a product or the running sum leaves the decimal range.
    pub fn calculate(services: &[ServiceLine]) -> Option<Self> {
        let lines = services
            .iter()
            .map(ServiceLine::amount)
            .collect::<Option<Vec<Money>>>()?;
        let total = lines
            .iter()
            .try_fold(Money::default(), |acc, x| acc.checked_add(*x))?;

        Some(Self { lines, total })
    }
}

impl fmt::Display for InvoiceTotal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Total: {}", self.total)
    }
}

/// The number following `current`, zero padded to three digits.
/// Non-numeric numbers have no successor and are never advanced.
pub fn next_invoice_number(current: &str) -> Option<String> {
    let number: i64 = current.trim().parse().ok()?;
    number.checked_add(1).map(|next| format!("{:03}", next))
}

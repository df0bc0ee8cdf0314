use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct Quote {
    symbol: String,
    name: Option<String>,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
    timestamp: Option<String>,
}

impl Quote {
    pub fn with_name(self, name: Option<String>) -> Self {
        Self { name, ..self }
    }

    /// Display name, or the symbol when no name is known.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn is_gain(&self) -> bool {
        self.change_percent >= Decimal::ZERO
    }
}

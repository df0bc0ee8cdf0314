use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct SectorPerformance {
    name: String,
    one_day: Decimal,
    five_day: Option<Decimal>,
    one_month: Option<Decimal>,
}

use std::{fmt::Display, str::FromStr};

use rust_decimal::prelude::ToPrimitive;
use rusty_money::{iso, Money, MoneyError};
use serde::{Deserialize, Serialize};

use crate::parse::text::normalize_whitespace;
use crate::parse::Error;
use crate::static_regex;

/// An amount in euros, parsed with the German convention (`1.234,50`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eur(Money<'static, iso::Currency>);

impl Eur {
    pub fn to_f64(&self) -> Option<f64> {
        self.0.amount().to_f64()
    }
}

impl FromStr for Eur {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Money::from_str(s, iso::EUR)?))
    }
}

impl Display for Eur {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Names of the price tiers, inferred from how many amounts a price carries.
pub fn tier_labels(count: usize) -> &'static [&'static str] {
    match count {
        2 => &["students", "guests"],
        3 => &["students", "staff", "guests"],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPrice {
    pub raw: String,
    pub currency: String,
    pub values: Vec<f64>,
    /// Either empty or aligned with `values`.
    pub labels: Vec<String>,
}

impl MealPrice {
    /// Returns `None` when the text carries no amount at all.
    pub fn from_text(text: &str) -> Result<Option<Self>, Error> {
        static_regex!(AMOUNT <- r"\d{1,2},\d{2}");
        let mut values = Vec::new();
        for m in AMOUNT.find_iter(text) {
            let eur: Eur = m.as_str().parse()?;
            let value = eur
                .to_f64()
                .ok_or_else(|| Error::PriceParse(format!("{eur} does not fit a float")))?;
            values.push(value);
        }
        if values.is_empty() {
            return Ok(None);
        }
        let labels = tier_labels(values.len())
            .iter()
            .map(ToString::to_string)
            .collect();
        Ok(Some(Self {
            raw: normalize_whitespace(text),
            currency: iso::EUR.iso_alpha_code.to_string(),
            values,
            labels,
        }))
    }
}

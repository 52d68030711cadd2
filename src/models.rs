use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

/// Scale of every stored price: hundredths of the currency unit.
pub const PRICE_SCALE: u32 = 2;
/// Total significant digits a price may carry.
pub const PRICE_PRECISION: u32 = 18;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_date: Date,
    pub genre: String,
    pub price: Decimal,
}

impl TryFrom<movie::Model> for Movie {
    type Error = AppError;

    fn try_from(row: movie::Model) -> AppResult<Self> {
        let release_date: Date = row.release_date.parse()?;
        Ok(Self {
            id: row.id,
            title: row.title,
            release_date,
            genre: row.genre,
            price: price_from_cents(row.price_cents),
        })
    }
}

/// A validated movie that has not been stored yet.
#[derive(Clone, Debug)]
pub struct NewMovie {
    pub title: String,
    pub release_date: Date,
    pub genre: String,
    pub price: Decimal,
}

/// Raw create-form submission, everything still text.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub price: String,
}

impl TryFrom<&MovieForm> for NewMovie {
    type Error = AppError;

    fn try_from(form: &MovieForm) -> AppResult<Self> {
        let release_date: Date = form
            .release_date
            .trim()
            .parse()
            .map_err(|_| AppError::invalid("release date must be a date like 1989-02-12"))?;

        let price: Decimal = form
            .price
            .trim()
            .parse()
            .map_err(|_| AppError::invalid("price must be a decimal number like 19.99"))?;
        // Rejects anything that would not survive storage.
        price_to_cents(price)?;

        Ok(Self { title: form.title.clone(), release_date, genre: form.genre.clone(), price })
    }
}

/// One entry of the genre dropdown.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

/// Converts a price to its exact stored form, hundredths as an integer.
pub fn price_to_cents(price: Decimal) -> AppResult<i64> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::invalid("price cannot be negative"));
    }

    let price = price.normalize();
    if price.scale() > PRICE_SCALE {
        return Err(AppError::invalid("price cannot have more than 2 decimal places"));
    }

    let mut scaled = price;
    scaled.rescale(PRICE_SCALE);
    let cents = scaled.mantissa();
    if cents >= 10_i128.pow(PRICE_PRECISION) {
        return Err(AppError::invalid("price has more than 18 digits"));
    }

    i64::try_from(cents).map_err(|_| AppError::invalid("price has more than 18 digits"))
}

use jiff::civil::date;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::info;

use crate::{catalog, entities::movie, error::AppResult, models::NewMovie};

fn demo_movies() -> Vec<NewMovie> {
    vec![
        NewMovie {
            title: "When Harry Met Sally".to_string(),
            release_date: date(1989, 2, 12),
            genre: "Romantic Comedy".to_string(),
            price: Decimal::new(799, 2),
        },
        NewMovie {
            title: "Ghostbusters".to_string(),
            release_date: date(1984, 3, 13),
            genre: "Comedy".to_string(),
            price: Decimal::new(899, 2),
        },
        NewMovie {
            title: "Ghostbusters 2".to_string(),
            release_date: date(1986, 2, 23),
            genre: "Comedy".to_string(),
            price: Decimal::new(999, 2),
        },
        NewMovie {
            title: "Rio Bravo".to_string(),
            release_date: date(1959, 4, 15),
            genre: "Western".to_string(),
            price: Decimal::new(399, 2),
        },
    ]
}

/// Fills an empty catalog with a handful of films. Returns how many were added.
pub async fn seed_if_empty<C>(db: &C) -> AppResult<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let existing = movie::Entity::find().count(&txn).await?;
    if existing > 0 {
        info!(existing, "catalog already populated, skipping seed");
        return Ok(0);
    }

    let movies = demo_movies();
    let added = movies.len();
    for new in movies {
        catalog::create_movie(&txn, new).await?;
    }
    txn.commit().await?;

    info!(added, "seeded catalog");
    Ok(added)
}

use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;

/// What the listing does with the `MovieGenre` parameter.
///
/// The page always offers the genre selector, but the listing it was modelled on
/// never narrowed results by genre. `Apply` filters on exact equality, `Ignore`
/// keeps the selector cosmetic.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GenreFilter {
    #[default]
    Apply,
    Ignore,
}

impl FromStr for GenreFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(GenreFilter::Apply),
            "ignore" => Ok(GenreFilter::Ignore),
            other => anyhow::bail!("unknown genre filter mode {other:?}, expected apply or ignore"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub search_case_sensitive: bool,
    pub genre_filter: GenreFilter,
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.db?mode=rwc".to_string());

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let search_case_sensitive = match std::env::var("SEARCH_CASE_SENSITIVE") {
            Ok(v) => parse_flag(&v).context("SEARCH_CASE_SENSITIVE")?,
            Err(_) => false,
        };

        let genre_filter = match std::env::var("GENRE_FILTER") {
            Ok(v) => v.parse().context("GENRE_FILTER")?,
            Err(_) => GenreFilter::default(),
        };

        let seed_data = match std::env::var("SEED_DATA") {
            Ok(v) => parse_flag(&v).context("SEED_DATA")?,
            Err(_) => true,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            database_max_connections,
            search_case_sensitive,
            genre_filter,
            seed_data,
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}

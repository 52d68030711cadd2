use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::{Config, GenreFilter},
    entities::movie,
    error::AppResult,
    models::{Movie, NewMovie, SelectOption, price_to_cents},
};

/// Escape character for `LIKE` patterns. Not a backslash so the generated SQL
/// reads the same on every backend.
const LIKE_ESCAPE: char = '!';

/// Query-string parameters of the listing, named as the page submits them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(rename = "SearchString", default)]
    pub search_string: Option<String>,
    #[serde(rename = "MovieGenre", default)]
    pub movie_genre: Option<String>,
}

impl ListingParams {
    pub fn search(&self) -> Option<&str> {
        non_empty(self.search_string.as_deref())
    }

    pub fn genre(&self) -> Option<&str> {
        non_empty(self.movie_genre.as_deref())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ListingOptions {
    pub case_sensitive: bool,
    pub genre_filter: GenreFilter,
}

impl From<&Config> for ListingOptions {
    fn from(config: &Config) -> Self {
        Self { case_sensitive: config.search_case_sensitive, genre_filter: config.genre_filter }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    TitleContains { needle: String, case_sensitive: bool },
    GenreEquals(String),
}

impl Predicate {
    fn into_expr(self) -> SimpleExpr {
        match self {
            Predicate::TitleContains { needle, case_sensitive: false } => {
                let pattern = format!("%{}%", escape_like(&needle));
                Expr::col(movie::Column::Title).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
            },
            Predicate::TitleContains { needle, case_sensitive: true } => Expr::expr(
                Func::cust(Alias::new("instr")).arg(Expr::col(movie::Column::Title)).arg(needle),
            )
            .gt(0),
            Predicate::GenreEquals(genre) => movie::Column::Genre.eq(genre),
        }
    }
}

/// Conjunction of the predicates a listing request asks for.
#[derive(Clone, Debug, Default)]
pub struct MovieFilter {
    predicates: Vec<Predicate>,
}

impl MovieFilter {
    pub fn from_params(params: &ListingParams, options: ListingOptions) -> Self {
        let mut filter = Self::default();

        if let Some(needle) = params.search() {
            filter.push(Predicate::TitleContains {
                needle: needle.to_string(),
                case_sensitive: options.case_sensitive,
            });
        }

        if let Some(genre) = params.genre() {
            match options.genre_filter {
                GenreFilter::Apply => filter.push(Predicate::GenreEquals(genre.to_string())),
                GenreFilter::Ignore => debug!(genre, "genre filter disabled, parameter ignored"),
            }
        }

        filter
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn condition(&self) -> Condition {
        self.predicates
            .iter()
            .cloned()
            .fold(Condition::all(), |cond, predicate| cond.add(predicate.into_expr()))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieListing {
    pub movies: Vec<Movie>,
    /// Distinct genres of the whole table, sorted, independent of the filter.
    pub genres: Vec<String>,
}

impl MovieListing {
    pub fn genre_options(&self, selected: Option<&str>) -> Vec<SelectOption> {
        self.genres
            .iter()
            .map(|genre| SelectOption {
                label: genre.clone(),
                value: genre.clone(),
                selected: selected == Some(genre.as_str()),
            })
            .collect()
    }
}

pub async fn get_movie_list<C: ConnectionTrait>(
    conn: &C,
    params: &ListingParams,
    options: ListingOptions,
) -> AppResult<MovieListing> {
    let filter = MovieFilter::from_params(params, options);
    debug!(predicates = ?filter.predicates(), "listing movies");

    let mut select = movie::Entity::find();
    if !filter.is_empty() {
        select = select.filter(filter.condition());
    }

    let movies = select
        .all(conn)
        .await?
        .into_iter()
        .map(Movie::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    let genres = distinct_genres(conn).await?;

    debug!(movies = movies.len(), genres = genres.len(), "listing loaded");
    Ok(MovieListing { movies, genres })
}

/// Runs the listing inside one read transaction. Dropping the transaction on an
/// early return rolls it back and hands the connection back to the pool.
pub async fn load_listing(
    db: &DatabaseConnection,
    params: &ListingParams,
    options: ListingOptions,
) -> AppResult<MovieListing> {
    let txn = db.begin().await?;
    let listing = get_movie_list(&txn, params, options).await?;
    txn.commit().await?;
    Ok(listing)
}

pub async fn distinct_genres<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<String>> {
    let genres = movie::Entity::find()
        .select_only()
        .column(movie::Column::Genre)
        .distinct()
        .order_by_asc(movie::Column::Genre)
        .into_tuple::<String>()
        .all(conn)
        .await?;
    Ok(genres)
}

pub async fn create_movie<C: ConnectionTrait>(conn: &C, new: NewMovie) -> AppResult<Movie> {
    let model = movie::ActiveModel {
        id: Default::default(),
        title: Set(new.title),
        release_date: Set(new.release_date.to_string()),
        genre: Set(new.genre),
        price_cents: Set(price_to_cents(new.price)?),
    };

    let row = model.insert(conn).await?;
    info!(id = row.id, title = %row.title, "movie created");
    Movie::try_from(row)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::civil::date;
    use rust_decimal::Decimal;

    use super::*;

    async fn test_db() -> DatabaseConnection {
        crate::db::connect_and_migrate("sqlite::memory:", 1).await.unwrap()
    }

    async fn add(db: &DatabaseConnection, title: &str, genre: &str, price: &str) -> Movie {
        let new = NewMovie {
            title: title.to_string(),
            release_date: date(1999, 3, 31),
            genre: genre.to_string(),
            price: Decimal::from_str(price).unwrap(),
        };
        create_movie(db, new).await.unwrap()
    }

    async fn matrix_db() -> DatabaseConnection {
        let db = test_db().await;
        add(&db, "The Matrix", "SciFi", "9.99").await;
        add(&db, "The Notebook", "Romance", "7.49").await;
        add(&db, "Matrix Reloaded", "SciFi", "10.00").await;
        db
    }

    fn params(search: Option<&str>, genre: Option<&str>) -> ListingParams {
        ListingParams {
            search_string: search.map(str::to_string),
            movie_genre: genre.map(str::to_string),
        }
    }

    fn titles(listing: &MovieListing) -> Vec<String> {
        let mut titles: Vec<String> = listing.movies.iter().map(|m| m.title.clone()).collect();
        titles.sort();
        titles
    }

    #[tokio::test]
    async fn no_parameters_returns_everything() {
        let db = matrix_db().await;
        let listing = get_movie_list(&db, &params(None, None), ListingOptions::default()).await.unwrap();
        assert_eq!(listing.movies.len(), 3);
    }

    #[tokio::test]
    async fn search_keeps_only_matching_titles() {
        let db = matrix_db().await;
        let listing =
            get_movie_list(&db, &params(Some("Matrix"), None), ListingOptions::default()).await.unwrap();
        assert_eq!(titles(&listing), vec!["Matrix Reloaded", "The Matrix"]);
        assert!(listing.movies.iter().all(|m| m.title.contains("Matrix")));
    }

    #[tokio::test]
    async fn empty_search_is_no_filter() {
        let db = matrix_db().await;
        let options = ListingOptions::default();
        let none = get_movie_list(&db, &params(None, None), options).await.unwrap();
        let empty = get_movie_list(&db, &params(Some(""), Some("")), options).await.unwrap();
        assert_eq!(none.movies, empty.movies);
    }

    #[tokio::test]
    async fn repeated_calls_agree() {
        let db = matrix_db().await;
        let options = ListingOptions::default();
        let first = get_movie_list(&db, &params(Some("The"), None), options).await.unwrap();
        let second = get_movie_list(&db, &params(Some("The"), None), options).await.unwrap();
        assert_eq!(titles(&first), titles(&second));
        assert_eq!(first.genres, second.genres);
    }

    #[tokio::test]
    async fn default_search_ignores_ascii_case() {
        let db = matrix_db().await;
        let listing =
            get_movie_list(&db, &params(Some("matrix"), None), ListingOptions::default()).await.unwrap();
        assert_eq!(listing.movies.len(), 2);
    }

    #[tokio::test]
    async fn case_sensitive_search_is_exact() {
        let db = matrix_db().await;
        let options = ListingOptions { case_sensitive: true, ..Default::default() };
        let lower = get_movie_list(&db, &params(Some("matrix"), None), options).await.unwrap();
        assert!(lower.movies.is_empty());

        let proper = get_movie_list(&db, &params(Some("Matrix"), None), options).await.unwrap();
        assert_eq!(titles(&proper), vec!["Matrix Reloaded", "The Matrix"]);
    }

    #[tokio::test]
    async fn wildcards_in_search_match_literally() {
        let db = matrix_db().await;
        add(&db, "100% Wolf", "Animation", "5.00").await;
        add(&db, "Wolf_Man", "Horror", "5.00").await;

        let options = ListingOptions::default();
        let percent = get_movie_list(&db, &params(Some("%"), None), options).await.unwrap();
        assert_eq!(titles(&percent), vec!["100% Wolf"]);

        let underscore = get_movie_list(&db, &params(Some("_"), None), options).await.unwrap();
        assert_eq!(titles(&underscore), vec!["Wolf_Man"]);

        let bang = get_movie_list(&db, &params(Some("!"), None), options).await.unwrap();
        assert!(bang.movies.is_empty());
    }

    #[tokio::test]
    async fn genre_is_applied_when_enabled() {
        let db = matrix_db().await;
        let listing =
            get_movie_list(&db, &params(None, Some("Romance")), ListingOptions::default()).await.unwrap();
        assert_eq!(titles(&listing), vec!["The Notebook"]);

        let both = get_movie_list(&db, &params(Some("Reloaded"), Some("SciFi")), ListingOptions::default())
            .await
            .unwrap();
        assert_eq!(titles(&both), vec!["Matrix Reloaded"]);
    }

    #[tokio::test]
    async fn genre_is_ignored_when_disabled() {
        let db = matrix_db().await;
        let options = ListingOptions { genre_filter: GenreFilter::Ignore, ..Default::default() };
        let listing = get_movie_list(&db, &params(None, Some("Romance")), options).await.unwrap();
        assert_eq!(listing.movies.len(), 3);
    }

    #[tokio::test]
    async fn genres_are_distinct_sorted_and_unfiltered() {
        let db = matrix_db().await;
        let listing =
            get_movie_list(&db, &params(Some("Notebook"), None), ListingOptions::default()).await.unwrap();
        assert_eq!(listing.genres, vec!["Romance", "SciFi"]);

        let options = listing.genre_options(Some("SciFi"));
        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].label, "SciFi");
    }

    #[tokio::test]
    async fn empty_table_gives_empty_listing() {
        let db = test_db().await;
        let listing = load_listing(&db, &params(Some("x"), None), ListingOptions::default()).await.unwrap();
        assert!(listing.movies.is_empty());
        assert!(listing.genres.is_empty());
    }

    #[tokio::test]
    async fn price_survives_storage_exactly() {
        let db = test_db().await;
        let created = add(&db, "Ghostbusters", "Comedy", "19.99").await;

        let listing = load_listing(&db, &params(None, None), ListingOptions::default()).await.unwrap();
        let stored = &listing.movies[0];
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.price, Decimal::new(1999, 2));
        assert_eq!(stored.price.to_string(), "19.99");
        assert_eq!(stored.release_date, date(1999, 3, 31));
    }

    #[test]
    fn filter_builds_predicates_from_present_parameters() {
        let filter = MovieFilter::from_params(&params(Some("Rio"), Some("Western")), ListingOptions::default());
        assert_eq!(
            filter.predicates(),
            &[
                Predicate::TitleContains { needle: "Rio".into(), case_sensitive: false },
                Predicate::GenreEquals("Western".into()),
            ]
        );

        assert!(MovieFilter::from_params(&params(Some(""), None), ListingOptions::default()).is_empty());
    }

    #[test]
    fn like_escaping_covers_wildcards_and_escape_char() {
        assert_eq!(escape_like("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like("plain"), "plain");
    }
}

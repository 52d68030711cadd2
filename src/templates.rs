use maud::{DOCTYPE, Markup, html};

use crate::{
    catalog::{ListingParams, MovieListing},
    models::{Movie, MovieForm},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";

pub fn movies_page(listing: &MovieListing, params: &ListingParams) -> String {
    let genre_options = listing.genre_options(params.genre());

    page(
        "Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { "Movies" }
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/movies/create" { "Create New" }
                    }

                    form class="mt-8 flex flex-wrap items-end gap-4" method="get" action="/movies" {
                        div {
                            label class="block text-sm font-medium text-gray-700" for="MovieGenre" { "Genre" }
                            select class=(INPUT_CLASS) name="MovieGenre" id="MovieGenre" {
                                option value="" { "All" }
                                @for opt in &genre_options {
                                    option value=(opt.value) selected[opt.selected] { (opt.label) }
                                }
                            }
                        }
                        div {
                            label class="block text-sm font-medium text-gray-700" for="SearchString" { "Title" }
                            input class=(INPUT_CLASS) type="text" name="SearchString" id="SearchString" value=(params.search_string.as_deref().unwrap_or_default());
                        }
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Filter" }
                    }

                    @if listing.movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies match." }
                        }
                    } @else {
                        table class="mt-10 w-full bg-white shadow rounded-lg text-left" {
                            thead class="border-b text-sm text-gray-500" {
                                tr {
                                    th class="px-4 py-3" { "Title" }
                                    th class="px-4 py-3" { "Release Date" }
                                    th class="px-4 py-3" { "Genre" }
                                    th class="px-4 py-3 text-right" { "Price" }
                                }
                            }
                            tbody {
                                @for movie in &listing.movies {
                                    (movie_row(movie))
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn create_page(form: &MovieForm, error: Option<&str>) -> String {
    page(
        "Create Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Create Movie" }

                        @if let Some(error) = error {
                            p class="mt-4 rounded-md bg-red-50 px-4 py-2 text-sm text-red-700" { (error) }
                        }

                        form class="mt-8 space-y-6" method="post" action="/movies/create" {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="title" { "Title" }
                                input class=(INPUT_CLASS) name="title" id="title" value=(form.title);
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="release_date" { "Release Date" }
                                input class=(INPUT_CLASS) type="date" name="release_date" id="release_date" value=(form.release_date) required;
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="genre" { "Genre" }
                                input class=(INPUT_CLASS) name="genre" id="genre" value=(form.genre);
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="price" { "Price" }
                                input class=(INPUT_CLASS) name="price" id="price" inputmode="decimal" value=(form.price) required;
                            }

                            button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Create" }
                        }

                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/movies" { "Back to List" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/movies" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_row(movie: &Movie) -> Markup {
    html! {
        tr class="border-b last:border-0 text-gray-700" {
            td class="px-4 py-3 font-medium text-gray-900" { (movie.title) }
            td class="px-4 py-3" { (movie.release_date.strftime("%Y-%m-%d").to_string()) }
            td class="px-4 py-3" { (movie.genre) }
            td class="px-4 py-3 text-right tabular-nums" { (format_price(movie)) }
        }
    }
}

fn format_price(movie: &Movie) -> String {
    format!("${:.2}", movie.price)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;

    use super::*;

    fn listing() -> MovieListing {
        MovieListing {
            movies: vec![Movie {
                id: 1,
                title: "Rio <Bravo>".to_string(),
                release_date: date(1959, 4, 15),
                genre: "Western".to_string(),
                price: Decimal::new(399, 2),
            }],
            genres: vec!["Comedy".to_string(), "Western".to_string()],
        }
    }

    #[test]
    fn listing_escapes_titles_and_formats_rows() {
        let html = movies_page(&listing(), &ListingParams::default());
        assert!(html.contains("Rio &lt;Bravo&gt;"));
        assert!(html.contains("1959-04-15"));
        assert!(html.contains("$3.99"));
    }

    #[test]
    fn selected_genre_is_marked() {
        let params =
            ListingParams { search_string: Some("Rio".into()), movie_genre: Some("Western".into()) };
        let html = movies_page(&listing(), &params);
        assert!(html.contains(r#"<option value="Western" selected>Western</option>"#));
        assert!(html.contains(r#"<option value="Comedy">Comedy</option>"#));
        assert!(html.contains(r#"value="Rio""#));
    }

    #[test]
    fn empty_listing_says_so() {
        let empty = MovieListing { movies: Vec::new(), genres: Vec::new() };
        let html = movies_page(&empty, &ListingParams::default());
        assert!(html.contains("No movies match."));
    }

    #[test]
    fn create_page_shows_the_error() {
        let html = create_page(&MovieForm::default(), Some("price must be a decimal number like 19.99"));
        assert!(html.contains("price must be a decimal number like 19.99"));
    }
}

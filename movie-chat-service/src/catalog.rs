//! Movie catalog lookups against a TMDB-compatible API.
//!
//! Resolution is two sequential calls: a title search whose first hit is
//! taken as-is, then a detail fetch for that id with credits embedded. The
//! detail record is normalized into [`MovieMetadata`] or rejected whole.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{MovieMetadata, ReleaseYear, UNKNOWN};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const CAST_LIMIT: usize = 5;
pub const PLOT_PLACEHOLDER: &str = "No plot summary available.";
const LANGUAGE: &str = "en-US";
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request timed out")]
    Timeout,

    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog responded with status {0}")]
    Status(u16),

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("catalog record is missing `{0}`")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            CatalogError::Status(status.as_u16())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}

/// TMDB sends `null` for empty lists on sparse records
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Detail record as returned by `/movie/{id}?append_to_response=credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    pub overview: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn named(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

impl MovieDetails {
    /// Normalize into the fixed metadata record. A record without a title is
    /// rejected rather than returned partially.
    pub fn normalize(self) -> Result<MovieMetadata, CatalogError> {
        let title = non_blank(self.title).ok_or(CatalogError::MissingField("title"))?;
        let credits = self.credits.unwrap_or_default();

        let year = self
            .release_date
            .as_deref()
            .and_then(|date| date.get(0..4))
            .and_then(|year| year.parse::<i32>().ok())
            .map_or(ReleaseYear::Unknown, ReleaseYear::Known);

        let rating = self
            .vote_average
            .filter(|avg| *avg > 0.0)
            .map_or_else(|| "N/A".to_string(), |avg| format!("{avg:.1}/10"));

        let runtime = match self.runtime {
            Some(minutes) if minutes > 0 => format!("{minutes} min"),
            _ => UNKNOWN.to_string(),
        };

        let genre = or_unknown(
            self.genres
                .iter()
                .filter_map(|g| named(g.name.as_deref()))
                .collect::<Vec<_>>()
                .join(", "),
        );

        let director = credits
            .crew
            .iter()
            .filter(|member| member.job.as_deref() == Some("Director"))
            .find_map(|member| named(member.name.as_deref()))
            .map_or_else(|| UNKNOWN.to_string(), str::to_string);

        let cast = or_unknown(
            credits
                .cast
                .iter()
                .filter_map(|member| named(member.name.as_deref()))
                .take(CAST_LIMIT)
                .collect::<Vec<_>>()
                .join(", "),
        );

        let plot = non_blank(self.overview).unwrap_or_else(|| PLOT_PLACEHOLDER.to_string());

        Ok(MovieMetadata {
            title,
            year,
            rating,
            genre,
            director,
            cast,
            runtime,
            plot,
        })
    }
}

/// Read-only access to an external movie catalog
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Id of the first search hit for `phrase`, if any
    async fn search(&self, phrase: &str) -> Result<Option<u64>, CatalogError>;

    /// Full record for `id`, including credits
    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError>;
}

/// Resolve `phrase` to one movie record. Every failure is logged and
/// reported as "no match".
pub async fn lookup_movie(catalog: &dyn MovieCatalog, phrase: &str) -> Option<MovieMetadata> {
    match resolve(catalog, phrase).await {
        Ok(Some(metadata)) => {
            info!(phrase = %phrase, title = %metadata.title, "catalog match");
            Some(metadata)
        }
        Ok(None) => {
            info!(phrase = %phrase, "catalog search returned no results");
            None
        }
        Err(e) => {
            warn!(
                phrase = %phrase,
                error = %e,
                "catalog lookup failed, continuing without metadata"
            );
            None
        }
    }
}

async fn resolve(
    catalog: &dyn MovieCatalog,
    phrase: &str,
) -> Result<Option<MovieMetadata>, CatalogError> {
    let Some(id) = catalog.search(phrase).await? else {
        return Ok(None);
    };
    let details = catalog.details(id).await?;
    details.normalize().map(Some)
}

/// TMDB v3 client
pub struct TmdbCatalog {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbCatalog {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, phrase: &str) -> Result<Option<u64>, CatalogError> {
        let response: SearchResponse = self
            .get_json(
                "search/movie",
                &[("query", phrase), ("include_adult", "false")],
            )
            .await?;

        Ok(response.results.into_iter().next().map(|hit| {
            info!(id = hit.id, title = ?hit.title, "first catalog search hit");
            hit.id
        }))
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.get_json(
            &format!("movie/{id}"),
            &[("append_to_response", "credits")],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inception() -> MovieDetails {
        serde_json::from_value(json!({
            "title": "Inception",
            "release_date": "2010-07-15",
            "vote_average": 8.369,
            "runtime": 148,
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
            "overview": "A thief who steals corporate secrets through dream-sharing technology.",
            "credits": {
                "cast": [
                    { "name": "Leonardo DiCaprio" },
                    { "name": "Joseph Gordon-Levitt" },
                    { "name": "Ken Watanabe" },
                    { "name": "Tom Hardy" },
                    { "name": "Elliot Page" },
                    { "name": "Dileep Rao" }
                ],
                "crew": [
                    { "job": "Producer", "name": "Emma Thomas" },
                    { "job": "Director", "name": "Christopher Nolan" }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_full_record() {
        let metadata = inception().normalize().unwrap();
        assert_eq!(metadata.title, "Inception");
        assert_eq!(metadata.year, ReleaseYear::Known(2010));
        assert_eq!(metadata.rating, "8.4/10");
        assert_eq!(metadata.genre, "Action, Science Fiction");
        assert_eq!(metadata.director, "Christopher Nolan");
        assert_eq!(
            metadata.cast,
            "Leonardo DiCaprio, Joseph Gordon-Levitt, Ken Watanabe, Tom Hardy, Elliot Page"
        );
        assert_eq!(metadata.runtime, "148 min");
        assert!(metadata.plot.starts_with("A thief"));
    }

    #[test]
    fn test_normalize_sparse_record_uses_placeholders() {
        let details = MovieDetails {
            title: Some("Obscure".into()),
            release_date: Some(String::new()),
            vote_average: Some(0.0),
            runtime: Some(0),
            overview: Some("   ".into()),
            ..Default::default()
        };
        let metadata = details.normalize().unwrap();
        assert_eq!(metadata.year, ReleaseYear::Unknown);
        assert_eq!(metadata.rating, "N/A");
        assert_eq!(metadata.genre, UNKNOWN);
        assert_eq!(metadata.director, UNKNOWN);
        assert_eq!(metadata.cast, UNKNOWN);
        assert_eq!(metadata.runtime, UNKNOWN);
        assert_eq!(metadata.plot, PLOT_PLACEHOLDER);
    }

    #[test]
    fn test_null_lists_and_names_decode_as_empty() {
        let details: MovieDetails = serde_json::from_value(json!({
            "title": "Sparse",
            "release_date": null,
            "vote_average": null,
            "genres": null,
            "overview": null,
            "credits": { "cast": null, "crew": null }
        }))
        .unwrap();
        let metadata = details.normalize().unwrap();
        assert_eq!(metadata.genre, UNKNOWN);
        assert_eq!(metadata.cast, UNKNOWN);
        assert_eq!(metadata.director, UNKNOWN);
        assert_eq!(metadata.rating, "N/A");

        let details: MovieDetails = serde_json::from_value(json!({
            "title": "Nameless Entries",
            "genres": [{ "id": 1, "name": null }, { "id": 18, "name": "Drama" }],
            "credits": {
                "cast": [{ "name": null }, { "name": "Jane Doe" }, {}],
                "crew": [
                    { "job": "Director", "name": null },
                    { "job": "Director", "name": "John Roe" }
                ]
            }
        }))
        .unwrap();
        let metadata = details.normalize().unwrap();
        assert_eq!(metadata.genre, "Drama");
        assert_eq!(metadata.cast, "Jane Doe");
        assert_eq!(metadata.director, "John Roe");

        let search: SearchResponse = serde_json::from_value(json!({ "results": null })).unwrap();
        assert!(search.results.is_empty());
    }

    #[test]
    fn test_normalize_rejects_missing_title() {
        let err = MovieDetails::default().normalize().unwrap_err();
        assert!(matches!(err, CatalogError::MissingField("title")));
    }

    struct FixedCatalog {
        hit: Option<u64>,
        details: Result<MovieDetails, fn() -> CatalogError>,
    }

    #[async_trait]
    impl MovieCatalog for FixedCatalog {
        async fn search(&self, _phrase: &str) -> Result<Option<u64>, CatalogError> {
            Ok(self.hit)
        }

        async fn details(&self, _id: u64) -> Result<MovieDetails, CatalogError> {
            match &self.details {
                Ok(details) => Ok(details.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[tokio::test]
    async fn test_lookup_without_hits_is_no_match() {
        let catalog = FixedCatalog {
            hit: None,
            details: Ok(inception()),
        };
        assert!(lookup_movie(&catalog, "nothing").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_detail_failure_is_no_match() {
        let catalog = FixedCatalog {
            hit: Some(27205),
            details: Err(|| CatalogError::Status(500)),
        };
        assert!(lookup_movie(&catalog, "Inception").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_resolves_record() {
        let catalog = FixedCatalog {
            hit: Some(27205),
            details: Ok(inception()),
        };
        let metadata = lookup_movie(&catalog, "Inception").await.unwrap();
        assert_eq!(metadata.director, "Christopher Nolan");
    }
}

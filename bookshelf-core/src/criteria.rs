//! Typed read-side filter criteria.
//!
//! Criteria arrive as text (query-string parameters) in [`CriteriaParams`] and are parsed into
//! a [`BookCriteria`], where every criterion is an optional typed value. A numeric parameter
//! that is missing, blank or not an integer leaves its criterion unset; it never turns into a
//! bound of zero. Genre tags must all belong to [`Genre`], otherwise parsing fails as a whole.

use bson::Bson;
use serde::Deserialize;

use crate::{
    book::Genre,
    error::{CatalogError, CatalogResult},
    query::{Expr, Filter},
};

/// Raw criteria exactly as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CriteriaParams {
    pub author: Option<String>,
    #[serde(rename = "price-bigger-than")]
    pub price_at_least: Option<String>,
    #[serde(rename = "price-less-than")]
    pub price_at_most: Option<String>,
    #[serde(rename = "year-bigger-than")]
    pub year_at_least: Option<String>,
    #[serde(rename = "year-less-than")]
    pub year_at_most: Option<String>,
    /// Comma-separated genre tags.
    pub genres: Option<String>,
}

/// Optional, independently composable criteria over books.
///
/// All supplied criteria must hold for a record to match; omitted ones impose no constraint.
/// Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCriteria {
    pub author: Option<String>,
    pub price_at_least: Option<i64>,
    pub price_at_most: Option<i64>,
    pub year_at_least: Option<i64>,
    pub year_at_most: Option<i64>,
    /// A record matches when it holds at least one of these genres.
    pub genres: Option<Vec<Genre>>,
}

impl BookCriteria {
    /// Returns `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &BookCriteria::default()
    }

    /// Lowers these criteria into a filter expression, or `None` when nothing is constrained.
    pub fn to_expr(&self) -> Option<Expr> {
        let mut exprs = Vec::new();

        if let Some(author) = &self.author {
            exprs.push(Filter::eq_ignore_case("author", author.as_str()));
        }
        if let Some(price) = self.price_at_least {
            exprs.push(Filter::gte("price", price));
        }
        if let Some(price) = self.price_at_most {
            exprs.push(Filter::lte("price", price));
        }
        if let Some(year) = self.year_at_least {
            exprs.push(Filter::gte("year", year));
        }
        if let Some(year) = self.year_at_most {
            exprs.push(Filter::lte("year", year));
        }
        if let Some(genres) = &self.genres {
            let values = genres.iter().copied().map(Bson::from).collect::<Vec<_>>();
            exprs.push(Filter::any_of("genres", values));
        }

        match exprs.len() {
            0 => None,
            1 => exprs.pop(),
            _ => Some(Filter::and(exprs)),
        }
    }
}

impl TryFrom<CriteriaParams> for BookCriteria {
    type Error = CatalogError;

    fn try_from(params: CriteriaParams) -> CatalogResult<Self> {
        Ok(BookCriteria {
            author: params.author.filter(|author| !author.trim().is_empty()),
            price_at_least: parse_bound(params.price_at_least.as_deref()),
            price_at_most: parse_bound(params.price_at_most.as_deref()),
            year_at_least: parse_bound(params.year_at_least.as_deref()),
            year_at_most: parse_bound(params.year_at_most.as_deref()),
            genres: parse_genres(params.genres.as_deref())?,
        })
    }
}

fn parse_bound(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

fn parse_genres(raw: Option<&str>) -> CatalogResult<Option<Vec<Genre>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let genres = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::parse::<Genre>)
        .collect::<CatalogResult<Vec<_>>>()?;

    Ok((!genres.is_empty()).then_some(genres))
}

//! Query expression evaluation for in-memory record filtering.
//!
//! This module provides the evaluation engine for query expressions over stored BSON
//! documents, and the base collation used to order results.

use std::cmp::Ordering;

use bson::Bson;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use bookshelf_core::{
    error::{CatalogError, CatalogResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Integers keep their exact `i64` value; only `Double` is held as f64. An integer and a
/// double still compare by value.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (Int32 and Int64)
    Int(i64),
    /// Floating-point value
    Number(f64),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Int(a), Comparable::Number(b)) => (*a as f64) == *b,
            (Comparable::Number(a), Comparable::Int(b)) => *a == (*b as f64),
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Int(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Number(b)) => (*a as f64).partial_cmp(b),
            (Comparable::Number(a), Comparable::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Owned sort key of one field under base collation.
///
/// Strings are folded once with [`base_key`]. Missing and unsortable values order first,
/// then booleans, numbers and strings.
#[derive(Debug, Clone)]
pub(crate) enum SortKey {
    Missing,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Builds the key for `field` of a stored document.
    pub(crate) fn of(document: &Bson, field: &str) -> Self {
        match document.as_document().and_then(|doc| doc.get(field)) {
            Some(Bson::Boolean(value)) => SortKey::Bool(*value),
            Some(Bson::Int32(value)) => SortKey::Int(i64::from(*value)),
            Some(Bson::Int64(value)) => SortKey::Int(*value),
            Some(Bson::Double(value)) => SortKey::Number(*value),
            Some(Bson::String(value)) => SortKey::Text(base_key(value)),
            _ => SortKey::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Bool(_) => 1,
            SortKey::Int(_) | SortKey::Number(_) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Int(a), SortKey::Number(b)) => (*a as f64).total_cmp(b),
            (SortKey::Number(a), SortKey::Int(b)) => a.total_cmp(&(*b as f64)),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Folds a string to its base-collation key.
///
/// The string is decomposed (NFD), combining marks are dropped and the rest is lowercased,
/// so "Émile" and "emile" share a key while the order of base characters is kept.
pub fn base_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> CatalogResult<bool> {
        self.visit_expr(expr)
    }

    /// Returns copies of the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> CatalogResult<Vec<Bson>> {
        let mut matched = Vec::new();

        for document in documents {
            if DocumentEvaluator::new(document).evaluate(expr)? {
                matched.push(document.clone());
            }
        }

        Ok(matched)
    }

    fn field(&self, field: &str) -> CatalogResult<Option<&'a Bson>> {
        match self.document.as_document() {
            Some(document) => Ok(document.get(field)),
            None => Err(CatalogError::InvalidDocument(format!(
                "expected a document, found {:?}",
                self.document.element_type()
            ))),
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = CatalogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        match self.field(field)? {
            Some(field_value) => match op {
                FieldOp::EqIgnoreCase => match (Comparable::from(field_value), Comparable::from(value)) {
                    (Comparable::String(left), Comparable::String(right)) => {
                        Ok(left.to_lowercase() == right.to_lowercase())
                    },
                    (left, right) => Ok(left == right),
                },
                FieldOp::Gte | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gte => ordering != Ordering::Less,
                            _ => ordering != Ordering::Greater,
                        }),
                        None => Ok(false),
                    }
                },
                FieldOp::AnyOf => match (Comparable::from(field_value), Comparable::from(value)) {
                    (Comparable::Array(array), Comparable::Array(values)) => {
                        Ok(values.iter().any(|val| array.iter().any(|item| item == val)))
                    },
                    (Comparable::Array(array), single_value) => {
                        Ok(array.iter().any(|item| item == &single_value))
                    },
                    (single_value, Comparable::Array(values)) => {
                        Ok(values.iter().any(|val| val == &single_value))
                    },
                    _ => Ok(false),
                },
            },
            None => Ok(false),
        }
    }
}

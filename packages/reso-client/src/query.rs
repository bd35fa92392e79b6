//! OData query construction for the `Property` resource.

use std::fmt;

/// A conjunction of OData comparison clauses.
///
/// ```rust
/// use reso_client::Filter;
///
/// let filter = Filter::new()
///     .eq("City", "Coeur d'Alene")
///     .ge("ListPrice", 250000.0);
/// assert_eq!(
///     filter.to_string(),
///     "City eq 'Coeur d''Alene' and ListPrice ge 250000"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field eq 'value'`
    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.clauses
            .push(format!("{} eq '{}'", field, escape_literal(value)));
        self
    }

    /// `field ge value`
    pub fn ge(mut self, field: &str, value: f64) -> Self {
        self.clauses.push(format!("{} ge {}", field, value));
        self
    }

    /// `field le value`
    pub fn le(mut self, field: &str, value: f64) -> Self {
        self.clauses.push(format!("{} le {}", field, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" and "))
    }
}

/// OData string literals double embedded single quotes.
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Sort direction for `$orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One page request against the `Property` resource.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub filter: Filter,
    pub order_by: Option<(String, SortOrder)>,
    /// `$top`
    pub top: usize,
    /// `$skip`
    pub skip: usize,
    pub expand_media: bool,
}

impl PropertyQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            order_by: None,
            top: 10,
            skip: 0,
            expand_media: false,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    pub fn page(mut self, top: usize, skip: usize) -> Self {
        self.top = top;
        self.skip = skip;
        self
    }

    pub fn with_media(mut self, expand: bool) -> Self {
        self.expand_media = expand;
        self
    }

    /// Query-string parameters in the order the provider documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if !self.filter.is_empty() {
            params.push(("$filter", self.filter.to_string()));
        }
        if let Some((field, order)) = &self.order_by {
            let dir = match order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            params.push(("$orderby", format!("{} {}", field, dir)));
        }
        params.push(("$top", self.top.to_string()));
        params.push(("$skip", self.skip.to_string()));
        if self.expand_media {
            params.push(("$expand", "Media".to_string()));
        }
        params
    }
}

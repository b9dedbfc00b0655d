//! # Query evaluation
//!
//! `list` takes a flat token stream mixing filter values and sort
//! directives (`tix list opened -created`). Tokens are parsed once into a
//! [`Query`] and evaluated against the cached ticket set: tokens matching a
//! configured status filter by status, a leading `+`/`-` followed by a field
//! name sorts ascending/descending, and anything unrecognized is silently
//! ignored. Only the first sort directive is honored.

use crate::model::{Ticket, TicketData};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Status,
    Severity,
    Created,
    Updated,
    CreatedBy,
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "status" => Ok(SortField::Status),
            "severity" => Ok(SortField::Severity),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            "created_by" => Ok(SortField::CreatedBy),
            _ => Err(()),
        }
    }
}

impl SortField {
    fn compare(self, a: &TicketData, b: &TicketData) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Severity => a.severity.cmp(&b.severity),
            SortField::Created => a.created.cmp(&b.created),
            SortField::Updated => a.updated.cmp(&b.updated),
            SortField::CreatedBy => a.created_by.cmp(&b.created_by),
        }
    }
}

/// A parsed `list` query: status filters plus at most one sort directive.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub statuses: Vec<String>,
    pub sort: Option<(SortField, Direction)>,
}

impl Query {
    /// Splits `tokens` into filters and sort directives.
    ///
    /// Filter tokens must match one of `known_statuses` to take effect;
    /// unrecognized tokens (including sort directives naming an unknown
    /// field) are dropped without error.
    pub fn parse<S: AsRef<str>>(tokens: &[S], known_statuses: &[String]) -> Self {
        let mut query = Query::default();
        for token in tokens {
            let token = token.as_ref();
            let directive = match token.strip_prefix('+') {
                Some(rest) => Some((rest, Direction::Ascending)),
                None => token.strip_prefix('-').map(|rest| (rest, Direction::Descending)),
            };
            match directive {
                Some((field, direction)) => {
                    if query.sort.is_none() {
                        if let Ok(field) = field.parse::<SortField>() {
                            query.sort = Some((field, direction));
                        }
                    }
                }
                None => {
                    if known_statuses.iter().any(|s| s == token) {
                        query.statuses.push(token.to_string());
                    }
                }
            }
        }
        query
    }

    /// Applies filter and sort, returning an owned snapshot of the matches
    /// in final order.
    pub fn apply<'a, I>(&self, tickets: I) -> Vec<Ticket>
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let mut matched: Vec<Ticket> = tickets
            .into_iter()
            .filter(|t| {
                self.statuses.is_empty() || self.statuses.iter().any(|s| s == &t.data.status)
            })
            .cloned()
            .collect();

        if let Some((field, direction)) = self.sort {
            // Stable sort, so equal keys keep their cache order.
            matched.sort_by(|a, b| {
                let ordering = field.compare(&a.data, &b.data);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        matched
    }
}

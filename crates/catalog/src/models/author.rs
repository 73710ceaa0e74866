//! Author domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use local_library_core::AuthorId;

/// Path of the author list page.
pub const AUTHOR_LIST_URL: &str = "/catalog/authors";

/// A catalogued author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique author ID.
    pub id: AuthorId,
    /// Given name.
    pub first_name: String,
    /// Family name (list pages sort on this).
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Build an author from validated input under the given ID.
    #[must_use]
    pub fn from_input(id: AuthorId, input: AuthorInput) -> Self {
        Self {
            id,
            first_name: input.first_name,
            family_name: input.family_name,
            date_of_birth: input.date_of_birth,
            date_of_death: input.date_of_death,
        }
    }

    /// Detail page path for this author.
    #[must_use]
    pub fn url(&self) -> String {
        author_url(self.id)
    }

    /// Display name in "family, first" order.
    ///
    /// Empty when either part is missing, so half-filled records never render
    /// as a dangling comma.
    #[must_use]
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Birth and death dates joined by a dash, each side blank when unknown.
    #[must_use]
    pub fn lifespan(&self) -> String {
        let fmt = |date: Option<NaiveDate>| {
            date.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        format!("{} - {}", fmt(self.date_of_birth), fmt(self.date_of_death))
    }
}

/// Detail page path for an author ID.
#[must_use]
pub fn author_url(id: AuthorId) -> String {
    format!("/catalog/author/{id}")
}

/// Validated fields for creating or replacing an author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorInput {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

//! Seed the catalog with sample authors and books.
//!
//! Every run inserts a fresh set of rows; nothing is deduplicated.

use chrono::NaiveDate;
use tracing::info;

use local_library_catalog::db::{CatalogStore, PgCatalogStore};
use local_library_catalog::models::{AuthorInput, BookInput};

use super::{CommandError, connect};

/// Sample author with the titles attributed to them.
struct SampleAuthor {
    first_name: &'static str,
    family_name: &'static str,
    born: Option<(i32, u32, u32)>,
    died: Option<(i32, u32, u32)>,
    books: &'static [(&'static str, &'static str, &'static str)],
}

const SAMPLE_AUTHORS: &[SampleAuthor] = &[
    SampleAuthor {
        first_name: "Patrick",
        family_name: "Rothfuss",
        born: Some((1973, 6, 6)),
        died: None,
        books: &[
            (
                "The Name of the Wind",
                "A hero recounts his early life to a travelling chronicler.",
                "9781473211896",
            ),
            (
                "The Wise Man's Fear",
                "Kvothe continues his story at the University and beyond.",
                "9788401352836",
            ),
        ],
    },
    SampleAuthor {
        first_name: "Ben",
        family_name: "Bova",
        born: Some((1932, 11, 8)),
        died: Some((2020, 11, 29)),
        books: &[(
            "Apes and Angels",
            "Humankind spreads outward to meet a wave of cosmic death.",
            "9780765379528",
        )],
    },
    SampleAuthor {
        first_name: "Isaac",
        family_name: "Asimov",
        born: Some((1920, 1, 2)),
        died: Some((1992, 4, 6)),
        books: &[],
    },
    SampleAuthor {
        first_name: "Bob",
        family_name: "Billings",
        born: None,
        died: None,
        books: &[],
    },
    SampleAuthor {
        first_name: "Jim",
        family_name: "Jones",
        born: Some((1971, 12, 16)),
        died: None,
        books: &[],
    },
];

fn date(parts: Option<(i32, u32, u32)>) -> Option<NaiveDate> {
    parts.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
}

/// Insert the sample data.
///
/// Returns the number of authors and books created.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails.
pub async fn run() -> Result<(usize, usize), CommandError> {
    let store = PgCatalogStore::new(connect().await?);
    let (authors, books) = seed(&store).await?;

    info!(authors, books, "Seeding complete!");
    Ok((authors, books))
}

/// Insert every sample author and book into `store`.
async fn seed(store: &dyn CatalogStore) -> Result<(usize, usize), CommandError> {
    let mut authors = 0;
    let mut books = 0;

    for sample in SAMPLE_AUTHORS {
        let author = store
            .create_author(&AuthorInput {
                first_name: sample.first_name.to_string(),
                family_name: sample.family_name.to_string(),
                date_of_birth: date(sample.born),
                date_of_death: date(sample.died),
            })
            .await?;
        authors += 1;
        info!(author_id = %author.id, name = %author.name(), "Author added");

        for (title, summary, isbn) in sample.books {
            store
                .create_book(&BookInput {
                    title: (*title).to_string(),
                    summary: (*summary).to_string(),
                    isbn: (*isbn).to_string(),
                    author_id: author.id,
                })
                .await?;
            books += 1;
        }
    }

    Ok((authors, books))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use local_library_catalog::db::MemoryCatalogStore;

    use super::*;

    #[test]
    fn test_sample_dates_are_valid() {
        for sample in SAMPLE_AUTHORS {
            assert_eq!(date(sample.born).is_some(), sample.born.is_some());
            assert_eq!(date(sample.died).is_some(), sample.died.is_some());
        }
    }

    #[tokio::test]
    async fn test_seed_inserts_every_sample() {
        let store = MemoryCatalogStore::new();
        let (authors, books) = seed(&store).await.unwrap();

        assert_eq!(authors, SAMPLE_AUTHORS.len());
        assert_eq!(books, 3);

        let listed = store.list_authors().await.unwrap();
        assert_eq!(listed.first().unwrap().family_name, "Asimov");
    }
}

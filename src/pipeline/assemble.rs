use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{ContentItem, FeedArtifact};

/// Keep the first occurrence of every id, in input order.
///
/// Input order is configured query order, so an earlier query's title and
/// channel win over a later query's copy of the same item.
pub fn dedup<I>(items: I) -> Vec<ContentItem>
where
    I: IntoIterator<Item = ContentItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

pub fn assemble<I>(
    category: &str,
    updated_at: DateTime<Utc>,
    items: I,
    max_items: usize,
) -> FeedArtifact
where
    I: IntoIterator<Item = ContentItem>,
{
    let mut items = dedup(items);
    items.truncate(max_items);
    FeedArtifact::new(category, updated_at, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, title: &str) -> ContentItem {
        ContentItem::new(id, title, "", None).unwrap()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let items = vec![
            item("a", "From first query"),
            item("b", "B"),
            item("a", "From second query"),
        ];
        let unique = dedup(items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "From first query");
        assert_eq!(unique[1].id, "b");
    }

    #[test]
    fn test_assemble_caps_after_dedup() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap();
        let items = vec![
            item("a", "A"),
            item("a", "A again"),
            item("b", "B"),
            item("c", "C"),
        ];
        let artifact = assemble("football", now, items, 2);

        assert_eq!(artifact.category, "football");
        assert_eq!(artifact.updated_at, now);
        let ids: Vec<_> = artifact.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_assemble_empty_input() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap();
        let artifact = assemble("viral", now, Vec::new(), 100);
        assert!(artifact.is_empty());
        assert_eq!(artifact.updated_at, now);
    }

    #[test]
    fn test_zero_cap_yields_empty_artifact() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap();
        let artifact = assemble("viral", now, vec![item("a", "A")], 0);
        assert!(artifact.is_empty());
    }
}

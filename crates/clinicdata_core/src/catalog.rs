//! Price-list search and grouping for public listings.

use crate::model::rate::RateItem;

/// Rates sharing one category, compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    /// Category spelling of the first entry seen.
    pub label: &'a str,
    pub rates: Vec<&'a RateItem>,
}

/// Case-insensitive substring match over name, category and description.
///
/// A blank term matches everything.
pub fn search_rates<'a>(rates: &'a [RateItem], term: &str) -> Vec<&'a RateItem> {
    let needle = term.trim().to_lowercase();
    rates
        .iter()
        .filter(|rate| {
            needle.is_empty()
                || rate.test_name.to_lowercase().contains(&needle)
                || rate.category.to_lowercase().contains(&needle)
                || rate
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Groups rates by category, keeping first-seen group and item order.
pub fn group_by_category<'a>(
    rates: impl IntoIterator<Item = &'a RateItem>,
) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<(String, CategoryGroup<'a>)> = Vec::new();
    for rate in rates {
        let key = rate.category.to_lowercase();
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, group)) => group.rates.push(rate),
            None => groups.push((
                key,
                CategoryGroup {
                    label: &rate.category,
                    rates: vec![rate],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

#[cfg(test)]
mod tests {
    use super::{group_by_category, search_rates};
    use crate::model::rate::{NewRate, RateItem};

    fn rate(id: &str, name: &str, category: &str, description: Option<&str>) -> RateItem {
        let mut payload = NewRate::new(name, 100.0, category);
        payload.description = description.map(str::to_string);
        RateItem::from_new(id.to_string(), &payload)
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() {
        let rates = vec![
            rate("1", "CBC", "Blood Tests", None),
            rate("2", "Chest X-Ray", "Radiology", Some("PA view")),
            rate("3", "ECG", "Cardiac", None),
        ];
        let ids = |term: &str| {
            search_rates(&rates, term)
                .into_iter()
                .map(|rate| rate.id.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids("blood"), vec!["1"]);
        assert_eq!(ids("pa VIEW"), vec!["2"]);
        assert_eq!(ids("   ").len(), 3);
        assert!(ids("mri").is_empty());
    }

    #[test]
    fn groups_case_insensitively_in_first_seen_order() {
        let rates = vec![
            rate("1", "CBC", "Blood Tests", None),
            rate("2", "ECG", "Cardiac", None),
            rate("3", "HbA1c", "blood tests", None),
        ];
        let groups = group_by_category(&rates);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Blood Tests");
        assert_eq!(
            groups[0].rates.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert_eq!(groups[1].label, "Cardiac");
    }
}

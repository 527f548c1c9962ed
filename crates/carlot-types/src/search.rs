//! Case-insensitive substring search over listings.

use crate::listing::Listing;

/// Returns `true` if `term` occurs in the title, the description, or any
/// tag of `listing`, ignoring case. An empty term matches every listing.
pub fn matches(listing: &Listing, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    listing.title.to_lowercase().contains(&needle)
        || listing.description.to_lowercase().contains(&needle)
        || listing
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keep the listings matching `term`, preserving their order.
pub fn filter_listings(listings: Vec<Listing>, term: &str) -> Vec<Listing> {
    if term.is_empty() {
        return listings;
    }
    listings
        .into_iter()
        .filter(|listing| matches(listing, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ListingId, Subject};
    use chrono::Utc;
    use proptest::prelude::*;

    fn listing(title: &str, description: &str, tags: &[&str]) -> Listing {
        Listing {
            id: ListingId::generate(),
            title: title.into(),
            description: description.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            images: vec![],
            owner_id: Subject::new("owner").unwrap(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn matches_title_ignoring_case() {
        let l = listing("Toyota Corolla", "reliable", &[]);
        assert!(matches(&l, "corolla"));
        assert!(matches(&l, "TOYOTA"));
    }

    #[test]
    fn matches_description() {
        let l = listing("Sedan", "One careful owner", &[]);
        assert!(matches(&l, "CAREFUL"));
    }

    #[test]
    fn matches_any_tag() {
        let l = listing("Sedan", "nice", &["SUV", "Dealer"]);
        assert!(matches(&l, "deal"));
        assert!(matches(&l, "suv"));
        assert!(!matches(&l, "truck"));
    }

    #[test]
    fn filter_keeps_order() {
        let listings = vec![
            listing("Red Mustang", "", &[]),
            listing("Blue Civic", "", &[]),
            listing("Red Golf", "", &[]),
        ];
        let result = filter_listings(listings, "red");
        let titles: Vec<_> = result.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Red Mustang", "Red Golf"]);
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        let listings = vec![listing("Civic", "", &[])];
        assert!(filter_listings(listings, "zzz").is_empty());
    }

    proptest! {
        #[test]
        fn empty_term_matches_everything(title in ".*", description in ".*", tag in ".*") {
            let l = listing(&title, &description, &[&tag]);
            prop_assert!(matches(&l, ""));
        }

        #[test]
        fn title_substring_always_matches(
            prefix in "[a-z]{0,8}",
            middle in "[a-zA-Z]{1,8}",
            suffix in "[a-z]{0,8}",
        ) {
            let l = listing(&format!("{prefix}{middle}{suffix}"), "", &[]);
            prop_assert!(matches(&l, &middle.to_uppercase()));
            prop_assert!(matches(&l, &middle.to_lowercase()));
        }

        #[test]
        fn tag_order_is_irrelevant(a in "[a-z]{1,6}", b in "[a-z]{1,6}", term in "[a-z]{1,3}") {
            let forward = listing("", "", &[&a, &b]);
            let reverse = listing("", "", &[&b, &a]);
            prop_assert_eq!(matches(&forward, &term), matches(&reverse, &term));
        }
    }
}

use moodmap_core::FavoriteRecord;
use serde::Serialize;

/// Entries shown per saved-place section.
pub const MAX_PER_GROUP: usize = 10;

/// Section a saved place is filed under, picked from its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SavedGroup {
    WorkCafes,
    DateSpots,
    QuickBites,
    BudgetFood,
}

impl SavedGroup {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::WorkCafes => "Work Cafes",
            Self::DateSpots => "Date Spots",
            Self::QuickBites => "Quick Bites",
            Self::BudgetFood => "Budget Food",
        }
    }
}

/// One titled section of saved places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedSection<'a> {
    pub group: SavedGroup,
    pub places: Vec<&'a FavoriteRecord>,
}

#[must_use]
pub fn classify_saved(record: &FavoriteRecord) -> SavedGroup {
    let category = record.category.as_deref().unwrap_or_default().to_lowercase();
    if category.contains("cafe") {
        SavedGroup::WorkCafes
    } else if category.contains("restaurant") {
        SavedGroup::DateSpots
    } else if category.contains("fast") {
        SavedGroup::QuickBites
    } else {
        SavedGroup::BudgetFood
    }
}

/// Groups favorites into sections ordered by first appearance, each capped
/// at [`MAX_PER_GROUP`] entries in backend order.
#[must_use]
pub fn group_saved(records: &[FavoriteRecord]) -> Vec<SavedSection<'_>> {
    let mut sections: Vec<SavedSection<'_>> = Vec::new();
    for record in records {
        let group = classify_saved(record);
        match sections.iter_mut().find(|s| s.group == group) {
            Some(section) => {
                if section.places.len() < MAX_PER_GROUP {
                    section.places.push(record);
                }
            }
            None => sections.push(SavedSection {
                group,
                places: vec![record],
            }),
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: Option<&str>) -> FavoriteRecord {
        FavoriteRecord {
            place_id: id.into(),
            name: Some(format!("Place {id}")),
            category: category.map(str::to_string),
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn classifies_by_category_keyword() {
        assert_eq!(classify_saved(&record("1", Some("Internet_Cafe"))), SavedGroup::WorkCafes);
        assert_eq!(classify_saved(&record("2", Some("restaurant"))), SavedGroup::DateSpots);
        assert_eq!(classify_saved(&record("3", Some("fast_food"))), SavedGroup::QuickBites);
        assert_eq!(classify_saved(&record("4", Some("bakery"))), SavedGroup::BudgetFood);
        assert_eq!(classify_saved(&record("5", None)), SavedGroup::BudgetFood);
    }

    #[test]
    fn sections_follow_first_appearance() {
        let records = vec![
            record("a", Some("fast_food")),
            record("b", Some("cafe")),
            record("c", Some("fast_food")),
            record("d", Some("bakery")),
        ];
        let sections = group_saved(&records);
        let groups: Vec<SavedGroup> = sections.iter().map(|s| s.group).collect();
        assert_eq!(
            groups,
            [SavedGroup::QuickBites, SavedGroup::WorkCafes, SavedGroup::BudgetFood]
        );
        let quick: Vec<&str> = sections[0].places.iter().map(|r| r.place_id.as_str()).collect();
        assert_eq!(quick, ["a", "c"]);
    }

    #[test]
    fn caps_each_section() {
        let records: Vec<FavoriteRecord> = (0..14)
            .map(|i| record(&i.to_string(), Some("cafe")))
            .collect();
        let sections = group_saved(&records);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].places.len(), MAX_PER_GROUP);
        assert_eq!(sections[0].places[9].place_id, "9");
    }

    #[test]
    fn empty_favorites_have_no_sections() {
        assert!(group_saved(&[]).is_empty());
    }

    #[test]
    fn titles() {
        assert_eq!(SavedGroup::DateSpots.title(), "Date Spots");
        assert_eq!(SavedGroup::QuickBites.title(), "Quick Bites");
    }
}

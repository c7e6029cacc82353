use crate::models::{CatalogCard, CatalogQuery, ExerciseCatalogItem};
use crate::selection::SelectionStore;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ExerciseCatalogItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub text: String,
    pub category: String,
}

impl CatalogFilter {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category.is_empty()
    }

    pub fn matches(&self, item: &ExerciseCatalogItem) -> bool {
        let text = self.text.to_lowercase();
        if !text.is_empty() {
            let haystack = format!("{} {}", item.name, item.description).to_lowercase();
            if !haystack.contains(&text) {
                return false;
            }
        }

        let category = self.category.to_lowercase();
        category.is_empty() || item.category.to_lowercase() == category
    }
}

impl From<&CatalogQuery> for CatalogFilter {
    fn from(query: &CatalogQuery) -> Self {
        Self::new(
            query.q.clone().unwrap_or_default(),
            query.tipo.clone().unwrap_or_default(),
        )
    }
}

impl Catalog {
    pub fn new(items: Vec<ExerciseCatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ExerciseCatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseCatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Narrows the catalog to one muscle, addressed by its URL slug
    /// (`cuerpo-completo` is the muscle `cuerpo completo`).
    pub fn for_muscle(&self, slug: &str) -> Option<Catalog> {
        let muscle = slug.replace('-', " ").to_lowercase();
        let items: Vec<_> = self
            .items
            .iter()
            .filter(|item| item.muscle.to_lowercase() == muscle)
            .cloned()
            .collect();

        if items.is_empty() {
            None
        } else {
            Some(Catalog::new(items))
        }
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.items.iter().map(|item| item.category.as_str()))
    }

    pub fn cards(&self, filter: &CatalogFilter, selection: &SelectionStore) -> Vec<CatalogCard> {
        self.items
            .iter()
            .map(|item| CatalogCard {
                item: item.clone(),
                selected: selection.contains(&item.id),
                visible: filter.matches(item),
            })
            .collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, description: &str, category: &str, muscle: &str) -> ExerciseCatalogItem {
        ExerciseCatalogItem {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            level: "Principiante".into(),
            muscle: muscle.into(),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            item("1", "Push-up", "Empuje con peso corporal", "Fuerza", "pecho"),
            item("2", "Plancha", "Core isométrico", "Resistencia", "cuerpo completo"),
            item("3", "Press banca", "Empuje con barra", "Fuerza", "pecho"),
            item("4", "Burpee", "Salto y flexión", "Cardio", "cuerpo completo"),
        ])
    }

    #[test]
    fn empty_filter_shows_everything() {
        let catalog = sample();
        let cards = catalog.cards(&CatalogFilter::default(), &SelectionStore::default());
        assert!(cards.iter().all(|card| card.visible));
    }

    #[test]
    fn filter_matches_name_and_description_case_insensitively() {
        let catalog = sample();
        let filter = CatalogFilter::new("EMPUJE", "");
        let visible: Vec<_> = catalog
            .cards(&filter, &SelectionStore::default())
            .into_iter()
            .filter(|card| card.visible)
            .map(|card| card.item.id)
            .collect();
        assert_eq!(visible, vec!["1", "3"]);
    }

    #[test]
    fn every_visible_card_satisfies_both_filters() {
        let catalog = sample();
        let pairs = [("", "fuerza"), ("p", ""), ("p", "Fuerza"), ("zzz", ""), ("", "cardio")];
        for (text, category) in pairs {
            let filter = CatalogFilter::new(text, category);
            for card in catalog.cards(&filter, &SelectionStore::default()) {
                let haystack = format!("{} {}", card.item.name, card.item.description).to_lowercase();
                let text_ok = haystack.contains(&text.to_lowercase());
                let category_ok = category.is_empty() || card.item.category.eq_ignore_ascii_case(category);
                assert_eq!(card.visible, text_ok && category_ok, "{text:?}/{category:?} on {}", card.item.id);
            }
        }
    }

    #[test]
    fn no_matches_is_a_valid_result() {
        let catalog = sample();
        let filter = CatalogFilter::new("natación", "");
        assert_eq!(catalog.cards(&filter, &SelectionStore::default()).len(), 4);
        assert!(catalog.items().iter().all(|item| !filter.matches(item)));
    }

    #[test]
    fn search_text_is_not_trimmed() {
        let catalog = sample();
        let filter = CatalogFilter::new("  ", "");
        assert!(!filter.is_empty());
        assert!(catalog.items().iter().all(|item| !filter.matches(item)));
        assert!(CatalogFilter::new(" con", "").matches(&catalog.items()[0]));
    }

    #[test]
    fn muscle_slug_uses_spaces() {
        let catalog = sample();
        let full_body = catalog.for_muscle("Cuerpo-Completo").unwrap();
        assert_eq!(full_body.len(), 2);
        assert!(catalog.for_muscle("espalda").is_none());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        assert_eq!(sample().categories(), vec!["Cardio", "Fuerza", "Resistencia"]);
    }
}

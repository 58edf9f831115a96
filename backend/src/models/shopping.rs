//! Shopping list grouped by store section.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Grocery store sections, in walking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StoreSection {
    Produce,
    Dairy,
    Pantry,
    Bakery,
    Other,
}

impl StoreSection {
    pub const ALL: [StoreSection; 5] = [
        StoreSection::Produce,
        StoreSection::Dairy,
        StoreSection::Pantry,
        StoreSection::Bakery,
        StoreSection::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreSection::Produce => "Produce",
            StoreSection::Dairy => "Dairy",
            StoreSection::Pantry => "Pantry",
            StoreSection::Bakery => "Bakery",
            StoreSection::Other => "Other",
        }
    }

    /// Case-insensitive lookup of a section label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for StoreSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ingredients to buy, keyed by section. Every section is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShoppingList {
    sections: BTreeMap<StoreSection, Vec<String>>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self {
            sections: StoreSection::ALL
                .into_iter()
                .map(|section| (section, Vec::new()))
                .collect(),
        }
    }

    pub fn items(&self, section: StoreSection) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, section: StoreSection, item: impl Into<String>) {
        self.sections.entry(section).or_default().push(item.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (StoreSection, &[String])> {
        self.sections
            .iter()
            .map(|(section, items)| (*section, items.as_slice()))
    }

    /// All items in section order.
    pub fn flat_items(&self) -> Vec<String> {
        self.sections.values().flatten().cloned().collect()
    }

    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for ShoppingList {
    /// Section labels match case-insensitively; unknown labels land in
    /// [`StoreSection::Other`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut list = ShoppingList::new();
        for (label, items) in raw {
            let section = StoreSection::from_label(&label).unwrap_or(StoreSection::Other);
            for item in items {
                list.push(section, item);
            }
        }
        Ok(list)
    }
}

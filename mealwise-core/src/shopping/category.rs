//! Supermarket category taxonomy and ordering.

use std::cmp::Ordering;

/// Known supermarket sections, in aisle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShoppingCategory {
    Produce,
    Butcher,
    Fishmonger,
    DairyEggs,
    Bakery,
    Pantry,
    Beverages,
    Frozen,
    Other,
}

impl ShoppingCategory {
    pub const ALL: [ShoppingCategory; 9] = [
        ShoppingCategory::Produce,
        ShoppingCategory::Butcher,
        ShoppingCategory::Fishmonger,
        ShoppingCategory::DairyEggs,
        ShoppingCategory::Bakery,
        ShoppingCategory::Pantry,
        ShoppingCategory::Beverages,
        ShoppingCategory::Frozen,
        ShoppingCategory::Other,
    ];

    pub fn spanish_label(&self) -> &'static str {
        match self {
            ShoppingCategory::Produce => "Frutas y Verduras",
            ShoppingCategory::Butcher => "Carnicería",
            ShoppingCategory::Fishmonger => "Pescadería",
            ShoppingCategory::DairyEggs => "Lácteos y Huevos",
            ShoppingCategory::Bakery => "Panadería",
            ShoppingCategory::Pantry => "Despensa",
            ShoppingCategory::Beverages => "Bebidas",
            ShoppingCategory::Frozen => "Congelados",
            ShoppingCategory::Other => "Otros",
        }
    }

    pub fn english_label(&self) -> &'static str {
        match self {
            ShoppingCategory::Produce => "Fruits and Vegetables",
            ShoppingCategory::Butcher => "Butcher",
            ShoppingCategory::Fishmonger => "Fishmonger",
            ShoppingCategory::DairyEggs => "Dairy & Eggs",
            ShoppingCategory::Bakery => "Bakery",
            ShoppingCategory::Pantry => "Pantry",
            ShoppingCategory::Beverages => "Beverages",
            ShoppingCategory::Frozen => "Frozen",
            ShoppingCategory::Other => "Other",
        }
    }

    /// Recognize a label in either language, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        ShoppingCategory::ALL.into_iter().find(|category| {
            category.spanish_label().to_lowercase() == label
                || category.english_label().to_lowercase() == label
        })
    }
}

/// Known labels in aisle order, then unknown labels alphabetically.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (ShoppingCategory::from_label(a), ShoppingCategory::from_label(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        price: f64,
        themes: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            price,
            themes: dedupe_themes(themes),
        }
    }
}

/// Vendor products in the order the catalog supplied them. That order is the
/// tie-break for equal scores, so it is never re-sorted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorCatalog {
    products: Vec<Product>,
}

impl VendorCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Drops repeated themes, keeping the first occurrence. Matching is case-sensitive.
pub fn dedupe_themes(themes: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(themes.len());
    for theme in themes {
        if !unique.contains(&theme) {
            unique.push(theme);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{dedupe_themes, Product, VendorCatalog};

    #[test]
    fn product_themes_are_deduplicated_case_sensitively() {
        let product = Product::new(
            "Desk Lamp",
            "Dorm",
            "Lighting",
            24.99,
            vec!["Tech-savvy".to_owned(), "tech-savvy".to_owned(), "Tech-savvy".to_owned()],
        );

        assert_eq!(product.themes, vec!["Tech-savvy".to_owned(), "tech-savvy".to_owned()]);
    }

    #[test]
    fn catalog_keeps_supplied_order() {
        let catalog = VendorCatalog::new(vec![
            Product::new("B", "", "", 1.0, Vec::new()),
            Product::new("A", "", "", 1.0, Vec::new()),
        ]);

        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn dedupe_of_empty_input_is_empty() {
        assert!(dedupe_themes(Vec::new()).is_empty());
    }
}

//! Facet summaries for the filter sidebar.

use std::collections::BTreeMap;

use catalog::{Catalog, CategoryId, Decimal, Product};

/// Number of products in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFacet {
    pub id: CategoryId,
    /// `None` when the category list does not know the id
    pub name: Option<String>,
    pub count: usize,
}

/// Number of products offered in one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFacet {
    pub color: String,
    pub count: usize,
}

/// Counts over a product list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub total: usize,
    /// Products with no (valid) category
    pub uncategorized: usize,
    /// Ordered by category id
    pub categories: Vec<CategoryFacet>,
    /// Most common first, ties alphabetical
    pub colors: Vec<ColorFacet>,
    /// Cheapest and dearest valid price
    pub price_range: Option<(Decimal, Decimal)>,
}

impl Facets {
    /// Summarize `products`, labelling categories from `catalog`.
    pub fn from_products(products: &[Product], catalog: &Catalog) -> Self {
        let mut by_category: BTreeMap<CategoryId, usize> = BTreeMap::new();
        let mut by_color: BTreeMap<&str, usize> = BTreeMap::new();
        let mut uncategorized = 0;
        let mut price_range: Option<(Decimal, Decimal)> = None;

        for product in products {
            match product.category {
                Some(id) => *by_category.entry(id).or_default() += 1,
                None => uncategorized += 1,
            }

            // A color listed twice on one product counts once
            let mut colors: Vec<&str> = product.colors.iter().map(String::as_str).collect();
            colors.sort_unstable();
            colors.dedup();
            for color in colors {
                *by_color.entry(color).or_default() += 1;
            }

            if let Some(price) = product.price {
                price_range = Some(match price_range {
                    Some((lo, hi)) => (lo.min(price), hi.max(price)),
                    None => (price, price),
                });
            }
        }

        let categories = by_category
            .into_iter()
            .map(|(id, count)| CategoryFacet {
                id,
                name: catalog.get_category(id).map(|c| c.name.clone()),
                count,
            })
            .collect();

        let mut colors: Vec<ColorFacet> = by_color
            .into_iter()
            .map(|(color, count)| ColorFacet {
                color: color.to_string(),
                count,
            })
            .collect();
        colors.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total: products.len(),
            uncategorized,
            categories,
            colors,
            price_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Category;

    fn catalog_with(products: Vec<Product>) -> Catalog {
        Catalog::from_parts(
            products,
            vec![Category {
                id: CategoryId::new(1),
                name: "Shirts".to_string(),
            }],
            Vec::new(),
        )
    }

    #[test]
    fn test_counts_categories_and_colors() {
        let catalog = catalog_with(vec![
            Product::new(1, "Tee")
                .with_category(1)
                .with_price(Decimal::new(1500, 2))
                .with_colors(&["Red, Blue", "red"]),
            Product::new(2, "Polo")
                .with_category(1)
                .with_price(Decimal::new(4000, 2))
                .with_colors(&["Blue"]),
            Product::new(3, "Cap").with_category(9).with_colors(&["Green"]),
            Product::new(4, "Mystery"),
        ]);

        let facets = Facets::from_products(catalog.products(), &catalog);

        assert_eq!(facets.total, 4);
        assert_eq!(facets.uncategorized, 1);
        assert_eq!(
            facets.categories,
            vec![
                CategoryFacet {
                    id: CategoryId::new(1),
                    name: Some("Shirts".to_string()),
                    count: 2,
                },
                CategoryFacet {
                    id: CategoryId::new(9),
                    name: None,
                    count: 1,
                },
            ]
        );

        let colors: Vec<(&str, usize)> = facets
            .colors
            .iter()
            .map(|c| (c.color.as_str(), c.count))
            .collect();
        assert_eq!(colors, vec![("blue", 2), ("green", 1), ("red", 1)]);

        assert_eq!(
            facets.price_range,
            Some((Decimal::new(1500, 2), Decimal::new(4000, 2)))
        );
    }

    #[test]
    fn test_empty_list() {
        let catalog = catalog_with(Vec::new());
        let facets = Facets::from_products(catalog.products(), &catalog);
        assert_eq!(facets, Facets::default());
    }
}

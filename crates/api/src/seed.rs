//! Demo catalog for local development.

use serde_json::json;

use vitrine_catalog::{CategoryDraft, ProductDraft, SpecMap, TagDraft};
use vitrine_core::{CatalogResult, CategoryId};

use crate::app::services::CatalogService;

const CATEGORIES: [&str; 6] = [
    "Jantes",
    "Éclairage",
    "Sièges",
    "Volants",
    "Accessoires",
    "Échappements",
];

const TAGS: [&str; 6] = ["Noir mat", "Cuir", "Chrome", "LED", "Sport", "Carbone"];

/// name, category index, tag slugs, featured, sort order
type SeedProduct = (&'static str, usize, &'static [&'static str], bool, Option<i32>);

const PRODUCTS: [SeedProduct; 20] = [
    ("Jante alu 18\" Turbine", 0, &["noir-mat", "sport"], true, Some(1)),
    ("Jante alu 19\" Course", 0, &["sport", "carbone"], false, Some(2)),
    ("Jante acier 16\" Hiver", 0, &[], false, None),
    ("Enjoliveur chrome 15\"", 0, &["chrome"], false, None),
    ("Phare avant LED Matrix", 1, &["led"], true, Some(1)),
    ("Feu arrière fumé LED", 1, &["led", "noir-mat"], false, None),
    ("Barre LED tout-terrain", 1, &["led", "sport"], false, None),
    ("Ampoule H7 longue portée", 1, &[], false, None),
    ("Siège baquet Rallye", 2, &["sport", "cuir"], true, Some(1)),
    ("Housse de siège cuir", 2, &["cuir"], false, None),
    ("Siège chauffant Confort", 2, &[], false, None),
    ("Volant sport alcantara", 3, &["sport", "noir-mat"], true, Some(1)),
    ("Volant bois verni Rétro", 3, &[], false, None),
    ("Moyeu de volant universel", 3, &["chrome"], false, None),
    ("Tapis de sol caoutchouc", 4, &["noir-mat"], false, None),
    ("Porte-vélos attelage", 4, &[], false, None),
    ("Coffre de toit 420L", 4, &[], false, Some(3)),
    ("Ligne d'échappement inox", 5, &["sport", "chrome"], true, Some(1)),
    ("Silencieux carbone GT", 5, &["carbone", "sport"], false, None),
    ("Embout d'échappement ovale", 5, &["chrome"], false, None),
];

/// Populate the catalog through the service so slugs, cover handling, and
/// events behave exactly as they would for real admin traffic. Returns the
/// number of products created.
pub fn demo_catalog(service: &CatalogService) -> CatalogResult<usize> {
    let mut category_ids: Vec<CategoryId> = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = service.create_category(CategoryDraft {
            name: name.to_string(),
            ..CategoryDraft::default()
        })?;
        category_ids.push(category.id);
    }

    for name in TAGS {
        service.create_tag(TagDraft {
            name: name.to_string(),
            slug: None,
        })?;
    }

    for (i, (name, category, tags, featured, sort_order)) in PRODUCTS.into_iter().enumerate() {
        let mut specs = SpecMap::new();
        specs.insert("reference".to_string(), json!(format!("DEMO-{:03}", i + 1)));
        service.create_product(ProductDraft {
            name: name.to_string(),
            short_description: Some(format!("{name}, article de démonstration.")),
            description: Some(format!(
                "{name}. Produit du catalogue de démonstration, sans valeur commerciale."
            )),
            category_ids: vec![category_ids[category]],
            tag_slugs: tags.iter().map(|s| s.to_string()).collect(),
            featured,
            sort_order,
            specs,
            ..ProductDraft::default()
        })?;
    }

    Ok(PRODUCTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vitrine_catalog::SearchParams;
    use vitrine_infra::{InMemoryCatalogStore, MemoryFileStore};

    #[test]
    fn seeding_builds_a_coherent_catalog() {
        let service = CatalogService::new(
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(MemoryFileStore::new()),
        );
        let count = demo_catalog(&service).unwrap();

        assert_eq!(count, 20);
        assert_eq!(service.categories().len(), 6);
        assert_eq!(service.tags().len(), 6);

        let all = service.search(&SearchParams {
            per_page: 50,
            ..SearchParams::default()
        });
        assert_eq!(all.total, 20);

        let featured = service.search(&SearchParams {
            featured: Some(true),
            ..SearchParams::default()
        });
        assert_eq!(featured.total, 5);

        // Every seeded tag slug resolves.
        let led = service.search(&SearchParams {
            tags: Some("led".to_string()),
            ..SearchParams::default()
        });
        assert!(led.total >= 3);
    }
}

//! Joins listings to products through the manufacturer key.

use crate::domain::model::{Association, ListingIndex, ProductIndex};
use crate::domain::ports::Diagnostics;

/// Attaches every listing group whose manufacturer has a product to that product's name.
///
/// Groups are visited in the order manufacturers first appeared in the listings,
/// so the output order follows the listing file. Groups without a product are dropped.
pub fn build_association(
    products: &ProductIndex,
    listings: ListingIndex,
    diagnostics: &dyn Diagnostics,
) -> Association {
    let mut association = Association::new();
    let mut unmatched = 0;

    for (manufacturer, group) in listings.into_groups() {
        match products.get(&manufacturer) {
            Some(product) => association.extend(&product.product_name, group),
            None => unmatched += group.len(),
        }
    }

    diagnostics.info(&format!(
        "matched {} listings to {} products, {} listings without a product",
        association.listing_count(),
        association.len(),
        unmatched
    ));

    association
}

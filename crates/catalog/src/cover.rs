//! Single-cover-image invariant.
//!
//! Among a product's images at most one carries the cover flag, and exactly
//! one when the collection is non-empty. Every mutation path that touches
//! images runs one of these routines as its last step before commit.

use vitrine_core::{CatalogError, CatalogResult, ImageId};

use crate::product::Image;

/// Policy: deleting the current cover image does NOT promote a replacement.
/// A product can therefore hold images with no cover until the next image
/// mutation re-runs [`enforce_single_cover`]. Flip this to change the
/// behavior in one place (`CatalogService::delete_image` branches on it).
pub const REELECT_COVER_AFTER_DELETE: bool = false;

/// Repair the invariant over an image list: the first flagged image wins,
/// later flags are cleared, and a non-empty list with no flag promotes its
/// first image. Used on create/update after a whole-list replacement.
pub fn enforce_single_cover(images: &mut [Image]) {
    let mut seen_cover = false;
    for img in images.iter_mut() {
        if img.cover {
            if seen_cover {
                img.cover = false;
            } else {
                seen_cover = true;
            }
        }
    }
    if !seen_cover {
        if let Some(first) = images.first_mut() {
            first.cover = true;
        }
    }
}

/// Append a freshly uploaded image. It becomes the cover when the caller
/// asked for it or when no image currently is; either way all siblings end
/// up demoted if the new image is promoted.
pub fn apply_upload(images: &mut Vec<Image>, mut uploaded: Image, requested_cover: bool) -> ImageId {
    let promote = requested_cover || !images.iter().any(|img| img.cover);
    if promote {
        for img in images.iter_mut() {
            img.cover = false;
        }
    }
    uploaded.cover = promote;
    let id = uploaded.id;
    images.push(uploaded);
    id
}

/// Explicit cover assignment: flag exactly `image_id`, clear every sibling.
pub fn set_cover(images: &mut [Image], image_id: ImageId) -> CatalogResult<()> {
    if !images.iter().any(|img| img.id == image_id) {
        return Err(CatalogError::not_found());
    }
    for img in images.iter_mut() {
        img.cover = img.id == image_id;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::ProductId;

    fn image(cover: bool) -> Image {
        Image {
            id: ImageId::new(),
            url: format!("/files/{}.webp", ImageId::new()),
            alt: "img".to_string(),
            cover,
            product_id: ProductId::new(),
        }
    }

    fn cover_ids(images: &[Image]) -> Vec<ImageId> {
        images.iter().filter(|i| i.cover).map(|i| i.id).collect()
    }

    #[test]
    fn first_flagged_image_wins() {
        let mut images = vec![image(false), image(true), image(true)];
        let expected = images[1].id;
        enforce_single_cover(&mut images);
        assert_eq!(cover_ids(&images), [expected]);
    }

    #[test]
    fn unflagged_non_empty_list_promotes_the_first() {
        let mut images = vec![image(false), image(false)];
        let expected = images[0].id;
        enforce_single_cover(&mut images);
        assert_eq!(cover_ids(&images), [expected]);
    }

    #[test]
    fn empty_list_stays_empty() {
        let mut images: Vec<Image> = vec![];
        enforce_single_cover(&mut images);
        assert!(images.is_empty());
    }

    #[test]
    fn enforce_is_idempotent() {
        let mut images = vec![image(true), image(true), image(false)];
        enforce_single_cover(&mut images);
        let snapshot = images.clone();
        enforce_single_cover(&mut images);
        assert_eq!(images, snapshot);
    }

    #[test]
    fn first_upload_becomes_cover_without_asking() {
        let mut images = vec![];
        let a = apply_upload(&mut images, image(false), false);
        assert_eq!(cover_ids(&images), [a]);
    }

    #[test]
    fn later_upload_without_request_stays_plain() {
        let mut images = vec![];
        let a = apply_upload(&mut images, image(false), false);
        apply_upload(&mut images, image(false), false);
        assert_eq!(cover_ids(&images), [a]);
    }

    #[test]
    fn requested_cover_demotes_every_sibling() {
        let mut images = vec![];
        apply_upload(&mut images, image(false), false);
        let b = apply_upload(&mut images, image(false), true);
        assert_eq!(cover_ids(&images), [b]);
    }

    #[test]
    fn set_cover_flips_the_flag_pair() {
        let mut images = vec![image(true), image(false)];
        let b = images[1].id;
        set_cover(&mut images, b).unwrap();
        assert_eq!(cover_ids(&images), [b]);
    }

    #[test]
    fn set_cover_on_unknown_image_is_not_found() {
        let mut images = vec![image(true)];
        assert_eq!(
            set_cover(&mut images, ImageId::new()),
            Err(CatalogError::NotFound)
        );
        // The existing cover is untouched.
        assert_eq!(cover_ids(&images).len(), 1);
    }
}

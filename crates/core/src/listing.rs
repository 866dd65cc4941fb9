//! Listing order shared by remote and local listings
//!
//! Directories come first, then files; each group is sorted by name.

use std::cmp::Ordering;

/// Something that can appear in a directory listing
pub trait ListingItem {
    /// Whether the item is a directory
    fn is_dir(&self) -> bool;

    /// Name the item is ordered by within its group
    fn sort_name(&self) -> &str;
}

/// Compare two listing items: directories first, then lexicographic by name
pub fn listing_order<T: ListingItem>(a: &T, b: &T) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.sort_name().cmp(b.sort_name()))
}

/// Sort a listing in place (stable)
pub fn sort_listing<T: ListingItem>(items: &mut [T]) {
    items.sort_by(listing_order);
}

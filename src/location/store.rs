//! Per-category image storage with inclusion flags and preview pagination.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::location::category::Category;
use crate::location::image::UploadedImage;

/// Default preview page size: five columns by two rows.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A stored upload and whether it goes into the report.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    filename: String,
    image: UploadedImage,
    included: bool,
}

impl ImageEntry {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn image(&self) -> &UploadedImage {
        &self.image
    }

    pub fn included(&self) -> bool {
        self.included
    }
}

/// Images of one category in upload order, plus the current preview page.
#[derive(Debug, Clone)]
struct CategoryImageSet {
    entries: Vec<ImageEntry>,
    page: usize,
}

impl Default for CategoryImageSet {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            page: 1,
        }
    }
}

impl CategoryImageSet {
    fn position(&self, filename: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.filename == filename)
    }

    fn total_pages(&self, page_size: usize) -> usize {
        self.entries.len().div_ceil(page_size).max(1)
    }
}

/// Everything uploaded during one editing session.
///
/// Each category is always present; an empty category simply has no entries.
#[derive(Debug, Clone)]
pub struct Session {
    sets: [CategoryImageSet; Category::ALL.len()],
    page_size: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A session whose previews show `page_size` images per page (minimum 1).
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            sets: Default::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn set(&self, category: Category) -> &CategoryImageSet {
        &self.sets[category as usize]
    }

    fn set_mut(&mut self, category: Category) -> &mut CategoryImageSet {
        &mut self.sets[category as usize]
    }

    /// Upload files into `category`, returning how many were stored.
    ///
    /// Filenames already present (or repeated within `files`) are skipped.
    /// Every new file is decoded before anything is stored, so any error leaves
    /// the session unchanged. A single-image category accepts one new file and
    /// only while it is empty.
    pub fn add_images<I, N, D>(&mut self, category: Category, files: I) -> Result<usize>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Bytes>,
    {
        let set = self.set(category);
        let mut fresh: Vec<(String, Bytes)> = Vec::new();
        for (name, data) in files {
            let name = name.into();
            if set.position(&name).is_some() || fresh.iter().any(|(n, _)| *n == name) {
                debug!(category = category.key(), filename = %name, "skipping duplicate upload");
                continue;
            }
            fresh.push((name, data.into()));
        }

        if !category.allows_multiple() {
            if fresh.len() > 1 {
                warn!(
                    category = category.key(),
                    count = fresh.len(),
                    "too many files for single-image category"
                );
                return Err(Error::TooManyFiles {
                    category: category.label(),
                    count: fresh.len(),
                });
            }
            if let (Some(existing), Some((name, _))) = (set.entries.first(), fresh.first()) {
                warn!(category = category.key(), filename = %name, "single-image slot occupied");
                return Err(Error::SlotOccupied {
                    category: category.label(),
                    existing: existing.filename.clone(),
                    filename: name.clone(),
                });
            }
        }

        let decoded = fresh
            .into_iter()
            .map(|(filename, data)| -> Result<ImageEntry> {
                let image = UploadedImage::decode(&filename, data).inspect_err(|e| {
                    warn!(category = category.key(), error = %e, "rejecting upload batch");
                })?;
                Ok(ImageEntry {
                    filename,
                    image,
                    included: true,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let added = decoded.len();
        for entry in &decoded {
            debug!(category = category.key(), filename = %entry.filename, "stored image");
        }
        self.set_mut(category).entries.extend(decoded);
        Ok(added)
    }

    /// Delete an image. The current page is pulled back when it no longer
    /// exists. Returns whether anything was removed.
    pub fn remove_image(&mut self, category: Category, filename: &str) -> bool {
        let page_size = self.page_size;
        let set = self.set_mut(category);
        let Some(index) = set.position(filename) else {
            return false;
        };
        set.entries.remove(index);
        set.page = set.page.min(set.total_pages(page_size));
        debug!(category = category.key(), filename, page = set.page, "removed image");
        true
    }

    /// Toggle whether an image goes into the report. Returns `false` when the
    /// filename is not stored.
    pub fn set_inclusion(&mut self, category: Category, filename: &str, included: bool) -> bool {
        let set = self.set_mut(category);
        match set.position(filename) {
            Some(index) => {
                set.entries[index].included = included;
                true
            }
            None => false,
        }
    }

    /// All entries of a category in upload order.
    pub fn images(&self, category: Category) -> &[ImageEntry] {
        &self.set(category).entries
    }

    /// Look up an entry by filename.
    pub fn image(&self, category: Category, filename: &str) -> Option<&ImageEntry> {
        let set = self.set(category);
        set.position(filename).map(|i| &set.entries[i])
    }

    /// Entries marked for the report, in upload order.
    pub fn included_images(&self, category: Category) -> impl Iterator<Item = &ImageEntry> {
        self.set(category).entries.iter().filter(|e| e.included)
    }

    /// One preview page (1-indexed). Pages outside `1..=total_pages` are empty.
    pub fn page(&self, category: Category, page: usize) -> &[ImageEntry] {
        let entries = &self.set(category).entries;
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size);
        if start >= entries.len() {
            return &[];
        }
        let end = (start + self.page_size).min(entries.len());
        &entries[start..end]
    }

    /// Number of preview pages, at least 1.
    pub fn total_pages(&self, category: Category) -> usize {
        self.set(category).total_pages(self.page_size)
    }

    pub fn current_page(&self, category: Category) -> usize {
        self.set(category).page
    }

    /// Navigate the preview, clamping to `1..=total_pages`. Returns the page set.
    pub fn set_page(&mut self, category: Category, page: usize) -> usize {
        let total = self.total_pages(category);
        let set = self.set_mut(category);
        set.page = page.clamp(1, total);
        set.page
    }

    /// Entries on the current preview page.
    pub fn current_page_images(&self, category: Category) -> &[ImageEntry] {
        self.page(category, self.current_page(category))
    }
}

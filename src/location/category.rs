//! Image categories of a location report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An image category, in report order.
///
/// The set is closed: every upload, preview and slide refers to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// サムネイル, the single image on the title slide
    Thumbnail,
    /// ロケ地写真
    Photos,
    /// アングル写真
    Angles,
    /// その他設備・搬入搬出経路
    Others,
    /// 平面図
    Floor,
    /// ロケ地MAP
    Map,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Thumbnail,
        Category::Photos,
        Category::Angles,
        Category::Others,
        Category::Floor,
        Category::Map,
    ];

    /// Display label, used as the slide heading.
    pub fn label(self) -> &'static str {
        match self {
            Category::Thumbnail => "サムネイル",
            Category::Photos => "ロケ地写真",
            Category::Angles => "アングル写真",
            Category::Others => "その他設備・搬入搬出経路",
            Category::Floor => "平面図",
            Category::Map => "ロケ地MAP",
        }
    }

    /// Short stable key, also the per-category directory name on disk.
    pub fn key(self) -> &'static str {
        match self {
            Category::Thumbnail => "thumbs",
            Category::Photos => "photos",
            Category::Angles => "angles",
            Category::Others => "others",
            Category::Floor => "floor",
            Category::Map => "map_img",
        }
    }

    /// Whether the category holds more than one image.
    pub fn allows_multiple(self) -> bool {
        !matches!(self, Category::Thumbnail)
    }

    /// Lookup by [`Category::key`].
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_key(s).ok_or_else(|| {
            let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
            format!("unknown category '{}', expected one of {}", s, keys.join(", "))
        })
    }
}

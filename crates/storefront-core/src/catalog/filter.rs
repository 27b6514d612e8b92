// ── Local catalog filtering ──
//
// Pure predicates over a product snapshot. Nothing here is cached: every
// iteration re-evaluates against the snapshot it was built from.

use std::str::FromStr;
use std::sync::Arc;

use crate::model::Product;

/// Sentinel that UIs use for "no category selected".
pub const ALL_CATEGORIES: &str = "all";

/// Category predicate: any category, or an exact (case-sensitive) name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    Any,
    Exact(String),
}

impl CategoryFilter {
    /// `""` and `"all"` mean any category.
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() || name == ALL_CATEGORIES {
            Self::Any
        } else {
            Self::Exact(name.to_owned())
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(name) => product.category == *name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Any, Self::from_name)
    }
}

/// Category plus free-text search, ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: CategoryFilter,
    /// Stored lowercased. Empty matches everything.
    search: String,
}

impl CatalogFilter {
    pub fn new(category: CategoryFilter, search: &str) -> Self {
        Self {
            category,
            search: search.to_lowercase(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Case-insensitive substring match on name or description, combined
    /// with the category predicate.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.category.matches(product) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        product.name.to_lowercase().contains(&self.search)
            || product.description.to_lowercase().contains(&self.search)
    }
}

/// A lazy, restartable view over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct FilteredProducts {
    snapshot: Arc<Vec<Arc<Product>>>,
    filter: CatalogFilter,
}

impl FilteredProducts {
    pub(crate) fn new(snapshot: Arc<Vec<Arc<Product>>>, filter: CatalogFilter) -> Self {
        Self { snapshot, filter }
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Fresh pass over the snapshot. Each call starts from the beginning.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> + '_ {
        self.snapshot.iter().filter(|p| self.filter.matches(p))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn to_vec(&self) -> Vec<Arc<Product>> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a FilteredProducts {
    type Item = &'a Arc<Product>;
    type IntoIter = Box<dyn Iterator<Item = &'a Arc<Product>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

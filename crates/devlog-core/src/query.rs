//! Listing filters, pagination arithmetic and aggregate result types.

use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostStatus};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Sort order of a listing. Both orders are newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostOrder {
    #[default]
    Created,
    RecentlyPublished,
}

/// Criteria for listing posts. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    /// Case-insensitive substring matched against title, excerpt and content.
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<PostStatus>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub order: PostOrder,
}

impl PostFilter {
    /// Filter for the public blog: published posts, latest publication first.
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            order: PostOrder::RecentlyPublished,
            ..Default::default()
        }
    }

    /// The search term with surrounding whitespace removed, if any is left.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Evaluate the filter against a post in memory.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(status) = self.status {
            if post.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &post.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if post.featured != featured {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            let hit = [&post.title, &post.excerpt, &post.content]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a page request, clamping `page >= 1` and `1 <= limit <= MAX_LIMIT`.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip before this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit())
    }
}

/// Number of published posts carrying a category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub name: String,
    pub count: u64,
}

/// Sort counts by descending count, then by name.
pub fn sort_term_counts(counts: &mut [TermCount]) {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

/// Collection-wide totals for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostStats {
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
    pub total_views: u64,
    pub by_category: Vec<TermCount>,
}

//! Campaign domain types — campaigns and the products and blog posts they promote.

use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, CampaignResult};

// ─── Product ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: u32,
    name: String,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ─── Blog Post ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    id: u32,
    name: String,
}

impl BlogPost {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ─── Campaign ──────────────────────────────────────────────────────────────

/// A marketing campaign running over an inclusive calendar date range.
///
/// Products and blog posts can only be appended; nothing is ever removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CampaignRecord")]
pub struct Campaign {
    id: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    products: Vec<Product>,
    blog_posts: Vec<BlogPost>,
}

/// Wire shape of a campaign before the date range has been checked.
#[derive(Deserialize)]
struct CampaignRecord {
    id: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    blog_posts: Vec<BlogPost>,
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = CampaignError;

    fn try_from(record: CampaignRecord) -> CampaignResult<Self> {
        Campaign::with_items(
            record.id,
            record.start_date,
            record.end_date,
            record.products,
            record.blog_posts,
        )
    }
}

impl Campaign {
    /// Create an empty campaign. Fails if `end_date` is before `start_date`.
    pub fn new(id: u32, start_date: NaiveDate, end_date: NaiveDate) -> CampaignResult<Self> {
        Self::with_items(id, start_date, end_date, Vec::new(), Vec::new())
    }

    /// Create a campaign pre-seeded with products and blog posts.
    pub fn with_items(
        id: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        products: Vec<Product>,
        blog_posts: Vec<BlogPost>,
    ) -> CampaignResult<Self> {
        if end_date < start_date {
            return Err(CampaignError::InvalidCampaign {
                id,
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            id,
            start_date,
            end_date,
            products,
            blog_posts,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn blog_posts(&self) -> &[BlogPost] {
        &self.blog_posts
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn add_blog_post(&mut self, blog_post: BlogPost) {
        self.blog_posts.push(blog_post);
    }

    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }

    pub fn has_blog_posts(&self) -> bool {
        !self.blog_posts.is_empty()
    }

    /// Product ids in insertion order, duplicates kept.
    pub fn product_ids(&self) -> Vec<u32> {
        self.products.iter().map(Product::id).collect()
    }

    /// Blog post ids in insertion order, duplicates kept.
    pub fn blog_post_ids(&self) -> Vec<u32> {
        self.blog_posts.iter().map(BlogPost::id).collect()
    }

    /// Approximates "the date range crosses a weekend" as
    /// `span_days + start_weekday > 6`, with weekdays counted from Sunday = 0.
    ///
    /// This is not an exact weekend test: a range starting on Sunday and
    /// ending on the following Saturday yields `0 + 6` and is not flagged.
    /// Callers rely on this exact formula, so keep it as is.
    pub fn includes_weekend(&self) -> bool {
        let span_days = self
            .end_date
            .signed_duration_since(self.start_date)
            .num_days()
            .unsigned_abs();
        let start_weekday = u64::from(self.start_date.weekday().num_days_from_sunday());

        span_days + start_weekday > 6
    }

    /// True when both campaigns share at least one product id or blog post id.
    pub fn has_overlapping_elements(&self, other: &Campaign) -> bool {
        intersects(&self.product_ids(), &other.product_ids())
            || intersects(&self.blog_post_ids(), &other.blog_post_ids())
    }

    /// Closed-interval date overlap; touching boundaries count.
    pub fn dates_overlap(&self, other: &Campaign) -> bool {
        other.start_date <= self.end_date && self.start_date <= other.end_date
    }
}

// ─── Batch loading ─────────────────────────────────────────────────────────

/// Parse a JSON array of campaigns, keeping their order.
pub fn parse_batch(raw: &str) -> CampaignResult<Vec<Campaign>> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and parse a JSON array of campaigns from a file.
pub fn load_batch(path: &Path) -> CampaignResult<Vec<Campaign>> {
    let raw = std::fs::read_to_string(path)?;
    parse_batch(&raw)
}

fn intersects(left: &[u32], right: &[u32]) -> bool {
    let left: HashSet<u32> = left.iter().copied().collect();
    right.iter().any(|id| left.contains(id))
}

//! Start rules for campaigns.

use campaign_core::Campaign;
use serde::Serialize;

/// Why a candidate was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum RejectionReason {
    /// Has blog posts and its date span includes a weekend.
    WeekendBlogPosts,
    /// Shares a product or blog post with a started campaign whose dates overlap.
    SharedElements { conflicting_id: u32 },
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::WeekendBlogPosts => "weekend_blog_posts",
            RejectionReason::SharedElements { .. } => "shared_elements",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectionReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Stateless evaluator for the two start rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignValidator;

impl CampaignValidator {
    pub fn new() -> Self {
        Self
    }

    /// Campaigns without blog posts always pass; campaigns with blog posts
    /// pass only if their span does not include a weekend.
    pub fn validate_blog_posts(&self, campaign: &Campaign) -> bool {
        if campaign.has_blog_posts() {
            return !campaign.includes_weekend();
        }

        true
    }

    /// Passes unless the first started campaign whose dates overlap the
    /// candidate shares a product or blog post with it.
    ///
    /// Only that first match (in `started` order) is consulted; later
    /// started campaigns with overlapping dates are not compared.
    pub fn validate_overlap<'a, I>(&self, started: I, campaign: &Campaign) -> bool
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        match first_date_overlap(started, campaign) {
            Some(matched) => !campaign.has_overlapping_elements(matched),
            None => true,
        }
    }

    /// Runs the blog post rule, then the overlap rule, and reports which one failed.
    pub fn evaluate<'a, I>(&self, started: I, campaign: &Campaign) -> Verdict
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        if !self.validate_blog_posts(campaign) {
            return Verdict::Reject(RejectionReason::WeekendBlogPosts);
        }

        match first_date_overlap(started, campaign) {
            Some(matched) if campaign.has_overlapping_elements(matched) => {
                Verdict::Reject(RejectionReason::SharedElements {
                    conflicting_id: matched.id(),
                })
            }
            _ => Verdict::Accept,
        }
    }
}

fn first_date_overlap<'a, I>(started: I, campaign: &Campaign) -> Option<&'a Campaign>
where
    I: IntoIterator<Item = &'a Campaign>,
{
    started
        .into_iter()
        .find(|candidate| candidate.dates_overlap(campaign))
}

/// Whether the runner applies the start rules at all.
#[derive(Debug, Clone, Copy)]
pub enum ValidationMode {
    Validated(CampaignValidator),
    /// Every candidate is started unconditionally.
    Unvalidated,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Validated(CampaignValidator::new())
    }
}

impl ValidationMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::default()
        } else {
            ValidationMode::Unvalidated
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, ValidationMode::Validated(_))
    }

    pub fn evaluate<'a, I>(&self, started: I, campaign: &Campaign) -> Verdict
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        match self {
            ValidationMode::Validated(validator) => validator.evaluate(started, campaign),
            ValidationMode::Unvalidated => Verdict::Accept,
        }
    }
}

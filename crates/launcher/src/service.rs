//! Campaign runner — owns the candidate list and the started list.

use campaign_core::Campaign;
use serde::Serialize;
use tracing::{debug, info};

use crate::validator::{RejectionReason, ValidationMode, Verdict};

/// Lifecycle of a single candidate. `Started` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CandidateState {
    Pending,
    Started,
    Rejected { reason: RejectionReason },
}

#[derive(Debug, Clone)]
struct Candidate {
    campaign: Campaign,
    state: CandidateState,
}

/// Counts for a single call to [`CampaignService::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub evaluated: usize,
    pub started: usize,
    pub rejected: usize,
}

/// Sequential, greedy campaign runner.
///
/// Candidates keep their insertion order. Rejected campaigns drop out of the
/// candidate list; started campaigns stay listed and are also recorded, in
/// acceptance order, in the started list.
#[derive(Debug)]
pub struct CampaignService {
    candidates: Vec<Candidate>,
    /// Indices into `candidates`, in acceptance order.
    started: Vec<usize>,
    mode: ValidationMode,
}

impl CampaignService {
    pub fn new(campaigns: Vec<Campaign>, mode: ValidationMode) -> Self {
        let mut service = Self {
            candidates: Vec::with_capacity(campaigns.len()),
            started: Vec::new(),
            mode,
        };
        for campaign in campaigns {
            service.add_campaign(campaign);
        }
        service
    }

    /// Runner with the start rules applied.
    pub fn validated(campaigns: Vec<Campaign>) -> Self {
        Self::new(campaigns, ValidationMode::default())
    }

    /// Runner that starts every candidate.
    pub fn unvalidated(campaigns: Vec<Campaign>) -> Self {
        Self::new(campaigns, ValidationMode::Unvalidated)
    }

    pub fn mode(&self) -> &ValidationMode {
        &self.mode
    }

    pub fn add_campaign(&mut self, campaign: Campaign) {
        self.candidates.push(Candidate {
            campaign,
            state: CandidateState::Pending,
        });
    }

    /// Evaluates every pending candidate once, in insertion order.
    ///
    /// Decisions are final: a second call only looks at campaigns added
    /// since the previous one, so calling it twice in a row is a no-op.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        for index in 0..self.candidates.len() {
            if self.candidates[index].state != CandidateState::Pending {
                continue;
            }

            let campaign = &self.candidates[index].campaign;
            let started = self.started.iter().map(|&i| &self.candidates[i].campaign);
            let verdict = self.mode.evaluate(started, campaign);
            let campaign_id = campaign.id();
            summary.evaluated += 1;

            match verdict {
                Verdict::Accept => {
                    self.candidates[index].state = CandidateState::Started;
                    self.started.push(index);
                    summary.started += 1;
                    metrics::counter!("launcher.campaigns.started").increment(1);
                    debug!(campaign_id, "Campaign started");
                }
                Verdict::Reject(reason) => {
                    self.candidates[index].state = CandidateState::Rejected { reason };
                    summary.rejected += 1;
                    metrics::counter!("launcher.campaigns.rejected", "reason" => reason.as_str())
                        .increment(1);
                    debug!(campaign_id, reason = reason.as_str(), "Campaign rejected");
                }
            }
        }

        info!(
            evaluated = summary.evaluated,
            started = summary.started,
            rejected = summary.rejected,
            validated = self.mode.is_validated(),
            "Campaign run complete"
        );

        summary
    }

    /// Started campaigns in acceptance order.
    pub fn started_campaigns(&self) -> Vec<&Campaign> {
        self.started
            .iter()
            .map(|&i| &self.candidates[i].campaign)
            .collect()
    }

    /// Campaigns not rejected so far, in insertion order. Includes started ones.
    pub fn candidates(&self) -> Vec<&Campaign> {
        self.candidates
            .iter()
            .filter(|c| !matches!(c.state, CandidateState::Rejected { .. }))
            .map(|c| &c.campaign)
            .collect()
    }

    pub fn rejected_campaigns(&self) -> Vec<(&Campaign, RejectionReason)> {
        self.candidates
            .iter()
            .filter_map(|c| match c.state {
                CandidateState::Rejected { reason } => Some((&c.campaign, reason)),
                _ => None,
            })
            .collect()
    }

    /// State of the first candidate with the given campaign id.
    pub fn state_of(&self, campaign_id: u32) -> Option<CandidateState> {
        self.candidates
            .iter()
            .find(|c| c.campaign.id() == campaign_id)
            .map(|c| c.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::{BlogPost, Product};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn campaign(id: u32, start: NaiveDate, end: NaiveDate) -> Campaign {
        Campaign::new(id, start, end).unwrap()
    }

    fn ids(campaigns: &[&Campaign]) -> Vec<u32> {
        campaigns.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_empty_run() {
        let mut service = CampaignService::validated(Vec::new());
        assert_eq!(service.run(), RunSummary::default());
        assert!(service.started_campaigns().is_empty());
    }

    #[test]
    fn test_states_after_run() {
        let mut weekend = campaign(1, date(2023, 6, 2), date(2023, 6, 4));
        weekend.add_blog_post(BlogPost::new(1, "Blog Post"));
        let mut weekday = campaign(2, date(2023, 6, 5), date(2023, 6, 6));
        weekday.add_product(Product::new(1, "Product"));

        let mut service = CampaignService::validated(vec![weekend, weekday]);
        assert_eq!(service.state_of(1), Some(CandidateState::Pending));

        let summary = service.run();
        assert_eq!(
            summary,
            RunSummary {
                evaluated: 2,
                started: 1,
                rejected: 1
            }
        );
        assert_eq!(
            service.state_of(1),
            Some(CandidateState::Rejected {
                reason: RejectionReason::WeekendBlogPosts
            })
        );
        assert_eq!(service.state_of(2), Some(CandidateState::Started));
        assert_eq!(service.state_of(99), None);
    }

    #[test]
    fn test_accepted_campaigns_remain_candidates() {
        let mut first = campaign(1, date(2023, 6, 1), date(2023, 6, 30));
        first.add_product(Product::new(1, "Product"));
        let mut second = campaign(2, date(2023, 6, 15), date(2023, 7, 15));
        second.add_product(Product::new(1, "Product"));

        let mut service = CampaignService::validated(vec![first, second]);
        service.run();

        assert_eq!(ids(&service.candidates()), vec![1]);
        assert_eq!(ids(&service.started_campaigns()), vec![1]);
        let rejected = service.rejected_campaigns();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0.id(), 2);
        assert_eq!(
            rejected[0].1,
            RejectionReason::SharedElements { conflicting_id: 1 }
        );
    }

    #[test]
    fn test_later_candidates_checked_against_earlier_starts() {
        let mut service = CampaignService::validated(Vec::new());
        let mut first = campaign(1, date(2023, 6, 1), date(2023, 6, 30));
        first.add_product(Product::new(7, "Product"));
        service.add_campaign(first);
        service.run();

        let mut late = campaign(2, date(2023, 6, 20), date(2023, 6, 22));
        late.add_product(Product::new(7, "Product"));
        service.add_campaign(late);

        let summary = service.run();
        assert_eq!(summary.evaluated, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(ids(&service.started_campaigns()), vec![1]);
    }

    #[test]
    fn test_unvalidated_mode_keeps_order() {
        let mut a = campaign(3, date(2023, 6, 2), date(2023, 6, 4));
        a.add_blog_post(BlogPost::new(1, "Blog Post"));
        let mut b = campaign(1, date(2023, 6, 1), date(2023, 6, 30));
        b.add_blog_post(BlogPost::new(1, "Blog Post"));

        let mut service = CampaignService::unvalidated(vec![a, b]);
        assert!(!service.mode().is_validated());
        let summary = service.run();
        assert_eq!(summary.started, 2);
        assert_eq!(ids(&service.started_campaigns()), vec![3, 1]);
    }
}

//! Campaign launcher — decides which candidate campaigns may start.
//!
//! A single greedy pass over the candidates, in order: each one is checked
//! against the blog post weekend rule and the date overlap rule, then either
//! started or rejected for good.

pub mod service;
pub mod validator;

pub use service::{CampaignService, CandidateState, RunSummary};
pub use validator::{CampaignValidator, RejectionReason, ValidationMode, Verdict};

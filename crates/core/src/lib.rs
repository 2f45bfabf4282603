pub mod config;
pub mod error;
pub mod models;

pub use config::RunnerConfig;
pub use error::{CampaignError, CampaignResult};
pub use models::{load_batch, parse_batch, BlogPost, Campaign, Product};

//! Storage interface consumed by the payment flows.
//!
//! The real tables live in the host CRM's database layer; the flows only
//! depend on this trait object. [`MockDb`] backs the test suites.

pub mod mock_db;

use crm_domain_models::{
    blacklist::BlacklistInterface,
    contributions::{ContributionInterface, RecurringContributionInterface},
};

pub use mock_db::MockDb;

/// Combined storage interface the flows are handed.
pub trait StorageInterface:
    ContributionInterface + RecurringContributionInterface + BlacklistInterface + Send + Sync + 'static
{
}

impl StorageInterface for MockDb {}

//! In-memory storage implementation for tests and local development.

use std::sync::{Mutex, PoisonError};

use common_utils::errors::CustomResult;
use crm_domain_models::{
    blacklist::{BlacklistInterface, IpRangeRule, UserAgentRule},
    contributions::{
        Contribution, ContributionInterface, RecurringContribution,
        RecurringContributionInterface,
    },
    errors::StorageError,
};
use error_stack::report;

/// In-memory stand-in for the CRM's contribution and blacklist tables.
#[derive(Default)]
pub struct MockDb {
    contributions: Mutex<Vec<Contribution>>,
    recurring_contributions: Mutex<Vec<RecurringContribution>>,
    ip_range_rules: Mutex<Vec<IpRangeRule>>,
    user_agent_rules: Mutex<Vec<UserAgentRule>>,
}

impl MockDb {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an IP range rule.
    pub fn add_ip_range_rule(&self, rule: IpRangeRule) {
        self.ip_range_rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rule);
    }

    /// Seed a user-agent rule.
    pub fn add_user_agent_rule(&self, rule: UserAgentRule) {
        self.user_agent_rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rule);
    }
}

impl ContributionInterface for MockDb {
    fn find_contribution_by_invoice_id(
        &self,
        invoice_id: &str,
    ) -> CustomResult<Option<Contribution>, StorageError> {
        Ok(self
            .contributions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|contribution| contribution.invoice_id == invoice_id)
            .cloned())
    }

    fn insert_contribution(
        &self,
        contribution: Contribution,
    ) -> CustomResult<Contribution, StorageError> {
        self.contributions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(contribution.clone());
        Ok(contribution)
    }
}

impl RecurringContributionInterface for MockDb {
    fn find_recurring_contribution_by_id(
        &self,
        id: i64,
    ) -> CustomResult<RecurringContribution, StorageError> {
        self.recurring_contributions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|recurring| recurring.id == id)
            .cloned()
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "recurring contribution {id}"
                )))
            })
    }

    fn insert_recurring_contribution(
        &self,
        recurring: RecurringContribution,
    ) -> CustomResult<RecurringContribution, StorageError> {
        self.recurring_contributions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recurring.clone());
        Ok(recurring)
    }

    fn update_recurring_processor_id(
        &self,
        id: i64,
        processor_id: String,
    ) -> CustomResult<RecurringContribution, StorageError> {
        let mut recurring_contributions = self
            .recurring_contributions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match recurring_contributions
            .iter_mut()
            .find(|recurring| recurring.id == id)
        {
            Some(recurring) => {
                recurring.processor_id = Some(processor_id);
                Ok(recurring.clone())
            }
            None => Err(report!(StorageError::ValueNotFound(format!(
                "recurring contribution {id}"
            )))),
        }
    }
}

impl BlacklistInterface for MockDb {
    fn list_ip_range_rules(&self) -> CustomResult<Vec<IpRangeRule>, StorageError> {
        Ok(self
            .ip_range_rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn list_user_agent_rules(&self) -> CustomResult<Vec<UserAgentRule>, StorageError> {
        Ok(self
            .user_agent_rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

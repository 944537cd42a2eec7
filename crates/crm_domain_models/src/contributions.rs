//! Contribution records and their storage interfaces.
//!
//! The contribution tables are owned by the host CRM; this module only
//! needs an existence check for duplicate detection and a single write to
//! attach the gateway billing id to a recurring contribution.

use common_utils::{errors::CustomResult, types::MinorUnit};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{errors::StorageError, payments::FrequencyUnit};

/// A completed (or in-flight) contribution row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Storage id.
    pub id: i64,
    /// Invoice id the submission carried; the duplicate-detection key.
    pub invoice_id: String,
    /// Gateway transaction id once charged.
    pub trxn_id: Option<String>,
    /// Contribution amount in minor units.
    pub total_amount: MinorUnit,
    /// Row creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A recurring-contribution row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurringContribution {
    /// Storage id, referenced by the transaction request.
    pub id: i64,
    /// Gateway-issued billing id, once the subscription is stored.
    pub processor_id: Option<String>,
    /// Per-cycle amount in minor units.
    pub amount: MinorUnit,
    /// Billing cycle unit.
    pub frequency_unit: FrequencyUnit,
    /// Billing cycle interval.
    pub frequency_interval: u32,
    /// Number of installments; `None` when open-ended.
    pub installments: Option<u32>,
    /// Row creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Read access to the contributions table.
pub trait ContributionInterface {
    /// Find a contribution by its invoice id, if any exists.
    fn find_contribution_by_invoice_id(
        &self,
        invoice_id: &str,
    ) -> CustomResult<Option<Contribution>, StorageError>;

    /// Insert a contribution row.
    fn insert_contribution(
        &self,
        contribution: Contribution,
    ) -> CustomResult<Contribution, StorageError>;
}

/// Access to the recurring-contributions table.
pub trait RecurringContributionInterface {
    /// Find a recurring contribution by storage id.
    fn find_recurring_contribution_by_id(
        &self,
        id: i64,
    ) -> CustomResult<RecurringContribution, StorageError>;

    /// Insert a recurring-contribution row.
    fn insert_recurring_contribution(
        &self,
        recurring: RecurringContribution,
    ) -> CustomResult<RecurringContribution, StorageError>;

    /// Attach the gateway billing id to a recurring contribution.
    fn update_recurring_processor_id(
        &self,
        id: i64,
        processor_id: String,
    ) -> CustomResult<RecurringContribution, StorageError>;
}

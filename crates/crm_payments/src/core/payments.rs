//! Payment flows: one-time sale and the subscription lifecycle.
//!
//! Data moves strictly one way through a flow: field mapping, the
//! extension hook, duplicate detection, the local guard, the gateway call,
//! reply classification. There is no branching back and no retry anywhere;
//! every failure returns immediately as a value.

pub mod guard;

use common_utils::ext_traits::OptionExt;
use crm_connectors::connectors::trustcommerce::{
    transformers::{self, TclinkRequest},
    Trustcommerce,
};
use crm_domain_models::{
    gateway::GatewayReply,
    payments::{fields, ClientInfo, FrequencyUnit, PaymentsResponse, TransactionRequest},
};
use error_stack::{report, ResultExt};
use tracing::instrument;

use crate::{
    core::errors::{PaymentError, PaymentResponse, StorageErrorExt},
    SessionState,
};

/// Extension point offered the caller's params and the built gateway
/// params, with the ability to mutate the latter in place.
///
/// Runs after field mapping and before the duplicate and blacklist checks.
pub trait PaymentParamsHook: Send + Sync {
    /// Inspect and optionally adjust the outbound gateway parameters.
    fn alter_gateway_params(&self, request: &TransactionRequest, gateway_params: &mut TclinkRequest);
}

/// Charge a one-time (or initial recurring) contribution.
#[instrument(skip_all)]
pub fn do_direct_payment(
    state: &SessionState,
    processor: &Trustcommerce,
    request: &TransactionRequest,
    client: &ClientInfo,
) -> PaymentResponse<PaymentsResponse> {
    let mut tclink = processor.build_sale_request(request);

    if request.is_truthy(fields::IS_RECUR) {
        let unit = request
            .text(fields::FREQUENCY_UNIT)
            .parse::<FrequencyUnit>()
            .map_err(|_| {
                report!(PaymentError::PolicyViolation(
                    "Recurring contribution is missing a valid billing frequency unit."
                        .to_string(),
                ))
            })?;
        let payments = request
            .integer(fields::FREQUENCY_INTERVAL)
            .and_then(|count| u32::try_from(count).ok());
        tclink.apply_recurrence(unit, payments);
    }

    for hook in &state.hooks {
        hook.alter_gateway_params(request, &mut tclink);
    }

    // The gateway does not refuse duplicates itself, so a resubmitted form
    // must be caught here before it is charged again.
    if let Some(ticket) = tclink.ticket.clone() {
        let existing = state
            .store
            .find_contribution_by_invoice_id(&ticket)
            .to_payment_failed_response()?;
        if existing.is_some() {
            return Err(report!(PaymentError::DuplicateTransaction));
        }
    }

    let reply = match guard::check_blacklist(state.store.as_ref(), client, tclink.amount)? {
        Some(hit) => {
            tracing::warn!(
                ?hit,
                params = ?tclink.redacted_param_map(),
                "transaction blocked by local guard"
            );
            guard::throttle(&state.guard);
            Some(GatewayReply::Blacklisted)
        }
        None => processor.submit(&tclink),
    };

    let approval = transformers::classify_transport_reply(reply)?;

    let trxn_id = approval
        .transid
        .get_required_value("transid")
        .change_context(PaymentError::GatewayUnavailable)?;

    if let Some(billingid) = &approval.billingid {
        if let Some(recur_id) = request.integer(fields::CONTRIBUTION_RECUR_ID) {
            state
                .store
                .update_recurring_processor_id(recur_id, billingid.clone())
                .to_payment_failed_response()?;
        }
    }

    Ok(PaymentsResponse {
        trxn_id,
        gross_amount: tclink.amount.unwrap_or_default().to_major_unit(),
        recurr_profile_id: approval.billingid,
    })
}

/// Update the stored card and billing address of a subscription.
///
/// Returns the caller-facing success message.
#[instrument(skip_all)]
pub fn update_subscription_billing_info(
    state: &SessionState,
    processor: &Trustcommerce,
    request: &TransactionRequest,
) -> PaymentResponse<String> {
    let mut tclink = processor.build_billing_update_request(request);

    for hook in &state.hooks {
        hook.alter_gateway_params(request, &mut tclink);
    }

    transformers::classify_transport_reply(processor.submit(&tclink))?;

    Ok(format!(
        "Successfully updated billing id {}",
        tclink.billingid.unwrap_or_default()
    ))
}

/// Cancel a subscription by its gateway billing id.
#[instrument(skip_all)]
pub fn cancel_subscription(
    processor: &Trustcommerce,
    request: &TransactionRequest,
) -> PaymentResponse<()> {
    let tclink = processor.build_unstore_request(request.text(fields::SUBSCRIPTION_ID));
    transformers::classify_transport_reply(processor.submit(&tclink)).map(|_| ())
}

/// Change the per-cycle amount and/or installment count of a subscription.
#[instrument(skip_all)]
pub fn change_subscription_amount(
    processor: &Trustcommerce,
    request: &TransactionRequest,
) -> PaymentResponse<()> {
    let tclink = processor.build_amount_change_request(request);
    transformers::classify_transport_reply(processor.submit(&tclink)).map(|_| ())
}

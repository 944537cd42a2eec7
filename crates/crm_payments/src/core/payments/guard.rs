//! Local guard: pre-flight blacklist checks run before any gateway contact.
//!
//! Three independent checks, short-circuiting in priority order: source IP
//! against the persisted range rules, user-agent against the persisted
//! pattern rules, and the parameter heuristic. A blocked request never
//! reaches the transport; the flow synthesizes a blacklisted reply and
//! delays the response so abusive clients get neither their answer quickly
//! nor an instantly fingerprintable rejection.

use std::{net::Ipv4Addr, ops::RangeInclusive, thread, time::Duration};

use common_utils::{errors::CustomResult, types::MinorUnit};
use crm_domain_models::payments::ClientInfo;
use rand::Rng;
use regex::Regex;

use crate::{
    core::errors::{PaymentError, StorageErrorExt},
    db::StorageInterface,
};

/// Gateway-amount value used operationally to trigger the blacklist path
/// from a test transaction. Not a fraud signal.
const TEST_BLACKLIST_AMOUNT: i64 = 101;

/// Guard tuning knobs.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Bounds, in whole seconds, of the randomized delay applied to
    /// blocked requests.
    pub throttle_secs: RangeInclusive<u64>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { throttle_secs: 1..=10 }
    }
}

impl GuardConfig {
    /// No delay on blocked requests; used by tests.
    pub fn without_throttle() -> Self {
        Self { throttle_secs: 0..=0 }
    }
}

/// Which check blocked the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistHit {
    /// Source address matched a persisted IP range rule.
    IpRule {
        /// Matching rule id.
        rule_id: i64,
    },
    /// The source address form is not supported by the range rules (IPv6)
    /// and is blocked unconditionally.
    UnsupportedAddress,
    /// User-agent matched a persisted pattern rule.
    UserAgentRule {
        /// Matching rule id.
        rule_id: i64,
    },
    /// The parameter heuristic fired.
    SuspiciousAmount,
}

/// Run the blacklist checks for one candidate transaction.
pub fn check_blacklist(
    store: &dyn StorageInterface,
    client: &ClientInfo,
    gateway_amount: Option<MinorUnit>,
) -> CustomResult<Option<BlacklistHit>, PaymentError> {
    if let Some(hit) = check_ip(store, client)? {
        return Ok(Some(hit));
    }
    if let Some(hit) = check_user_agent(store, client)? {
        return Ok(Some(hit));
    }
    if gateway_amount.map(MinorUnit::get_amount_as_i64) == Some(TEST_BLACKLIST_AMOUNT) {
        tracing::warn!(
            client_ip = %client.remote_addr,
            "transaction blacklisted by parameter heuristic"
        );
        return Ok(Some(BlacklistHit::SuspiciousAmount));
    }
    Ok(None)
}

fn check_ip(
    store: &dyn StorageInterface,
    client: &ClientInfo,
) -> CustomResult<Option<BlacklistHit>, PaymentError> {
    let addr = client.remote_addr.as_str();

    // The range rules only cover IPv4; anything with a colon is blocked
    // outright until the tables learn IPv6.
    if addr.contains(':') {
        tracing::warn!(client_ip = %addr, "IPv6 source address, treating as blacklisted");
        return Ok(Some(BlacklistHit::UnsupportedAddress));
    }

    let ip = match addr.parse::<Ipv4Addr>() {
        Ok(parsed) => u32::from(parsed),
        Err(_) => {
            tracing::warn!(client_ip = %addr, "unparseable source address, skipping IP blacklist");
            return Ok(None);
        }
    };

    for rule in store.list_ip_range_rules().to_payment_failed_response()? {
        if rule.contains(ip) {
            tracing::warn!(
                rule_id = rule.id,
                client_ip = %addr,
                agent = %client.user_agent,
                "blacklisted by IP rule"
            );
            return Ok(Some(BlacklistHit::IpRule { rule_id: rule.id }));
        }
    }
    Ok(None)
}

fn check_user_agent(
    store: &dyn StorageInterface,
    client: &ClientInfo,
) -> CustomResult<Option<BlacklistHit>, PaymentError> {
    for rule in store.list_user_agent_rules().to_payment_failed_response()? {
        let pattern = match Regex::new(&rule.name) {
            Ok(pattern) => pattern,
            Err(error) => {
                tracing::warn!(rule_id = rule.id, %error, "skipping unparseable user-agent rule");
                continue;
            }
        };
        if pattern.is_match(&client.user_agent) {
            tracing::warn!(
                rule_id = rule.id,
                client_ip = %client.remote_addr,
                agent = %client.user_agent,
                "blacklisted by user-agent rule"
            );
            return Ok(Some(BlacklistHit::UserAgentRule { rule_id: rule.id }));
        }
    }
    Ok(None)
}

/// Delay a blocked request by a random 1-10 seconds (per configuration).
///
/// Blocks the calling thread on purpose; this is a throttling mechanism,
/// not a cooperative yield.
pub fn throttle(config: &GuardConfig) {
    let secs = rand::thread_rng().gen_range(config.throttle_secs.clone());
    if secs > 0 {
        thread::sleep(Duration::from_secs(secs));
    }
}

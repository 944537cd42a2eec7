//! Blacklist rules and their storage interface.
//!
//! Rules are externally owned (typically maintained alongside fail2ban) and
//! read-only here; each request scans the full table.

use common_utils::errors::CustomResult;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

/// An IPv4 range rule, bounds stored as unsigned 32-bit integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRangeRule {
    /// Rule id, referenced from guard logs.
    pub id: i64,
    /// Inclusive lower bound.
    pub start: u32,
    /// Inclusive upper bound.
    pub end: u32,
}

impl IpRangeRule {
    /// Inclusive membership test.
    pub fn contains(&self, ip: u32) -> bool {
        self.start <= ip && ip <= self.end
    }
}

/// A user-agent pattern rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentRule {
    /// Rule id, referenced from guard logs.
    pub id: i64,
    /// Regular-expression pattern matched against the user-agent header.
    pub name: String,
}

/// Read access to the blacklist tables.
pub trait BlacklistInterface {
    /// All IP range rules.
    fn list_ip_range_rules(&self) -> CustomResult<Vec<IpRangeRule>, StorageError>;

    /// All user-agent pattern rules.
    fn list_user_agent_rules(&self) -> CustomResult<Vec<UserAgentRule>, StorageError>;
}

//! ============================================================================
//! Membership Tracker - tagged membership results
//! ============================================================================
//! Every balance query is tagged with the account it was issued for and a
//! generation number. A completion is applied only if its tag is still the
//! current one, so a slow query for a previous account (or one that lands
//! after a disconnect) can never overwrite the present state.
//! ============================================================================

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::checker::TokenBalanceReader;
use super::types::MembershipStatus;
use crate::types::{Address, BalanceError};

/// Identity of one membership query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTag {
    account: String,
    generation: u64,
}

impl QueryTag {
    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A detached balance query, runnable without borrowing the controller
pub struct MembershipQuery {
    tag: QueryTag,
    reader: Arc<dyn TokenBalanceReader>,
    contract: Address,
    owner: Address,
    token_id: String,
}

impl MembershipQuery {
    pub fn new(
        tag: QueryTag,
        reader: Arc<dyn TokenBalanceReader>,
        contract: Address,
        owner: Address,
        token_id: String,
    ) -> Self {
        Self {
            tag,
            reader,
            contract,
            owner,
            token_id,
        }
    }

    pub fn tag(&self) -> &QueryTag {
        &self.tag
    }

    pub async fn run(self) -> MembershipOutcome {
        let result = self
            .reader
            .balance_of(&self.contract, &self.owner, &self.token_id)
            .await;
        MembershipOutcome {
            tag: self.tag,
            result,
        }
    }
}

/// Result of a membership query, still carrying its tag
#[derive(Debug, Clone)]
pub struct MembershipOutcome {
    pub tag: QueryTag,
    pub result: Result<u128, BalanceError>,
}

/// Owns the membership flag and the tag of the query allowed to update it
#[derive(Debug, Default)]
pub struct MembershipTracker {
    current: Option<QueryTag>,
    next_generation: u64,
    status: MembershipStatus,
    balance: Option<u128>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query for `account`; any earlier query becomes stale
    pub fn begin(&mut self, account: &Address) -> QueryTag {
        self.next_generation += 1;
        let tag = QueryTag {
            account: account.canonical(),
            generation: self.next_generation,
        };

        debug!("Membership query #{} for {}", tag.generation, tag.account);
        self.current = Some(tag.clone());
        self.status = MembershipStatus::Checking;
        self.balance = None;
        tag
    }

    /// Apply a completed query. Returns false when the result was stale and dropped.
    pub fn complete(&mut self, outcome: &MembershipOutcome, required_count: u64) -> bool {
        if self.current.as_ref() != Some(&outcome.tag) {
            debug!(
                "Discarding stale membership result #{} for {}",
                outcome.tag.generation, outcome.tag.account
            );
            return false;
        }

        match &outcome.result {
            Ok(balance) => {
                self.balance = Some(*balance);
                self.status = MembershipStatus::from_balance(*balance, required_count);
                info!(
                    "Membership for {}: {} (balance {}, need {})",
                    outcome.tag.account,
                    self.status.display_name(),
                    balance,
                    required_count
                );
            }
            Err(e) => {
                // Fail closed
                warn!("Membership check failed for {}: {}", outcome.tag.account, e);
                self.balance = None;
                self.status = MembershipStatus::Unavailable;
            }
        }
        true
    }

    /// Drop the session: flag false, in-flight query invalidated
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            debug!("Membership reset");
        }
        self.status = MembershipStatus::Disconnected;
        self.balance = None;
    }

    pub fn is_member(&self) -> bool {
        self.status.is_member()
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn balance(&self) -> Option<u128> {
        self.balance
    }

    pub fn is_checking(&self) -> bool {
        self.status == MembershipStatus::Checking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn addr(last: &str) -> Address {
        Address::parse(&format!("0x{:0>40}", last)).unwrap()
    }

    fn outcome(tag: &QueryTag, result: Result<u128, BalanceError>) -> MembershipOutcome {
        MembershipOutcome {
            tag: tag.clone(),
            result,
        }
    }

    struct FixedBalance(u128);

    #[async_trait]
    impl TokenBalanceReader for FixedBalance {
        async fn balance_of(
            &self,
            _contract: &Address,
            _owner: &Address,
            _token_id: &str,
        ) -> Result<u128, BalanceError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_initial_state() {
        let tracker = MembershipTracker::new();
        assert!(!tracker.is_member());
        assert_eq!(tracker.status(), MembershipStatus::Disconnected);
        assert_eq!(tracker.balance(), None);
    }

    #[test]
    fn test_member_result_applied() {
        let mut tracker = MembershipTracker::new();
        let tag = tracker.begin(&addr("a1"));
        assert!(tracker.is_checking());

        assert!(tracker.complete(&outcome(&tag, Ok(1)), 1));
        assert!(tracker.is_member());
        assert_eq!(tracker.balance(), Some(1));
    }

    #[test]
    fn test_below_threshold() {
        let mut tracker = MembershipTracker::new();
        let tag = tracker.begin(&addr("a1"));
        assert!(tracker.complete(&outcome(&tag, Ok(0)), 1));
        assert!(!tracker.is_member());
        assert_eq!(tracker.status(), MembershipStatus::NotMember);
    }

    #[test]
    fn test_error_fails_closed() {
        let mut tracker = MembershipTracker::new();
        let tag = tracker.begin(&addr("a1"));
        let err = BalanceError::Network("timeout".into());
        assert!(tracker.complete(&outcome(&tag, Err(err)), 1));
        assert!(!tracker.is_member());
        assert_eq!(tracker.status(), MembershipStatus::Unavailable);
    }

    #[test]
    fn test_stale_account_discarded() {
        let mut tracker = MembershipTracker::new();
        let old = tracker.begin(&addr("a1"));
        let new = tracker.begin(&addr("b2"));

        assert!(tracker.complete(&outcome(&new, Ok(0)), 1));
        // Late result for the previous account must not flip the flag
        assert!(!tracker.complete(&outcome(&old, Ok(5)), 1));
        assert!(!tracker.is_member());
    }

    #[test]
    fn test_same_account_newer_generation_wins() {
        let mut tracker = MembershipTracker::new();
        let first = tracker.begin(&addr("a1"));
        let second = tracker.begin(&addr("a1"));
        assert_eq!(first.account(), second.account());
        assert!(second.generation() > first.generation());

        assert!(!tracker.complete(&outcome(&first, Ok(1)), 1));
        assert!(tracker.is_checking());
    }

    #[test]
    fn test_result_after_reset_discarded() {
        let mut tracker = MembershipTracker::new();
        let tag = tracker.begin(&addr("a1"));
        tracker.reset();

        assert!(!tracker.complete(&outcome(&tag, Ok(1)), 1));
        assert!(!tracker.is_member());
        assert_eq!(tracker.status(), MembershipStatus::Disconnected);
    }

    #[test]
    fn test_reset_clears_member() {
        let mut tracker = MembershipTracker::new();
        let tag = tracker.begin(&addr("a1"));
        tracker.complete(&outcome(&tag, Ok(3)), 1);
        assert!(tracker.is_member());

        tracker.reset();
        assert!(!tracker.is_member());
        assert_eq!(tracker.balance(), None);
    }

    #[tokio::test]
    async fn test_query_run_keeps_tag() {
        let mut tracker = MembershipTracker::new();
        let owner = addr("a1");
        let tag = tracker.begin(&owner);

        let query = MembershipQuery::new(
            tag.clone(),
            Arc::new(FixedBalance(2)),
            addr("c0"),
            owner,
            "0".into(),
        );
        assert_eq!(query.tag(), &tag);

        let result = query.run().await;
        assert_eq!(result.tag, tag);
        assert!(tracker.complete(&result, 2));
        assert!(tracker.is_member());
    }
}

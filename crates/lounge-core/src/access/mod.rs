//! ============================================================================
//! Access Module - NFT-gated membership
//! ============================================================================
//! Decides whether the connected wallet is a member: it holds at least the
//! required count of the membership token id on the membership contract.
//!
//! The flag computed here only drives what the page shows. The lounge route
//! re-verifies ownership server-side from the signed access message.
//!
//! ## Usage
//! ```rust,ignore
//! use lounge_core::access::{Erc1155BalanceReader, MembershipTracker};
//!
//! let mut tracker = MembershipTracker::new();
//! let tag = tracker.begin(&session.address);
//! // ... run the query, then
//! tracker.complete(&outcome, config.required_count);
//! ```
//! ============================================================================

mod checker;
mod membership;
mod types;

pub use checker::{decode_balance, encode_balance_of, Erc1155BalanceReader, TokenBalanceReader};
pub use membership::{MembershipOutcome, MembershipQuery, MembershipTracker, QueryTag};
pub use types::{u128_from_word, uint256_from_decimal, MembershipStatus, BALANCE_OF_SELECTOR};

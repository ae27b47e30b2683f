//! ============================================================================
//! Access Types - membership status and uint256 word helpers
//! ============================================================================

use serde::{Deserialize, Serialize};

/// ERC-1155 `balanceOf(address,uint256)` selector
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x00, 0xfd, 0xd5, 0x8e];

/// Membership of the connected wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// No wallet session
    #[default]
    Disconnected,
    /// Balance query in flight
    Checking,
    /// Holds at least the required count
    Member,
    /// Holds fewer than the required count
    NotMember,
    /// Balance query failed; treated as not a member
    Unavailable,
}

impl MembershipStatus {
    /// Status for a balance against the required token count
    pub fn from_balance(balance: u128, required_count: u64) -> Self {
        if balance >= u128::from(required_count) {
            MembershipStatus::Member
        } else {
            MembershipStatus::NotMember
        }
    }

    /// The membership flag; only `Member` grants it
    pub fn is_member(&self) -> bool {
        matches!(self, MembershipStatus::Member)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MembershipStatus::Disconnected => "Not connected",
            MembershipStatus::Checking => "Checking",
            MembershipStatus::Member => "Member",
            MembershipStatus::NotMember => "Not a member",
            MembershipStatus::Unavailable => "Unavailable",
        }
    }
}

/// Encode a decimal integer as a big-endian uint256 word.
/// Returns None for non-digits or values above 2^256 - 1.
pub fn uint256_from_decimal(s: &str) -> Option<[u8; 32]> {
    if s.is_empty() {
        return None;
    }

    let mut word = [0u8; 32];
    for c in s.chars() {
        let digit = c.to_digit(10)?;
        // word = word * 10 + digit
        let mut carry = digit;
        for byte in word.iter_mut().rev() {
            let v = u32::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return None;
        }
    }
    Some(word)
}

/// Decode a uint256 word, saturating at `u128::MAX`
pub fn u128_from_word(word: &[u8; 32]) -> u128 {
    if word[..16].iter().any(|b| *b != 0) {
        return u128::MAX;
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    u128::from_be_bytes(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_balance() {
        assert_eq!(MembershipStatus::from_balance(0, 1), MembershipStatus::NotMember);
        assert_eq!(MembershipStatus::from_balance(1, 1), MembershipStatus::Member);
        assert_eq!(MembershipStatus::from_balance(5, 1), MembershipStatus::Member);
        assert_eq!(MembershipStatus::from_balance(2, 3), MembershipStatus::NotMember);
        assert_eq!(MembershipStatus::from_balance(u128::MAX, u64::MAX), MembershipStatus::Member);
    }

    #[test]
    fn test_threshold_sweep() {
        for required in 1..=5u64 {
            for balance in 0..=10u128 {
                let status = MembershipStatus::from_balance(balance, required);
                assert_eq!(status.is_member(), balance >= u128::from(required));
            }
        }
    }

    #[test]
    fn test_only_member_is_member() {
        assert!(MembershipStatus::Member.is_member());
        assert!(!MembershipStatus::Disconnected.is_member());
        assert!(!MembershipStatus::Checking.is_member());
        assert!(!MembershipStatus::NotMember.is_member());
        assert!(!MembershipStatus::Unavailable.is_member());
    }

    #[test]
    fn test_uint256_from_decimal() {
        assert_eq!(uint256_from_decimal("0"), Some([0u8; 32]));

        let word = uint256_from_decimal("258").unwrap();
        assert_eq!(word[30], 1);
        assert_eq!(word[31], 2);

        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(uint256_from_decimal(max), Some([0xff; 32]));

        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(uint256_from_decimal(over), None);

        assert_eq!(uint256_from_decimal(""), None);
        assert_eq!(uint256_from_decimal("12a"), None);
    }

    #[test]
    fn test_u128_from_word() {
        let mut word = [0u8; 32];
        word[31] = 7;
        assert_eq!(u128_from_word(&word), 7);

        word[0] = 1;
        assert_eq!(u128_from_word(&word), u128::MAX);
    }
}

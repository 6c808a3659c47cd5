use proptest::prelude::*;

use blackhole_types::{Address, NativeAmount, Timestamp, TokenAmount};

proptest! {
    /// Address Display -> FromStr yields the same address.
    #[test]
    fn address_display_parses_back(bytes in prop::array::uniform32(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address::is_zero is true only for the all-zero address.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(Address::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// TokenAmount::checked_add agrees with u128::checked_add.
    #[test]
    fn token_amount_checked_add(a in any::<u128>(), b in any::<u128>()) {
        let sum = TokenAmount::new(a).checked_add(TokenAmount::new(b));
        prop_assert_eq!(sum.map(|s| s.raw()), a.checked_add(b));
    }

    /// TokenAmount::checked_sub returns None exactly when b > a.
    #[test]
    fn token_amount_checked_sub(a in any::<u128>(), b in any::<u128>()) {
        let result = TokenAmount::new(a).checked_sub(TokenAmount::new(b));
        prop_assert_eq!(result.is_none(), b > a);
    }

    /// Native amounts convert 1:1 into token amounts.
    #[test]
    fn native_to_token_is_identity(raw in any::<u128>()) {
        prop_assert_eq!(TokenAmount::from(NativeAmount::new(raw)).raw(), raw);
    }

    /// A deadline is past only when now is strictly later.
    #[test]
    fn deadline_past_iff_now_greater(deadline in any::<u64>(), now in any::<u64>()) {
        prop_assert_eq!(Timestamp::new(deadline).is_past(Timestamp::new(now)), now > deadline);
    }
}

//! Property tests for the fundamental types.

use proptest::prelude::*;
use volta_types::{Address, Bytes32, Hash, Token};

proptest! {
    #[test]
    fn address_bincode_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
        let a = Address::new(bytes);
        let encoded = bincode::serialize(&a).unwrap();
        let decoded: Address = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(a, decoded);
    }

    #[test]
    fn hash_bincode_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let h = Hash::new(bytes);
        let encoded = bincode::serialize(&h).unwrap();
        let decoded: Hash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(h, decoded);
    }

    #[test]
    fn bytes32_hex_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let id = Bytes32::new(bytes);
        prop_assert_eq!(Bytes32::from_hex(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn token_byte_roundtrip(byte in 0u8..=1) {
        let t = Token::try_from(byte).unwrap();
        prop_assert_eq!(t.as_byte(), byte);
    }

    #[test]
    fn token_rejects_out_of_range(byte in 2u8..) {
        prop_assert!(Token::try_from(byte).is_err());
    }
}

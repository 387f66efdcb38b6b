//! Property tests: round trip, size accuracy and truncation safety.

use proptest::prelude::*;
use tensor_codec::schema::{encode_with, encoded_len_with};
use tensor_codec::{
    ArrayParams, DataOrder, DenseTensor, EncodeConfig, MaskedDenseTensor, Message,
    RepeatedEncoding, Triangle,
};

fn array_params() -> impl Strategy<Value = ArrayParams> {
    (
        prop::collection::vec(any::<i32>(), 0..6),
        prop::collection::vec(any::<i32>(), 0..6),
        any::<u32>(),
        any::<i32>(),
    )
        .prop_map(|(shape, strides, order, triangle)| ArrayParams {
            shape,
            strides,
            order: DataOrder::from_bits(order),
            triangle: Triangle::from_i32(triangle),
        })
}

fn dense() -> impl Strategy<Value = DenseTensor> {
    (
        array_params(),
        "[a-z0-9_\u{e9}]{0,12}",
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(params, type_tag, data)| DenseTensor::new(params, type_tag, data))
}

fn masked() -> impl Strategy<Value = MaskedDenseTensor> {
    (
        dense(),
        prop::collection::vec(any::<bool>(), 0..20),
        prop::collection::vec(any::<bool>(), 0..20),
    )
        .prop_map(|(tensor, mask, soft)| MaskedDenseTensor::new(tensor, mask, soft))
}

fn encodings() -> impl Strategy<Value = EncodeConfig> {
    prop_oneof![
        Just(RepeatedEncoding::Packed),
        Just(RepeatedEncoding::Expanded)
    ]
    .prop_map(|repeated| EncodeConfig { repeated })
}

proptest! {
    #[test]
    fn array_params_round_trip(ap in array_params(), config in encodings()) {
        let bytes = encode_with(&ap, &config);
        prop_assert_eq!(bytes.len(), encoded_len_with(&ap, &config));
        prop_assert_eq!(ArrayParams::decode(&bytes), Ok(ap));
    }

    #[test]
    fn masked_round_trip(t in masked(), config in encodings()) {
        let bytes = encode_with(&t, &config);
        prop_assert_eq!(bytes.len(), encoded_len_with(&t, &config));
        prop_assert_eq!(MaskedDenseTensor::decode(&bytes), Ok(t));
    }

    #[test]
    fn dense_prefixes_never_panic(t in dense(), cut in any::<prop::sample::Index>()) {
        let bytes = t.encode();
        let cut = cut.index(bytes.len() + 1);
        if let Err(e) = DenseTensor::decode(&bytes[..cut]) {
            prop_assert!(
                e.as_wire().is_some_and(|w| w.is_truncation()),
                "cut {} gave {:?}",
                cut,
                e
            );
        }
    }

    #[test]
    fn decode_then_encode_is_canonical(t in masked()) {
        let once = t.encode();
        let twice = MaskedDenseTensor::decode(&once).unwrap().encode();
        prop_assert_eq!(once, twice);
    }
}

//! Wire compatibility: golden bytes, packed/expanded equivalence, unknown
//! fields and truncation.

use tensor_codec::{
    ArrayParams, CodecError, DataOrder, DenseTensor, MaskedDenseTensor, Message, Triangle,
    WireError,
};

fn masked_sample() -> MaskedDenseTensor {
    let params = ArrayParams::contiguous(&[2, 3], DataOrder::COL_MAJOR)
        .unwrap()
        .with_triangle(Triangle::Lower);
    MaskedDenseTensor::new(
        DenseTensor::new(params, "float32", (0u8..24).collect()),
        vec![false, false, true, false, true, false],
        vec![false, false, true, false, false, false],
    )
}

#[test]
fn golden_row_major_2x2() {
    let ap = ArrayParams {
        shape: vec![2, 2],
        strides: vec![2, 1],
        order: DataOrder::ROW_MAJOR,
        triangle: Triangle::NotTriangle,
    };
    assert_eq!(
        ap.encode(),
        [0x0A, 0x02, 0x02, 0x02, 0x12, 0x02, 0x02, 0x01]
    );
}

#[test]
fn expanded_shape_decodes_like_packed() {
    let expanded = [0x08, 0x02, 0x08, 0x03];
    let packed = [0x0A, 0x02, 0x02, 0x03];
    let a = ArrayParams::decode(&expanded).unwrap();
    let b = ArrayParams::decode(&packed).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.shape, vec![2, 3]);
}

#[test]
fn mixed_packed_and_expanded_append_in_order() {
    // shape: 1 expanded, then [2, 3] packed, then 4 expanded
    let bytes = [0x08, 0x01, 0x0A, 0x02, 0x02, 0x03, 0x08, 0x04];
    assert_eq!(ArrayParams::decode(&bytes).unwrap().shape, vec![1, 2, 3, 4]);
}

#[test]
fn negative_extent_round_trips_as_ten_byte_varint() {
    let ap = ArrayParams::new(vec![-1], Vec::new());
    let bytes = ap.encode();
    // tag, len, 10-byte varint
    assert_eq!(bytes.len(), 12);
    assert_eq!(bytes[1], 10);
    assert_eq!(ArrayParams::decode(&bytes).unwrap(), ap);
}

#[test]
fn unknown_fields_of_every_kind_are_ignored() {
    let known = masked_sample().encode();

    let mut with_unknown = Vec::new();
    // field 100 varint
    with_unknown.extend_from_slice(&[0xA0, 0x06, 0x96, 0x01]);
    with_unknown.extend_from_slice(&known[..4]);
    // field 101 length-delimited
    with_unknown.extend_from_slice(&[0xAA, 0x06, 0x03, b'a', b'b', b'c']);
    // field 102 fixed64
    with_unknown.extend_from_slice(&[0xB1, 0x06, 1, 2, 3, 4, 5, 6, 7, 8]);
    // field 103 fixed32
    with_unknown.extend_from_slice(&[0xBD, 0x06, 1, 2, 3, 4]);
    // field 104 group holding a varint field 1
    with_unknown.extend_from_slice(&[0xC3, 0x06, 0x08, 0x07, 0xC4, 0x06]);
    with_unknown.extend_from_slice(&known[4..]);

    assert_eq!(
        MaskedDenseTensor::decode(&with_unknown).unwrap(),
        MaskedDenseTensor::decode(&known).unwrap()
    );
}

#[test]
fn newer_record_readable_by_older_schema() {
    let masked = masked_sample();
    let bytes = masked.encode();
    assert_eq!(DenseTensor::decode(&bytes).unwrap(), masked.tensor);
    assert_eq!(ArrayParams::decode(&bytes).unwrap(), masked.tensor.params);
}

#[test]
fn end_group_at_top_level_is_malformed() {
    // field 1 end group
    let err = ArrayParams::decode(&[0x0C]).unwrap_err();
    assert_eq!(err, CodecError::Wire(WireError::MalformedTag { offset: 0, key: 0x0C }));
}

#[test]
fn reserved_wire_kind_and_field_zero_are_malformed() {
    for key in [0x0E_u8, 0x0F, 0x00, 0x02] {
        let err = ArrayParams::decode(&[key, 0x00]).unwrap_err();
        assert!(
            matches!(err, CodecError::Wire(WireError::MalformedTag { offset: 0, .. })),
            "key {key:#x} gave {err:?}"
        );
    }
}

#[test]
fn every_truncation_fails_cleanly_or_yields_prefix() {
    let full = masked_sample();
    let bytes = full.encode();
    for cut in 0..bytes.len() {
        match MaskedDenseTensor::decode(&bytes[..cut]) {
            Ok(partial) => assert_ne!(partial, full, "cut {cut} decoded the whole record"),
            Err(CodecError::Wire(e)) => {
                assert!(e.is_truncation(), "cut {cut} gave {e:?}");
            }
            Err(other) => panic!("cut {cut} gave {other:?}"),
        }
    }
    assert_eq!(MaskedDenseTensor::decode(&bytes).unwrap(), full);
}

#[test]
fn truncated_body_reports_offset() {
    // data declares 4 bytes, 2 present
    let bytes = [0x32, 0x04, 0xAA, 0xBB];
    assert_eq!(
        DenseTensor::decode(&bytes),
        Err(CodecError::Wire(WireError::Truncated { offset: 2 }))
    );
}

#[test]
fn unknown_order_bits_and_triangle_survive() {
    let ap = ArrayParams::new(vec![1], vec![1])
        .with_order(DataOrder::from_bits(0x41))
        .with_triangle(Triangle::from_i32(7));
    let back = ArrayParams::decode(&ap.encode()).unwrap();
    assert_eq!(back.order.unknown_bits(), 0x40);
    assert_eq!(back.triangle, Triangle::Unknown(7));
    assert_eq!(back, ap);
}

#[test]
fn row_major_is_indistinguishable_from_unset() {
    let explicit = [0x18, 0x00];
    assert_eq!(
        ArrayParams::decode(&explicit).unwrap(),
        ArrayParams::decode(&[]).unwrap()
    );
    assert!(ArrayParams::new(vec![], vec![])
        .with_order(DataOrder::ROW_MAJOR)
        .encode()
        .is_empty());
}

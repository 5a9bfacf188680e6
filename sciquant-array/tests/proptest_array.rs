use proptest::prelude::*;
use sciquant_array::{persist, DType, NdArray};

fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..6, 1..4)
}

// Property 1: persisted blobs restore dtype, shape and every sample
proptest! {
    #[test]
    fn prop_blob_restores_u16_array(shape in shape_strategy(), seed in any::<u16>()) {
        let n: usize = shape.iter().product();
        let data: Vec<u16> = (0..n).map(|i| seed.wrapping_mul(31).wrapping_add(i as u16 * 257)).collect();
        let arr = NdArray::from_u16(&shape, data).unwrap();

        let mut blob = Vec::new();
        persist::write_array(&mut blob, &arr).unwrap();
        let back = persist::read_array(&blob[..]).unwrap();

        prop_assert_eq!(back.dtype(), DType::U16);
        prop_assert_eq!(back.shape(), arr.shape());
        prop_assert_eq!(back, arr);
    }
}

// Property 2: reshape never changes the flat sample order
proptest! {
    #[test]
    fn prop_reshape_preserves_order(rows in 1usize..20, cols in 1usize..20) {
        let data: Vec<u8> = (0..rows * cols).map(|i| (i % 256) as u8).collect();
        let arr = NdArray::from_u8(&[rows, cols], data.clone()).unwrap();
        let flat = arr.clone().flatten();

        prop_assert_eq!(flat.shape(), &[rows * cols][..]);
        prop_assert_eq!(flat.to_le_bytes(), data);
        prop_assert_eq!(flat.reshape(&[rows, cols]).unwrap(), arr);
    }
}

// Property 3: any two different shapes fail the shape check
proptest! {
    #[test]
    fn prop_shape_check_rejects_unequal(a in shape_strategy(), b in shape_strategy()) {
        prop_assume!(a != b);
        let x = NdArray::zeros(&a, DType::U8);
        let y = NdArray::zeros(&b, DType::U8);
        prop_assert!(x.check_same_shape(&y).is_err());
        prop_assert!(x.check_same_shape(&x).is_ok());
    }
}

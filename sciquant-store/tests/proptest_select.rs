use proptest::prelude::*;
use sciquant_array::{DType, NdArray};
use sciquant_store::{select_variable, VariableSet, VariableValue};

// Property 1: auto-selection returns a variable no smaller than any other candidate
proptest! {
    #[test]
    fn prop_selection_is_largest(
        sizes in prop::collection::vec((1usize..64, any::<bool>()), 1..12)
    ) {
        let mut vars = VariableSet::new();
        for (i, &(n, wide)) in sizes.iter().enumerate() {
            let dtype = if wide { DType::U16 } else { DType::U8 };
            vars.insert(format!("v{}", i), VariableValue::Array(NdArray::zeros(&[n], dtype))).unwrap();
        }

        let (name, chosen) = select_variable(&vars, None).unwrap();
        let largest = sizes
            .iter()
            .map(|&(n, wide)| if wide { n * 2 } else { n })
            .max()
            .unwrap();
        prop_assert_eq!(chosen.nbytes(), largest);

        // first index with that size
        let first = sizes
            .iter()
            .position(|&(n, wide)| (if wide { n * 2 } else { n }) == largest)
            .unwrap();
        prop_assert_eq!(name, format!("v{}", first));
    }
}

// Property 2: containers restore names, order and values
proptest! {
    #[test]
    fn prop_container_roundtrip(
        values in prop::collection::vec(0u16..=u16::MAX, 0..50),
        scalar in -1.0e6f64..1.0e6,
        text in "[a-z ]{0,40}",
    ) {
        let mut vars = VariableSet::new();
        vars.insert("__header__", VariableValue::Text(text)).unwrap();
        vars.insert("data", VariableValue::Array(NdArray::from_u16(&[values.len()], values).unwrap())).unwrap();
        vars.insert("gain", VariableValue::Scalar(scalar)).unwrap();

        let mut buf = Vec::new();
        vars.write_to(&mut buf).unwrap();
        let back = VariableSet::read_from(buf.as_slice()).unwrap();
        prop_assert_eq!(back, vars);
    }
}

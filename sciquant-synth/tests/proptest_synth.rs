use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sciquant_synth::{generate, generate_microscopy_stack, EntropyLevel, MicroscopyParams};

// Property 1: every entropy level honours the requested 2-D shape
proptest! {
    #[test]
    fn prop_generate_honours_shape(
        rows in 1usize..40,
        cols in 1usize..40,
        level_idx in 0usize..3,
        seed in any::<u64>(),
    ) {
        let level = EntropyLevel::ALL[level_idx];
        let mut rng = StdRng::seed_from_u64(seed);
        let ds = generate(&[rows, cols], level, &mut rng).unwrap();
        prop_assert_eq!(ds.shape(), &[rows, cols]);
        prop_assert_eq!(ds.array.nbytes(), rows * cols);
    }
}

// Property 2: the low level does not depend on the RNG at all
proptest! {
    #[test]
    fn prop_low_is_deterministic(seed_a in any::<u64>(), seed_b in any::<u64>()) {
        let a = generate(&[8, 8], EntropyLevel::Low, &mut StdRng::seed_from_u64(seed_a)).unwrap();
        let b = generate(&[8, 8], EntropyLevel::Low, &mut StdRng::seed_from_u64(seed_b)).unwrap();
        prop_assert_eq!(a, b);
    }
}

// Property 3: stack geometry follows the parameters for any spot count
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn prop_microscopy_geometry(
        height in 1usize..24,
        width in 1usize..24,
        n_frames in 1usize..4,
        n_peaks in 0usize..10,
        seed in any::<u64>(),
    ) {
        let params = MicroscopyParams {
            height,
            width,
            n_frames,
            background: 20.0,
            peak_intensity: 200.0,
            n_peaks,
        };
        let ds = generate_microscopy_stack(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(ds.shape(), &[n_frames, height, width]);
    }
}

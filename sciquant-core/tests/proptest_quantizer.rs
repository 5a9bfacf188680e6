use proptest::prelude::*;
use sciquant_array::{DType, NdArray};
use sciquant_core::{
    compare, AffineQuantizer, ArrayCodec, CallConvention, CodecError, CompressedPayload, DecodeHint,
    EntropyCoder, MetricsError, QuantizationConfig, QuantizedCodec,
};

struct Passthrough;

impl EntropyCoder for Passthrough {
    fn name(&self) -> &str {
        "stored"
    }
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(raw.to_vec())
    }
    fn decompress(&self, payload: &[u8], _raw_len: usize) -> Result<Vec<u8>, CodecError> {
        Ok(payload.to_vec())
    }
}

// Property 1: reconstruction error never exceeds ceil(scale) above the offset
proptest! {
    #[test]
    fn prop_linear_error_bounded_by_scale(
        offset in 0u16..1000,
        delta in 0u16..60000,
        scale in 0.05f64..16.0,
    ) {
        let x = offset.saturating_add(delta);
        let q = AffineQuantizer::linear(QuantizationConfig::new(offset as f64, scale).unwrap());
        let back = q.reconstruct(q.forward(x as f64), DType::U16);
        let err = (back as f64 - x as f64).abs();
        prop_assert!(
            err <= scale.ceil(),
            "x={} offset={} scale={} reconstructed={} (error: {})",
            x, offset, scale, back, err
        );
    }
}

// Property 2: forward is monotone non-decreasing
proptest! {
    #[test]
    fn prop_forward_is_monotone(
        a in 0u16..=u16::MAX,
        b in 0u16..=u16::MAX,
        offset in 0u16..500,
        scale in 0.05f64..16.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let q = AffineQuantizer::linear(QuantizationConfig::new(offset as f64, scale).unwrap());
        prop_assert!(q.forward(lo as f64) <= q.forward(hi as f64));
    }
}

// Property 3: unit scale with the data minimum as offset is lossless end to end
proptest! {
    #[test]
    fn prop_unit_scale_codec_is_exact(
        values in prop::collection::vec(0u16..=u16::MAX, 1..200)
    ) {
        let arr = NdArray::from_u16(&[values.len()], values).unwrap();
        let offset = sciquant_core::offset_for(&arr);
        let codec = QuantizedCodec::new(
            Passthrough,
            AffineQuantizer::linear(QuantizationConfig::new(offset, 1.0).unwrap()),
        );
        let payload: CompressedPayload = codec.encode(&arr).unwrap();
        let back = codec
            .decode(&payload, &DecodeHint::for_array(&arr, CallConvention::ByShape))
            .unwrap();

        let m = compare(&arr, &back).unwrap();
        prop_assert_eq!(m.max_error, 0.0);
        prop_assert_eq!(m.psnr, f64::INFINITY);
    }
}

// Property 4: metrics reject any pair of differing shapes
proptest! {
    #[test]
    fn prop_metrics_reject_shape_mismatch(
        rows in 1usize..8,
        cols in 1usize..8,
        extra in 1usize..4,
    ) {
        let a = NdArray::zeros(&[rows, cols], DType::U8);
        let b = NdArray::zeros(&[rows, cols + extra], DType::U8);
        let is_mismatch = matches!(compare(&a, &b), Err(MetricsError::ShapeMismatch { .. }));
        prop_assert!(is_mismatch);
    }
}

// Property 5: RMSE never exceeds the maximum absolute error
proptest! {
    #[test]
    fn prop_rmse_below_max_error(
        pairs in prop::collection::vec((0u8..=255, 0u8..=255), 1..100)
    ) {
        let (a, b): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
        let n = a.len();
        let a = NdArray::from_u8(&[n], a).unwrap();
        let b = NdArray::from_u8(&[n], b).unwrap();
        let m = compare(&a, &b).unwrap();
        prop_assert!(m.rmse <= m.max_error + 1e-9);
        prop_assert!(m.mse >= 0.0);
    }
}

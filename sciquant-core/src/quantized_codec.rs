use sciquant_array::NdArray;

use crate::codec::{ArrayCodec, CompressedPayload, DecodeHint};
use crate::coder::{check_decoded_len, CodecError, EntropyCoder};
use crate::quantize::{AffineQuantizer, CodeWidth};

/// Quantize-then-code adapter.
///
/// Payload format:
/// [u8 code width: 1 | 2 | 4] [coder output over LE-packed codes...]
///
/// The inverse transform reconstructs samples in the dtype named by the
/// decode hint, rounded and clamped to that dtype's range.
pub struct QuantizedCodec<C> {
    coder: C,
    quantizer: AffineQuantizer,
}

impl<C: EntropyCoder> QuantizedCodec<C> {
    pub fn new(coder: C, quantizer: AffineQuantizer) -> Self {
        Self { coder, quantizer }
    }

    pub fn quantizer(&self) -> &AffineQuantizer {
        &self.quantizer
    }
}

impl<C: EntropyCoder> ArrayCodec for QuantizedCodec<C> {
    fn name(&self) -> String {
        format!("{}+{}", self.coder.name(), self.quantizer.mode())
    }

    fn encode(&self, array: &NdArray) -> Result<CompressedPayload, CodecError> {
        let codes = self.quantizer.forward_array(array);
        let width = CodeWidth::for_codes(&codes);
        let body = self.coder.compress(&width.pack(&codes))?;

        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(width as u8);
        bytes.extend_from_slice(&body);
        Ok(CompressedPayload::new(bytes))
    }

    fn decode(&self, payload: &CompressedPayload, hint: &DecodeHint) -> Result<NdArray, CodecError> {
        let (&tag, body) = payload
            .as_bytes()
            .split_first()
            .ok_or(CodecError::Truncated("missing code width"))?;
        let width = CodeWidth::from_byte(tag).ok_or(CodecError::InvalidCodeWidth(tag))?;

        let raw_len = hint.element_count()? * width.bytes();
        let raw = self.coder.decompress(body, raw_len)?;
        check_decoded_len(&raw, raw_len)?;

        let codes = width.unpack(&raw);
        Ok(self.quantizer.inverse_array(&codes, hint.dtype(), &hint.shape()?)?)
    }
}

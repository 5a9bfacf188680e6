use sciquant_core::{CodecError, EntropyCoder};

const MAX_RUN: usize = 128;

/// Byte-level run-length coder.
/// Best for flat images and coarse quantization codes with long constant runs.
/// Format:
/// [Opcode: u8] [Data...]
/// Opcode 0x00..0x7F: Literal run of (N+1) bytes. Followed by (N+1) bytes.
/// Opcode 0x80..0xFF: Repeat run of (N-128+1) copies of the single byte that follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLengthCoder;

impl RunLengthCoder {
    pub fn new() -> Self {
        Self
    }
}

fn run_length(raw: &[u8], start: usize) -> usize {
    let b = raw[start];
    raw[start..].iter().take(MAX_RUN).take_while(|&&x| x == b).count()
}

impl EntropyCoder for RunLengthCoder {
    fn name(&self) -> &str {
        "rle"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        let mut i = 0;

        while i < raw.len() {
            let run = run_length(raw, i);
            if run >= 2 {
                // Repeat run: 2..128 -> opcode 0x81..0xFF
                out.push((128 + run - 1) as u8);
                out.push(raw[i]);
                i += run;
            } else {
                // Literal run: stop where a repeat of two or more begins
                let start = i;
                while i < raw.len() && (i - start) < MAX_RUN && (i == start || run_length(raw, i) < 2) {
                    i += 1;
                }
                let count = i - start;
                out.push((count - 1) as u8);
                out.extend_from_slice(&raw[start..i]);
            }
        }

        Ok(out)
    }

    fn decompress(&self, payload: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        let truncated = || CodecError::Decompress {
            coder: "rle".to_string(),
            reason: "stream ends inside a run".to_string(),
        };

        let mut out = Vec::with_capacity(raw_len);
        let mut ptr = 0;

        while ptr < payload.len() {
            let opcode = payload[ptr];
            ptr += 1;

            if opcode >= 128 {
                let count = (opcode - 128) as usize + 1;
                let &b = payload.get(ptr).ok_or_else(truncated)?;
                ptr += 1;
                out.extend(std::iter::repeat(b).take(count));
            } else {
                let count = opcode as usize + 1;
                let literal = payload.get(ptr..ptr + count).ok_or_else(truncated)?;
                ptr += count;
                out.extend_from_slice(literal);
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rle_compression() {
        // 100 zeros, one byte, 100 zeros
        let mut data = vec![0u8; 201];
        data[100] = 10;

        let coder = RunLengthCoder::new();
        let bytes = coder.compress(&data).unwrap();

        // 100 zeros -> 2 bytes, 1 literal -> 2 bytes, 100 zeros -> 2 bytes
        assert_eq!(bytes.len(), 6, "unexpected stream {:?}", bytes);

        let back = coder.decompress(&bytes, data.len()).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_long_runs_split_at_128() {
        let data = vec![7u8; 300];
        let coder = RunLengthCoder::new();
        let bytes = coder.compress(&data).unwrap();
        // 128 + 128 + 44
        assert_eq!(bytes, vec![0xFF, 7, 0xFF, 7, 128 + 43, 7]);
        assert_eq!(coder.decompress(&bytes, 300).unwrap(), data);
    }

    #[test]
    fn test_mixed_literals_and_repeats() {
        let data: Vec<u8> = vec![1, 2, 3, 3, 3, 4, 5, 5, 6];
        let coder = RunLengthCoder::new();
        let bytes = coder.compress(&data).unwrap();
        assert_eq!(coder.decompress(&bytes, data.len()).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let coder = RunLengthCoder::new();
        assert!(coder.compress(&[]).unwrap().is_empty());
        assert!(coder.decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_stream() {
        let coder = RunLengthCoder::new();
        assert!(matches!(coder.decompress(&[0x85], 6), Err(CodecError::Decompress { .. })));
        assert!(matches!(coder.decompress(&[0x03, 1, 2], 4), Err(CodecError::Decompress { .. })));
    }
}

use crate::{Hasher, Result, VerificationError};

/// Hashes chunks as they stream past and checks the digest once the stream
/// ends.
///
/// The expected digest is stored lower-cased; comparison ignores case.
pub struct StreamVerifier<H> {
    hasher: H,
    expected: String,
    bytes_verified: u64,
}

impl<H: Hasher> StreamVerifier<H> {
    pub fn new(hasher: H, expected_hex: impl Into<String>) -> Self {
        Self {
            hasher,
            expected: expected_hex.into().to_ascii_lowercase(),
            bytes_verified: 0,
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes_verified += chunk.len() as u64;
    }

    pub fn expected(&self) -> &str { &self.expected }

    pub fn bytes_verified(&self) -> u64 { self.bytes_verified }

    /// Finalize the digest and return it if it matches the expected one.
    pub fn finish(self) -> Result<String> {
        let actual = self.hasher.finalize_hex();
        if actual == self.expected {
            Ok(actual)
        } else {
            Err(VerificationError::Mismatch {
                expected: self.expected,
                actual,
            })
        }
    }
}

#[cfg(all(test, feature = "sha1"))]
mod tests {
    use super::*;
    use crate::Sha1Hasher;

    #[test]
    fn test_sha1_hasher_known_vector() {
        let mut hasher = Sha1Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");

        assert_eq!(hasher.finalize_hex(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn test_sha1_empty_input() {
        assert_eq!(
            Sha1Hasher::digest_hex(b""),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_chunks_match_upper_case_digest() {
        let data = b"test data for verification";
        let expected = Sha1Hasher::digest_hex(data).to_ascii_uppercase();

        let mut verifier = StreamVerifier::new(Sha1Hasher::new(), expected);
        for chunk in data.chunks(5) {
            verifier.update(chunk);
        }

        assert_eq!(verifier.bytes_verified(), data.len() as u64);
        assert_eq!(verifier.finish().unwrap(), Sha1Hasher::digest_hex(data));
    }

    #[test]
    fn test_mismatch_reports_both_digests() {
        let wrong = "0".repeat(40);
        let mut verifier = StreamVerifier::new(Sha1Hasher::new(), wrong.clone());
        verifier.update(b"test data");

        match verifier.finish() {
            Err(VerificationError::Mismatch { expected, actual }) => {
                assert_eq!(expected, wrong);
                assert_eq!(actual, Sha1Hasher::digest_hex(b"test data"));
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }
}

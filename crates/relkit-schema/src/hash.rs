/// A SHA256 digest as 64 lowercase hex characters.
///
/// Digests are produced by hashing downloaded release assets and end up
/// verbatim inside formula files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Build a digest from raw hasher output (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_from_bytes_is_lowercase_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let d = Sha256Digest::from_bytes(&bytes);
        assert_eq!(d.as_str().len(), 64);
        assert!(d.as_str().starts_with("ab00"));
        assert!(d.as_str().ends_with("01"));
        assert_eq!(d.to_string(), d.as_str());
    }
}

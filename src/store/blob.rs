// Store file framing: [version: u8][wincode payload].

pub(super) const STORE_VERSION: u8 = 1;

pub(super) fn encode(payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(STORE_VERSION);
    out.extend_from_slice(&payload);
    out
}

/// Payload after the version byte; an unknown version is an error rather than
/// a guess at the layout.
pub(super) fn decode(bytes: &[u8]) -> anyhow::Result<&[u8]> {
    match bytes.split_first() {
        Some((&STORE_VERSION, payload)) => Ok(payload),
        Some((version, _)) => anyhow::bail!("unsupported store version {}", version),
        None => anyhow::bail!("store file is empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_strips_version_byte() {
        let framed = encode(vec![1, 2, 3]);
        assert_eq!(framed[0], STORE_VERSION);
        assert_eq!(decode(&framed).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn decode_rejects_other_versions() {
        assert!(decode(&[STORE_VERSION + 1, 0]).is_err());
        assert!(decode(&[]).is_err());
    }
}

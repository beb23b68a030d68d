use super::ExtractError;

pub fn extract(data: &[u8]) -> Result<String, ExtractError> {
    String::from_utf8(data.to_vec()).map_err(|e| ExtractError::processing("TXT", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_utf8() {
        let err = extract(&[0x66, 0x6f, 0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().starts_with("Error reading TXT"));
    }

    #[test]
    fn test_unicode_passthrough() -> anyhow::Result<()> {
        assert_eq!(extract("রাত — night".as_bytes())?, "রাত — night");
        Ok(())
    }
}

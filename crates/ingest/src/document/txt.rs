/// Decode plain text bytes. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn extract_txt(bytes: &[u8]) -> String {
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    // Strip a UTF-8 BOM left behind by editors that export "Unicode text".
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

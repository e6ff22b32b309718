use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// UTF-8 BOM bytes
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// UTF-16 LE BOM bytes
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];

/// UTF-16 BE BOM bytes
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Allow guessing UTF-8 encoding
const ALLOW_UTF8: bool = true;

/// Detect the character encoding of the given data.
pub fn detect_charset(data: &[u8]) -> &'static Encoding {
    // Check for BOM markers first
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }

    // Valid UTF-8 needs no guessing
    if std::str::from_utf8(data).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    detector.guess(None, ALLOW_UTF8)
}

/// Decode data in the given encoding to UTF-8, dropping any BOM.
/// Returns an error message if UTF-8 input is malformed.
pub fn convert_to_utf8(data: &[u8], encoding: &'static Encoding) -> Result<String, String> {
    let data = if encoding == UTF_8 && data.starts_with(UTF8_BOM) {
        &data[3..]
    } else if encoding == UTF_16LE && data.starts_with(UTF16_LE_BOM) {
        &data[2..]
    } else if encoding == UTF_16BE && data.starts_with(UTF16_BE_BOM) {
        &data[2..]
    } else {
        data
    };

    if encoding == UTF_8 {
        return String::from_utf8(data.to_vec()).map_err(|e| format!("Invalid UTF-8: {}", e));
    }

    let (decoded, _) = encoding.decode_without_bom_handling(data);
    Ok(decoded.into_owned())
}

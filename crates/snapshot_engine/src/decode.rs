use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decodes a page body into text for link discovery and linting.
///
/// Order: BOM -> Content-Type charset -> chardetng guess. Malformed sequences
/// are replaced rather than rejected; the snapshot itself keeps the raw bytes.
pub fn decode_for_parsing<'a>(bytes: &'a [u8], content_type: Option<&str>) -> Cow<'a, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        return text;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

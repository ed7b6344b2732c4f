use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::{BlogPostError, Result};
use crate::models::ReadmeContent;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const BASE64_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const BASE64_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Content encodings a README can be delivered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeEncoding {
    Base64,
    Base64Url,
    Hex,
    Utf8,
    Utf16Le,
    Latin1,
}

impl FromStr for ReadmeEncoding {
    type Err = BlogPostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "base64" => Ok(ReadmeEncoding::Base64),
            "base64url" => Ok(ReadmeEncoding::Base64Url),
            "hex" => Ok(ReadmeEncoding::Hex),
            "utf8" | "utf-8" => Ok(ReadmeEncoding::Utf8),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(ReadmeEncoding::Utf16Le),
            "latin1" | "binary" | "ascii" => Ok(ReadmeEncoding::Latin1),
            _ => Err(BlogPostError::DecodeError {
                encoding: s.to_string(),
                detail: "unsupported encoding".to_string(),
            }),
        }
    }
}

impl ReadmeEncoding {
    /// Decode `content` into raw bytes.
    pub fn decode_bytes(&self, content: &str) -> std::result::Result<Vec<u8>, String> {
        match self {
            ReadmeEncoding::Base64 => BASE64_STANDARD
                .decode(strip_whitespace(content))
                .map_err(|e| e.to_string()),
            ReadmeEncoding::Base64Url => BASE64_URL_SAFE
                .decode(strip_whitespace(content))
                .map_err(|e| e.to_string()),
            ReadmeEncoding::Hex => hex::decode(strip_whitespace(content)).map_err(|e| e.to_string()),
            ReadmeEncoding::Utf8 => Ok(content.as_bytes().to_vec()),
            ReadmeEncoding::Utf16Le => Ok(content
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect()),
            // Low byte of each UTF-16 code unit
            ReadmeEncoding::Latin1 => Ok(content.encode_utf16().map(|unit| unit as u8).collect()),
        }
    }
}

/// GitHub wraps base64 content across lines
fn strip_whitespace(content: &str) -> String {
    content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect()
}

/// Decode a README using the encoding GitHub reported for it.
///
/// Invalid UTF-8 in the decoded bytes is replaced rather than rejected.
pub fn decode_readme(readme: &ReadmeContent) -> Result<String> {
    let encoding: ReadmeEncoding = readme.encoding.parse()?;
    let bytes = encoding
        .decode_bytes(&readme.content)
        .map_err(|detail| BlogPostError::DecodeError {
            encoding: readme.encoding.clone(),
            detail,
        })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readme(content: &str, encoding: &str) -> ReadmeContent {
        ReadmeContent {
            content: content.to_string(),
            encoding: encoding.to_string(),
        }
    }

    #[test]
    fn test_decode_base64_hello() {
        let text = decode_readme(&readme("IyBIZWxsbw==", "base64")).unwrap();
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_decode_base64_wrapped_lines() {
        let wrapped = "IyBTZXJ2ZXJsZXNzIGJs\nb2cKClB1Ymxpc2hlcyBh\nIFJFQURNRSB0byBkZXYu\ndG8g4oCTIGFzIGEgZHJh\nZnQuCg==\n";
        let text = decode_readme(&readme(wrapped, "base64")).unwrap();
        assert_eq!(
            text,
            "# Serverless blog\n\nPublishes a README to dev.to \u{2013} as a draft.\n"
        );
    }

    #[test]
    fn test_decode_base64_without_padding() {
        let text = decode_readme(&readme("IyBIZWxsbw", "base64")).unwrap();
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_encoding_name_is_case_insensitive() {
        let text = decode_readme(&readme("IyBIZWxsbw==", "BASE64")).unwrap();
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_decode_base64url() {
        let bytes = ReadmeEncoding::Base64Url.decode_bytes("-_8_Pg==").unwrap();
        assert_eq!(bytes, vec![0xfb, 0xff, 0x3f, 0x3e]);
    }

    #[test]
    fn test_decode_hex() {
        let text = decode_readme(&readme("232048656c6c6f", "hex")).unwrap();
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_decode_utf8_passthrough() {
        let text = decode_readme(&readme("# Hello", "utf-8")).unwrap();
        assert_eq!(text, "# Hello");
        let text = decode_readme(&readme("# Hello", "utf8")).unwrap();
        assert_eq!(text, "# Hello");
    }

    #[test]
    fn test_utf16le_aliases_parse() {
        for name in ["utf16le", "UTF-16LE", "ucs2", "ucs-2"] {
            assert_eq!(name.parse::<ReadmeEncoding>().unwrap(), ReadmeEncoding::Utf16Le);
        }
    }

    #[test]
    fn test_decode_utf16le_emits_code_unit_bytes() {
        let bytes = ReadmeEncoding::Utf16Le.decode_bytes("hi\u{e9}").unwrap();
        assert_eq!(bytes, vec![0x68, 0x00, 0x69, 0x00, 0xe9, 0x00]);

        let text = decode_readme(&readme("hi", "ucs2")).unwrap();
        assert_eq!(text, "h\0i\0");
    }

    #[test]
    fn test_decode_latin1_replaces_invalid_utf8() {
        let text = decode_readme(&readme("h\u{e9}llo", "latin1")).unwrap();
        assert_eq!(text, "h\u{FFFD}llo");
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let err = decode_readme(&readme("IyBIZWxsbw==", "rot13")).unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("encoding: rot13"));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = decode_readme(&readme("!!!not base64!!!", "base64")).unwrap_err();
        assert!(matches!(err, BlogPostError::DecodeError { .. }));
    }
}

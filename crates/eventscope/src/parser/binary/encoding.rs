/// Text encodings the heuristic scanner tries, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Le,
    Utf8,
    Latin1,
}

pub const SCAN_ORDER: &[TextEncoding] = &[TextEncoding::Utf16Le, TextEncoding::Utf8, TextEncoding::Latin1];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// `None` when the bytes cannot be read in this encoding at all.
    ///
    /// UTF-16LE drops unpaired surrogates and a trailing odd byte; UTF-8 is
    /// strict; Latin-1 always succeeds.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf16Le => {
                if bytes.len() < 2 {
                    return None;
                }
                let units = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                Some(char::decode_utf16(units).filter_map(Result::ok).collect())
            }
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// First encoding in `order` that decodes.
pub fn decode_first(order: &[TextEncoding], bytes: &[u8]) -> Option<(TextEncoding, String)> {
    order
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
}

#[cfg(test)]
pub(crate) fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

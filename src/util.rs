use std::borrow::Cow;

use crate::xmlchar::XmlChar;

/// Decode a character reference body (`#10`, `#xA`) into the character it names.
/// Returns `None` for malformed numbers and for code points that are not XML chars.
pub fn decode_char_reference(reference: &str) -> Option<char> {
    let code = if let Some(hex) = reference.strip_prefix("#x").or_else(|| reference.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        reference.strip_prefix('#')?.parse::<u32>().ok()?
    };
    let c = char::from_u32(code)?;
    if !c.is_xml_char() {
        return None;
    }
    Some(c)
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => decode_char_reference(reference),
    }
}

/// Replace predefined entities and character references.
/// Anything that does not decode is copied through unchanged.
pub fn decode_references(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi))) {
            Some((c, semi)) => {
                decoded.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

//! Decoding of literal values found in `<match>` attributes.
//!
//! String values use C-style escapes (`\n`, `\x7f`, `\177`, `\\`), numeric
//! values may be written in hexadecimal, octal or decimal, and string masks
//! are hexadecimal byte strings.

/// Decode C-style escapes in a quoted string value into raw bytes.
///
/// Unknown escapes stand for the escaped character itself, so `\.` decodes
/// to `.`. A trailing lone backslash is kept as-is.
///
/// # Examples
///
/// ```
/// use taxon::common::literal::decode_c_escapes;
/// assert_eq!(decode_c_escapes(r"\x89PNG\r\n"), b"\x89PNG\r\n".to_vec());
/// assert_eq!(decode_c_escapes(r"\177ELF"), b"\x7fELF".to_vec());
/// assert_eq!(decode_c_escapes(r"a\\b"), b"a\\b".to_vec());
/// ```
pub fn decode_c_escapes(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while let Some(found) = memchr::memchr(b'\\', &bytes[pos..]) {
        out.extend_from_slice(&bytes[pos..pos + found]);
        pos += found + 1;

        let Some(&escape) = bytes.get(pos) else {
            out.push(b'\\');
            return out;
        };
        pos += 1;

        match escape {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'v' => out.push(0x0B),
            b'e' => out.push(0x1B),
            b'x' => {
                let digits = take_digits(&bytes[pos..], 2, |b| b.is_ascii_hexdigit());
                if digits == 0 {
                    out.push(b'x');
                } else {
                    let text = std::str::from_utf8(&bytes[pos..pos + digits]).unwrap_or("0");
                    out.push(u8::from_str_radix(text, 16).unwrap_or(0));
                    pos += digits;
                }
            },
            b'0'..=b'7' => {
                // First octal digit was already consumed as `escape`.
                let rest = take_digits(&bytes[pos..], 2, |b| (b'0'..=b'7').contains(&b));
                let mut code = u32::from(escape - b'0');
                for &digit in &bytes[pos..pos + rest] {
                    code = code * 8 + u32::from(digit - b'0');
                }
                out.push((code & 0xFF) as u8);
                pos += rest;
            },
            other => out.push(other),
        }
    }

    out.extend_from_slice(&bytes[pos..]);
    out
}

fn take_digits(bytes: &[u8], max: usize, accept: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take(max).take_while(|&&b| accept(b)).count()
}

/// Parse an unsigned integer literal in hexadecimal (`0x1F`), octal (`017`)
/// or decimal (`31`) form.
///
/// # Examples
///
/// ```
/// use taxon::common::literal::parse_number;
/// assert_eq!(parse_number("0x1F"), Some(31));
/// assert_eq!(parse_number("017"), Some(15));
/// assert_eq!(parse_number("31"), Some(31));
/// assert_eq!(parse_number("zz"), None);
/// ```
pub fn parse_number(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if value.len() > 1 && value.starts_with('0') {
        return u64::from_str_radix(&value[1..], 8).ok();
    }
    value.parse().ok()
}

/// Parse a hexadecimal byte string such as `0xFFFF00` into bytes.
///
/// An odd number of digits is left-padded with a zero nibble.
pub fn parse_hex_bytes(value: &str) -> Option<Vec<u8>> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };

    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

/// Decodes a measurement of the form `-?\d{1,2}\.\d` into tenths.
///
/// `b"-5.2"` becomes `-52`. Digits are read as `byte - b'0'` directly.
/// Returns `None` for anything else; callers treat that as fatal.
#[inline]
pub fn parse_tenths(bytes: &[u8]) -> Option<i32> {
    let (negative, digits) = match bytes {
        [b'-', rest @ ..] => (true, rest),
        _ => (false, bytes),
    };

    let magnitude = match *digits {
        [ones, b'.', tenths] => digit(ones)? * 10 + digit(tenths)?,
        [tens, ones, b'.', tenths] => digit(tens)? * 100 + digit(ones)? * 10 + digit(tenths)?,
        _ => return None,
    };

    Some(if negative { -magnitude } else { magnitude })
}

#[inline]
fn digit(byte: u8) -> Option<i32> {
    byte.is_ascii_digit().then(|| i32::from(byte - b'0'))
}

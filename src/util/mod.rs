use unicode_width::UnicodeWidthChar;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Horizontal whitespace; line feeds are handled separately because they reset the column.
#[inline]
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

/// Number of terminal columns a character occupies. Control characters count as one.
#[inline]
pub fn display_width(c: char) -> i32 {
    c.width().map(|width| width as i32).unwrap_or(1)
}

/// Length in bytes of the leading run of `s` whose bytes satisfy `pred`.
pub fn prefix_len(s: &str, pred: impl Fn(u8) -> bool) -> usize {
    s.bytes().take_while(|&b| pred(b)).count()
}

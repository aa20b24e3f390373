const fn create_character_class_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    table[b'\t' as usize] = 1;
    table[b'\n' as usize] = 1;
    table[b'\x0b' as usize] = 1; // \v
    table[b'\x0c' as usize] = 1; // \f
    table[b'\r' as usize] = 1;
    table[b' ' as usize] = 1;
    table
}

/// Whitespace that may appear between payload literals or inside hard wrapped
/// base64 text
pub(crate) static CHARACTER_CLASS: [u8; 256] = create_character_class_table();

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    CHARACTER_CLASS[usize::from(b)] != 0
}

/// Iterate over the whitespace delimited tokens of a payload
pub(crate) fn tokens(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split(|&b| is_whitespace(b)).filter(|x| !x.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_tokens() {
        let data = b"  1 2\n\t3\r\n  -4.5  ";
        let actual: Vec<&[u8]> = tokens(data).collect();
        assert_eq!(actual, vec![&b"1"[..], b"2", b"3", b"-4.5"]);
        assert_eq!(tokens(b" \n ").count(), 0);
    }

    #[quickcheck]
    fn whitespace_matches_std(b: u8) -> bool {
        is_whitespace(b) == (b.is_ascii_whitespace() || b == b'\x0b')
    }
}

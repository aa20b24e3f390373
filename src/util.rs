/// A simplified and const generic version of arrayref
#[inline]
fn take<const N: usize>(data: &[u8]) -> [u8; N] {
    debug_assert!(data.len() >= N);
    unsafe { *(data.as_ptr() as *const [u8; N]) }
}

#[inline]
pub(crate) fn le_u64(data: &[u8]) -> u64 {
    u64::from_le_bytes(take::<8>(data))
}

/// Number of elements described by a list of dimensions, `None` on overflow
#[inline]
pub(crate) fn element_count(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(&[3, 3], Some(9))]
    #[case(&[143479, 1], Some(143479))]
    #[case(&[7], Some(7))]
    #[case(&[2, 0, 4], Some(0))]
    #[case(&[usize::MAX, 2], None)]
    fn test_element_count(#[case] dims: &[usize], #[case] expected: Option<usize>) {
        assert_eq!(element_count(dims), expected);
    }

    #[test]
    fn test_le_u64() {
        assert_eq!(le_u64(b"\x01\0\0\0\0\0\0\0rest"), 1);
    }
}

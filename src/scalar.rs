use crate::util::le_u64;
use std::error;
use std::fmt;

/// An error that can occur when converting a scalar into the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarError {
    /// The given string did not contain only numbers
    AllDigits(String),

    /// The given string caused an overflow when calculating its numerical value
    Overflow(String),

    /// The given string was not a recognized floating point value
    InvalidFloat(String),
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarError::AllDigits(x) => write!(f, "did not contain all digits: {}", x),
            ScalarError::Overflow(x) => write!(f, "caused an overflow: {}", x),
            ScalarError::InvalidFloat(x) => write!(f, "is not a valid float: {}", x),
        }
    }
}

impl error::Error for ScalarError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// A single whitespace delimited literal from an ASCII encoded payload.
///
/// ```
/// use gifti::Scalar;
///
/// let v1 = Scalar::new(b"-42");
/// assert_eq!(v1.to_i64(), Ok(-42));
/// assert_eq!(Scalar::new(b"1.5e-3").to_f64(), Ok(0.0015));
/// ```
#[derive(PartialEq, Copy, Clone)]
pub struct Scalar<'a> {
    data: &'a [u8],
}

impl<'a> Scalar<'a> {
    /// Create a new scalar backed by an ascii byte slice
    pub fn new(data: &'a [u8]) -> Scalar<'a> {
        Scalar { data }
    }

    /// View the underlying data
    pub fn view_data(&self) -> &[u8] {
        self.data
    }

    /// Try converting the scalar to f64
    pub fn to_f64(&self) -> Result<f64, ScalarError> {
        parse_float(self.data)
    }

    /// Try converting the scalar to f32 without a detour through f64, so the
    /// result is the nearest f32 to the literal
    pub fn to_f32(&self) -> Result<f32, ScalarError> {
        parse_float(self.data)
    }

    /// Try converting the scalar to i64
    pub fn to_i64(&self) -> Result<i64, ScalarError> {
        to_i64(self.data)
    }

    /// Try converting the scalar to u64
    pub fn to_u64(&self) -> Result<u64, ScalarError> {
        let d = self.data.strip_prefix(b"+").unwrap_or(self.data);
        to_u64(d)
    }

    fn lossy(&self) -> String {
        String::from_utf8_lossy(self.data).into_owned()
    }

    /// Convert to a signed integer type narrower than 64 bits
    pub(crate) fn to_int<T>(&self) -> Result<T, ScalarError>
    where
        T: TryFrom<i64>,
    {
        let wide = self.to_i64()?;
        T::try_from(wide).map_err(|_| ScalarError::Overflow(self.lossy()))
    }

    /// Convert to an unsigned integer type narrower than 64 bits
    pub(crate) fn to_uint<T>(&self) -> Result<T, ScalarError>
    where
        T: TryFrom<u64>,
    {
        let wide = self.to_u64()?;
        T::try_from(wide).map_err(|_| ScalarError::Overflow(self.lossy()))
    }
}

impl<'a> fmt::Debug for Scalar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar {{ {} }}", self)
    }
}

impl<'a> fmt::Display for Scalar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.data))
    }
}

#[inline]
fn parse_float<T: std::str::FromStr>(d: &[u8]) -> Result<T, ScalarError> {
    std::str::from_utf8(d)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| ScalarError::InvalidFloat(String::from_utf8_lossy(d).into_owned()))
}

fn is_digits_wide(d: &[u8]) -> bool {
    // Taken from simdjson: https://youtu.be/wlvKAT7SZIQ?t=2377
    const SIZE: usize = std::mem::size_of::<u64>();
    debug_assert!(d.len() == SIZE);

    let val = le_u64(d);
    val.checked_add(0x0606_0606_0606_0606).map_or(false, |x| {
        ((val & 0xF0F0_F0F0_F0F0_F0F0) | ((x & 0xF0F0_F0F0_F0F0_F0F0) >> 4))
            == 0x3333_3333_3333_3333
    })
}

fn is_digits(d: &[u8]) -> bool {
    d.iter().all(|x| x.is_ascii_digit())
}

#[inline]
fn ascii_u64_to_digits(mut val: u64) -> u64 {
    // Taken from simdjson: https://youtu.be/wlvKAT7SZIQ?t=2479
    val = (val & 0x0F0F_0F0F_0F0F_0F0F).wrapping_mul(2561) >> 8;
    val = (val & 0x00FF_00FF_00FF_00FF).wrapping_mul(6553601) >> 16;
    (val & 0x0000_FFFF_0000_FFFF).wrapping_mul(42949672960001) >> 32
}

#[inline]
fn to_i64(d: &[u8]) -> Result<i64, ScalarError> {
    let (is_negative, digits) = match d.first() {
        Some(b'-') => (true, &d[1..]),
        Some(b'+') => (false, &d[1..]),
        _ => (false, d),
    };

    let rest = to_u64(digits)?;
    if is_negative {
        if rest > i64::MAX as u64 + 1 {
            return Err(ScalarError::Overflow(String::from_utf8_lossy(d).into_owned()));
        }
        Ok((rest as i64).wrapping_neg())
    } else {
        i64::try_from(rest).map_err(|_| ScalarError::Overflow(String::from_utf8_lossy(d).into_owned()))
    }
}

#[inline]
fn to_u64(d: &[u8]) -> Result<u64, ScalarError> {
    const POWER10: [u64; 8] = [10_000_000, 1_000_000, 100_000, 10_000, 1_000, 100, 10, 1];
    let owned = || String::from_utf8_lossy(d).into_owned();

    if d.is_empty() {
        return Err(ScalarError::AllDigits(owned()));
    }

    let mut chunks = d.chunks_exact(8);
    let all_digits = chunks.all(is_digits_wide);
    let remainder = chunks.remainder();
    if !(all_digits & is_digits(remainder)) {
        return Err(ScalarError::AllDigits(owned()));
    }

    let mut result: u64 = 0;
    let chunks = d.chunks_exact(8);
    for chunk in chunks {
        let val = le_u64(chunk);

        result = result
            .checked_mul(100_000_000)
            .and_then(|x| x.checked_add(ascii_u64_to_digits(val)))
            .ok_or_else(|| ScalarError::Overflow(owned()))?;
    }

    if result != 0 {
        result = 10_u64
            .checked_pow(remainder.len() as u32)
            .and_then(|x| result.checked_mul(x))
            .ok_or_else(|| ScalarError::Overflow(owned()))?;
    }

    let maxxed = 8 - remainder.len();
    for (i, &x) in remainder.iter().enumerate() {
        result = result
            .checked_add(u64::from(x - b'0') * POWER10[maxxed + i])
            .ok_or_else(|| ScalarError::Overflow(owned()))?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn scalar_to_f64() {
        assert_eq!((Scalar::new(b"0").to_f64()), Ok(0.0));
        assert_eq!((Scalar::new(b"-1").to_f64()), Ok(-1.0));
        assert_eq!((Scalar::new(b"20405029").to_f64()), Ok(20405029.0));
        assert_eq!((Scalar::new(b"0.504").to_f64()), Ok(0.504));
        assert_eq!((Scalar::new(b"-1.50000").to_f64()), Ok(-1.5));
        assert_eq!((Scalar::new(b"1e-05").to_f64()), Ok(0.00001));
        assert_eq!((Scalar::new(b"-2.5E+2").to_f64()), Ok(-250.0));
        assert!(Scalar::new(b"1.2.3").to_f64().is_err());
        assert!(Scalar::new(b"NaN").to_f64().unwrap().is_nan());
    }

    #[test]
    fn scalar_to_f32_is_nearest() {
        assert_eq!(Scalar::new(b"-16.072010").to_f32(), Ok(-16.07201f32));
        assert_eq!(Scalar::new(b"0.0980392").to_f32(), Ok(0.0980392f32));
    }

    #[test]
    fn scalar_to_i64() {
        assert_eq!((Scalar::new(b"0").to_i64()), Ok(0));
        assert_eq!((Scalar::new(b"1").to_i64()), Ok(1));
        assert_eq!((Scalar::new(b"+7").to_i64()), Ok(7));
        assert_eq!((Scalar::new(b"-1").to_i64()), Ok(-1));
        assert_eq!((Scalar::new(b"-20405029").to_i64()), Ok(-20405029));
        assert_eq!(
            (Scalar::new(b"-20405029553322").to_i64()),
            Ok(-20405029553322)
        );
        assert_eq!(
            (Scalar::new(b"-9223372036854775808").to_i64()),
            Ok(i64::MIN)
        );
        assert!(Scalar::new(b"9223372036854775808").to_i64().is_err());
    }

    #[test]
    fn scalar_to_u64() {
        assert_eq!((Scalar::new(b"0").to_u64()), Ok(0));
        assert_eq!((Scalar::new(b"45").to_u64()), Ok(45));
        assert_eq!((Scalar::new(b"20405029").to_u64()), Ok(20405029));
        assert_eq!(
            (Scalar::new(b"20405029553322").to_u64()),
            Ok(20405029553322)
        );
        assert!(Scalar::new(b"-1").to_u64().is_err());
    }

    #[test]
    fn scalar_to_u64_overflow() {
        assert!(Scalar::new(b"888888888888888888888888888888888")
            .to_u64()
            .is_err());
        assert!(Scalar::new(b"666666666666666685902").to_u64().is_err());
    }

    #[test]
    fn scalar_narrowing() {
        assert_eq!(Scalar::new(b"255").to_uint::<u8>(), Ok(255u8));
        assert!(Scalar::new(b"256").to_uint::<u8>().is_err());
        assert_eq!(Scalar::new(b"-128").to_int::<i8>(), Ok(-128i8));
        assert!(Scalar::new(b"-129").to_int::<i8>().is_err());
        assert_eq!(Scalar::new(b"9182740").to_int::<i32>(), Ok(9182740));
    }

    #[test]
    fn scalar_empty_string() {
        let s = Scalar::new(b"");
        assert!(s.to_f64().is_err());
        assert!(s.to_i64().is_err());
        assert!(s.to_u64().is_err());
    }

    #[quickcheck]
    fn i64_display_roundtrip(x: i64) -> bool {
        let text = x.to_string();
        Scalar::new(text.as_bytes()).to_i64() == Ok(x)
    }

    #[quickcheck]
    fn u64_display_roundtrip(x: u64) -> bool {
        let text = x.to_string();
        Scalar::new(text.as_bytes()).to_u64() == Ok(x)
    }
}

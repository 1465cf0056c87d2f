//! Exact mixed fractions
//!
//! A length such as `1 3/16` is kept as sign, whole part, numerator and
//! denominator so it can be reduced and printed without any rounding.
//! This is display arithmetic only; no operators are provided.

use crate::error::LengthParseError;
use std::fmt;
use std::str::FromStr;

/// A value of the form `sign * (whole + numerator / denominator)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FractionValue {
    pub negative: bool,
    pub whole: u64,
    pub numerator: u64,
    pub denominator: Option<u64>,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl FractionValue {
    /// Build from possibly negative parts. The value is negative when either
    /// part is negative; only magnitudes are stored.
    pub fn new(whole: i64, numerator: i64, denominator: Option<u64>) -> Self {
        Self {
            negative: whole < 0 || numerator < 0,
            whole: whole.unsigned_abs(),
            numerator: numerator.unsigned_abs(),
            denominator,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.numerator == 0
    }

    /// Carry an improper numerator into the whole part and divide out the
    /// common factor. Unset or zero denominators and zero numerators are
    /// returned unchanged.
    pub fn reduce(&self) -> Self {
        let denominator = match self.denominator {
            Some(d) if d != 0 && self.numerator != 0 => d,
            _ => return *self,
        };

        let whole = self.whole + self.numerator / denominator;
        let numerator = self.numerator % denominator;
        let divisor = gcd(numerator, denominator);

        Self {
            negative: self.negative,
            whole,
            numerator: numerator / divisor,
            denominator: Some(denominator / divisor),
        }
    }

    /// Reduced denominator, or 1 when there is no fractional part
    pub fn reduced_denominator(&self) -> u64 {
        self.reduce().denominator.unwrap_or(1)
    }

    pub fn to_f64(&self) -> f64 {
        let mut value = self.whole as f64;
        if self.numerator > 0 {
            if let Some(d) = self.denominator.filter(|d| *d != 0) {
                value += self.numerator as f64 / d as f64;
            }
        }
        if self.negative {
            -value
        } else {
            value
        }
    }

    /// Render as `[-][whole][separator][numerator/denominator]`, or `0`.
    pub fn format(&self, separator: &str) -> String {
        let r = self.reduce();
        if r.is_zero() {
            return "0".to_string();
        }

        let mut s = String::new();
        if r.negative {
            s.push('-');
        }
        if r.whole > 0 {
            s.push_str(&r.whole.to_string());
            if r.numerator != 0 {
                s.push_str(separator);
            }
        }
        if r.numerator != 0 {
            s.push_str(&format!("{}/{}", r.numerator, r.denominator.unwrap_or(1)));
        }
        s
    }

    /// Parse either a decimal (`2.375`, `.5`) or a fraction
    /// (`3`, `3/8`, `1 3/8`, or `1{separator}3/8`). A leading `-` negates
    /// the whole value.
    pub fn parse(input: &str, separator: &str) -> Result<Self, LengthParseError> {
        let text = input.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, text),
        };

        let mut value = match body.find('.') {
            Some(dot) => Self::parse_decimal(input, &body[..dot], &body[dot + 1..])?,
            None => Self::parse_fraction(input, body, separator)?,
        };
        value.negative = negative && !value.is_zero();
        Ok(value)
    }

    fn parse_decimal(input: &str, whole: &str, rest: &str) -> Result<Self, LengthParseError> {
        let whole = whole.trim();
        let rest = rest.trim();

        let mut value = Self {
            negative: false,
            whole: 0,
            numerator: 0,
            denominator: Some(1),
        };
        if !whole.is_empty() {
            value.whole = parse_digits(input, whole)?;
        }
        if !rest.is_empty() {
            value.numerator = parse_digits(input, rest)?;
            let places = u32::try_from(rest.len()).map_err(|_| LengthParseError::TooPrecise {
                input: input.to_string(),
            })?;
            value.denominator = Some(10u64.checked_pow(places).ok_or_else(|| {
                LengthParseError::TooPrecise {
                    input: input.to_string(),
                }
            })?);
            value = value.reduce();
        }
        Ok(value)
    }

    fn parse_fraction(input: &str, body: &str, separator: &str) -> Result<Self, LengthParseError> {
        let body = if separator.is_empty() || separator == " " {
            body.to_string()
        } else {
            body.replacen(separator, " ", 1)
        };

        let parts: Vec<&str> = body.split('/').collect();
        match parts.as_slice() {
            [whole] => Ok(Self {
                negative: false,
                whole: parse_digits(input, whole.trim())?,
                numerator: 0,
                denominator: Some(1),
            }),
            [left, right] => {
                let (whole, numerator) = match left.split_whitespace().collect::<Vec<_>>()[..] {
                    [n] => (0, parse_digits(input, n)?),
                    [w, n] => (parse_digits(input, w)?, parse_digits(input, n)?),
                    _ => return Err(LengthParseError::bad(input)),
                };
                let denominator = match right.split_whitespace().collect::<Vec<_>>()[..] {
                    [d] => parse_digits(input, d)?,
                    _ => return Err(LengthParseError::bad(input)),
                };
                if denominator == 0 {
                    return Err(LengthParseError::ZeroDenominator {
                        input: input.to_string(),
                    });
                }
                Ok(Self {
                    negative: false,
                    whole,
                    numerator,
                    denominator: Some(denominator),
                })
            }
            _ => Err(LengthParseError::bad(input)),
        }
    }
}

fn parse_digits(input: &str, token: &str) -> Result<u64, LengthParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LengthParseError::bad(input));
    }
    token.parse().map_err(|_| LengthParseError::TooPrecise {
        input: input.to_string(),
    })
}

impl fmt::Display for FractionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(" "))
    }
}

impl FromStr for FractionValue {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, " ")
    }
}

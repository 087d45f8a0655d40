use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub},
};

/// Signed money amount represented as **integer cents**.
///
/// Every computation on expense amounts goes through this type to avoid
/// floating-point drift. `Display` renders the plain decimal with exactly two
/// fraction digits; the currency symbol is a presentation concern.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_30);
/// assert_eq!(amount.to_string(), "12.30");
/// assert_eq!(amount.milliunits(), 12_300);
/// ```
///
/// User input is read leniently with [`MoneyCents::coerce`]:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::coerce("-5").to_string(), "0.00");
/// assert_eq!(MoneyCents::coerce("12.3").to_string(), "12.30");
/// assert_eq!(MoneyCents::coerce("").to_string(), "0.00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the value in YNAB milliunits (1 cent = 10 milliunits).
    #[must_use]
    pub const fn milliunits(self) -> i64 {
        self.0 * 10
    }

    /// Returns `true` if the amount has an odd number of cents, i.e. it
    /// cannot be halved exactly.
    #[must_use]
    pub const fn is_odd(self) -> bool {
        self.0 % 2 != 0
    }

    /// Reads free-form amount text the way an amount field does.
    ///
    /// The longest numeric prefix (optional sign, digits, optional `.` and
    /// digits) is used, anything after it is ignored. Text without a numeric
    /// prefix reads as zero, negative values clamp to zero and extra decimals
    /// round half-up to cents.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);
        let frac_part = match after.strip_prefix('.') {
            Some(frac) => {
                let frac_len = frac.bytes().take_while(u8::is_ascii_digit).count();
                &frac[..frac_len]
            }
            None => "",
        };

        if negative || (int_part.is_empty() && frac_part.is_empty()) {
            return Self::ZERO;
        }

        let euros = if int_part.is_empty() {
            Some(0)
        } else {
            int_part.parse::<i64>().ok()
        };

        let digits: Vec<i64> = frac_part
            .bytes()
            .map(|digit| i64::from(digit - b'0'))
            .collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).is_some_and(|&digit| digit >= 5);
        let cents = tenths * 10 + hundredths + i64::from(round_up);

        euros
            .and_then(|euros| euros.checked_mul(100))
            .and_then(|total| total.checked_add(cents))
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    /// Splits the amount in two halves, rounding the odd cent as requested.
    #[must_use]
    pub fn half(self, round_up: bool) -> Self {
        let half = self.0.div_euclid(2);
        if self.is_odd() && round_up {
            Self(half + 1)
        } else {
            Self(half)
        }
    }
}

/// Formats the raw text of an amount field for read-only display.
///
/// ```rust
/// assert_eq!(engine::display_amount("1."), "1.00");
/// ```
#[must_use]
pub fn display_amount(raw: &str) -> String {
    MoneyCents::coerce(raw).to_string()
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let euros = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{euros}.{cents:02}")
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

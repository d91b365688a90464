/// A Sudoku digit in the range 1–9.
///
/// The zero value used by the puzzle-source wire format to mean "blank" is
/// deliberately unrepresentable; blanks are `Option::<Digit>::None` in engine
/// types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

/// Error returned when a raw value is outside the 1–9 digit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("digit out of range: {_0} (expected 1-9)")]
pub struct DigitOutOfRange(#[error(not(source))] pub u8);

impl Digit {
    /// Creates a digit, returning `None` unless `value` is in 1–9.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if matches!(value, 1..=9) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the digit as a plain `u8` in 1–9.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All nine digits in ascending order.
    pub const ALL: [Self; 9] = [
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
        Self(9),
    ];
}

impl TryFrom<u8> for Digit {
    type Error = DigitOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(DigitOutOfRange(value))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.get()
    }
}

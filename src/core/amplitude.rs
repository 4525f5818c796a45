// src/core/amplitude.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, Mul};

/// Sign shown between the real and imaginary parts when an amplitude is printed.
///
/// Purely presentational: it never takes part in arithmetic or equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    /// Printed as `a+ib`
    #[default]
    Plus,
    /// Printed as `a-i|b|`
    Minus,
}

impl Sign {
    /// Sign matching the imaginary part: `Minus` only for a strictly negative value.
    pub fn of(imaginary: f64) -> Self {
        if imaginary < 0.0 { Sign::Minus } else { Sign::Plus }
    }
}

/// A complex amplitude `re + i·im` in double precision.
///
/// The value itself is a `num_complex::Complex<f64>`; the extra [`Sign`] only
/// steers [`fmt::Display`]. Two amplitudes with equal real and imaginary parts
/// compare equal whatever their sign field says.
#[derive(Debug, Clone, Copy, Default)]
pub struct Amplitude {
    value: Complex<f64>,
    sign: Sign,
}

impl Amplitude {
    /// The additive identity `0+i0`.
    pub const ZERO: Amplitude = Amplitude { value: Complex::new(0.0, 0.0), sign: Sign::Plus };
    /// The multiplicative identity `1+i0`.
    pub const ONE: Amplitude = Amplitude { value: Complex::new(1.0, 0.0), sign: Sign::Plus };

    /// Creates an amplitude, deriving the display sign from `im`.
    pub fn new(re: f64, im: f64) -> Self {
        Self { value: Complex::new(re, im), sign: Sign::of(im) }
    }

    /// Creates an amplitude with a display sign chosen by the caller,
    /// e.g. the sign an ingestion layer read from text.
    pub fn with_sign(re: f64, im: f64, sign: Sign) -> Self {
        Self { value: Complex::new(re, im), sign }
    }

    /// Purely real amplitude.
    pub fn real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    pub fn re(&self) -> f64 {
        self.value.re
    }

    pub fn im(&self) -> f64 {
        self.value.im
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The underlying `num_complex` value.
    pub fn to_complex(self) -> Complex<f64> {
        self.value
    }

    /// Componentwise sum `(a+c) + i(b+d)`.
    pub fn add(self, other: Amplitude) -> Amplitude {
        Amplitude::from(self.value + other.value)
    }

    /// Complex product `(ac-bd) + i(ad+bc)`.
    pub fn multiply(self, other: Amplitude) -> Amplitude {
        let (a, b) = (self.value.re, self.value.im);
        let (c, d) = (other.value.re, other.value.im);
        Amplitude::new(a * c - b * d, a * d + b * c)
    }

    /// Modulus `sqrt(re² + im²)`.
    pub fn modulus(self) -> f64 {
        (self.value.re * self.value.re + self.value.im * self.value.im).sqrt()
    }

    /// Squared modulus, used by the normalization checks.
    pub fn norm_sqr(self) -> f64 {
        self.value.norm_sqr()
    }

    /// Complex conjugate.
    pub fn conj(self) -> Amplitude {
        Amplitude::from(self.value.conj())
    }

    /// Whether both parts lie within `tolerance` of `other`'s.
    pub fn approx_eq(self, other: Amplitude, tolerance: f64) -> bool {
        (self.value.re - other.value.re).abs() <= tolerance
            && (self.value.im - other.value.im).abs() <= tolerance
    }
}

impl PartialEq for Amplitude {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<Complex<f64>> for Amplitude {
    fn from(value: Complex<f64>) -> Self {
        Amplitude { value, sign: Sign::of(value.im) }
    }
}

impl From<Amplitude> for Complex<f64> {
    fn from(amplitude: Amplitude) -> Self {
        amplitude.value
    }
}

impl From<f64> for Amplitude {
    fn from(re: f64) -> Self {
        Amplitude::real(re)
    }
}

impl Add for Amplitude {
    type Output = Amplitude;

    fn add(self, rhs: Amplitude) -> Amplitude {
        Amplitude::add(self, rhs)
    }
}

impl Mul for Amplitude {
    type Output = Amplitude;

    fn mul(self, rhs: Amplitude) -> Amplitude {
        self.multiply(rhs)
    }
}

impl Zero for Amplitude {
    fn zero() -> Self {
        Amplitude::ZERO
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl std::iter::Sum for Amplitude {
    fn sum<I: Iterator<Item = Amplitude>>(iter: I) -> Self {
        iter.fold(Amplitude::ZERO, Amplitude::add)
    }
}

impl fmt::Display for Amplitude {
    /// Five decimals, with the imaginary magnitude after `+i` or `-i`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Plus => write!(f, "{:.5}+i{:.5}", self.value.re, self.value.im),
            Sign::Minus => write!(f, "{:.5}-i{:.5}", self.value.re, self.value.im.abs()),
        }
    }
}

/// Dot product of a matrix row with a vector, accumulated left to right.
pub(crate) fn dot(row: &[Amplitude], vector: &[Amplitude]) -> Amplitude {
    row.iter()
        .zip(vector)
        .fold(Amplitude::ZERO, |sum, (m, v)| sum.add(m.multiply(*v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_componentwise_and_sets_sign() {
        let sum = Amplitude::new(1.0, 2.0).add(Amplitude::new(0.5, -3.0));
        assert_eq!(sum, Amplitude::new(1.5, -1.0));
        assert_eq!(sum.sign(), Sign::Minus);
    }

    #[test]
    fn multiply_follows_complex_product() {
        // (1 + 2i)(3 - i) = 3 - i + 6i - 2i² = 5 + 5i
        let product = Amplitude::new(1.0, 2.0) * Amplitude::new(3.0, -1.0);
        assert_eq!(product, Amplitude::new(5.0, 5.0));
        assert_eq!(product.sign(), Sign::Plus);

        // i · i = -1, imaginary part zero keeps a plus sign
        let i = Amplitude::new(0.0, 1.0);
        assert_eq!(i * i, Amplitude::real(-1.0));
        assert_eq!((i * i).sign(), Sign::Plus);
    }

    #[test]
    fn modulus_of_three_four() {
        assert_eq!(Amplitude::new(3.0, -4.0).modulus(), 5.0);
        assert_eq!(Amplitude::ZERO.modulus(), 0.0);
    }

    #[test]
    fn equality_ignores_sign_field() {
        let a = Amplitude::with_sign(0.25, 0.0, Sign::Minus);
        let b = Amplitude::with_sign(0.25, 0.0, Sign::Plus);
        assert_eq!(a, b);
    }

    #[test]
    fn display_uses_sign_field() {
        assert_eq!(Amplitude::new(0.70711, 0.0).to_string(), "0.70711+i0.00000");
        assert_eq!(Amplitude::new(-1.0, -0.5).to_string(), "-1.00000-i0.50000");
        assert_eq!(Amplitude::with_sign(1.0, 0.0, Sign::Minus).to_string(), "1.00000-i0.00000");
    }

    #[test]
    fn complex_interop_round_trips_value() {
        let c = Complex::new(0.5, -0.25);
        let a = Amplitude::from(c);
        assert_eq!(a.sign(), Sign::Minus);
        assert_eq!(a.to_complex(), c);
        assert_eq!(a.conj(), Amplitude::new(0.5, 0.25));
    }

    #[test]
    fn dot_accumulates_products() {
        let row = [Amplitude::real(1.0), Amplitude::new(0.0, 1.0)];
        let v = [Amplitude::real(2.0), Amplitude::real(3.0)];
        assert_eq!(dot(&row, &v), Amplitude::new(2.0, 3.0));
        let total: Amplitude = v.iter().copied().sum();
        assert_eq!(total, Amplitude::real(5.0));
    }
}

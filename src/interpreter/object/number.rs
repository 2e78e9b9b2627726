use std::fmt::{Display, Formatter};
use std::ops;

/// Complex number value with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub real: f64,
    pub imaginary: f64,
}

impl Complex {
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }
}

impl From<f64> for Complex {
    fn from(real: f64) -> Self {
        Complex::new(real, 0.0)
    }
}

impl From<i64> for Complex {
    fn from(real: i64) -> Self {
        Complex::new(real as f64, 0.0)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.imaginary.is_sign_negative() {
            write!(f, "{}-{}i", self.real, -self.imaginary)
        } else {
            write!(f, "{}+{}i", self.real, self.imaginary)
        }
    }
}

impl ops::Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.real + rhs.real, self.imaginary + rhs.imaginary)
    }
}

impl ops::Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.real - rhs.real, self.imaginary - rhs.imaginary)
    }
}

impl ops::Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.real * rhs.real - self.imaginary * rhs.imaginary,
            self.real * rhs.imaginary + self.imaginary * rhs.real,
        )
    }
}

impl ops::Div for Complex {
    type Output = Complex;

    /// Division by zero follows IEEE semantics and yields non-finite parts.
    fn div(self, rhs: Complex) -> Complex {
        let denominator = rhs.real * rhs.real + rhs.imaginary * rhs.imaginary;

        Complex::new(
            (self.real * rhs.real + self.imaginary * rhs.imaginary) / denominator,
            (self.imaginary * rhs.real - self.real * rhs.imaginary) / denominator,
        )
    }
}

impl ops::Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.real, -self.imaginary)
    }
}

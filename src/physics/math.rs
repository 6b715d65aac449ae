//! Scalar type and numeric helpers shared by the force model and integrators

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// Gravitational acceleration used for the friction normal force, in m/s²
pub const GRAVITY: Scalar = 9.81;

/// Smallest mass the force model will divide by, in kg
pub const MIN_MASS: Scalar = 1e-4;

/// Sign of `value` as -1, 0 or 1.
///
/// Unlike [`f64::signum`], exact zero (of either sign) maps to 0 so that
/// `sign(0) * magnitude` never produces a spurious force. NaN maps to 0.
#[inline]
pub fn sign(value: Scalar) -> Scalar {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        // signum would report 1.0 here
        assert_eq!(0.0_f64.signum(), 1.0);
    }

    #[test]
    fn test_sign_of_nonzero_values() {
        assert_eq!(sign(1e-300), 1.0);
        assert_eq!(sign(-1e-300), -1.0);
        assert_eq!(sign(42.0), 1.0);
        assert_eq!(sign(-0.5), -1.0);
    }

    #[test]
    fn test_sign_of_nan_is_zero() {
        assert_eq!(sign(Scalar::NAN), 0.0);
    }
}

//! Property tests for share validation and secret recovery

use std::rc::Rc;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use secshsrv::domain::{DecodedShare, RequestDescriptor, ShareCount, Threshold};
use secshsrv::engine::{LagrangeEngine, SecretRecovery, SharePoint};
use secshsrv::validator::{Acceptance, ShareSet};

/// Random polynomial with its evaluation points
///
/// `coefficients[0]` is the secret; `xs` are distinct, non-zero and at least
/// `coefficients.len()` long.
#[derive(Clone, Debug)]
struct Polynomial {
    coefficients: Vec<i64>,
    xs: Vec<u32>,
}

impl Arbitrary for Polynomial {
    fn arbitrary(g: &mut Gen) -> Self {
        let threshold = (usize::arbitrary(g) % 5) + 1; // 1..=5
        let extra = usize::arbitrary(g) % 4; // 0..=3 verification points

        let mut coefficients: Vec<i64> = (0..threshold)
            .map(|_| i64::from(i16::arbitrary(g)))
            .collect();
        coefficients[0] = i64::from(u32::arbitrary(g));

        // Evenly spaced distinct positions
        let offset = (u32::arbitrary(g) % 10) + 1;
        let stride = (u32::arbitrary(g) % 3) + 1;
        let xs = (0..(threshold + extra) as u32)
            .map(|i| offset + i * stride)
            .collect();

        Polynomial { coefficients, xs }
    }
}

impl Polynomial {
    fn threshold(&self) -> Threshold {
        Threshold::new(self.coefficients.len() as u32).unwrap()
    }

    fn share_count(&self) -> ShareCount {
        ShareCount::new(self.xs.len() as u32).unwrap()
    }

    fn eval(&self, x: u32) -> BigInt {
        let x = BigInt::from(x);
        self.coefficients
            .iter()
            .rev()
            .fold(BigInt::from(0), |acc, c| acc * &x + BigInt::from(*c))
    }

    fn points(&self, modulus: Option<&BigInt>) -> Vec<SharePoint> {
        self.xs
            .iter()
            .map(|&x| {
                let y = self.eval(x);
                SharePoint {
                    x,
                    y: modulus.map_or(y.clone(), |p| y.mod_floor(p)),
                }
            })
            .collect()
    }
}

/// 2^127 - 1
fn mersenne_127() -> BigInt {
    (BigInt::one() << 127) - BigInt::one()
}

/// Integer-coefficient polynomials are recovered exactly over the rationals
#[quickcheck]
fn prop_lagrange_recovers_secret(poly: Polynomial) -> bool {
    let points = poly.points(None);
    let recovered = LagrangeEngine.recover(&points, poly.threshold(), poly.share_count(), None);

    recovered.ok() == Some(BigInt::from(poly.coefficients[0]))
}

/// The same holds inside a prime field
#[quickcheck]
fn prop_lagrange_recovers_secret_mod_prime(poly: Polynomial) -> bool {
    let p = mersenne_127();
    let points = poly.points(Some(&p));
    let recovered =
        LagrangeEngine.recover(&points, poly.threshold(), poly.share_count(), Some(&p));

    recovered.ok() == Some(BigInt::from(poly.coefficients[0]).mod_floor(&p))
}

/// Corrupting a verification point beyond the threshold is detected
#[quickcheck]
fn prop_lagrange_detects_corrupt_extra_point(poly: Polynomial) -> bool {
    let threshold = poly.coefficients.len();
    let mut points = poly.points(None);
    if points.len() == threshold {
        return true;
    }

    let last = points.len() - 1;
    points[last].y += BigInt::one();

    LagrangeEngine
        .recover(&points, poly.threshold(), poly.share_count(), None)
        .is_err()
}

/// Submitting every share twice leaves the same set as submitting it once
#[quickcheck]
fn prop_resubmission_is_idempotent(poly: Polynomial) -> bool {
    // Positions may be spread out, so n must cover the largest one
    let max_x = poly.xs.iter().copied().max().unwrap();
    let share_count = ShareCount::new(max_x).unwrap();
    let descriptor = Rc::new(
        RequestDescriptor::new(share_count, poly.threshold(), Some(mersenne_127())).unwrap(),
    );
    let p = mersenne_127();
    // Distinct values are needed; a low-degree polynomial can repeat
    let mut seen = Vec::new();
    let points: Vec<_> = poly
        .points(Some(&p))
        .into_iter()
        .filter(|pt| {
            let fresh = !seen.contains(&pt.y);
            seen.push(pt.y.clone());
            fresh
        })
        .collect();

    let mut once = ShareSet::new();
    let mut twice = ShareSet::new();
    for point in &points {
        let share = || {
            DecodedShare::new(point.x, point.y.clone(), Rc::clone(&descriptor)).unwrap()
        };

        if once.accept(share()).ok() != Some(Acceptance::Added) {
            return false;
        }
        if twice.accept(share()).ok() != Some(Acceptance::Added)
            || twice.accept(share()).ok() != Some(Acceptance::Resubmitted)
        {
            return false;
        }
    }

    once.len() == twice.len() && twice.len() == points.len()
}

/// A second value under an accepted x is always refused
#[quickcheck]
fn prop_conflicting_value_is_refused(x: bool, value: u64, delta: u64) -> bool {
    let x = if x { 2 } else { 1 };
    let delta = delta.max(1);
    let descriptor = Rc::new(
        RequestDescriptor::new(ShareCount::new(2).unwrap(), Threshold::new(1).unwrap(), None)
            .unwrap(),
    );

    let first = BigInt::from(value);
    let second = BigInt::from_biguint(Sign::Plus, first.magnitude() + delta);

    let mut set = ShareSet::new();
    set.accept(DecodedShare::new(x, first, Rc::clone(&descriptor)).unwrap())
        .unwrap();
    set.accept(DecodedShare::new(x, second, descriptor).unwrap()).is_err()
}

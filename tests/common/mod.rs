#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use skytime::observers::{EarthObserver, Observer};
use skytime::objects::SiderealObject;
use skytime::skytime::Skytime;

/// A handle on the built-in analytic ephemeris.
pub fn skytime() -> Skytime {
    Skytime::default()
}

/// Vega, ICRS J2000 with its Hipparcos proper motion and parallax.
pub fn vega() -> SiderealObject {
    let mut vega = SiderealObject::default();
    vega.parse_ra_dec("18 36 56.336", "+38 47 01.28")
        .unwrap()
        .set_proper_motion(200.94, 286.23)
        .unwrap()
        .set_parallax(130.23)
        .unwrap()
        .set_vradial(-20.6)
        .unwrap();
    vega
}

/// The Airy transit circle at Greenwich.
pub fn greenwich() -> Observer {
    Observer::from(EarthObserver::new(51.4769f64.to_radians(), -0.0005f64.to_radians(), 46.0).unwrap())
}

/// Angular separation between two (ra, dec) pairs, arcseconds.
pub fn separation_arcsec(a: (f64, f64), b: (f64, f64)) -> f64 {
    let cos = a.1.sin() * b.1.sin() + a.1.cos() * b.1.cos() * (a.0 - b.0).cos();
    cos.clamp(-1.0, 1.0).acos().to_degrees() * 3600.0
}

pub fn assert_angle_close(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU)
        - std::f64::consts::PI;
    assert_abs_diff_eq!(diff, 0.0, epsilon = epsilon);
}

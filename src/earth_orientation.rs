//! # Earth orientation
//!
//! Precession (IAU 1976), nutation (IAU 1980), frame bias and polar motion, used to carry
//! vectors between the GCRS and the true equator and equinox of date, and to compute the
//! apparent sidereal time.
//!
//! Every matrix is passive (see [`rotmt`]):
//!
//! ```text
//! x_true_of_date = N(t) · P(t) · B · x_gcrs
//! ```
//!
//! With [`Accuracy::Reduced`] the frame bias is dropped and the nutation series is truncated
//! to its four largest terms (≈0.5" error), which is about two orders of magnitude faster.
//!
//! Dates are Modified Julian Dates in TT; the TT/TDB difference is negligible here.

use nalgebra::Matrix3;

use crate::constants::{ArcSec, Radian, DAYS_PER_JULIAN_CENTURY, DPI, MJD, RADEG, RADSEC, T2000};
use crate::place::Accuracy;
use crate::ref_system::{rotmt, Axis};

/// Obliquity of the ecliptic at J2000 used by the frame bias, in arcseconds.
const EPS0_ARCSEC: f64 = 84381.448;

/// Frame bias: ICRS pole offsets and equinox offset (IERS 2003), in arcseconds.
const DPSI_BIAS: f64 = -0.041775;
const DEPS_BIAS: f64 = -0.0068192;
const DRA0: f64 = -0.0146;

fn julian_centuries(tjm: MJD) -> f64 {
    (tjm - T2000) / DAYS_PER_JULIAN_CENTURY
}

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// Returns
/// --------
/// * ε = ε₀ + ε₁·T + ε₂·T² + ε₃·T³, evaluated with Horner's scheme.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = julian_centuries(tjm);

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity, IAU 1980 (Wahr) theory.
///
/// The series is evaluated with trigonometric recurrences over the five Delaunay
/// arguments (l, l', F, D, Ω) instead of one `sin`/`cos` per term.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// Returns
/// --------
/// * `(Δψ, Δε)` in arcseconds.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = julian_centuries(tjm);
    let t1 = t;
    let t2 = t * t;
    let t3 = t2 * t;

    let dl = (485866.733 + 1717915922.633 * t1 + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let dp = (1287099.804 + 129596581.224 * t1 - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let df = (335778.877 + 1739527263.137 * t1 - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let dd = (1072261.307 + 1602961601.328 * t1 - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let dn = (450160.280 - 6962890.539 * t1 + 7.455 * t2 + 0.008 * t3) * RADSEC;

    let l = dl % DPI;
    let p = dp % DPI;
    let x = df % DPI * 2.0;
    let d = dd % DPI;
    let n = dn % DPI;

    let sin_cos = |x: f64| -> (f64, f64) { (x.cos(), x.sin()) };

    let (cl, sl) = sin_cos(l);
    let (cp, sp) = sin_cos(p);
    let (cx, sx) = sin_cos(x);
    let (cd, sd) = sin_cos(d);
    let (cn, sn) = sin_cos(n);

    // products of the fundamental arguments
    let cp2 = 2.0 * cp * cp - 1.0;

    let sp2 = 2.0 * sp * cp;
    let cd2 = 2.0 * cd * cd - 1.0;
    let sd2 = 2.0 * sd * cd;
    let cn2 = 2.0 * cn * cn - 1.0;
    let sn2 = 2.0 * sn * cn;
    let cl2 = 2.0 * cl * cl - 1.0;
    let sl2 = 2.0 * sl * cl;

    let ca = cx * cd2 + sx * sd2;
    let sa = sx * cd2 - cx * sd2;
    let cb = ca * cn - sa * sn;
    let sb = sa * cn + ca * sn;
    let cc = cb * cn - sb * sn;
    let sc = sb * cn + cb * sn;

    let cv = cx * cd2 - sx * sd2;
    let sv = sx * cd2 + cx * sd2;
    let ce = cv * cn - sv * sn;
    let se = sv * cn + cv * sn;
    let cf = ce * cn - se * sn;
    let sf = se * cn + ce * sn;

    let cg = cl * cd2 + sl * sd2;
    let sg = sl * cd2 - cl * sd2;
    let ch = cx * cn2 - sx * sn2;
    let sh = sx * cn2 + cx * sn2;
    let cj = ch * cl - sh * sl;
    let sj = sh * cl + ch * sl;

    let ck = cj * cl - sj * sl;
    let sk = sj * cl + cj * sl;
    let cm = cx * cl2 + sx * sl2;
    let sm = sx * cl2 - cx * sl2;
    let cq = cl * cd + sl * sd;
    let sq = sl * cd - cl * sd;

    let cr = 2.0 * cq * cq - 1.0;
    let sr = 2.0 * sq * cq;
    let cs = cx * cn - sx * sn;
    let ss = sx * cn + cx * sn;
    let ct = cs * cl - ss * sl;
    let st = ss * cl + cs * sl;

    let cu = cf * cl + sf * sl;
    let su = sf * cl - cf * sl;
    let cw = cp * cg - sp * sg;
    let sw = sp * cg + cp * sg;

    // Δψ in units of 0.0001"
    let mut dpsi =
        -(171996.0 + 174.2 * t) * sn + (2062.0 + 0.2 * t) * sn2 + 46.0 * (sm * cn + cm * sn)
            - 11.0 * sm
            - 3.0 * (sm * cn2 + cm * sn2)
            - 3.0 * (sq * cp - cq * sp)
            - 2.0 * (sb * cp2 - cb * sp2)
            + (sn * cm - cn * sm)
            - (13187.0 + 1.6 * t) * sc
            + (1426.0 - 3.4 * t) * sp
            - (517.0 - 1.2 * t) * (sc * cp + cc * sp)
            + (217.0 - 0.5 * t) * (sc * cp - cc * sp)
            + (129.0 + 0.1 * t) * sb
            + 48.0 * sr
            - 22.0 * sa
            + (17.0 - 0.1 * t) * sp2
            - 15.0 * (sp * cn + cp * sn)
            - (16.0 - 0.1 * t) * (sc * cp2 + cc * sp2)
            - 12.0 * (sn * cp - cn * sp);

    dpsi += -6.0 * (sn * cr - cn * sr) - 5.0 * (sb * cp - cb * sp)
        + 4.0 * (sr * cn + cr * sn)
        + 4.0 * (sb * cp + cb * sp)
        - 4.0 * sq
        + (sr * cp + cr * sp)
        + (sn * ca - cn * sa)
        - (sp * ca - cp * sa)
        + (sp * cn2 + cp * sn2)
        + (sn * cq - cn * sq)
        - (sp * ca + cp * sa)
        - (2274.0 + 0.2 * t) * sh
        + (712.0 + 0.1 * t) * sl
        - (386.0 + 0.4 * t) * ss
        - 301.0 * sj
        - 158.0 * sg
        + 123.0 * (sh * cl - ch * sl)
        + 63.0 * sd2
        + (63.0 + 0.1 * t) * (sl * cn + cl * sn)
        - (58.0 + 0.1 * t) * (sn * cl - cn * sl)
        - 59.0 * su
        - 51.0 * st
        - 38.0 * sf
        + 29.0 * sl2;

    dpsi += 29.0 * (sc * cl + cc * sl) - 31.0 * sk
        + 26.0 * sx
        + 21.0 * (ss * cl - cs * sl)
        + 16.0 * (sn * cg - cn * sg)
        - 13.0 * (sn * cg + cn * sg)
        - 10.0 * (se * cl - ce * sl)
        - 7.0 * (sg * cp + cg * sp)
        + 7.0 * (sh * cp + ch * sp)
        - 7.0 * (sh * cp - ch * sp)
        - 8.0 * (sf * cl + cf * sl)
        + 6.0 * (sl * cd2 + cl * sd2)
        + 6.0 * (sc * cl2 + cc * sl2)
        - 6.0 * (sn * cd2 + cn * sd2)
        - 7.0 * se
        + 6.0 * (sb * cl + cb * sl)
        - 5.0 * (sn * cd2 - cn * sd2)
        + 5.0 * (sl * cp - cl * sp)
        - 5.0 * (ss * cl2 + cs * sl2)
        - 4.0 * (sp * cd2 - cp * sd2);

    dpsi += 4.0 * (sl * cx - cl * sx) - 4.0 * sd - 3.0 * (sl * cp + cl * sp)
        + 3.0 * (sl * cx + cl * sx)
        - 3.0 * (sj * cp - cj * sp)
        - 3.0 * (su * cp - cu * sp)
        - 2.0 * (sn * cl2 - cn * sl2)
        - 3.0 * (sk * cl + ck * sl)
        - 3.0 * (sf * cp - cf * sp)
        + 2.0 * (sj * cp + cj * sp)
        - 2.0 * (sb * cl - cb * sl);

    dpsi += 2.0 * (sn * cl2 + cn * sl2) - 2.0 * (sl * cn2 + cl * sn2)
        + 2.0 * (sl * cl2 + cl * sl2)
        + 2.0 * (sh * cd + ch * sd)
        + (sn2 * cl - cn2 * sl)
        - (sg * cd2 - cg * sd2)
        + (sf * cl2 - cf * sl2)
        - 2.0 * (su * cd2 + cu * sd2)
        - (sr * cd2 - cr * sd2)
        + (sw * ch + cw * sh)
        - (sl * ce + cl * se)
        - (sf * cr - cf * sr)
        + (su * ca + cu * sa)
        + (sg * cp - cg * sp)
        + (sb * cl2 + cb * sl2)
        - (sf * cl2 + cf * sl2)
        - (st * ca - ct * sa)
        + (sc * cx + cc * sx)
        + (sj * cr + cj * sr)
        - (sg * cx + cg * sx);

    dpsi += (sp * cs + cp * ss) + (sn * cw - cn * sw)
        - (sn * cx - cn * sx)
        - (sh * cd - ch * sd)
        - (sp * cd2 + cp * sd2)
        - (sl * cv - cl * sv)
        - (ss * cp - cs * sp)
        - (sw * cn + cw * sn)
        - (sl * ca - cl * sa)
        + (sl2 * cd2 + cl2 * sd2)
        - (sf * cd2 + cf * sd2)
        + (sp * cd + cp * sd);

    // Δε in units of 0.0001"
    let mut deps = (92025.0 + 8.9 * t) * cn - (895.0 - 0.5 * t) * cn2 - 24.0 * (cm * cn - sm * sn)
        + (cm * cn2 - sm * sn2)
        + (cb * cp2 + sb * sp2)
        + (5736.0 - 3.1 * t) * cc
        + (54.0 - 0.1 * t) * cp
        + (224.0 - 0.6 * t) * (cc * cp - sc * sp)
        - (95.0 - 0.3 * t) * (cc * cp + sc * sp)
        - 70.0 * cb
        + cr
        + 9.0 * (cp * cn - sp * sn)
        + 7.0 * (cc * cp2 - sc * sp2)
        + 6.0 * (cn * cp + sn * sp)
        + 3.0 * (cn * cr + sn * sr)
        + 3.0 * (cb * cp + sb * sp)
        - 2.0 * (cr * cn - sr * sn)
        - 2.0 * (cb * cp - sb * sp);

    deps += (977.0 - 0.5 * t) * ch - 7.0 * cl + 200.0 * cs + (129.0 - 0.1 * t) * cj
        - cg
        - 53.0 * (ch * cl + sh * sl)
        - 2.0 * cd2
        - 33.0 * (cl * cn - sl * sn)
        + 32.0 * (cn * cl + sn * sl)
        + 26.0 * cu
        + 27.0 * ct
        + 16.0 * cf
        - cl2
        - 12.0 * (cc * cl - sc * sl)
        + 13.0 * ck
        - cx
        - 10.0 * (cs * cl + ss * sl)
        - 8.0 * (cn * cg + sn * sg)
        + 7.0 * (cn * cg - sn * sg)
        + 5.0 * (ce * cl + se * sl)
        - 3.0 * (ch * cp - sh * sp)
        + 3.0 * (ch * cp + sh * sp)
        + 3.0 * (cf * cl - sf * sl)
        - 3.0 * (cc * cl2 - sc * sl2)
        + 3.0 * (cn * cd2 - sn * sd2)
        + 3.0 * ce
        - 3.0 * (cb * cl - sb * sl)
        + 3.0 * (cn * cd2 + sn * sd2)
        + 3.0 * (cs * cl2 - ss * sl2)
        + (cj * cp + sj * sp)
        + (cu * cp + su * sp)
        + (cn * cl2 + sn * sl2)
        + (ck * cl - sk * sl)
        + (cf * cp + sf * sp)
        - (cj * cp - sj * sp)
        + (cb * cl + sb * sl)
        - (cn * cl2 - sn * sl2)
        + (cl * cn2 - sl * sn2)
        - (ch * cd - sh * sd)
        - (cn2 * cl + sn2 * sl)
        - (cf * cl2 + sf * sl2)
        + (cu * cd2 - su * sd2)
        - (cw * ch - sw * sh)
        + (cl * ce - sl * se)
        + (cf * cr + sf * sr)
        - (cb * cl2 - sb * sl2);

    dpsi *= 1e-4;
    deps *= 1e-4;

    (dpsi, deps)
}


/// Truncated nutation: the four largest terms of the IAU 1980 series.
///
/// Good to about 0.5" for Δψ and 0.1" for Δε.
pub fn nutn80_reduced(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = julian_centuries(tjm);

    // mean longitudes of the Sun and Moon, longitude of the lunar node
    let l_sun = ((280.4665 + 36000.7698 * t) * RADEG) % DPI;
    let l_moon = ((218.3165 + 481267.8813 * t) * RADEG) % DPI;
    let node = ((125.04452 - 1934.136261 * t) * RADEG) % DPI;

    let dpsi = -17.20 * node.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * node).sin();
    let deps = 9.20 * node.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * node).cos();

    (dpsi, deps)
}

/// Nutation angles `(Δψ, Δε)` in arcseconds at the requested accuracy.
pub fn nutation_angles(tjm: MJD, accuracy: Accuracy) -> (ArcSec, ArcSec) {
    match accuracy {
        Accuracy::Full => nutn80(tjm),
        Accuracy::Reduced => nutn80_reduced(tjm),
    }
}

/// Nutation matrix, mean equator and equinox of date → true equator and equinox of date.
///
/// ```text
/// N = R1(−(ε + Δε)) · R3(−Δψ) · R1(ε)
/// ```
pub fn rnut80(tjm: MJD, accuracy: Accuracy) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutation_angles(tjm, accuracy);
    let epst = epsm + deps * RADSEC;

    rotmt(-epst, Axis::X) * rotmt(-dpsi * RADSEC, Axis::Z) * rotmt(epsm, Axis::X)
}

/// Equation of the equinoxes `Δψ · cos ε`, in radians.
///
/// Difference between apparent and mean sidereal time.
pub fn equequ(tjm: MJD, accuracy: Accuracy) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutation_angles(tjm, accuracy);
    RADSEC * dpsi * oblm.cos()
}

/// Precession matrix (IAU 1976), mean J2000 → mean equator and equinox of date.
///
/// ```text
/// P = R3(−z) · R2(θ) · R3(−ζ)
/// ζ = (0.6406161 + 0.0000839·T + 0.0000050·T²)·T   [deg]
/// θ = (0.5567530 − 0.0001185·T − 0.0000116·T²)·T   [deg]
/// z = (0.6406161 + 0.0003041·T + 0.0000051·T²)·T   [deg]
/// ```
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = julian_centuries(tjm);

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    rotmt(-z, Axis::Z) * rotmt(theta, Axis::Y) * rotmt(-zeta, Axis::Z)
}

/// Frame bias matrix, GCRS → mean J2000 dynamical frame.
///
/// ```text
/// B = R1(−δε_b) · R2(δψ_b · sin ε₀) · R3(δα₀)
/// ```
pub fn frame_bias() -> Matrix3<f64> {
    let eps0 = EPS0_ARCSEC * RADSEC;
    rotmt(-DEPS_BIAS * RADSEC, Axis::X)
        * rotmt(DPSI_BIAS * RADSEC * eps0.sin(), Axis::Y)
        * rotmt(DRA0 * RADSEC, Axis::Z)
}

/// Full celestial rotation GCRS → true equator and equinox of date, `N · P · B`.
///
/// The frame bias (≈23 mas) is only applied with [`Accuracy::Full`].
pub fn gcrs_to_true_of_date(tjm: MJD, accuracy: Accuracy) -> Matrix3<f64> {
    let np = rnut80(tjm, accuracy) * prec(tjm);
    match accuracy {
        Accuracy::Full => np * frame_bias(),
        Accuracy::Reduced => np,
    }
}

/// Polar motion matrix, terrestrial intermediate frame → ITRS.
///
/// Arguments
/// ---------
/// * `xp`, `yp`: pole coordinates in arcseconds.
///
/// Returns
/// --------
/// * `W = R1(−yp) · R2(−xp)`; its transpose carries ITRS vectors back to the rotating
///   equator of date.
pub fn polar_motion(xp: ArcSec, yp: ArcSec) -> Matrix3<f64> {
    rotmt(-yp * RADSEC, Axis::X) * rotmt(-xp * RADSEC, Axis::Y)
}

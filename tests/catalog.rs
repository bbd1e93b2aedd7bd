mod common;

use approx::assert_relative_eq;
use common::{skytime, vega};
use skytime::observers::{EarthObserver, Observer};
use skytime::objects::SiderealObject;
use skytime::sesame::parse_sesame_response;
use skytime::skytime_errors::SkytimeError;
use skytime::time::Timescale;

const SIRIUS: &str = "# Sirius\t#Q9012
#=S=Simbad (via url):    1
%@ 1
%I.0 * alf CMa
%J 101.28715533 -16.71611586 = 06:45:08.91 -16:42:58.0
%P -546.01 -1223.07 [1.33 1.24 0] A 2007A&A...474..653V
%X 379.21 [1.58] A 2007A&A...474..653V
%V v -5.50 [0.4] A 1953GCRV..C......0W

#====Done (2024-Jan-01,00:00:00z)====
";

#[test]
fn test_sesame_answer() {
    let mut sirius = SiderealObject::default();
    parse_sesame_response(SIRIUS, &mut sirius).unwrap();
    assert_relative_eq!(sirius.ra().to_degrees(), 101.28715533, epsilon = 1e-10);
    assert_relative_eq!(sirius.dec().to_degrees(), -16.71611586, epsilon = 1e-10);
    assert_eq!(sirius.promora(), -546.01);
    assert_eq!(sirius.promodec(), -1223.07);
    assert_eq!(sirius.parallax(), 379.21);
    assert_eq!(sirius.vradial(), -5.5);
    assert_eq!(sirius.format_ra_dec(), "06:45:08.917 -16:42:58.02");
}

#[test]
fn test_sesame_failure() {
    let mut object = vega();
    let before = object;
    assert_eq!(
        parse_sesame_response("#! Nothing found for \"xyzzy\"\n", &mut object),
        Err(SkytimeError::LookupFailure("Nothing found for \"xyzzy\"".into()))
    );
    assert_eq!(object, before);
}

#[test]
fn test_describe() {
    let mut vega = vega();
    vega.set_promoepoch_from_calendar(1991, 4, 2, 13, 30, 0.0, Timescale::TT, false)
        .unwrap();
    let text = vega.describe();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "ICRS J2000: 18:36:56.336 +38:47:01.28",
            "Proper motion: +200.94 +286.23 mas/yr",
            "Parallax: 130.23 mas",
            "Radial velocity: -20.60 km/s",
            "Proper-motion epoch: 1991/04/02 13:30:00 [TDB]",
        ]
    );
}

#[test]
fn test_nan_rejected() {
    let mut star = SiderealObject::default();
    assert_eq!(
        star.set_parallax(f64::NAN).map(|_| ()),
        Err(SkytimeError::InvalidArgument("parallax must be finite".into()))
    );
    assert!(SiderealObject::new(f64::NAN, 0.0).is_err());
    assert!(EarthObserver::new(0.0, f64::NAN, 0.0).is_err());
}

#[test]
fn test_observer_text() {
    let mut site = EarthObserver::default();
    site.parse_lat_lon("-30 14 26.7", "-70 44 12.0").unwrap();
    assert_relative_eq!(site.latitude().to_degrees(), -30.240_75, epsilon = 1e-9);
    assert_relative_eq!(site.longitude().to_degrees(), -70.736_666_666_7, epsilon = 1e-9);
    assert_eq!(site.format_lat_lon(", "), "-30:14:26.70, -070:44:12.00");

    assert!(matches!(
        site.parse_lat_lon("95 00 00", "0 0 0"),
        Err(SkytimeError::InvalidArgument(_))
    ));
    assert_relative_eq!(site.latitude().to_degrees(), -30.240_75, epsilon = 1e-9);

    assert_eq!(Observer::Geocenter.to_string(), "geocenter");
}

#[test]
fn test_serde() {
    let mut site = EarthObserver::new(0.5, -1.2, 2200.0).unwrap();
    site.set_atmosphere(-5.0, 780.0).unwrap();
    let observer = Observer::from(site);
    let json = serde_json::to_string(&observer).unwrap();
    let back: Observer = serde_json::from_str(&json).unwrap();
    assert_eq!(back, observer);

    let star = vega();
    let json = serde_json::to_string(&star).unwrap();
    assert_eq!(serde_json::from_str::<SiderealObject>(&json).unwrap(), star);
}

#[test]
#[ignore = "queries the CDS Sesame service"]
fn test_sesame_lookup() {
    let skytime = skytime();
    let mut vega = SiderealObject::default();
    vega.from_sesame(&skytime, "Vega").unwrap();
    assert_relative_eq!(vega.ra().to_degrees(), 279.2347, epsilon = 1e-3);
    assert!(vega.parallax() > 120.0);

    let mut nothing = SiderealObject::default();
    assert!(matches!(
        nothing.from_sesame(&skytime, "no such object xyzzy"),
        Err(SkytimeError::LookupFailure(_))
    ));
}

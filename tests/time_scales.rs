use approx::assert_relative_eq;
use skytime::skytime_errors::SkytimeError;
use skytime::time::{Time, Timescale};

#[test]
fn test_timescale_validation() {
    for name in ["TAI", "UTC", "UT1", "TT", "TCG", "TCB", "TDB"] {
        let scale = Timescale::validate(name).unwrap();
        assert_eq!(scale.name(), name);
        assert_eq!(name.parse::<Timescale>().unwrap(), scale);
    }
    assert_eq!(
        Timescale::validate("GPS"),
        Err(SkytimeError::InvalidTimescale("GPS".into()))
    );
    assert_eq!(
        "tt".parse::<Timescale>(),
        Err(SkytimeError::InvalidTimescale("tt".into()))
    );
}

#[test]
fn test_julian_date_round_trips() {
    for jd in [2451545.0, 2460000.25, 2400000.5, 0.0] {
        assert_eq!(Time::from_jd(jd, Timescale::TT).as_jd(), jd);
    }

    let t = Time::from_mjd(51544.5, Timescale::TT);
    assert_eq!(t.as_mjd(), 51544.5);
    assert_eq!(t.as_jd(), 2451545.0);
    assert_eq!(t.jd1(), 2400000.5);
}

#[test]
fn test_tt_and_tdb_tags() {
    let tt = Time::from_jd(2451545.0, Timescale::TT);
    assert_eq!(tt.as_tt(false).unwrap(), tt);

    let tdb = tt.as_tdb(true).unwrap();
    assert_eq!(tdb.timescale(), Timescale::TT);
    assert_eq!(tdb.as_jd(), 2451545.0);

    let true_tdb = Time::from_jd(2451545.0, Timescale::TDB);
    assert_eq!(true_tdb.as_tdb(false).unwrap(), true_tdb);

    let ut1 = Time::from_jd(2451545.0, Timescale::UT1);
    assert_eq!(
        ut1.as_tt(false),
        Err(SkytimeError::UnsupportedTimescale(Timescale::UT1))
    );
    assert_eq!(
        Time::from_jd(2451545.0, Timescale::TCB).as_tdb(true),
        Err(SkytimeError::UnsupportedTimescale(Timescale::TCB))
    );
}

#[test]
fn test_utc_to_tt() {
    // 32 leap seconds at the start of 2000, plus the 32.184 s of TT − TAI
    let utc = Time::from_calendar(2000, 1, 1, 11, 58, 55.816, Timescale::UTC, false).unwrap();
    let tt = utc.as_tt(false).unwrap();
    assert_eq!(tt.timescale(), Timescale::TT);
    assert_relative_eq!(tt.as_jd(), 2451545.0, epsilon = 1e-9);

    let tai = Time::from_jd(2451545.0, Timescale::TAI).as_tt(false).unwrap();
    assert_relative_eq!((tai.as_jd() - 2451545.0) * 86400.0, 32.184, epsilon = 1e-5);
}

#[test]
fn test_calendar_round_trip() {
    let t = Time::from_calendar(2000, 1, 1, 12, 0, 0.0, Timescale::TT, false).unwrap();
    assert_eq!(t.as_jd(), 2451545.0);
    assert_eq!(t.to_calendar().unwrap(), (2000, 1, 1, 0.5));

    let fday = Time::from_fractional_day_calendar(2000, 1, 1, 0.5, Timescale::TT, false).unwrap();
    assert_eq!(fday.as_jd(), 2451545.0);

    let epoch = Time::from_julian_epoch(2000.0);
    assert_eq!(epoch.timescale(), Timescale::TT);
    assert_eq!(epoch.as_jd(), 2451545.0);
}

#[test]
fn test_dubious_year() {
    assert_eq!(
        Time::from_calendar(1900, 6, 1, 0, 0, 0.0, Timescale::UTC, false),
        Err(SkytimeError::ExternalLibrary {
            function: "dtf2d",
            code: 1
        })
    );
    let t = Time::from_calendar(1900, 6, 1, 0, 0, 0.0, Timescale::UTC, true).unwrap();
    assert_eq!(
        t.as_tt(false),
        Err(SkytimeError::ExternalLibrary {
            function: "utctai",
            code: 1
        })
    );
    assert!(t.as_tt(true).is_ok());

    // only UTC has dubious years
    assert!(Time::from_calendar(1900, 6, 1, 0, 0, 0.0, Timescale::TT, false).is_ok());
}

#[test]
fn test_calendar_errors() {
    assert_eq!(
        Time::from_calendar(2000, 13, 1, 0, 0, 0.0, Timescale::TT, false),
        Err(SkytimeError::ExternalLibrary {
            function: "dtf2d",
            code: -2
        })
    );
    assert_eq!(
        Time::from_calendar(-4800, 1, 1, 0, 0, 0.0, Timescale::TT, false),
        Err(SkytimeError::ExternalLibrary {
            function: "dtf2d",
            code: -1
        })
    );
    assert_eq!(
        Time::from_calendar(2000, 1, 1, 24, 0, 0.0, Timescale::TT, false),
        Err(SkytimeError::ExternalLibrary {
            function: "dtf2d",
            code: -4
        })
    );
}

#[test]
fn test_formatting() {
    let j2000 = Time::from_jd(2451545.0, Timescale::TT);
    assert_eq!(j2000.format(3, false).unwrap(), "2000/01/01 12:00:00.000");
    assert_eq!(j2000.format(0, false).unwrap(), "2000/01/01 12:00:00");
    assert_eq!(j2000.to_string(), "2000/01/01 12:00:00 TT");

    let late = Time::new(2451544.5, 0.999_999_999_5, Timescale::TT);
    assert_eq!(late.format(3, false).unwrap(), "2000/01/02 00:00:00.000");

    assert!(matches!(
        j2000.format(10, false),
        Err(SkytimeError::InvalidArgument(_))
    ));
}

#[test]
fn test_hifitime_interop() {
    let t = Time::from_calendar(2015, 6, 29, 12, 0, 0.0, Timescale::UTC, false).unwrap();
    let epoch = t.to_epoch().unwrap();
    let back = Time::from_epoch(epoch, Timescale::TT).unwrap();
    assert_relative_eq!(
        back.as_jd(),
        t.as_tt(false).unwrap().as_jd(),
        epsilon = 1e-8
    );

    assert_eq!(
        Time::from_jd(2451545.0, Timescale::UT1).to_epoch(),
        Err(SkytimeError::UnsupportedTimescale(Timescale::UT1))
    );
}

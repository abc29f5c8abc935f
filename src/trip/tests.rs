use super::*;

#[test]
fn test_travel_mode_parse() {
    assert_eq!("walking".parse::<TravelMode>(), Ok(TravelMode::Walking));
    assert_eq!("Cycling".parse::<TravelMode>(), Ok(TravelMode::Cycling));
    assert_eq!(" TRANSIT ".parse::<TravelMode>(), Ok(TravelMode::Transit));
    assert_eq!("driving".parse::<TravelMode>(), Ok(TravelMode::Driving));
    assert!("teleport".parse::<TravelMode>().is_err());
}

#[test]
fn test_travel_mode_lenient_fallback() {
    assert_eq!(TravelMode::parse_lenient("teleport"), TravelMode::Driving);
    assert_eq!(TravelMode::parse_lenient(""), TravelMode::Driving);
    assert_eq!(TravelMode::parse_lenient("walking"), TravelMode::Walking);
}

#[test]
fn test_reference_speeds() {
    assert_eq!(TravelMode::Walking.reference_speed_kmh(), 5.0);
    assert_eq!(TravelMode::Cycling.reference_speed_kmh(), 15.0);
    assert_eq!(TravelMode::Transit.reference_speed_kmh(), 25.0);
    assert_eq!(TravelMode::Driving.reference_speed_kmh(), 45.0);
}

#[test]
fn test_mode_codes_are_distinct() {
    let codes = [
        TravelMode::Driving.code(),
        TravelMode::Walking.code(),
        TravelMode::Cycling.code(),
        TravelMode::Transit.code(),
    ];
    assert_eq!(codes, [0, 1, 2, 3]);
}

#[test]
fn test_forecast_type_parse() {
    assert_eq!("weather".parse::<ForecastType>(), Ok(ForecastType::Weather));
    assert_eq!("ACCIDENTS".parse::<ForecastType>(), Ok(ForecastType::Accidents));
    assert_eq!(ForecastType::parse_lenient("congestion"), ForecastType::Congestion);
    assert_eq!(ForecastType::parse_lenient("sunspots"), ForecastType::Overall);
}

/// Earth's standard gravitational parameter (m^3/s^2).
pub const MU_EARTH: f64 = 3.986_004_418e14;

/// Reference spherical Earth radius (m), equatorial WGS-84 value.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

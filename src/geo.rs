//! Geographic coordinates and the regions geohashes decode to.

use crate::{Error, Result};

/// Mean Earth radius in meters used by [`Location::distance_to`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location after checking both coordinates are in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] or [`Error::LongitudeOutOfRange`] for coordinates
    /// outside the valid ranges, NaN included.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the great-circle distance to `other` in meters, computed with the haversine
    /// formula.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::Location;
    ///
    /// let london = Location::new(51.5074, -0.1278)?;
    /// let paris = Location::new(48.8566, 2.3522)?;
    /// let d = london.distance_to(&paris);
    /// assert!((343_000.0..344_000.0).contains(&d));
    /// # Ok::<(), dwuid::Error>(())
    /// ```
    pub fn distance_to(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }
}

/// Rejects coordinates outside `[-90, 90]` x `[-180, 180]`.
pub(crate) fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

/// A rectangular latitude/longitude region.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BoundingBox {
    min_latitude: f64,
    min_longitude: f64,
    max_latitude: f64,
    max_longitude: f64,
}

impl BoundingBox {
    pub(crate) const fn new(
        min_latitude: f64,
        min_longitude: f64,
        max_latitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            min_longitude,
            max_latitude,
            max_longitude,
        }
    }

    /// Returns the southern edge in degrees.
    pub const fn min_latitude(&self) -> f64 {
        self.min_latitude
    }

    /// Returns the western edge in degrees.
    pub const fn min_longitude(&self) -> f64 {
        self.min_longitude
    }

    /// Returns the northern edge in degrees.
    pub const fn max_latitude(&self) -> f64 {
        self.max_latitude
    }

    /// Returns the eastern edge in degrees.
    pub const fn max_longitude(&self) -> f64 {
        self.max_longitude
    }

    /// Returns true if `location` lies within the box, edges included.
    pub fn contains(&self, location: &Location) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&location.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&location.longitude)
    }

    /// Returns the midpoint of the box.
    pub fn center(&self) -> Location {
        Location::new_unchecked(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }
}

use datascrub_core::error::{Result, ScrubError};
use geo::{BoundingRect, Coord, Intersects, LineString, Point, Polygon, Rect};

/// A closed polygon of (longitude, latitude) vertices used for membership tests
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygon: Polygon<f64>,
}

impl Boundary {
    /// Build a boundary from (longitude, latitude) vertices.
    ///
    /// The ring is closed implicitly; a trailing vertex equal to the first is
    /// accepted and not counted. At least three vertices are required.
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self> {
        if let Some((i, _)) =
            vertices.iter().enumerate().find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
        {
            return Err(ScrubError::InvalidBoundary {
                reason: format!("vertex {} has non-finite coordinates", i),
            });
        }

        let mut vertices = vertices;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(ScrubError::InvalidBoundary {
                reason: format!("boundary needs at least 3 vertices, found {}", vertices.len()),
            });
        }

        let exterior: LineString<f64> = vertices.into_iter().map(Coord::from).collect();
        Ok(Self { polygon: Polygon::new(exterior, vec![]) })
    }

    /// Parse a boundary from JSON text.
    ///
    /// Accepts either an array of `[lon, lat]` pairs or a GeoJSON Polygon
    /// (as a bare geometry, a Feature, or the first polygon Feature of a
    /// FeatureCollection). Only the exterior ring is used.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ScrubError::InvalidBoundary { reason: format!("Failed to parse boundary JSON: {}", e) }
        })?;

        if json.is_array() {
            let pairs: Vec<(f64, f64)> = serde_json::from_value(json).map_err(|e| {
                ScrubError::InvalidBoundary {
                    reason: format!("Expected an array of [lon, lat] pairs: {}", e),
                }
            })?;
            return Self::new(pairs);
        }

        let geojson = geojson::GeoJson::from_json_value(json).map_err(|e| {
            ScrubError::InvalidBoundary { reason: format!("Failed to parse GeoJSON: {}", e) }
        })?;
        Self::from_geojson(&geojson)
    }

    fn from_geojson(geojson: &geojson::GeoJson) -> Result<Self> {
        let geometry = match geojson {
            geojson::GeoJson::Geometry(geom) => Some(geom),
            geojson::GeoJson::Feature(feature) => feature.geometry.as_ref(),
            geojson::GeoJson::FeatureCollection(fc) => fc
                .features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .find(|g| matches!(g.value, geojson::Value::Polygon(_))),
        };

        let rings = match geometry.map(|g| &g.value) {
            Some(geojson::Value::Polygon(rings)) => rings,
            _ => {
                return Err(ScrubError::InvalidBoundary {
                    reason: "GeoJSON does not contain a Polygon geometry".to_string(),
                })
            }
        };

        let exterior = rings.first().ok_or_else(|| ScrubError::InvalidBoundary {
            reason: "Polygon has no exterior ring".to_string(),
        })?;

        let vertices = exterior
            .iter()
            .map(|position| match (position.first(), position.get(1)) {
                (Some(lon), Some(lat)) => Ok((*lon, *lat)),
                _ => Err(ScrubError::InvalidBoundary {
                    reason: "Polygon position needs longitude and latitude".to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(vertices)
    }

    /// Whether the point lies inside the boundary or on its edge
    pub fn contains_point(&self, longitude: f64, latitude: f64) -> bool {
        self.polygon.intersects(&Point::new(longitude, latitude))
    }

    /// Distinct vertices in ring order (without the closing vertex)
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        let ring = &self.polygon.exterior().0;
        ring.iter().take(ring.len().saturating_sub(1)).map(|c| (c.x, c.y)).collect()
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.polygon.bounding_rect()
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }
}

//! Sample points and datasets
//!
//! A dataset is an ordered list of geotagged samples, each carrying a map of
//! named attributes. Order only matters for cross-validation fold assignment.

mod demo;

pub use demo::demo_dataset;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::grid::LatLng;
use crate::result::AnalysisType;

/// Minimum number of samples an analysis accepts.
pub const MIN_POINTS: usize = 3;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric view of the attribute.
    ///
    /// Text that parses as a float counts as numeric.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            AttributeValue::Number(v) => *v,
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

/// A geotagged sample measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
}

impl SamplePoint {
    /// Create a sample with no attributes
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Numeric value of an attribute, if present and numeric
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AttributeValue::as_f64)
    }

    pub fn location(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Short description of a dataset, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub points: usize,
    pub variables: Vec<String>,
    pub numeric_variables: Vec<String>,
}

/// Samples plus the variable selection for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub points: Vec<SamplePoint>,
    pub target_variable: String,
    #[serde(default)]
    pub predictor_variables: BTreeSet<String>,
}

impl Dataset {
    pub fn new(points: Vec<SamplePoint>, target_variable: impl Into<String>) -> Self {
        Self {
            points,
            target_variable: target_variable.into(),
            predictor_variables: BTreeSet::new(),
        }
    }

    /// Replace the predictor selection
    pub fn with_predictors<I, S>(mut self, predictors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predictor_variables = predictors.into_iter().map(Into::into).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Target value of the point at `index`, if numeric
    pub fn numeric_value(&self, index: usize) -> Option<f64> {
        self.points
            .get(index)
            .and_then(|p| p.numeric(&self.target_variable))
    }

    /// Iterate `(location, target value)` over points with a numeric target
    pub fn numeric_samples(&self) -> impl Iterator<Item = (LatLng, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.numeric(&self.target_variable).map(|v| (p.location(), v)))
    }

    pub fn locations(&self) -> Vec<LatLng> {
        self.points.iter().map(SamplePoint::location).collect()
    }

    /// Whether any point carries `name` in its attribute map
    pub fn has_variable(&self, name: &str) -> bool {
        self.points.iter().any(|p| p.attributes.contains_key(name))
    }

    /// Variables that are numeric on at least one point, sorted
    pub fn numeric_variables(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, bool> = BTreeMap::new();
        for p in &self.points {
            for (k, v) in &p.attributes {
                let numeric = seen.entry(k.as_str()).or_insert(false);
                *numeric |= v.as_f64().is_some();
            }
        }
        seen.into_iter()
            .filter(|(_, numeric)| *numeric)
            .map(|(k, _)| k.to_string())
            .collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let variables: BTreeSet<&str> = self
            .points
            .iter()
            .flat_map(|p| p.attributes.keys().map(String::as_str))
            .collect();
        DatasetSummary {
            points: self.points.len(),
            variables: variables.into_iter().map(str::to_string).collect(),
            numeric_variables: self.numeric_variables(),
        }
    }

    /// Derived solely from whether any predictor was selected
    pub fn analysis_type(&self) -> AnalysisType {
        if self.predictor_variables.is_empty() {
            AnalysisType::SingleVariable
        } else {
            AnalysisType::PredictorBased
        }
    }

    /// Check point count and that the target exists and is numeric somewhere.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() < MIN_POINTS {
            return Err(Error::TooFewPoints {
                found: self.points.len(),
                required: MIN_POINTS,
            });
        }
        if let Some(p) = self.points.iter().find(|p| !p.location().in_range()) {
            return Err(Error::invalid(
                "point",
                format!("({}, {})", p.lat, p.lng),
                "coordinates must be finite with |lat| <= 90 and |lng| <= 180",
            ));
        }
        if !self.has_variable(&self.target_variable) {
            return Err(Error::MissingVariable(self.target_variable.clone()));
        }
        if self.numeric_samples().next().is_none() {
            return Err(Error::NonNumericVariable(self.target_variable.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Dataset {
        Dataset::new(
            vec![
                SamplePoint::new(0.0, 0.0).with("ph", 6.5).with("crop", "Maize"),
                SamplePoint::new(0.0, 1.0).with("ph", "7.0"),
                SamplePoint::new(1.0, 0.0).with("ph", "n/a"),
            ],
            "ph",
        )
    }

    #[test]
    fn test_text_parses_as_number() {
        assert_eq!(AttributeValue::from("7.25").as_f64(), Some(7.25));
        assert_eq!(AttributeValue::from("Maize").as_f64(), None);
        assert_eq!(AttributeValue::Number(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_numeric_samples_skip_text() {
        let ds = tiny();
        let values: Vec<f64> = ds.numeric_samples().map(|(_, v)| v).collect();
        assert_eq!(values, vec![6.5, 7.0]);
        assert_eq!(ds.numeric_value(2), None);
    }

    #[test]
    fn test_summary() {
        let s = tiny().summary();
        assert_eq!(s.points, 3);
        assert_eq!(s.variables, vec!["crop".to_string(), "ph".to_string()]);
        assert_eq!(s.numeric_variables, vec!["ph".to_string()]);
    }

    #[test]
    fn test_analysis_type() {
        let ds = tiny();
        assert_eq!(ds.analysis_type(), AnalysisType::SingleVariable);
        let ds = ds.with_predictors(["crop"]);
        assert_eq!(ds.analysis_type(), AnalysisType::PredictorBased);
    }

    #[test]
    fn test_validate_errors() {
        let mut ds = tiny();
        ds.points.truncate(2);
        assert!(matches!(ds.validate(), Err(Error::TooFewPoints { found: 2, .. })));

        let ds = Dataset::new(tiny().points, "yield");
        assert_eq!(ds.validate(), Err(Error::MissingVariable("yield".into())));

        let ds = Dataset::new(tiny().points, "crop");
        assert_eq!(ds.validate(), Err(Error::NonNumericVariable("crop".into())));

        assert!(tiny().validate().is_ok());
    }

    #[test]
    fn test_validate_coordinate_range() {
        for (lat, lng) in [(1e16, 0.0), (90.5, 0.0), (0.0, -180.5), (f64::NAN, 0.0)] {
            let mut ds = tiny();
            ds.points[0].lat = lat;
            ds.points[0].lng = lng;
            assert!(
                matches!(ds.validate(), Err(Error::InvalidParameter { name: "point", .. })),
                "({lat}, {lng})"
            );
        }

        let mut ds = tiny();
        ds.points[0].lat = -90.0;
        ds.points[0].lng = 180.0;
        assert!(ds.validate().is_ok());
    }

    #[test]
    fn test_deserialize_untagged() {
        let json = r#"{
            "points": [{"lat": 1.0, "lng": 2.0, "attributes": {"a": 3.5, "b": "x"}}],
            "target_variable": "a"
        }"#;
        let ds: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(ds.points[0].numeric("a"), Some(3.5));
        assert_eq!(ds.points[0].get("b"), Some(&AttributeValue::Text("x".into())));
        assert!(ds.predictor_variables.is_empty());
    }
}

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An insulin treatment record. Timestamps are ISO-8601 with local offset.
///
/// Untagged on the wire: a record with `duration`/`absolute` is a temp
/// basal, one with `insulin` is a bolus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Treatment {
    TempBasal {
        created_at: String,
        /// Minutes. Zero cancels the running temp basal.
        duration: u32,
        /// Units per hour.
        absolute: f64,
    },
    Bolus {
        created_at: String,
        insulin: f64,
    },
}

impl Treatment {
    pub fn bolus(created_at: impl Into<String>, insulin: f64) -> Self {
        Self::Bolus {
            created_at: created_at.into(),
            insulin,
        }
    }

    pub fn temp_basal(created_at: impl Into<String>, duration: u32, absolute: f64) -> Self {
        Self::TempBasal {
            created_at: created_at.into(),
            duration,
            absolute,
        }
    }

    pub fn created_at(&self) -> &str {
        match self {
            Self::TempBasal { created_at, .. } | Self::Bolus { created_at, .. } => created_at,
        }
    }

    pub fn is_bolus(&self) -> bool {
        matches!(self, Self::Bolus { .. })
    }
}

/// One entry of a scheduled basal profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasalRate {
    /// Start of the slot as `HH:MM`.
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasalProfile {
    pub basal: Vec<BasalRate>,
}

/// Uploader/loop status record carrying battery level and predictions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(rename = "created_at")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader_battery: Option<u8>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_status: Option<LoopStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openaps: Option<OpenApsStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStatus {
    pub predicted: LoopPrediction,
}

/// A single predicted glucose curve, one value per five minutes from `startDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopPrediction {
    pub values: Vec<i64>,
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApsStatus {
    #[serde(default)]
    pub suggested: OpenApsSuggestion,
}

/// Named prediction curves (`IOB`, `COB`, `aCOB`, ...). An empty
/// suggestion is valid and means the loop ran without predicting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApsSuggestion {
    #[serde(rename = "predBGs", default, skip_serializing_if = "Option::is_none")]
    pub pred_bgs: Option<PredictionCurves>,
}

/// Named prediction curves kept in the order the rig reported them. The
/// watchface draws them in that order, so a sorted map would not do.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionCurves(Vec<(String, Vec<i64>)>);

impl PredictionCurves {
    /// Add a curve at the end, or replace an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<i64>) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = values,
            None => self.0.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[i64]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<i64>)> for PredictionCurves {
    fn from_iter<I: IntoIterator<Item = (N, Vec<i64>)>>(iter: I) -> Self {
        let mut curves = Self::default();
        for (name, values) in iter {
            curves.insert(name, values);
        }
        curves
    }
}

impl Serialize for PredictionCurves {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in &self.0 {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct CurvesVisitor;

impl<'de> Visitor<'de> for CurvesVisitor {
    type Value = PredictionCurves;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of curve name to predicted values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut curves = PredictionCurves::default();
        while let Some((name, values)) = access.next_entry::<String, Vec<i64>>()? {
            curves.insert(name, values);
        }
        Ok(curves)
    }
}

impl<'de> Deserialize<'de> for PredictionCurves {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CurvesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_treatments_pick_the_right_shape() {
        let parsed: Vec<Treatment> = serde_json::from_str(
            r#"[
                {"created_at": "2026-01-01T00:00:00+00:00", "insulin": 1.5},
                {"created_at": "2026-01-01T00:05:00+00:00", "duration": 30, "absolute": 0.8}
            ]"#,
        )
        .unwrap_or_default();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is_bolus());
        assert_eq!(
            parsed[1],
            Treatment::temp_basal("2026-01-01T00:05:00+00:00", 30, 0.8)
        );
    }

    #[test]
    fn loop_status_wire_names() {
        let status = DeviceStatus {
            created_at: "t".into(),
            loop_status: Some(LoopStatus {
                predicted: LoopPrediction {
                    values: vec![150, 125],
                    start_date: "t".into(),
                },
            }),
            ..DeviceStatus::default()
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap_or_default(),
            serde_json::json!({
                "created_at": "t",
                "loop": { "predicted": { "values": [150, 125], "startDate": "t" } },
            })
        );
    }

    #[test]
    fn empty_openaps_suggestion_round_trips() {
        let status: DeviceStatus = serde_json::from_str(
            r#"{"created_at": "t", "device": "openaps://rig", "openaps": {"suggested": {}}}"#,
        )
        .unwrap_or_default();
        let suggestion = status.openaps.map(|o| o.suggested);
        assert_eq!(suggestion, Some(OpenApsSuggestion::default()));
    }

    #[test]
    fn prediction_curves_keep_wire_order() {
        let curves: PredictionCurves = [
            ("COB", vec![1]),
            ("aCOB", vec![2]),
            ("IOB", vec![3]),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            serde_json::to_string(&curves).unwrap_or_default(),
            r#"{"COB":[1],"aCOB":[2],"IOB":[3]}"#
        );

        let parsed: PredictionCurves =
            serde_json::from_str(r#"{"ZT":[4],"IOB":[5],"COB":[6]}"#).unwrap_or_default();
        assert_eq!(parsed.names().collect::<Vec<_>>(), ["ZT", "IOB", "COB"]);
        assert_eq!(parsed.get("IOB"), Some(&[5][..]));
    }

    #[test]
    fn replacing_a_curve_keeps_its_position() {
        let mut curves: PredictionCurves =
            [("IOB", vec![1]), ("COB", vec![2])].into_iter().collect();
        curves.insert("IOB", vec![9, 9]);
        assert_eq!(curves.len(), 2);
        assert_eq!(curves.names().collect::<Vec<_>>(), ["IOB", "COB"]);
        assert_eq!(curves.get("IOB"), Some(&[9, 9][..]));
    }

    #[test]
    fn uploader_battery_is_camel_case() {
        let status = DeviceStatus {
            created_at: "t".into(),
            uploader_battery: Some(85),
            ..DeviceStatus::default()
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap_or_default(),
            serde_json::json!({ "created_at": "t", "uploaderBattery": 85 })
        );
    }
}

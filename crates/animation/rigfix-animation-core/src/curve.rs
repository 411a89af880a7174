//! Keyframe curves.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectRef;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Default,
    Once,
    Loop,
    PingPong,
    ClampForever,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightedMode {
    #[default]
    None,
    In,
    Out,
    Both,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
    #[serde(default = "default_weight")]
    pub in_weight: f32,
    #[serde(default = "default_weight")]
    pub out_weight: f32,
    #[serde(default)]
    pub weighted_mode: WeightedMode,
}

fn default_weight() -> f32 {
    1.0 / 3.0
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
            in_weight: default_weight(),
            out_weight: default_weight(),
            weighted_mode: WeightedMode::None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub keys: Vec<Keyframe>,
    #[serde(default)]
    pub pre_wrap: WrapMode,
    #[serde(default)]
    pub post_wrap: WrapMode,
}

impl Curve {
    pub fn new(keys: Vec<Keyframe>) -> Self {
        Self {
            keys,
            pre_wrap: WrapMode::Default,
            post_wrap: WrapMode::Default,
        }
    }

    /// Curve through `(time, value)` points with flat tangents.
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self::new(points.iter().map(|&(t, v)| Keyframe::new(t, v)).collect())
    }

    /// Copy with `offset` added to every key value. Time, tangents, weights and
    /// weighted mode are carried over unchanged.
    pub fn with_offset(&self, offset: f32) -> Self {
        Self {
            keys: self
                .keys
                .iter()
                .map(|k| Keyframe {
                    value: k.value + offset,
                    ..*k
                })
                .collect(),
            ..self.clone()
        }
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.keys.iter().map(|k| k.value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectKeyframe {
    pub time: f32,
    pub value: Option<ObjectRef>,
}

pub type ObjectCurve = Vec<ObjectKeyframe>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_preserves_key_metadata() {
        let mut curve = Curve::from_points(&[(0.0, 1.0), (1.0, 2.0)]);
        curve.keys[1].in_tangent = 0.5;
        curve.keys[1].weighted_mode = WeightedMode::Both;
        curve.post_wrap = WrapMode::Loop;

        let shifted = curve.with_offset(0.25);
        assert_eq!(shifted.values().collect::<Vec<_>>(), vec![1.25, 2.25]);
        assert_eq!(shifted.keys[1].time, 1.0);
        assert_eq!(shifted.keys[1].in_tangent, 0.5);
        assert_eq!(shifted.keys[1].weighted_mode, WeightedMode::Both);
        assert_eq!(shifted.post_wrap, WrapMode::Loop);
        assert_eq!(curve.keys[0].value, 1.0);
    }
}

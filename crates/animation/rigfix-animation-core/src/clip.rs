//! Animation clips: float and object-reference curves keyed by binding.

use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::curve::{Curve, ObjectCurve, WrapMode};
use crate::origin::AssetOrigin;

/// Axis-aligned bounds of the animated content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipSettings {
    #[serde(default)]
    pub loop_time: bool,
    #[serde(default)]
    pub start_time: f32,
    #[serde(default)]
    pub stop_time: f32,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub cycle_offset: f32,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            loop_time: false,
            start_time: 0.0,
            stop_time: 1.0,
            mirror: false,
            cycle_offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub time: f32,
    pub function: String,
    #[serde(default)]
    pub string_parameter: String,
    #[serde(default)]
    pub float_parameter: f32,
    #[serde(default)]
    pub int_parameter: i32,
}

fn default_frame_rate() -> f32 {
    60.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    #[serde(default)]
    pub wrap_mode: WrapMode,
    #[serde(default)]
    pub legacy: bool,
    #[serde(default)]
    pub local_bounds: Bounds,
    #[serde(default)]
    pub settings: ClipSettings,
    #[serde(default, with = "curve_map")]
    pub float_curves: IndexMap<Binding, Curve>,
    #[serde(default, with = "curve_map")]
    pub object_curves: IndexMap<Binding, ObjectCurve>,
    #[serde(default)]
    pub events: Vec<AnimationEvent>,
    #[serde(default)]
    pub origin: AssetOrigin,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_rate: default_frame_rate(),
            wrap_mode: WrapMode::Default,
            legacy: false,
            local_bounds: Bounds::default(),
            settings: ClipSettings::default(),
            float_curves: IndexMap::new(),
            object_curves: IndexMap::new(),
            events: Vec::new(),
            origin: AssetOrigin::Transient,
        }
    }

    pub fn with_origin(mut self, origin: AssetOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_float_curve(mut self, binding: Binding, curve: Curve) -> Self {
        self.set_float_curve(binding, curve);
        self
    }

    pub fn set_float_curve(&mut self, binding: Binding, curve: Curve) {
        self.float_curves.insert(binding, curve);
    }

    pub fn set_object_curve(&mut self, binding: Binding, curve: ObjectCurve) {
        self.object_curves.insert(binding, curve);
    }

    pub fn float_curve(&self, binding: &Binding) -> Option<&Curve> {
        self.float_curves.get(binding)
    }

    pub fn object_curve(&self, binding: &Binding) -> Option<&ObjectCurve> {
        self.object_curves.get(binding)
    }

    /// Every binding the clip animates, float curves first.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.float_curves.keys().chain(self.object_curves.keys())
    }

    /// Empty clip carrying this clip's playback metadata under a new name.
    /// Curves and events are not copied.
    pub fn empty_like(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_rate: self.frame_rate,
            wrap_mode: self.wrap_mode,
            legacy: self.legacy,
            local_bounds: self.local_bounds,
            settings: self.settings.clone(),
            ..Self::new("")
        }
    }
}

/// Serialize a `Binding`-keyed map as a sequence of `{ binding, curve }` entries.
mod curve_map {
    use indexmap::IndexMap;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::binding::Binding;

    #[derive(Serialize)]
    struct EntryRef<'a, C> {
        binding: &'a Binding,
        curve: &'a C,
    }

    #[derive(Deserialize)]
    struct Entry<C> {
        binding: Binding,
        curve: C,
    }

    pub fn serialize<S, C>(map: &IndexMap<Binding, C>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        C: Serialize,
    {
        serializer.collect_seq(map.iter().map(|(binding, curve)| EntryRef { binding, curve }))
    }

    pub fn deserialize<'de, D, C>(deserializer: D) -> Result<IndexMap<Binding, C>, D::Error>
    where
        D: Deserializer<'de>,
        C: DeserializeOwned,
    {
        let entries: Vec<Entry<C>> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.binding, e.curve)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::property;

    #[test]
    fn curve_maps_round_trip_as_entry_lists() {
        let clip = Clip::new("walk")
            .with_float_curve(
                Binding::transform("Root/Leg", format!("{}.y", property::LOCAL_POSITION)),
                Curve::from_points(&[(0.0, 0.0), (1.0, 0.5)]),
            )
            .with_origin(AssetOrigin::persisted("Assets/Anim/walk.anim"));

        let json = serde_json::to_value(&clip).unwrap();
        assert!(json["float_curves"].is_array());
        assert_eq!(json["float_curves"][0]["binding"]["path"], "Root/Leg");

        let back: Clip = serde_json::from_value(json).unwrap();
        assert_eq!(back, clip);
    }

    #[test]
    fn empty_like_keeps_playback_metadata() {
        let mut clip = Clip::new("idle");
        clip.frame_rate = 30.0;
        clip.wrap_mode = WrapMode::Loop;
        clip.settings.loop_time = true;
        clip.events.push(AnimationEvent {
            time: 0.5,
            function: "Step".into(),
            string_parameter: String::new(),
            float_parameter: 0.0,
            int_parameter: 0,
        });
        clip.set_float_curve(Binding::transform("Hips", "m_LocalScale.x"), Curve::default());

        let copy = clip.empty_like("rebased idle");
        assert_eq!(copy.name, "rebased idle");
        assert_eq!(copy.frame_rate, 30.0);
        assert_eq!(copy.wrap_mode, WrapMode::Loop);
        assert!(copy.settings.loop_time);
        assert!(copy.float_curves.is_empty());
        assert!(copy.events.is_empty());
        assert_eq!(copy.origin, AssetOrigin::Transient);
    }
}

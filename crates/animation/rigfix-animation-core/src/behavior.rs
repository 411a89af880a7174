//! State machine behaviors as tagged variants.
//!
//! Only kinds the cloner understands carry typed payloads; everything else is kept as an
//! opaque blob with the object references it holds, so the clone walk can still follow them.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectRef;

/// Which playable a layer-control behavior drives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendableLayer {
    #[default]
    Action,
    Fx,
    Gesture,
    Additive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverOp {
    Set,
    Add,
    Random,
    Copy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub op: DriverOp,
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    /// Fades another layer's weight. `layer` is an index into the owning controller's layers.
    LayerControl {
        playable: BlendableLayer,
        layer: i32,
        goal_weight: f32,
        blend_duration: f32,
    },
    ParameterDriver {
        entries: Vec<DriverEntry>,
        #[serde(default)]
        local_only: bool,
    },
    Opaque {
        type_name: String,
        #[serde(default)]
        payload: serde_json::Value,
        #[serde(default)]
        references: Vec<ObjectRef>,
    },
}

impl Behavior {
    pub fn layer_control(playable: BlendableLayer, layer: i32) -> Self {
        Behavior::LayerControl {
            playable,
            layer,
            goal_weight: 1.0,
            blend_duration: 0.0,
        }
    }

    /// Layer index this behavior targets, if any.
    pub fn target_layer(&self) -> Option<(BlendableLayer, i32)> {
        match self {
            Behavior::LayerControl { playable, layer, .. } => Some((*playable, *layer)),
            _ => None,
        }
    }

    pub fn references(&self) -> &[ObjectRef] {
        match self {
            Behavior::Opaque { references, .. } => references,
            _ => &[],
        }
    }

    pub fn references_mut(&mut self) -> Option<&mut Vec<ObjectRef>> {
        match self {
            Behavior::Opaque { references, .. } => Some(references),
            _ => None,
        }
    }
}

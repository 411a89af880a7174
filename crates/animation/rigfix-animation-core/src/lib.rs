//! rigfix animation core (engine-agnostic)
//!
//! Keyframe clips and hierarchical animation controllers. Clips hold float and
//! object-reference curves keyed by [`Binding`]; controllers are graphs of layers, state
//! machines, states, transitions, blend trees and behaviors. Everything lives in an
//! [`AssetStore`] arena addressed by typed ids, so shared and cyclic references are plain
//! id copies. [`AssetOrigin`] separates persisted assets from transient ones.

pub mod asset;
pub mod behavior;
pub mod binding;
pub mod clip;
pub mod controller;
pub mod curve;
pub mod error;
pub mod ids;
pub mod origin;
pub mod store;

// Re-exports for consumers
pub use asset::{AssetKind, OpaqueAsset};
pub use behavior::{Behavior, BlendableLayer, DriverEntry, DriverOp};
pub use binding::{property, Axis, Binding, CurveKind, PropertyOwner};
pub use clip::{AnimationEvent, Bounds, Clip, ClipSettings};
pub use controller::{
    BlendTree, BlendType, BlendingMode, ChildMotion, Condition, ConditionMode, Controller,
    Destination, Layer, OverrideController, Parameter, ParameterKind, State, StateMachine,
    Transition, NO_SYNCED_LAYER,
};
pub use curve::{Curve, Keyframe, ObjectCurve, ObjectKeyframe, WeightedMode, WrapMode};
pub use error::AssetError;
pub use ids::{
    AnyController, AssetId, BehaviorId, BlendTreeId, ClipId, ControllerId, IdAllocator, Motion,
    ObjectRef, OverrideControllerId, StateId, StateMachineId, TransitionId,
};
pub use origin::{AssetContainer, AssetOrigin};
pub use store::AssetStore;

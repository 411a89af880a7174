//! Identifiers and a simple allocator for arena objects.

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

macro_rules! arena_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
            pub struct $name(pub u32);

            impl From<u32> for $name {
                #[inline]
                fn from(raw: u32) -> Self {
                    $name(raw)
                }
            }
        )*
    };
}

arena_id!(
    ClipId,
    BlendTreeId,
    StateId,
    StateMachineId,
    TransitionId,
    BehaviorId,
    ControllerId,
    OverrideControllerId,
    /// Leaf asset the animation graph only references (textures, masks, scripts...).
    AssetId,
);

/// Monotonic allocator shared by every object kind of one store.
/// Ids are unique across kinds, which keeps debug output unambiguous.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc<I: From<u32>>(&mut self) -> I {
        let id = I::from(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Reference to any object living in an [`crate::AssetStore`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ObjectRef {
    Clip(ClipId),
    BlendTree(BlendTreeId),
    State(StateId),
    StateMachine(StateMachineId),
    Transition(TransitionId),
    Behavior(BehaviorId),
    Controller(ControllerId),
    OverrideController(OverrideControllerId),
    Asset(AssetId),
}

/// What a state plays: a single clip or a blend construct over other motions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Motion {
    Clip(ClipId),
    BlendTree(BlendTreeId),
}

impl From<Motion> for ObjectRef {
    fn from(m: Motion) -> Self {
        match m {
            Motion::Clip(c) => ObjectRef::Clip(c),
            Motion::BlendTree(b) => ObjectRef::BlendTree(b),
        }
    }
}

macro_rules! object_ref_variants {
    ($($variant:ident($id:ident)),* $(,)?) => {
        $(
            impl From<$id> for ObjectRef {
                #[inline]
                fn from(id: $id) -> Self {
                    ObjectRef::$variant(id)
                }
            }

            impl TryFrom<ObjectRef> for $id {
                type Error = AssetError;

                fn try_from(obj: ObjectRef) -> Result<Self, AssetError> {
                    match obj {
                        ObjectRef::$variant(id) => Ok(id),
                        found => Err(AssetError::UnexpectedKind {
                            expected: stringify!($variant),
                            found,
                        }),
                    }
                }
            }
        )*
    };
}

object_ref_variants!(
    Clip(ClipId),
    BlendTree(BlendTreeId),
    State(StateId),
    StateMachine(StateMachineId),
    Transition(TransitionId),
    Behavior(BehaviorId),
    Controller(ControllerId),
    OverrideController(OverrideControllerId),
    Asset(AssetId),
);

impl TryFrom<ObjectRef> for Motion {
    type Error = AssetError;

    fn try_from(obj: ObjectRef) -> Result<Self, AssetError> {
        match obj {
            ObjectRef::Clip(id) => Ok(Motion::Clip(id)),
            ObjectRef::BlendTree(id) => Ok(Motion::BlendTree(id)),
            found => Err(AssetError::UnexpectedKind {
                expected: "Motion",
                found,
            }),
        }
    }
}

/// A controller slot: either a plain controller or an override variant of one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AnyController {
    Animator(ControllerId),
    Override(OverrideControllerId),
}

impl From<AnyController> for ObjectRef {
    fn from(c: AnyController) -> Self {
        match c {
            AnyController::Animator(id) => ObjectRef::Controller(id),
            AnyController::Override(id) => ObjectRef::OverrideController(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic_across_kinds() {
        let mut alloc = IdAllocator::new();
        let a: ClipId = alloc.alloc();
        let b: StateId = alloc.alloc();
        let c: ClipId = alloc.alloc();
        assert_eq!(a, ClipId(0));
        assert_eq!(b, StateId(1));
        assert_eq!(c, ClipId(2));
        alloc.reset();
        assert_eq!(alloc.alloc::<ClipId>(), ClipId(0));
    }

    #[test]
    fn typed_conversion_rejects_other_kinds() {
        let obj = ObjectRef::from(StateId(4));
        assert_eq!(StateId::try_from(obj), Ok(StateId(4)));
        assert!(matches!(
            ClipId::try_from(obj),
            Err(AssetError::UnexpectedKind { expected: "Clip", .. })
        ));
        assert_eq!(Motion::try_from(ObjectRef::Clip(ClipId(1))), Ok(Motion::Clip(ClipId(1))));
        assert!(Motion::try_from(obj).is_err());
    }
}

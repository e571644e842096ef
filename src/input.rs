use bevy_math::Vec2;

use crate::entities::Loadout;

/// One tick's worth of input. Held keys are levels; everything else is an
/// edge that fired since the previous tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    /// Pointer position in view space (world units relative to the camera).
    pub pointer: Option<Vec2>,
    pub jump: bool,
    pub dash: bool,
    pub fire_left: bool,
    pub fire_right: bool,
    pub switch_loadout: Option<Loadout>,
}

impl InputFrame {
    /// Horizontal intent: -1, 0 or +1. Right wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

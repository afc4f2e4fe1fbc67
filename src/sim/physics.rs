//! Character integration: gravity, jump and double jump
//!
//! Explicit Euler, one step per tick. Motion is normalized to a 16 ms frame
//! so the feel does not depend on the display refresh rate.

use super::state::{Character, JumpState};
use crate::consts::FRAME_MS;

/// Which jump fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Single,
    Double,
}

impl Character {
    /// Apply a jump impulse if one is available
    pub fn jump(&mut self, jump_strength: f32, double_jump_factor: f32) -> Option<Jump> {
        match self.jump_state {
            JumpState::Grounded => {
                self.vel_y = -jump_strength;
                self.jump_state = JumpState::Airborne { double_jump: true };
                Some(Jump::Single)
            }
            JumpState::Airborne { double_jump: true } => {
                self.vel_y = -jump_strength * double_jump_factor;
                self.jump_state = JumpState::Airborne { double_jump: false };
                Some(Jump::Double)
            }
            JumpState::Airborne { double_jump: false } => None,
        }
    }

    /// Integrate one tick of `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: f32, gravity: f32) {
        let frames = elapsed_ms / FRAME_MS;
        self.vel_y += gravity * frames;
        self.pos.y += self.vel_y * frames;

        if self.pos.y >= self.rest_y {
            self.land();
        }
    }

    fn land(&mut self) {
        self.pos.y = self.rest_y;
        self.vel_y = 0.0;
        self.jump_state = JumpState::Grounded;
    }
}

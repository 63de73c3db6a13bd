//! The two-road traffic-light controller.
//!
//! The two roads always show opposite states.  At the start of every tick
//! whose index is a multiple of `t_green` (tick 0 included) both lights flip
//! together, giving a full cycle of `2 * t_green` ticks synchronised to the
//! start of the simulation.

use ix_core::{LightState, Road, Tick};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficLights {
    states:  [LightState; 2],
    t_green: u64,
}

impl TrafficLights {
    /// Initial state: R1 green, R2 red.
    pub fn new(t_green: u64) -> Self {
        Self {
            states: [LightState::Green, LightState::Red],
            t_green,
        }
    }

    /// Apply the toggle rule for `tick`.  Returns `true` if the lights flipped.
    pub fn update(&mut self, tick: Tick) -> bool {
        if tick.is_multiple_of(self.t_green) {
            self.states = [self.states[0].flipped(), self.states[1].flipped()];
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn state(&self, road: Road) -> LightState {
        self.states[road.index()]
    }

    #[inline]
    pub fn is_red(&self, road: Road) -> bool {
        self.state(road).is_red()
    }

    /// `[R1, R2]` states.
    #[inline]
    pub fn pair(&self) -> [LightState; 2] {
        self.states
    }

    pub fn t_green(&self) -> u64 {
        self.t_green
    }
}

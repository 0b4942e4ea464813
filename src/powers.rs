//! Extension points for time powers and bosses.
//!
//! Both exist in the game as labels only: a level may grant a time power and
//! levels 5 and 10 flag a boss, but neither has an effect yet. The hooks
//! receive the session read-only; the default implementations log and do
//! nothing.

use crate::entities::Session;
use crate::level::TimePower;
use crate::render::Surface;

pub trait TimePowerEffect {
    fn activate(&mut self, power: TimePower, session: &Session) {
        tracing::debug!(
            target: "powers",
            power = power.label(),
            level = session.current_level,
            "time power has no effect"
        );
    }
}

pub trait BossBehavior {
    fn update(&mut self, _session: &Session) {}

    fn draw(&self, _surface: &mut dyn Surface, _session: &Session) {}
}

/// Default time power: logs the activation only.
#[derive(Debug, Default)]
pub struct Inert;

impl TimePowerEffect for Inert {}

/// Default boss: never moves, never drawn.
#[derive(Debug, Default)]
pub struct Dormant;

impl BossBehavior for Dormant {}

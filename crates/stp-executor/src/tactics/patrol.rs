use stp_core::{PlayerData, PlayerId};

use super::{closest_to, Tactic, TacticCtx};
use crate::{
    actions::{ActionProgress, GoTo},
    invoke_action, Coordinate, Primitive, WorldView,
};

/// Walks a list of coordinates in order, looping back to the first.
pub struct Patrol {
    waypoints: Vec<Coordinate>,
    leg: usize,
    laps: Option<u32>,
    completed_laps: u32,
}

impl Patrol {
    pub fn new(waypoints: Vec<Coordinate>) -> Self {
        Self {
            waypoints,
            leg: 0,
            laps: None,
            completed_laps: 0,
        }
    }

    /// Stop after this many laps, making the tactic done.
    pub fn laps(mut self, laps: u32) -> Self {
        self.laps = Some(laps);
        self
    }

    fn finished(&self) -> bool {
        self.waypoints.is_empty() || self.laps.is_some_and(|laps| self.completed_laps >= laps)
    }
}

impl Tactic for Patrol {
    fn description(&self) -> String {
        format!("patrol leg {}/{}", self.leg + 1, self.waypoints.len())
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        match self.waypoints.get(self.leg) {
            Some(waypoint) => closest_to(candidates, waypoint.evaluate(view)),
            None => candidates.first().map(|p| p.id),
        }
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        // Each leg is one action, keyed by the leg index. Finishing a leg forgets it so
        // the next lap starts fresh.
        for _ in 0..self.waypoints.len() {
            if self.finished() {
                break;
            }
            let leg = self.leg;
            let dest = self.waypoints[leg].clone();
            match invoke_action!(ctx, leg, GoTo::new(dest)) {
                ActionProgress::Continue(primitive) => return primitive,
                ActionProgress::Done(_) => {
                    ctx.actions.remove(&leg.to_string());
                    self.leg = (leg + 1) % self.waypoints.len();
                    if self.leg == 0 {
                        self.completed_laps += 1;
                    }
                }
            }
        }
        Primitive::Stop
    }

    fn done(&self, _player: &PlayerData, _view: &WorldView<'_>) -> bool {
        self.laps.is_some() && self.finished()
    }

    fn reset(&mut self) {
        self.leg = 0;
        self.completed_laps = 0;
    }
}

#[cfg(test)]
mod tests {
    use stp_core::{Vector2, WorldData};

    use super::*;
    use crate::tactics::{test_util::Harness, BoundTactic};

    fn harness_at(position: Vector2) -> Harness {
        Harness::new(WorldData::new(0.0).with_own_player(PlayerData::new(PlayerId::new(0), position)))
    }

    #[test]
    fn advances_legs_and_loops() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1000.0, 0.0);
        let mut patrol = BoundTactic::new(Box::new(Patrol::new(vec![a.into(), b.into()])));

        // At `a`: the first leg finishes at once and the second one starts.
        let at_a = harness_at(a);
        assert!(matches!(
            at_a.execute(&mut patrol, 0),
            Primitive::MoveTo { dest, .. } if dest == b
        ));
        assert_eq!(patrol.description(), "patrol leg 2/2");

        // At `b`: loops back to `a`.
        let at_b = harness_at(b);
        assert!(matches!(
            at_b.execute(&mut patrol, 0),
            Primitive::MoveTo { dest, .. } if dest == a
        ));
        assert_eq!(patrol.description(), "patrol leg 1/2");
        assert!(!patrol.done(&at_b.view()));
    }

    #[test]
    fn new_robot_starts_from_the_first_leg() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1000.0, 0.0);
        let mut patrol = BoundTactic::new(Box::new(Patrol::new(vec![a.into(), b.into()])));
        harness_at(a).execute(&mut patrol, 0);
        assert_eq!(patrol.description(), "patrol leg 2/2");

        let other = Harness::new(WorldData::new(0.0).with_own_player(PlayerData::new(
            PlayerId::new(1),
            Vector2::new(0.0, -1000.0),
        )));
        assert!(matches!(
            other.execute(&mut patrol, 0),
            Primitive::MoveTo { dest, .. } if dest == a
        ));
        assert_eq!(patrol.description(), "patrol leg 1/2");
    }

    #[test]
    fn laps_restart_after_unbinding() {
        let a = Vector2::new(0.0, 0.0);
        let h = harness_at(a);
        let mut patrol = BoundTactic::new(Box::new(Patrol::new(vec![a.into()]).laps(1)));
        h.execute(&mut patrol, 0);
        assert!(patrol.done(&h.view()));

        patrol.unbind();
        patrol.bind(PlayerId::new(0));
        assert!(!patrol.done(&h.view()));
    }

    #[test]
    fn done_after_requested_laps() {
        let a = Vector2::new(0.0, 0.0);
        let h = harness_at(a);
        let mut patrol = BoundTactic::new(Box::new(Patrol::new(vec![a.into()]).laps(1)));
        assert!(!patrol.done(&h.view()));
        assert_eq!(h.execute(&mut patrol, 0), Primitive::Stop);
        assert!(patrol.done(&h.view()));
    }
}

use std::sync::Arc;

use anyhow::{anyhow, Result};
use stp_core::WorldData;

use crate::tactics::Tactic;

/// What a running play's termination predicates get to see.
pub struct PlayCtx<'a> {
    pub world: &'a WorldData,
    /// Index of the current step in the role sequences.
    pub step: usize,
    /// Seconds since the play was selected.
    pub elapsed: f64,
}

type WorldPredicate = Arc<dyn Fn(&WorldData) -> bool + Send + Sync>;
type PlayPredicate = Arc<dyn Fn(&PlayCtx<'_>) -> bool + Send + Sync>;
type AssignFn = Arc<dyn Fn(&WorldData, &mut RoleSequences) + Send + Sync>;

/// The tactic sequences a play hands out: one for the goalie and one for each of the
/// four field roles. Each sequence is indexed by the executor's step.
#[derive(Default)]
pub struct RoleSequences {
    pub goalie: Vec<Box<dyn Tactic>>,
    pub roles: [Vec<Box<dyn Tactic>>; 4],
}

impl RoleSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tactic to the goalie sequence.
    pub fn goalie(&mut self, tactic: impl Tactic + 'static) -> &mut Self {
        self.goalie.push(Box::new(tactic));
        self
    }

    /// Appends a tactic to field role `role` (0 to 3).
    pub fn role(&mut self, role: usize, tactic: impl Tactic + 'static) -> &mut Self {
        self.roles[role].push(Box::new(tactic));
        self
    }

    /// The five sequences in slot order, goalie first.
    pub fn into_slots(self) -> [Vec<Box<dyn Tactic>>; 5] {
        let [r0, r1, r2, r3] = self.roles;
        [self.goalie, r0, r1, r2, r3]
    }
}

/// A team-wide strategy: guards, termination predicates and the role assignment.
#[derive(Clone)]
pub struct Play {
    name: String,
    invariant: WorldPredicate,
    applicable: WorldPredicate,
    done: PlayPredicate,
    fail: PlayPredicate,
    assign: AssignFn,
}

impl std::fmt::Debug for Play {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Play {{ name: {} }}", self.name)
    }
}

impl Play {
    pub fn builder(name: impl Into<String>) -> PlayBuilder {
        PlayBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the play may run at all in this world.
    pub fn invariant(&self, world: &WorldData) -> bool {
        (self.invariant)(world)
    }

    /// Whether the play should be started now.
    pub fn applicable(&self, world: &WorldData) -> bool {
        (self.applicable)(world)
    }

    pub fn done(&self, ctx: &PlayCtx<'_>) -> bool {
        (self.done)(ctx)
    }

    pub fn fail(&self, ctx: &PlayCtx<'_>) -> bool {
        (self.fail)(ctx)
    }

    /// Builds fresh tactic sequences for a new run of the play.
    pub fn assign(&self, world: &WorldData) -> RoleSequences {
        let mut sequences = RoleSequences::new();
        (self.assign)(world, &mut sequences);
        sequences
    }
}

fn always(_: &WorldData) -> bool {
    true
}

fn never(_: &PlayCtx<'_>) -> bool {
    false
}

/// Builder for creating plays with a fluent API
#[derive(Clone)]
pub struct PlayBuilder {
    name: String,
    invariant: Option<WorldPredicate>,
    applicable: Option<WorldPredicate>,
    done: Option<PlayPredicate>,
    fail: Option<PlayPredicate>,
    assign: Option<AssignFn>,
}

impl PlayBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invariant: None,
            applicable: None,
            done: None,
            fail: None,
            assign: None,
        }
    }

    /// Set the eligibility precondition. Defaults to always true.
    pub fn invariant(
        &mut self,
        f: impl Fn(&WorldData) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.invariant = Some(Arc::new(f));
        self
    }

    /// Set the trigger that starts the play. Required.
    pub fn applicable(
        &mut self,
        f: impl Fn(&WorldData) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.applicable = Some(Arc::new(f));
        self
    }

    /// Set the success condition. Defaults to never.
    pub fn done(&mut self, f: impl Fn(&PlayCtx<'_>) -> bool + Send + Sync + 'static) -> &mut Self {
        self.done = Some(Arc::new(f));
        self
    }

    /// Set the failure condition. Defaults to never.
    pub fn fail(&mut self, f: impl Fn(&PlayCtx<'_>) -> bool + Send + Sync + 'static) -> &mut Self {
        self.fail = Some(Arc::new(f));
        self
    }

    /// Set the role assignment. Required.
    pub fn assign(
        &mut self,
        f: impl Fn(&WorldData, &mut RoleSequences) + Send + Sync + 'static,
    ) -> &mut Self {
        self.assign = Some(Arc::new(f));
        self
    }

    /// Build the play
    pub fn build(&self) -> Result<Play> {
        let applicable = self
            .applicable
            .clone()
            .ok_or_else(|| anyhow!("Play '{}' missing applicable predicate", self.name))?;
        let assign = self
            .assign
            .clone()
            .ok_or_else(|| anyhow!("Play '{}' missing assignment", self.name))?;

        Ok(Play {
            name: self.name.clone(),
            invariant: self
                .invariant
                .clone()
                .unwrap_or_else(|| Arc::new(always)),
            applicable,
            done: self
                .done
                .clone()
                .unwrap_or_else(|| Arc::new(never)),
            fail: self
                .fail
                .clone()
                .unwrap_or_else(|| Arc::new(never)),
            assign,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::{Idle, Move};

    #[test]
    fn builder_requires_applicable_and_assign() {
        let err = Play::builder("empty").build().unwrap_err();
        assert!(err.to_string().contains("applicable"));

        let mut builder = Play::builder("no assign");
        builder.applicable(|_| true);
        assert!(builder.build().unwrap_err().to_string().contains("assignment"));
    }

    #[test]
    fn defaults_and_assignment() {
        let mut builder = Play::builder("hold");
        builder.applicable(|w| w.own_players.len() > 1).assign(|_, roles| {
            roles
                .goalie(Idle::new())
                .role(2, Move::new(stp_core::Vector2::zeros()).as_active());
        });
        let play = builder.build().unwrap();
        let world = WorldData::new(0.0);
        let ctx = PlayCtx {
            world: &world,
            step: 0,
            elapsed: 0.0,
        };
        assert_eq!(play.name(), "hold");
        assert!(play.invariant(&world));
        assert!(!play.applicable(&world));
        assert!(!play.done(&ctx));
        assert!(!play.fail(&ctx));

        let slots = play.assign(&world).into_slots();
        let lens: Vec<usize> = slots.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 0, 0, 1, 0]);
        assert!(slots[3][0].active());
    }
}

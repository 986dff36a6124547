use std::sync::Arc;

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use stp_core::{
    roster_changes, ExecutorInfo, ExecutorSettings, GameState, PlayerData, PlayerId,
    RosterChange, SlotInfo, WorldData, ROLE_SLOTS,
};

use crate::{
    navigator::{Navigator, StraightLineNavigator},
    tactics::{BoundTactic, Idle},
    Assignment, MoveFlags, Play, PlayAbort, PlayCatalog, PlayCtx, PlayerCommand, PlayerCommands,
    WorldView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    NoPlay,
    Running,
}

/// One of the five role slots of a running play.
struct RoleSlot {
    sequence: Vec<BoundTactic>,
    /// Index of the current tactic. Stays on the last one once the step runs past the
    /// end of the sequence.
    current: usize,
}

impl RoleSlot {
    fn current(&self) -> &BoundTactic {
        &self.sequence[self.current]
    }

    fn current_mut(&mut self) -> &mut BoundTactic {
        &mut self.sequence[self.current]
    }
}

struct RunningPlay {
    play: Arc<Play>,
    slots: Vec<RoleSlot>,
    step: usize,
    /// Length of the longest role sequence.
    max_step: usize,
    started_at: f64,
}

impl RunningPlay {
    fn new(play: Arc<Play>, world: &WorldData) -> Self {
        let sequences = play.assign(world).into_slots();
        let max_step = sequences.iter().map(Vec::len).max().unwrap_or(0);
        let slots = sequences
            .into_iter()
            .map(|tactics| {
                let mut sequence: Vec<BoundTactic> =
                    tactics.into_iter().map(BoundTactic::new).collect();
                if sequence.is_empty() {
                    sequence.push(BoundTactic::new(Box::new(Idle::new())));
                }
                RoleSlot {
                    sequence,
                    current: 0,
                }
            })
            .collect();
        Self {
            play,
            slots,
            step: 0,
            max_step,
            started_at: world.t_received,
        }
    }

    fn ctx<'a>(&self, world: &'a WorldData) -> PlayCtx<'a> {
        PlayCtx {
            world,
            step: self.step,
            elapsed: world.t_received - self.started_at,
        }
    }

    fn advance_step(&mut self) -> Result<(), PlayAbort> {
        self.step += 1;
        if self.step >= self.max_step {
            return Err(PlayAbort::TacticsDone);
        }
        log::debug!("{}: step {}", self.play.name(), self.step);
        Ok(())
    }
}

/// Selects plays from a catalog and drives them, one cycle per [`Executor::tick`].
pub struct Executor {
    catalog: PlayCatalog,
    settings: ExecutorSettings,
    navigator: Box<dyn Navigator>,
    rng: StdRng,
    running: Option<RunningPlay>,
    assignment: Assignment,
    active_slot: Option<usize>,
    known_roster: Vec<PlayerId>,
    forced_play: Option<String>,
    last_abort: Option<PlayAbort>,
}

impl Executor {
    pub fn new(catalog: PlayCatalog, settings: ExecutorSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            navigator: Box::new(StraightLineNavigator::new(&settings.navigator)),
            settings,
            rng,
            running: None,
            assignment: Assignment::default(),
            active_slot: None,
            known_roster: Vec::new(),
            forced_play: None,
            last_abort: None,
        }
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    /// Runs one control cycle and returns the commands for our robots.
    ///
    /// Never fails: problems with the running play are logged and the play is
    /// discarded, to be replaced on the next cycle.
    pub fn tick(&mut self, world: &WorldData) -> PlayerCommands {
        let mut commands = PlayerCommands::new();

        self.track_roster(world);
        if world.own_players.is_empty() {
            self.abort(PlayAbort::RosterChanged);
            return commands;
        }
        if self.settings.halt_overrides && world.game_state() == GameState::Halt {
            self.abort(PlayAbort::Halted);
            return commands;
        }

        if let Some(reason) = self.check_running(world) {
            self.abort(reason);
        }
        if self.running.is_none() {
            self.calc_play(world);
        }
        let Some(mut running) = self.running.take() else {
            log::warn!("No applicable play");
            return commands;
        };

        let result = self.execute_tactics(&mut running, world, &mut commands);
        self.running = Some(running);
        if let Err(reason) = result {
            self.abort(reason);
        }
        commands
    }

    pub fn state(&self) -> ExecutorState {
        if self.running.is_some() {
            ExecutorState::Running
        } else {
            ExecutorState::NoPlay
        }
    }

    pub fn current_play(&self) -> Option<&str> {
        self.running.as_ref().map(|r| r.play.name())
    }

    pub fn step(&self) -> Option<usize> {
        self.running.as_ref().map(|r| r.step)
    }

    /// Robots bound to the role slots in the last cycle.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// The robot running the active tactic.
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_slot
            .and_then(|slot| self.assignment.player(slot))
    }

    pub fn last_abort(&self) -> Option<PlayAbort> {
        self.last_abort
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &PlayCatalog {
        &self.catalog
    }

    /// Pins selection to one play, or releases the pin with `None`. A pinned play is
    /// started regardless of its `applicable` predicate and its enabled flag.
    pub fn force_play(&mut self, name: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            if self.catalog.get(name).is_none() {
                bail!("Unknown play '{}'", name);
            }
            log::info!("Forcing play {}", name);
        } else if self.forced_play.is_some() {
            log::info!("Releasing forced play");
        }
        self.forced_play = name.map(ToOwned::to_owned);
        Ok(())
    }

    pub fn set_play_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.catalog.set_enabled(name, enabled)
    }

    pub fn info(&self) -> ExecutorInfo {
        let last_abort = self.last_abort.map(|r| r.to_string());
        let Some(running) = &self.running else {
            return ExecutorInfo {
                last_abort,
                ..Default::default()
            };
        };
        let slots = running
            .slots
            .iter()
            .enumerate()
            .map(|(slot, role)| {
                let tactic = role.current();
                SlotInfo {
                    slot: slot as u32,
                    player: self.assignment.player(slot),
                    active: tactic.active(),
                    description: tactic.description(),
                }
            })
            .collect();
        ExecutorInfo {
            play: Some(running.play.name().to_owned()),
            step: running.step as u32,
            slots,
            active_player: self.active_player(),
            last_abort,
        }
    }

    fn track_roster(&mut self, world: &WorldData) {
        let changes = roster_changes(&self.known_roster, world);
        if changes.is_empty() {
            return;
        }
        for change in &changes {
            match change {
                RosterChange::Added(id) => log::info!("Robot {} joined", id),
                RosterChange::Removed(id) => log::info!("Robot {} left", id),
            }
        }
        self.known_roster = world.own_roster();
        self.abort(PlayAbort::RosterChanged);
    }

    /// Checks whether the running play should end before this cycle's assignment.
    fn check_running(&self, world: &WorldData) -> Option<PlayAbort> {
        let running = self.running.as_ref()?;
        let play = &running.play;
        let ctx = running.ctx(world);
        if !play.invariant(world) {
            return Some(PlayAbort::InvariantLost);
        }
        if play.done(&ctx) {
            return Some(PlayAbort::PlayDone);
        }
        if play.fail(&ctx) {
            return Some(PlayAbort::PlayFailed);
        }
        if let Some(limit) = self.settings.play_timeout_secs {
            if ctx.elapsed > limit {
                return Some(PlayAbort::Timeout);
            }
        }
        match &self.forced_play {
            Some(forced) if forced != play.name() => Some(PlayAbort::Overridden),
            _ => None,
        }
    }

    fn calc_play(&mut self, world: &WorldData) {
        let forced = self.forced_play.is_some();
        let mut plays: Vec<Arc<Play>> = match &self.forced_play {
            Some(name) => self.catalog.get(name).into_iter().collect(),
            None => self.catalog.enabled().collect(),
        };
        plays.shuffle(&mut self.rng);

        let ctx = PlayCtx {
            world,
            step: 0,
            elapsed: 0.0,
        };
        let chosen = plays.into_iter().find(|play| {
            if !play.invariant(world) || !(forced || play.applicable(world)) {
                return false;
            }
            if play.done(&ctx) {
                log::error!("Play applicable but done: {}", play.name());
                return false;
            }
            if play.fail(&ctx) {
                log::debug!("Play applicable but failed: {}", play.name());
                return false;
            }
            log::debug!("Play candidate: {}", play.name());
            true
        });

        if let Some(play) = chosen {
            log::info!("Play chosen: {}", play.name());
            self.clear_bindings();
            self.running = Some(RunningPlay::new(play, world));
        }
    }

    /// Binds robots, cascades through finished steps and executes every bound tactic.
    fn execute_tactics(
        &mut self,
        running: &mut RunningPlay,
        world: &WorldData,
        commands: &mut PlayerCommands,
    ) -> Result<(), PlayAbort> {
        let active = loop {
            let active = assign_roles(running, world, &self.settings, &mut self.assignment)?;
            self.active_slot = Some(active);

            let view = WorldView::new(world, &self.assignment, &self.settings);
            let tactic = running.slots[active].current();
            if tactic.fail(&view) {
                return Err(PlayAbort::ActiveFailed);
            }
            if !tactic.done(&view) {
                break active;
            }
            running.advance_step()?;
        };

        let field_flags = MoveFlags::for_field_slot(&world.current_game_state);
        let view = WorldView::new(world, &self.assignment, &self.settings);
        for (slot, role) in running.slots.iter_mut().enumerate() {
            let Some(id) = self.assignment.player(slot) else {
                continue;
            };
            let Some(player) = world.own_player(id) else {
                continue;
            };
            let flags = if slot == 0 {
                MoveFlags::NONE
            } else {
                field_flags
            };
            let primitive = role
                .current_mut()
                .execute(player, view, flags, self.navigator.as_ref());
            commands.emit(id, PlayerCommand { primitive, flags });
        }

        let tactic = running.slots[active].current();
        if tactic.fail(&view) {
            return Err(PlayAbort::ActiveFailed);
        }
        if tactic.done(&view) {
            running.advance_step()?;
        }
        Ok(())
    }

    fn clear_bindings(&mut self) {
        self.assignment = Assignment::default();
        self.active_slot = None;
    }

    /// Discards the running play, if any. Dropping it drops every tactic and their
    /// in-flight actions.
    fn abort(&mut self, reason: PlayAbort) {
        let Some(running) = self.running.take() else {
            return;
        };
        log::log!(reason.level(), "{}: {}", running.play.name(), reason);
        self.clear_bindings();
        self.last_abort = Some(reason);
    }
}

/// Binds the current step's tactics to robots and returns the active slot.
///
/// The goalie slot takes the configured goalie without consulting its tactic. Field
/// slots then pick in slot order from the robots nobody has claimed yet; once the pool
/// is empty the remaining slots stay unbound for the cycle.
fn assign_roles(
    running: &mut RunningPlay,
    world: &WorldData,
    settings: &ExecutorSettings,
    assignment: &mut Assignment,
) -> Result<usize, PlayAbort> {
    let step = running.step;
    let mut active = Vec::with_capacity(1);
    for (slot, role) in running.slots.iter_mut().enumerate() {
        if step < role.sequence.len() {
            if role.current != step {
                role.current_mut().unbind();
                role.current = step;
            }
        } else if role.current().active() {
            return Err(PlayAbort::ActiveExhausted { slot });
        }
        if role.current().active() {
            active.push(slot);
        }
    }
    if active.len() != 1 {
        return Err(PlayAbort::ActiveCount(active.len()));
    }
    let active_slot = active[0];

    *assignment = Assignment::default();
    let goalie = match settings.goalie.fixed_id() {
        None => world.own_players.first(),
        Some(id) => world.own_player(id),
    }
    .ok_or(PlayAbort::NoGoalie)?;
    running.slots[0].current_mut().bind(goalie.id);
    assignment.bind(0, goalie.id);

    let mut pool: Vec<&PlayerData> = world
        .own_players
        .iter()
        .filter(|p| p.id != goalie.id)
        .collect();
    let mut active_assigned = active_slot == 0;
    for slot in 1..ROLE_SLOTS {
        let tactic = running.slots[slot].current_mut();
        if pool.is_empty() {
            tactic.unbind();
            continue;
        }
        let view = WorldView::new(world, assignment, settings);
        let chosen = tactic
            .select(&pool, &view)
            .and_then(|id| pool.iter().position(|p| p.id == id));
        let Some(index) = chosen else {
            return Err(PlayAbort::SelectContract { slot });
        };
        let player = pool.remove(index);
        tactic.bind(player.id);
        assignment.bind(slot, player.id);
        active_assigned |= slot == active_slot;
    }

    if !active_assigned {
        return Err(PlayAbort::ActiveUnassigned);
    }
    Ok(active_slot)
}

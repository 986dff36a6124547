use stp_core::{ExecutorSettings, PlayerData, PlayerId, WorldData, ROLE_SLOTS};

/// The robot bound to a role slot in the current cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotBinding {
    Assigned(PlayerId),
    /// No robot was left for the slot.
    #[default]
    Unassigned,
}

impl SlotBinding {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            SlotBinding::Assigned(id) => Some(*id),
            SlotBinding::Unassigned => None,
        }
    }
}

/// Robots bound to the five role slots. Slot 0 is the goalie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assignment(pub [SlotBinding; ROLE_SLOTS]);

impl Assignment {
    pub fn player(&self, slot: usize) -> Option<PlayerId> {
        self.0.get(slot).and_then(SlotBinding::player)
    }

    /// The slot a robot is bound to.
    pub fn slot_of(&self, id: PlayerId) -> Option<usize> {
        self.0.iter().position(|b| *b == SlotBinding::Assigned(id))
    }

    pub fn bind(&mut self, slot: usize, id: PlayerId) {
        self.0[slot] = SlotBinding::Assigned(id);
    }

    pub fn assigned(&self) -> impl Iterator<Item = (usize, PlayerId)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(slot, b)| b.player().map(|id| (slot, id)))
    }
}

/// Everything a tactic or coordinate may look at during a cycle.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub world: &'a WorldData,
    pub assignment: &'a Assignment,
    pub settings: &'a ExecutorSettings,
}

impl<'a> WorldView<'a> {
    pub fn new(
        world: &'a WorldData,
        assignment: &'a Assignment,
        settings: &'a ExecutorSettings,
    ) -> Self {
        Self {
            world,
            assignment,
            settings,
        }
    }

    /// The robot currently bound to `slot`, if any.
    pub fn role_player(&self, slot: usize) -> Option<&'a PlayerData> {
        self.assignment
            .player(slot)
            .and_then(|id| self.world.own_player(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        let mut assignment = Assignment::default();
        assignment.bind(0, PlayerId::new(4));
        assignment.bind(2, PlayerId::new(1));
        assert_eq!(assignment.player(0), Some(PlayerId::new(4)));
        assert_eq!(assignment.player(1), None);
        assert_eq!(assignment.player(9), None);
        assert_eq!(assignment.slot_of(PlayerId::new(1)), Some(2));
        assert_eq!(assignment.slot_of(PlayerId::new(7)), None);
        assert_eq!(
            assignment.assigned().collect::<Vec<_>>(),
            vec![(0, PlayerId::new(4)), (2, PlayerId::new(1))]
        );
    }
}

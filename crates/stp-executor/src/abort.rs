use log::Level;

/// Why a running play was discarded.
///
/// None of these escape a cycle: the executor logs the reason, records it for
/// diagnostics and drops the play, and the next cycle selects a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAbort {
    /// The configured goalie is not on the field.
    NoGoalie,
    /// The current step does not have exactly one active tactic.
    ActiveCount(usize),
    /// A role sequence ran out and its last tactic, which would be reused, is active.
    ActiveExhausted { slot: usize },
    /// A tactic selected a robot that was not offered to it.
    SelectContract { slot: usize },
    /// The active tactic's slot got no robot.
    ActiveUnassigned,
    ActiveFailed,
    /// Every step of the play is done.
    TacticsDone,
    PlayDone,
    PlayFailed,
    InvariantLost,
    Timeout,
    RosterChanged,
    Halted,
    /// Another play was forced by the operator.
    Overridden,
}

impl PlayAbort {
    /// Level at which the abort is logged. Broken play definitions are errors, normal
    /// endings are informational.
    pub fn level(&self) -> Level {
        match self {
            PlayAbort::NoGoalie
            | PlayAbort::ActiveCount(_)
            | PlayAbort::ActiveExhausted { .. }
            | PlayAbort::SelectContract { .. }
            | PlayAbort::ActiveUnassigned => Level::Error,
            PlayAbort::ActiveFailed | PlayAbort::PlayFailed | PlayAbort::Timeout => Level::Warn,
            PlayAbort::TacticsDone
            | PlayAbort::PlayDone
            | PlayAbort::InvariantLost
            | PlayAbort::RosterChanged
            | PlayAbort::Halted
            | PlayAbort::Overridden => Level::Info,
        }
    }
}

impl std::fmt::Display for PlayAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayAbort::NoGoalie => write!(f, "no goalie with the configured id"),
            PlayAbort::ActiveCount(n) => write!(f, "{} active tactics, expected exactly 1", n),
            PlayAbort::ActiveExhausted { slot } => {
                write!(f, "slot {} ran out of tactics on an active one", slot)
            }
            PlayAbort::SelectContract { slot } => {
                write!(f, "slot {} selected a robot outside its pool", slot)
            }
            PlayAbort::ActiveUnassigned => write!(f, "active tactic not assigned"),
            PlayAbort::ActiveFailed => write!(f, "active tactic failed"),
            PlayAbort::TacticsDone => write!(f, "all tactics done"),
            PlayAbort::PlayDone => write!(f, "play done"),
            PlayAbort::PlayFailed => write!(f, "play failed"),
            PlayAbort::InvariantLost => write!(f, "play invariant no longer holds"),
            PlayAbort::Timeout => write!(f, "play timed out"),
            PlayAbort::RosterChanged => write!(f, "roster changed"),
            PlayAbort::Halted => write!(f, "halted"),
            PlayAbort::Overridden => write!(f, "another play was forced"),
        }
    }
}

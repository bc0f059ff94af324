/// Length of one round, in clock ticks.
pub const CLOCK_PERIOD: u8 = 100;
/// The only tick at which the player's hand is latched.
pub const CAPTURE_TICK: u8 = 60;
/// Once a round is resolved, the next one starts at this tick.
pub const ROUND_ADVANCE_TICK: u8 = 90;

/// Top level mode of the match, only changed by explicit commands (and by the
/// match ending, which pauses).
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum Phase {
    Stopped,
    Running,
    Paused,
}

/// What the match looks like from the outside.
///
/// `RoundEnded` and `MatchEnded` are never stored, they are derived from
/// [`Phase`] and the round/match flags.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum MatchStatus {
    Stopped,
    Running,
    Paused,
    /// Running, and the result of the current round is on screen
    RoundEnded,
    MatchEnded,
}

/// Stage of the current round, purely a function of the clock.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum SubPhase {
    /// `[0, 20)`
    GetReady,
    /// `[20, 30)`
    Rock,
    /// `[30, 40)`
    Paper,
    /// `[40, 50)`
    Scissors,
    /// `[50, 60)`
    Shoot,
    /// `60`, latch the player's and computer's moves
    Capture,
    /// `(60, 100)`, score the round once
    Resolve,
}
impl SubPhase {
    /// Clock values outside of `[0, 100)` are wrapped.
    pub fn at(clock: u8) -> Self {
        use SubPhase::*;
        match clock % CLOCK_PERIOD {
            0..=19 => GetReady,
            20..=29 => Rock,
            30..=39 => Paper,
            40..=49 => Scissors,
            50..=59 => Shoot,
            CAPTURE_TICK => Capture,
            _ => Resolve,
        }
    }
    /// Countdown text shown during this sub-phase, if it is fixed.
    pub fn banner(self) -> Option<&'static str> {
        use SubPhase::*;
        match self {
            Rock => Some("Rock"),
            Paper => Some("Paper"),
            Scissors => Some("Scissors"),
            Shoot => Some("Shoot!"),
            GetReady | Capture | Resolve => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_phase_boundaries() {
        use SubPhase::*;
        let expected = [
            (0, GetReady),
            (19, GetReady),
            (20, Rock),
            (29, Rock),
            (30, Paper),
            (40, Scissors),
            (49, Scissors),
            (50, Shoot),
            (59, Shoot),
            (60, Capture),
            (61, Resolve),
            (99, Resolve),
        ];
        for (clock, sub_phase) in expected {
            assert_eq!(sub_phase, SubPhase::at(clock), "clock {clock}");
        }
    }
    #[test]
    fn sub_phase_wraps_clock() {
        assert_eq!(SubPhase::GetReady, SubPhase::at(100));
        assert_eq!(SubPhase::Capture, SubPhase::at(160));
        assert_eq!(SubPhase::Shoot, SubPhase::at(255));
    }
}

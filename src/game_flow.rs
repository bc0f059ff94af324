//! Match flow driver, manages when moves are captured, how rounds are scored
//! and when the match ends.
//!
//! # Architecture
//!
//! This module does:
//! * Own the whole match state in the [`MatchController`] resource.
//! * Apply [`MatchCommand`]s (start, pause, reset) sent by the dashboard.
//! * Advance the round clock at a fixed rate and feed it, with the latest
//!   [`GestureReading`], to [`MatchController::tick`] (see [`drive_match`]).
//! * Publish the resulting [`MatchSnapshot`] as a resource, the only thing
//!   the dashboard reads.
//!
//! ## Round clock
//!
//! A round is 100 clock ticks. What happens on a tick only depends on the
//! clock value, see [`SubPhase`]:
//!
//! ```text
//!  0        20     30      40         50      60   61                90    100
//!  |Get Ready| Rock | Paper | Scissors | Shoot! | C |  Resolve (once)  |     |
//!                                                  |                  ↓
//!                                   latch player + computer moves   next round
//! ```
//!
//! The player's move is only latched at the capture tick (`C`). During the
//! resolve window, the first tick with exactly one hand visible scores the
//! round. The result stays on screen until the clock reaches 90, then the
//! clock goes back to 0 and the next round starts.
//!
//! If no valid hand was seen at the capture tick, the round cannot score: the
//! resolve window only asks for a hand, and the same round starts over once
//! the clock wraps.
//!
//! ## Match end
//!
//! The first side to win [`MatchRules::win_threshold`] rounds wins the match.
//! The match is then paused and stays ended until it is reset.
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use enum_map::EnumMap;

use crate::{
    gesture::{GestureReading, GestureSystem, LatestGesture},
    opponent::{MovePicker, RandomPicker},
    rules::{Move, RoundOutcome},
    state::{MatchStatus, Phase, SubPhase, CLOCK_PERIOD, ROUND_ADVANCE_TICK},
};

const IDLE_TEXT: &str = "Press Start to begin";
const FALLBACK_TEXT: &str = "Game paused or stopped";
const HAND_PROMPT: &str = "Show exactly one hand!";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MatchRules {
    /// Round wins needed to win the match.
    pub win_threshold: u32,
}
impl Default for MatchRules {
    fn default() -> Self {
        Self { win_threshold: 2 }
    }
}

/// A scored round.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoundRecord {
    pub round: u32,
    pub player: Move,
    pub computer: Move,
    pub outcome: RoundOutcome,
}

/// Everything the dashboard needs to draw a frame.
#[derive(Clone, PartialEq, Debug)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub clock: u8,
    pub player_move: Option<Move>,
    pub computer_move: Option<Move>,
    pub round: u32,
    pub player_score: u32,
    pub computer_score: u32,
    pub match_ended: bool,
    pub round_resolved: bool,
    pub win_threshold: u32,
    pub status_text: String,
    pub history: Vec<RoundRecord>,
    pub player_tally: EnumMap<Move, u32>,
    pub computer_tally: EnumMap<Move, u32>,
}
impl MatchSnapshot {
    pub fn status(&self) -> MatchStatus {
        match self.phase {
            _ if self.match_ended => MatchStatus::MatchEnded,
            Phase::Running if self.round_resolved => MatchStatus::RoundEnded,
            Phase::Running => MatchStatus::Running,
            Phase::Paused => MatchStatus::Paused,
            Phase::Stopped => MatchStatus::Stopped,
        }
    }
}

/// The match state machine.
///
/// Commands ([`start`](Self::start), [`pause`](Self::pause),
/// [`reset`](Self::reset)) change the [`Phase`]; [`tick`](Self::tick) plays
/// the round. Nothing here fails: a missing or ambiguous hand is a message to
/// the player, not an error.
pub struct MatchController {
    rules: MatchRules,
    picker: Box<dyn MovePicker>,
    phase: Phase,
    clock: u8,
    player_move: Option<Move>,
    computer_move: Option<Move>,
    round: u32,
    player_score: u32,
    computer_score: u32,
    match_ended: bool,
    round_resolved: bool,
    status_text: String,
    history: Vec<RoundRecord>,
    player_tally: EnumMap<Move, u32>,
    computer_tally: EnumMap<Move, u32>,
}
impl MatchController {
    pub fn new(rules: MatchRules, picker: Box<dyn MovePicker>) -> Self {
        Self {
            rules,
            picker,
            phase: Phase::Stopped,
            clock: 0,
            player_move: None,
            computer_move: None,
            round: 1,
            player_score: 0,
            computer_score: 0,
            match_ended: false,
            round_resolved: false,
            status_text: IDLE_TEXT.to_owned(),
            history: Vec::new(),
            player_tally: EnumMap::default(),
            computer_tally: EnumMap::default(),
        }
    }

    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.set_status("Game started!");
        info!("match started, round {}", self.round);
    }

    pub fn pause(&mut self) {
        self.phase = Phase::Paused;
        self.set_status("Game paused");
        info!("match paused at clock {}", self.clock);
    }

    /// Back to round 1 with no score, keeps the rules and move picker.
    pub fn reset(&mut self) {
        self.phase = Phase::Stopped;
        self.clock = 0;
        self.player_move = None;
        self.computer_move = None;
        self.round = 1;
        self.player_score = 0;
        self.computer_score = 0;
        self.match_ended = false;
        self.round_resolved = false;
        self.status_text = IDLE_TEXT.to_owned();
        self.history.clear();
        self.player_tally = EnumMap::default();
        self.computer_tally = EnumMap::default();
        info!("match reset");
    }

    pub fn clock(&self) -> u8 {
        self.clock
    }

    /// Whether the clock should keep moving.
    pub fn is_advancing(&self) -> bool {
        self.phase == Phase::Running && !self.match_ended
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            clock: self.clock,
            player_move: self.player_move,
            computer_move: self.computer_move,
            round: self.round,
            player_score: self.player_score,
            computer_score: self.computer_score,
            match_ended: self.match_ended,
            round_resolved: self.round_resolved,
            win_threshold: self.rules.win_threshold,
            status_text: self.status_text.clone(),
            history: self.history.clone(),
            player_tally: self.player_tally,
            computer_tally: self.computer_tally,
        }
    }

    /// Play one clock tick.
    ///
    /// `clock` is owned by the caller, it should be the previous
    /// [`clock`](Self::clock) plus one (wrapping at 100) while the match is
    /// advancing. Out of range values are wrapped. Does nothing but keep a
    /// status message when the match is not running.
    pub fn tick(&mut self, clock: u8, reading: GestureReading) -> MatchSnapshot {
        self.clock = clock % CLOCK_PERIOD;
        if !self.is_advancing() {
            if self.status_text.is_empty() {
                self.set_status(FALLBACK_TEXT);
            }
            return self.snapshot();
        }
        let sub_phase = SubPhase::at(self.clock);
        match sub_phase {
            SubPhase::GetReady => {
                let text = format!("Round {} - Get Ready!", self.round);
                self.set_status(&text);
                self.round_resolved = false;
                self.player_move = None;
                self.computer_move = None;
            }
            SubPhase::Rock | SubPhase::Paper | SubPhase::Scissors | SubPhase::Shoot => {
                if let Some(banner) = sub_phase.banner() {
                    self.set_status(banner);
                }
            }
            SubPhase::Capture => self.capture(reading),
            SubPhase::Resolve => {
                if !self.round_resolved {
                    self.resolve(reading);
                }
                if self.round_resolved && !self.match_ended && self.clock >= ROUND_ADVANCE_TICK {
                    self.clock = 0;
                    self.round += 1;
                    debug!("advancing to round {}", self.round);
                }
            }
        }
        self.snapshot()
    }

    /// Latch both moves, at most once per round. The driver may repeat the
    /// capture tick over several frames.
    fn capture(&mut self, reading: GestureReading) {
        if self.player_move.is_some() {
            return;
        }
        match reading.single_hand() {
            Some(player) => {
                let computer = self.picker.pick();
                self.player_move = Some(player);
                self.computer_move = Some(computer);
                debug!("round {} captured: {player} vs {computer}", self.round);
            }
            None => self.set_status(HAND_PROMPT),
        }
    }

    fn resolve(&mut self, reading: GestureReading) {
        let moves = (reading.single_hand(), self.player_move, self.computer_move);
        let (player, computer) = match moves {
            (Some(_), Some(player), Some(computer)) => (player, computer),
            _ => {
                self.set_status(HAND_PROMPT);
                return;
            }
        };
        let outcome = player.beats(&computer);
        match outcome {
            RoundOutcome::Win => self.player_score += 1,
            RoundOutcome::Loss => self.computer_score += 1,
            RoundOutcome::Draw => {}
        }
        self.player_tally[player] += 1;
        self.computer_tally[computer] += 1;
        self.history.push(RoundRecord { round: self.round, player, computer, outcome });
        let text = format!("You: {player} | Computer: {computer} | {}", outcome.verdict());
        self.set_status(&text);
        self.round_resolved = true;
        info!(
            "round {}: {}, score {}-{}",
            self.round, self.status_text, self.player_score, self.computer_score
        );

        let threshold = self.rules.win_threshold;
        if self.player_score >= threshold || self.computer_score >= threshold {
            self.match_ended = true;
            self.phase = Phase::Paused;
            let text = if self.player_score > self.computer_score {
                "You Win the Match!"
            } else {
                "Computer Wins the Match!"
            };
            self.set_status(text);
            info!("{text} ({}-{})", self.player_score, self.computer_score);
        }
    }

    fn set_status(&mut self, text: &str) {
        if self.status_text != text {
            debug!("status: {text}");
            self.status_text.clear();
            self.status_text.push_str(text);
        }
    }
}

/// Requests from the player, applied before the next tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchCommand {
    Start,
    Pause,
    Reset,
}

#[derive(SystemLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchSystem {
    Commands,
    Drive,
}

/// Fixed rate at which the round clock advances.
pub struct ClockDriver {
    timer: Timer,
}
impl ClockDriver {
    pub fn new(tick_hz: f32) -> Self {
        Self { timer: Timer::from_seconds(1.0 / tick_hz, true) }
    }
}

fn apply_commands(
    mut events: EventReader<MatchCommand>,
    mut controller: ResMut<MatchController>,
    mut snapshot: ResMut<MatchSnapshot>,
) {
    let mut applied = false;
    for command in events.iter() {
        screen_print!("match command: {:?}", command);
        match command {
            MatchCommand::Start => controller.start(),
            MatchCommand::Pause => controller.pause(),
            MatchCommand::Reset => controller.reset(),
        }
        applied = true;
    }
    if applied {
        *snapshot = controller.snapshot();
    }
}

/// Clock value for the next tick: one step further (wrapping) when the timer
/// fired during a running match, unchanged otherwise.
fn next_clock(clock: u8, fired: bool, advancing: bool) -> u8 {
    match fired && advancing {
        true => (clock % CLOCK_PERIOD + 1) % CLOCK_PERIOD,
        false => clock,
    }
}

/// Advance the clock when the driver timer fires and play a tick with the
/// current hand reading.
///
/// Runs every frame: between clock steps, ticks repeat the same clock value
/// so a hand shown late in the resolve window is still picked up.
fn drive_match(
    time: Res<Time>,
    gesture: Res<LatestGesture>,
    mut driver: ResMut<ClockDriver>,
    mut controller: ResMut<MatchController>,
    mut snapshot: ResMut<MatchSnapshot>,
) {
    let fired = driver.timer.tick(time.delta()).just_finished();
    let clock = next_clock(controller.clock(), fired, controller.is_advancing());
    let next = controller.tick(clock, gesture.0);
    screen_print!("clock {} {:?} {:?}", next.clock, SubPhase::at(next.clock), next.status());
    if *snapshot != next {
        *snapshot = next;
    }
}

pub struct Plugin {
    pub rules: MatchRules,
    pub tick_hz: f32,
    pub seed: Option<u64>,
}
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        let picker = match self.seed {
            Some(seed) => RandomPicker::with_seed(seed),
            None => RandomPicker::new(),
        };
        let controller = MatchController::new(self.rules, Box::new(picker));
        app.add_event::<MatchCommand>()
            .insert_resource(controller.snapshot())
            .insert_resource(controller)
            .insert_resource(ClockDriver::new(self.tick_hz))
            .add_system(apply_commands.label(MatchSystem::Commands))
            .add_system(
                drive_match
                    .label(MatchSystem::Drive)
                    .after(MatchSystem::Commands)
                    .after(GestureSystem),
            );
    }
}

//! Defines the rules of a single throw. Exactly, how a round resolves (rather
//! than how it flows, see [`crate::game_flow`] for that).
//!
//! # Rules
//!
//! * Rock beats Scissors
//! * Scissors beats Paper
//! * Paper beats Rock
//! * Two identical moves are a draw, nobody scores.
use std::{fmt, str::FromStr};

use enum_map::Enum;

#[derive(Clone, PartialEq, Debug)]
pub enum ParseError {
    BadMove(String),
    BadNumber(String),
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadMove(text) => write!(f, "{text} is not rock, paper or scissors"),
            ParseError::BadNumber(text) => write!(f, "The number {text} is invalid"),
        }
    }
}
impl std::error::Error for ParseError {}

/// Outcome of a round, from the point of view of the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundOutcome {
    Loss,
    Draw,
    Win,
}
impl RoundOutcome {
    /// Suffix appended to the round result line.
    pub fn verdict(self) -> &'static str {
        match self {
            RoundOutcome::Loss => "Computer wins this round!",
            RoundOutcome::Draw => "Draw!",
            RoundOutcome::Win => "You win this round!",
        }
    }
}

#[derive(Enum, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}
impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    #[rustfmt::skip]
    pub fn beats(&self, other: &Self) -> RoundOutcome {
        use Move::*;
        use RoundOutcome::*;
        match (self, other) {
            (a, b) if a == b => Draw,
            (Rock,     Scissors) => Win,
            (Scissors, Paper)    => Win,
            (Paper,    Rock)     => Win,
            _ => Loss,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Move {
    type Err = ParseError;
    #[rustfmt::skip]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Move::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Rock),
            "paper" | "p" => Ok(Paper),
            "scissors" | "s" => Ok(Scissors),
            _ => Err(ParseError::BadMove(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! outcome {
        ($player:tt vs $computer:tt) => {{
            let player: Move = stringify!($player).parse().unwrap();
            let computer: Move = stringify!($computer).parse().unwrap();
            player.beats(&computer)
        }};
    }
    #[test]
    fn beats_relation() {
        use RoundOutcome::*;
        assert_eq!(Win, outcome!(rock vs scissors));
        assert_eq!(Win, outcome!(scissors vs paper));
        assert_eq!(Win, outcome!(paper vs rock));

        assert_eq!(Draw, outcome!(rock vs rock));
        assert_eq!(Draw, outcome!(paper vs paper));
        assert_eq!(Draw, outcome!(scissors vs scissors));

        assert_eq!(Loss, outcome!(scissors vs rock));
        assert_eq!(Loss, outcome!(paper vs scissors));
        assert_eq!(Loss, outcome!(rock vs paper));
    }
    #[test]
    fn exactly_one_side_wins_distinct_moves() {
        use RoundOutcome::Win;
        for a in Move::ALL {
            for b in Move::ALL.into_iter().filter(|b| *b != a) {
                let wins = (a.beats(&b) == Win) as u8 + (b.beats(&a) == Win) as u8;
                assert_eq!(1, wins, "{a} vs {b}");
            }
        }
    }
    #[test]
    fn parse_moves() {
        assert_eq!(Ok(Move::Rock), "Rock".parse());
        assert_eq!(Ok(Move::Scissors), " s ".parse());
        assert_eq!(Err(ParseError::BadMove("lizard".into())), "lizard".parse::<Move>());
        assert_eq!("scissors", Move::Scissors.to_string());
    }
}

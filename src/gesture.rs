//! What the player is showing to the camera.
//!
//! The match only cares about a [`GestureReading`]: how many hands are
//! visible and, if it could be told, which move the hand makes. Hand tracking
//! itself is done by an external landmark model, this module only turns its
//! 21 landmarks into a [`Move`] (see [`HandLandmarks::classify`]).
//!
//! Without a camera backend, hands are shown with the keyboard: every held
//! `R`, `P` or `S` key is one visible hand posed as that move, read through
//! the same classifier as a tracked hand.
use bevy::math::Vec2;
use bevy::prelude::{Plugin as BevyPlugin, *};

use crate::rules::Move;

/// A finger is extended when its tip is higher than its middle joint by more
/// than this, in normalized image coordinates.
const EXTENSION_THRESHOLD: f32 = 0.05;

/// One reading of the hand tracker.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GestureReading {
    pub mv: Option<Move>,
    pub hand_count: usize,
}
impl GestureReading {
    pub fn none() -> Self {
        Self { mv: None, hand_count: 0 }
    }
    pub fn hand(mv: Move) -> Self {
        Self { mv: Some(mv), hand_count: 1 }
    }
    /// The shown move, only if exactly one hand is visible and its shape was
    /// recognized. No hands and several hands are equally ambiguous.
    pub fn single_hand(&self) -> Option<Move> {
        match self.hand_count {
            1 => self.mv,
            _ => None,
        }
    }
    pub fn from_hands(hands: &[HandLandmarks]) -> Self {
        match hands {
            [] => Self::none(),
            [hand] => Self::hand(hand.classify()),
            _ => Self { mv: None, hand_count: hands.len() },
        }
    }
}

/// Landmark indices, in the order the tracker reports them.
#[derive(Clone, Copy, Debug)]
pub enum Landmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// Joints of the four fingers, from knuckle to tip.
#[rustfmt::skip]
const FINGERS: [[Landmark; 4]; 4] = {
    use Landmark::*;
    [
        [IndexMcp,  IndexPip,  IndexDip,  IndexTip],
        [MiddleMcp, MiddlePip, MiddleDip, MiddleTip],
        [RingMcp,   RingPip,   RingDip,   RingTip],
        [PinkyMcp,  PinkyPip,  PinkyDip,  PinkyTip],
    ]
};
const THUMB: [Landmark; 4] = [Landmark::ThumbCmc, Landmark::ThumbMcp, Landmark::ThumbIp, Landmark::ThumbTip];

/// A tracked hand, normalized image coordinates (`y` grows downward).
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks(pub [Vec2; 21]);
impl HandLandmarks {
    /// An upright hand in the middle of the frame making `mv`: a fist, index
    /// and middle fingers up, or all fingers up.
    pub fn posed(mv: Move) -> Self {
        let raised = match mv {
            Move::Rock => [false; 4],
            Move::Paper => [true; 4],
            Move::Scissors => [true, true, false, false],
        };
        let mut points = [Vec2::ZERO; 21];
        points[Landmark::Wrist as usize] = Vec2::new(0.5, 0.8);
        for (i, joint) in THUMB.into_iter().enumerate() {
            let step = i as f32 * 0.04;
            points[joint as usize] = Vec2::new(0.42 - step, 0.76 - step);
        }
        for (i, ([mcp, pip, dip, tip], raised)) in FINGERS.into_iter().zip(raised).enumerate() {
            let x = 0.44 + i as f32 * 0.04;
            let (dip_y, tip_y) = if raised { (0.48, 0.42) } else { (0.6, 0.62) };
            points[mcp as usize] = Vec2::new(x, 0.66);
            points[pip as usize] = Vec2::new(x, 0.56);
            points[dip as usize] = Vec2::new(x, dip_y);
            points[tip as usize] = Vec2::new(x, tip_y);
        }
        Self(points)
    }
    fn at(&self, landmark: Landmark) -> Vec2 {
        self.0[landmark as usize]
    }
    fn extended(&self, tip: Landmark, pip: Landmark) -> bool {
        self.at(tip).y < self.at(pip).y - EXTENSION_THRESHOLD
    }
    /// Fist is rock, index and middle fingers alone is scissors, any other
    /// shape is paper. The thumb is ignored.
    pub fn classify(&self) -> Move {
        use Landmark::*;
        let index = self.extended(IndexTip, IndexPip);
        let middle = self.extended(MiddleTip, MiddlePip);
        let ring = self.extended(RingTip, RingPip);
        let pinky = self.extended(PinkyTip, PinkyPip);
        match (index, middle, ring, pinky) {
            (false, false, false, false) => Move::Rock,
            (true, true, false, false) => Move::Scissors,
            _ => Move::Paper,
        }
    }
}

/// The reading used by the match driver this frame.
#[derive(Default, Debug)]
pub struct LatestGesture(pub GestureReading);

#[derive(SystemLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GestureSystem;

/// One posed hand per held move key.
fn keyboard_hands(held: impl Iterator<Item = Move>) -> Vec<HandLandmarks> {
    held.map(HandLandmarks::posed).collect()
}

fn read_keyboard_hands(keys: Res<Input<KeyCode>>, mut latest: ResMut<LatestGesture>) {
    let keymap = [(KeyCode::R, Move::Rock), (KeyCode::P, Move::Paper), (KeyCode::S, Move::Scissors)];
    let held = keymap.into_iter().filter(|(key, _)| keys.pressed(*key)).map(|(_, mv)| mv);
    let reading = GestureReading::from_hands(&keyboard_hands(held));
    if latest.0 != reading {
        debug!("hand reading changed: {reading:?}");
        latest.0 = reading;
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LatestGesture>()
            .add_system(read_keyboard_hands.label(GestureSystem));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open hand, then fold the given fingers (index, middle, ring, pinky).
    fn hand(folded: [bool; 4]) -> HandLandmarks {
        use Landmark::*;
        let mut points = [Vec2::new(0.5, 0.9); 21];
        let fingers = [(IndexTip, IndexPip), (MiddleTip, MiddlePip), (RingTip, RingPip), (PinkyTip, PinkyPip)];
        for ((tip, pip), folded) in fingers.into_iter().zip(folded) {
            points[pip as usize] = Vec2::new(0.5, 0.5);
            let tip_y = if folded { 0.55 } else { 0.3 };
            points[tip as usize] = Vec2::new(0.5, tip_y);
        }
        HandLandmarks(points)
    }

    #[test]
    fn classify_shapes() {
        assert_eq!(Move::Rock, hand([true, true, true, true]).classify());
        assert_eq!(Move::Scissors, hand([false, false, true, true]).classify());
        assert_eq!(Move::Paper, hand([false, false, false, false]).classify());
        // Pointing is not a known shape, it counts as paper
        assert_eq!(Move::Paper, hand([false, true, true, true]).classify());
    }
    #[test]
    fn barely_raised_finger_is_folded() {
        let mut fist = hand([true, true, true, true]);
        fist.0[Landmark::IndexTip as usize].y = 0.5 - EXTENSION_THRESHOLD + 0.01;
        assert_eq!(Move::Rock, fist.classify());
    }
    #[test]
    fn only_one_hand_is_valid() {
        let rock = hand([true, true, true, true]);
        assert_eq!(None, GestureReading::from_hands(&[]).single_hand());
        assert_eq!(Some(Move::Rock), GestureReading::from_hands(&[rock.clone()]).single_hand());
        let two = GestureReading::from_hands(&[rock.clone(), rock]);
        assert_eq!(2, two.hand_count);
        assert_eq!(None, two.single_hand());
    }
    #[test]
    fn posed_hands_classify_as_their_move() {
        for mv in Move::ALL {
            assert_eq!(mv, HandLandmarks::posed(mv).classify(), "{mv}");
        }
    }
    #[test]
    fn held_keys_become_hands() {
        use Move::*;
        let reading = |held: &[Move]| GestureReading::from_hands(&keyboard_hands(held.iter().copied()));
        assert_eq!(GestureReading::none(), reading(&[]));
        assert_eq!(GestureReading::hand(Scissors), reading(&[Scissors]));
        let both = reading(&[Rock, Paper]);
        assert_eq!((2, None), (both.hand_count, both.single_hand()));
    }
    #[test]
    fn unrecognized_single_hand_is_invalid() {
        let reading = GestureReading { mv: None, hand_count: 1 };
        assert_eq!(None, reading.single_hand());
    }
}

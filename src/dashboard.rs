//! Ui showing the match to the player: scores, round countdown, hands in
//! view and the Start/Stop/Reset/Close buttons.
//!
//! Everything drawn comes from the [`MatchSnapshot`] and [`LatestGesture`]
//! resources, texts are only rewritten when one of them changed. Buttons send
//! [`MatchCommand`]s, the match itself is never touched from here.
use bevy::app::AppExit;
use bevy::math::Vec3Swizzles;
use bevy::prelude::{Plugin as BevyPlugin, *};
use bevy_debug_text_overlay::screen_print;
use bevy_ui_build_macros::{build_ui, rect, size, style, unit};
use bevy_ui_navigation::{Focusable, Focused, NavEvent, NavRequest};
use bevy_ui_navigation::{systems as nav, NavigationPlugin};

use crate::{
    game_flow::{MatchCommand, MatchSnapshot, MatchSystem},
    gesture::{GestureReading, LatestGesture},
    rules::Move,
    state::{MatchStatus, CLOCK_PERIOD},
};

/// Rounds listed in the history panel.
const HISTORY_LEN: usize = 5;

/// Filled part of the round clock bar.
#[derive(Component, Clone)]
struct ClockBar;

#[derive(Component, Clone, Copy, PartialEq)]
enum DashboardText {
    Title,
    Score,
    Hands,
    Round,
    Status,
    Moves,
    Tally,
    History,
}

#[derive(Component, Clone, Copy, PartialEq, Debug)]
enum DashboardButton {
    Start,
    Stop,
    Reset,
    Close,
}

/// Thickness of the bar under the focused button.
const FOCUS_BAR_HEIGHT: f32 = 6.0;
/// Fraction of the remaining distance the focus bar covers per second.
const FOCUS_BAR_SPEED: f32 = 14.0;

/// Underline sliding to the focused button.
#[derive(Clone, Component, Default)]
struct FocusCursor {
    /// Bottom left corner, in window coordinates.
    position: Vec2,
    width: f32,
}
impl FocusCursor {
    /// Move `blend` of the way toward sitting under a node of `size` centered
    /// on `center`.
    fn approach(&mut self, size: Vec2, center: Vec2, blend: f32) {
        let target = center - size / 2.0 - Vec2::new(0.0, FOCUS_BAR_HEIGHT);
        self.position = self.position.lerp(target, blend);
        self.width += (size.x - self.width) * blend;
    }
    fn spawn_ui_element(cmds: &mut Commands) -> Entity {
        cmds.spawn_bundle(NodeBundle {
            style: style! { position_type: PositionType::Absolute, size: size!(0 px, 0 px), },
            color: UiColor(Color::rgb(0.2, 0.2, 0.2)),
            ..Default::default()
        })
        .insert_bundle((Self::default(), Name::new("Focus bar")))
        .id()
    }
}

struct UiAssets {
    font: Handle<Font>,
}
impl FromWorld for UiAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.get_resource::<AssetServer>().unwrap();
        Self { font: assets.load("fonts/dashboard.ttf") }
    }
}
impl UiAssets {
    fn text_bundle(&self, content: &str, font_size: f32, color: Color) -> TextBundle {
        let horizontal = HorizontalAlign::Left;
        let style = TextStyle { color, font: self.font.clone(), font_size };
        let align = TextAlignment { horizontal, ..Default::default() };
        let text = Text::with_section(content, style, align);
        TextBundle { text, ..Default::default() }
    }
}

fn spawn_dashboard(mut cmds: Commands, ui_assets: Res<UiAssets>) {
    use DashboardButton::*;
    use DashboardText::*;
    use FlexDirection as FD;

    let dark = Color::rgb(0.2, 0.2, 0.2);
    let accent = Color::rgb(0.4, 0.8, 0.6);
    let text = |content: &str, font_size: f32| ui_assets.text_bundle(content, font_size, dark);
    let light_text = |content: &str, font_size: f32| {
        ui_assets.text_bundle(content, font_size, Color::WHITE)
    };
    let button_text = |content: &str| ui_assets.text_bundle(content, 36.0, Color::WHITE);
    let node = NodeBundle {
        color: Color::NONE.into(),
        style: style! {
            display: Display::Flex,
            flex_direction: FD::ColumnReverse,
            align_items: AlignItems::FlexStart,
        },
        ..Default::default()
    };
    let button = |color: Color| UiColor(color);

    cmds.spawn_bundle(UiCameraBundle::default());
    let cursor = FocusCursor::spawn_ui_element(&mut cmds);
    build_ui! {
        #[cmd(cmds)]
        node{
            size: size!(100 pct, 100 pct),
            align_items: AlignItems::Stretch
        }[; UiColor(Color::rgb(0.94, 0.94, 0.94)), Name::new("Dashboard root")](
            id(cursor),
            node{
                flex_direction: FD::Row,
                justify_content: JustifyContent::SpaceBetween,
                padding: rect!(16 px)
            }[; UiColor(Color::rgb(0.12, 0.12, 0.12)), Name::new("Title bar")](
                entity[light_text("", 30.0); Title],
                entity[ui_assets.text_bundle("", 30.0, accent); Score]
            ),
            node{ flex_direction: FD::Row, flex_grow: 1.0 }[; Name::new("Panels")](
                node{
                    size: size!(40 pct, auto),
                    margin: rect!(20 px),
                    padding: rect!(20 px)
                }[; UiColor(Color::WHITE), Name::new("Hands panel")](
                    entity[text("", 40.0); Hands],
                    entity[text("Hold R, P or S to show a hand", 22.0);],
                    entity[text("Each held key is one hand in view", 22.0);]
                ),
                node{
                    size: size!(60 pct, auto),
                    margin: rect!(20 px),
                    padding: rect!(20 px)
                }[; UiColor(Color::WHITE), Name::new("Match panel")](
                    entity[text("", 30.0); Round],
                    entity[text("", 44.0); Status],
                    node{
                        size: size!(100 pct, 16 px),
                        margin: rect!(10 px),
                        flex_direction: FD::Row
                    }[; UiColor(Color::rgb(0.85, 0.85, 0.85)), Name::new("Clock bar")](
                        node{ size: size!(0 pct, 100 pct) }[; UiColor(accent), ClockBar]
                    ),
                    entity[text("", 28.0); Moves],
                    entity[text("", 22.0); Tally],
                    entity[text("", 22.0); History],
                    node{ flex_direction: FD::Row }[; Name::new("Buttons")](
                        node{ margin: rect!(8 px), padding: rect!(10 px) }[; Focusable::new().prioritized(), button(Color::rgb(0.3, 0.69, 0.31)), Start](
                            entity[button_text("Start");]
                        ),
                        node{ margin: rect!(8 px), padding: rect!(10 px) }[; Focusable::default(), button(Color::rgb(0.25, 0.32, 0.71)), Stop](
                            entity[button_text("Stop");]
                        ),
                        node{ margin: rect!(8 px), padding: rect!(10 px) }[; Focusable::default(), button(Color::rgb(1.0, 0.6, 0.0)), Reset](
                            entity[button_text("Reset");]
                        ),
                        node{ margin: rect!(8 px), padding: rect!(10 px) }[; Focusable::default(), button(Color::rgb(0.96, 0.26, 0.21)), Close](
                            entity[button_text("Close");]
                        )
                    )
                )
            )
        )
    };
}

fn hands_text(reading: &GestureReading) -> String {
    match (reading.hand_count, reading.single_hand()) {
        (0, _) => "No hand in view".to_owned(),
        (1, Some(mv)) => format!("Showing {mv}"),
        (1, None) => "Hand not recognized".to_owned(),
        (count, _) => format!("{count} hands in view, show only one"),
    }
}

fn tally_text(snapshot: &MatchSnapshot) -> String {
    let count = |mv: Move| (snapshot.player_tally[mv], snapshot.computer_tally[mv]);
    let (rock, paper, scissors) = (count(Move::Rock), count(Move::Paper), count(Move::Scissors));
    format!(
        "Thrown (you/computer): rock {}/{}  paper {}/{}  scissors {}/{}",
        rock.0, rock.1, paper.0, paper.1, scissors.0, scissors.1
    )
}

fn history_text(snapshot: &MatchSnapshot) -> String {
    let skip = snapshot.history.len().saturating_sub(HISTORY_LEN);
    let lines: Vec<_> = snapshot.history[skip..]
        .iter()
        .map(|r| format!("Round {}: {} vs {}, {}", r.round, r.player, r.computer, r.outcome.verdict()))
        .collect();
    lines.join("\n")
}

fn dashboard_text(which: DashboardText, snapshot: &MatchSnapshot, reading: &GestureReading) -> String {
    use DashboardText::*;
    match which {
        Title => format!("Rock Paper Scissors - First to {}", snapshot.win_threshold),
        Score => format!("You: {} - Computer: {}", snapshot.player_score, snapshot.computer_score),
        Hands => hands_text(reading),
        Round => format!("Round {}", snapshot.round),
        Status => snapshot.status_text.clone(),
        Moves => match (snapshot.player_move, snapshot.computer_move) {
            (Some(player), Some(computer)) => format!("You: {player}   Computer: {computer}"),
            _ => "You: -   Computer: -".to_owned(),
        },
        Tally => tally_text(snapshot),
        History => history_text(snapshot),
    }
}

fn update_dashboard(
    snapshot: Res<MatchSnapshot>,
    gesture: Res<LatestGesture>,
    mut texts: Query<(&mut Text, &DashboardText)>,
    mut clock_bar: Query<(&mut Style, &mut UiColor), With<ClockBar>>,
) {
    if !snapshot.is_changed() && !gesture.is_changed() {
        return;
    }
    for (mut text, which) in texts.iter_mut() {
        let value = dashboard_text(*which, &snapshot, &gesture.0);
        if text.sections[0].value != value {
            text.sections[0].value = value;
        }
    }
    if let Ok((mut style, mut color)) = clock_bar.get_single_mut() {
        let progress = f32::from(snapshot.clock) / f32::from(CLOCK_PERIOD);
        style.size.width = Val::Percent(progress * 100.0);
        color.0 = match snapshot.status() {
            MatchStatus::Running | MatchStatus::RoundEnded => Color::rgb(0.4, 0.8, 0.6),
            MatchStatus::MatchEnded => Color::GOLD,
            MatchStatus::Paused | MatchStatus::Stopped => Color::GRAY,
        };
    }
}

fn update_focus_bar(
    time: Res<Time>,
    mut bar: Query<(&mut Style, &mut FocusCursor), Without<Focused>>,
    focused: Query<(&Node, &GlobalTransform), With<Focused>>,
) {
    if let (Ok((mut style, mut cursor)), Ok((node, transform))) = (bar.get_single_mut(), focused.get_single()) {
        let blend = (FOCUS_BAR_SPEED * time.delta_seconds()).min(1.0);
        cursor.approach(node.size, transform.translation.xy(), blend);
        style.position.left = Val::Px(cursor.position.x);
        style.position.bottom = Val::Px(cursor.position.y);
        style.size = Size::new(Val::Px(cursor.width), Val::Px(FOCUS_BAR_HEIGHT));
    }
}

fn handle_buttons(
    mut events: EventReader<NavEvent>,
    mut commands: EventWriter<MatchCommand>,
    mut exit: EventWriter<AppExit>,
    buttons: Query<&DashboardButton>,
) {
    use NavEvent::NoChanges;
    use NavRequest::Action;
    for (event_type, from) in events.nav_iter().types() {
        match (event_type, buttons.get(from)) {
            (NoChanges { request: Action, .. }, Ok(button)) => {
                screen_print!("Player pressed the {:?} button", button);
                match button {
                    DashboardButton::Start => commands.send(MatchCommand::Start),
                    DashboardButton::Stop => commands.send(MatchCommand::Pause),
                    DashboardButton::Reset => commands.send(MatchCommand::Reset),
                    DashboardButton::Close => exit.send(AppExit),
                }
            }
            (_, Err(err)) => warn!("nav event on a non-button entity: {err:?}"),
            _ => {}
        }
    }
}

fn quit_on_q(keys: Res<Input<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Q) {
        info!("quit requested from keyboard");
        exit.send(AppExit);
    }
}

pub struct Plugin;
impl BevyPlugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_plugin(NavigationPlugin)
            .init_resource::<UiAssets>()
            .init_resource::<nav::InputMapping>()
            .add_system(nav::default_mouse_input)
            .add_startup_system(spawn_dashboard)
            .add_system(
                handle_buttons
                    .after(NavRequestSystem)
                    .before(MatchSystem::Commands),
            )
            .add_system(quit_on_q)
            .add_system(update_focus_bar)
            .add_system(update_dashboard.after(MatchSystem::Drive));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game_flow::{MatchController, MatchRules},
        opponent::Scripted,
    };
    use Move::{Paper, Rock, Scissors};

    fn played_match() -> MatchSnapshot {
        let mut ctrl = MatchController::new(MatchRules { win_threshold: 10 }, Box::new(Scripted::new(&[Scissors])));
        ctrl.start();
        for round in 0..7 {
            let mv = [Rock, Paper, Scissors][round % 3];
            for clock in 0..60 {
                ctrl.tick(clock, GestureReading::none());
            }
            for clock in 60..=90 {
                ctrl.tick(clock, GestureReading::hand(mv));
            }
        }
        ctrl.snapshot()
    }

    #[test]
    fn focus_bar_slides_under_button() {
        let mut cursor = FocusCursor::default();
        let button = Vec2::new(100.0, 40.0);
        cursor.approach(button, Vec2::new(200.0, 100.0), 0.5);
        assert_eq!(Vec2::new(75.0, 37.0), cursor.position);
        assert_eq!(50.0, cursor.width);
        cursor.approach(button, Vec2::new(200.0, 100.0), 1.0);
        assert_eq!(Vec2::new(150.0, 74.0), cursor.position);
        assert_eq!(100.0, cursor.width);
    }
    #[test]
    fn hands_descriptions() {
        let text = |mv, hand_count| hands_text(&GestureReading { mv, hand_count });
        assert_eq!("No hand in view", text(None, 0));
        assert_eq!("Showing paper", text(Some(Paper), 1));
        assert_eq!("Hand not recognized", text(None, 1));
        assert_eq!("3 hands in view, show only one", text(None, 3));
    }
    #[test]
    fn history_keeps_last_rounds() {
        let snapshot = played_match();
        assert_eq!(7, snapshot.history.len());
        let history = history_text(&snapshot);
        assert_eq!(HISTORY_LEN, history.lines().count());
        assert!(history.starts_with("Round 3: scissors vs scissors, Draw!"));
        assert!(history.ends_with("Round 7: rock vs scissors, You win this round!"));
    }
    #[test]
    fn score_and_tally_texts() {
        let snapshot = played_match();
        let reading = GestureReading::none();
        assert_eq!("You: 3 - Computer: 2", dashboard_text(DashboardText::Score, &snapshot, &reading));
        assert_eq!(
            "Thrown (you/computer): rock 3/0  paper 2/0  scissors 2/7",
            tally_text(&snapshot)
        );
        assert_eq!("Rock Paper Scissors - First to 10", dashboard_text(DashboardText::Title, &snapshot, &reading));
    }
}

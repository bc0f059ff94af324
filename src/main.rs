use bevy::prelude::*;

mod config;
mod dashboard;
mod game_flow;
mod gesture;
mod opponent;
mod rules;
mod state;

fn main() -> anyhow::Result<()> {
    let config = config::DuelConfig::from_env()?;

    let mut app = App::new();
    app.insert_resource(WindowDescriptor {
        title: "Rock Paper Scissors".to_owned(),
        width: config.window.width,
        height: config.window.height,
        ..Default::default()
    })
    .insert_resource(ClearColor(Color::rgb(0.94, 0.94, 0.94)))
    .add_plugins(DefaultPlugins)
    .add_plugin(gesture::Plugin)
    .add_plugin(game_flow::Plugin {
        rules: config.rules(),
        tick_hz: config.tick_hz,
        seed: config.seed,
    })
    .add_plugin(dashboard::Plugin);

    #[cfg(feature = "debug")]
    app.add_plugin(bevy_debug_text_overlay::OverlayPlugin::default())
        .add_plugin(bevy_inspector_egui::WorldInspectorPlugin::new());

    info!("starting with {config:?}");
    app.run();
    Ok(())
}

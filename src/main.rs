//! Hex Reveal desktop entry point.

use bevy::log::LogPlugin;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_reveal::{HexRevealPlugins, LaunchOptions};

/// Whether the world inspector is shown (F12).
#[derive(Resource, Default)]
struct InspectorOpen(bool);

fn main() {
    let options = launch_options();
    let filter = if options.verbose {
        "wgpu=error,naga=warn,hex_reveal=debug"
    } else {
        "wgpu=error,naga=warn,hex_reveal=info"
    };

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Hex Reveal".into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: filter.into(),
                ..default()
            }),
    )
    .insert_resource(options)
    .init_resource::<InspectorOpen>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(HexRevealPlugins)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(|open: Res<InspectorOpen>| open.0));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

#[cfg(feature = "native")]
fn launch_options() -> LaunchOptions {
    <LaunchOptions as clap::Parser>::parse()
}

#[cfg(not(feature = "native"))]
fn launch_options() -> LaunchOptions {
    LaunchOptions::default()
}

fn toggle_inspector(keys: Res<ButtonInput<KeyCode>>, mut open: ResMut<InspectorOpen>) {
    if keys.just_pressed(KeyCode::F12) {
        open.0 = !open.0;
    }
}

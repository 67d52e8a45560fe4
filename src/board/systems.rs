use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::sprite_render::AlphaMode2d;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, PrimaryEguiContext};

use super::{BoardConfig, TileId};
use super::entities::{BoardRoot, CoverFade, HexCover};
use super::reveal::RevealRound;
use crate::math;
use crate::session::{GameCommand, GameSession, RoundStarted};
use crate::stage::StageCamera;

// ── Render: covers ─────────────────────────────────────────────────

/// Replaces the board with fresh covers whenever a round starts.
///
/// Each tile is an outline hexagon with a slightly smaller fill hexagon as
/// its child; both get their own material so they can fade independently of
/// other tiles.
pub fn spawn_covers(
    mut commands: Commands,
    mut rounds_in: MessageReader<RoundStarted>,
    session: Res<GameSession>,
    cfg: Res<BoardConfig>,
    roots: Query<Entity, With<BoardRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if rounds_in.read().count() == 0 {
        return;
    }
    for root in &roots {
        commands.entity(root).despawn();
    }
    let Some(round) = session.round() else { return };

    let size = round.hex_size();
    let stroke_mesh = meshes.add(build_hex_mesh(size));
    let fill_mesh = meshes.add(build_hex_mesh((size - cfg.outline_width).max(0.0)));

    commands
        .spawn((
            Name::new("Board"),
            BoardRoot,
            Transform::from_xyz(0.0, 0.0, cfg.z),
            Visibility::default(),
        ))
        .with_children(|board| {
            for tile in round.tiles() {
                let pos = math::image_to_world(tile.layout.center, round.area());
                let fill = materials.add(cover_material(cfg.cover_color));
                let stroke = materials.add(cover_material(cfg.outline_color));
                board
                    .spawn((
                        Name::new(tile.id().to_string()),
                        HexCover {
                            id: tile.id(),
                            fill: fill.clone(),
                            stroke: stroke.clone(),
                        },
                        Mesh2d(stroke_mesh.clone()),
                        MeshMaterial2d(stroke),
                        Transform::from_translation(pos.extend(0.0)),
                        Visibility::default(),
                    ))
                    .with_child((
                        Mesh2d(fill_mesh.clone()),
                        MeshMaterial2d(fill),
                        Transform::from_xyz(0.0, 0.0, 0.01),
                    ));
            }
        });

    info!("spawned {} tile covers (size {size:.1})", round.tiles().len());
}

/// Starts the fade-out of every cover whose tile the session has revealed.
pub fn mark_revealed_covers(
    mut commands: Commands,
    session: Res<GameSession>,
    covers: Query<(Entity, &HexCover), Without<CoverFade>>,
) {
    if !session.is_changed() {
        return;
    }
    let Some(round) = session.round() else { return };
    for (entity, cover) in &covers {
        if round.tile(cover.id).is_some_and(|t| t.revealed) {
            commands.entity(entity).insert(CoverFade::default());
        }
    }
}

/// Lightens the covered tile under the pointer.
pub fn highlight_hovered_cover(
    session: Res<GameSession>,
    cfg: Res<BoardConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    covers: Query<&HexCover, Without<CoverFade>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut hovered: Local<Option<TileId>>,
) {
    let current = session
        .round()
        .and_then(|round| pointer_tile(round, &windows, &camera_q));
    if current == *hovered {
        return;
    }
    *hovered = current;

    for cover in &covers {
        let color = if Some(cover.id) == current {
            cfg.hover_color
        } else {
            cfg.cover_color
        };
        if let Some(mat) = materials.get_mut(&cover.fill) {
            mat.color = color;
        }
    }
}

/// Fades revealed covers out with an ease-out curve, then hides them.
pub fn fade_covers(
    time: Res<Time>,
    cfg: Res<BoardConfig>,
    mut covers: Query<(&HexCover, &mut CoverFade, &mut Visibility)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (cover, mut fade, mut visibility) in &mut covers {
        if *visibility == Visibility::Hidden {
            continue;
        }
        fade.elapsed += time.delta_secs();
        let alpha = math::fade_alpha(fade.elapsed, cfg.fade_duration);
        for handle in [&cover.fill, &cover.stroke] {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = mat.color.with_alpha(alpha);
            }
        }
        if fade.elapsed >= cfg.fade_duration {
            *visibility = Visibility::Hidden;
        }
    }
}

// ── Input: click to reveal ─────────────────────────────────────────

/// Reveals the tile under a left click, unless the click lands on the HUD.
pub fn reveal_clicked_cover(
    buttons: Res<ButtonInput<MouseButton>>,
    session: Res<GameSession>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut commands_out: MessageWriter<GameCommand>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if let Ok(mut ctx) = egui_ctx.single_mut()
        && ctx.get_mut().is_pointer_over_area()
    {
        return;
    }
    let Some(round) = session.round() else { return };
    if let Some(id) = pointer_tile(round, &windows, &camera_q)
        && round.tile(id).is_some_and(|t| !t.revealed)
    {
        commands_out.write(GameCommand::RevealTile(id));
    }
}

// ── OnEnter(Setup) ─────────────────────────────────────────────────

/// Removes the board when the game returns to setup.
pub fn clear_board(mut commands: Commands, roots: Query<Entity, With<BoardRoot>>) {
    for root in &roots {
        commands.entity(root).despawn();
    }
}

/// The session changed and no longer has a round to cover.
pub fn round_discarded(session: Res<GameSession>) -> bool {
    session.is_changed() && session.round().is_none()
}

// ── Pure helpers ───────────────────────────────────────────────────

fn pointer_tile(
    round: &RevealRound,
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_q: &Query<(&Camera, &GlobalTransform), With<StageCamera>>,
) -> Option<TileId> {
    let cursor = windows.single().ok()?.cursor_position()?;
    let (camera, cam_gt) = camera_q.single().ok()?;
    let world = camera.viewport_to_world_2d(cam_gt, cursor).ok()?;
    let point = math::world_to_image(world, round.area());
    round.tile_at(point).map(|t| t.id())
}

/// Blended so the fade-out is visible.
fn cover_material(color: Color) -> ColorMaterial {
    ColorMaterial {
        color,
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    }
}

/// Filled pointy-top hexagon as a triangle fan around its center.
fn build_hex_mesh(size: f32) -> Mesh {
    let corners = math::hex_corners(size);
    let mut positions = vec![[0.0, 0.0, 0.0]];
    positions.extend(corners.iter().map(|c| [c.x, c.y, 0.0]));
    let normals = vec![[0.0f32, 0.0, 1.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| {
            if size > 0.0 {
                [0.5 + p[0] / (2.0 * size), 0.5 - p[1] / (2.0 * size)]
            } else {
                [0.5, 0.5]
            }
        })
        .collect();
    let indices: Vec<u16> = (0..6u16)
        .flat_map(|i| [0, 1 + i, 1 + (i + 1) % 6])
        .collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U16(indices))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::system::RunSystemOnce;
    use bevy::mesh::VertexAttributeValues;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    // ── build_hex_mesh ──────────────────────────────────────────────

    #[test]
    fn hex_mesh_is_a_six_triangle_fan() {
        let mesh = build_hex_mesh(50.0);
        assert_eq!(mesh.count_vertices(), 7);
        let Some(Indices::U16(indices)) = mesh.indices() else {
            panic!("expected u16 indices");
        };
        assert_eq!(indices.len(), 18);
        assert!(indices.chunks(3).all(|tri| tri[0] == 0));
        assert_eq!(&indices[15..], &[0, 6, 1]);
    }

    #[test]
    fn hex_mesh_corners_match_geometry() {
        let mesh = build_hex_mesh(40.0);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("expected float3 positions");
        };
        for (p, c) in positions[1..].iter().zip(math::hex_corners(40.0)) {
            assert!((p[0] - c.x).abs() < 1e-5 && (p[1] - c.y).abs() < 1e-5);
        }
    }

    // ── mark_revealed_covers / clear_board ──────────────────────────

    fn board_world() -> (World, TileId) {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = GameSession::default();
        session.set_library(
            std::path::PathBuf::from("/pics"),
            vec![crate::library::ImageMetadata {
                filename: "a.png".into(),
                path: "/pics/a.png".into(),
                width: 600,
                height: 400,
            }],
        );
        session.start_game().unwrap();
        session
            .set_rendered_dimensions(Vec2::new(600.0, 400.0), &mut rng)
            .unwrap();
        let id = session.round().unwrap().tiles()[0].id();

        let mut world = World::new();
        world.insert_resource(session);
        for tile in world.resource::<GameSession>().round().unwrap().tiles().to_vec() {
            world.spawn(HexCover {
                id: tile.id(),
                fill: Handle::default(),
                stroke: Handle::default(),
            });
        }
        (world, id)
    }

    #[test]
    fn only_revealed_tiles_start_fading() {
        let (mut world, id) = board_world();
        world.resource_mut::<GameSession>().reveal_tile(id);
        let _ = world.run_system_once(mark_revealed_covers);

        let mut q = world.query::<(&HexCover, Option<&CoverFade>)>();
        for (cover, fade) in q.iter(&world) {
            assert_eq!(fade.is_some(), cover.id == id, "{}", cover.id);
        }
    }

    #[test]
    fn reveal_all_fades_every_cover() {
        let (mut world, _) = board_world();
        world.resource_mut::<GameSession>().reveal_all();
        let _ = world.run_system_once(mark_revealed_covers);

        let mut q = world.query_filtered::<&HexCover, Without<CoverFade>>();
        assert_eq!(q.iter(&world).count(), 0);
    }

    // ── spawn_covers / fade_covers ──────────────────────────────────

    #[test]
    fn spawned_covers_blend_and_fade() {
        let (mut world, id) = board_world();
        world.clear_entities();
        world.init_resource::<BoardConfig>();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<ColorMaterial>>();
        world.init_resource::<Time>();
        world.init_resource::<Messages<RoundStarted>>();
        let _ = world.write_message(RoundStarted {
            tiles: 1,
            hex_size: 40.0,
        });
        let _ = world.run_system_once(spawn_covers);

        let mut q = world.query::<(Entity, &HexCover)>();
        let covers: Vec<(Entity, HexCover)> =
            q.iter(&world).map(|(e, c)| (e, c.clone())).collect();
        assert_eq!(
            covers.len(),
            world.resource::<GameSession>().round().unwrap().tiles().len()
        );
        {
            let materials = world.resource::<Assets<ColorMaterial>>();
            for (_, cover) in &covers {
                for handle in [&cover.fill, &cover.stroke] {
                    let mat = materials.get(handle).unwrap();
                    assert_eq!(mat.alpha_mode, AlphaMode2d::Blend);
                    assert_eq!(mat.color.alpha(), 1.0);
                }
            }
        }

        let (entity, cover) = covers
            .iter()
            .find(|(_, c)| c.id == id)
            .cloned()
            .unwrap();
        world.entity_mut(entity).insert(CoverFade::default());
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        let _ = world.run_system_once(fade_covers);

        let materials = world.resource::<Assets<ColorMaterial>>();
        let alpha = materials.get(&cover.fill).unwrap().color.alpha();
        assert!(alpha > 0.0 && alpha < 1.0, "alpha {alpha}");
        assert_eq!(world.get::<Visibility>(entity), Some(&Visibility::Inherited));

        let untouched = covers.iter().find(|(_, c)| c.id != id).unwrap();
        assert_eq!(materials.get(&untouched.1.fill).unwrap().color.alpha(), 1.0);
    }

    #[test]
    fn discarded_round_clears_board() {
        let (mut world, _) = board_world();
        assert!(!world.run_system_once(round_discarded).unwrap());

        world.spawn(BoardRoot);
        world.resource_mut::<GameSession>().discard_round();
        assert!(world.run_system_once(round_discarded).unwrap());
        let _ = world.run_system_once(clear_board);
        assert_eq!(world.query::<&BoardRoot>().iter(&world).count(), 0);
    }

    #[test]
    fn clear_board_despawns_root_and_children() {
        let mut world = World::new();
        let root = world.spawn(BoardRoot).id();
        let child = world.spawn(ChildOf(root)).id();
        let _ = world.run_system_once(clear_board);
        assert!(world.get_entity(root).is_err());
        assert!(world.get_entity(child).is_err());
    }
}

//! # Tuning Panel
//!
//! On-screen list of the galaxy parameters, driven from the keyboard:
//! Up/Down select a row, Left/Right nudge it (Shift for ten steps), and
//! releasing the nudge key finishes the edit. Generator fields rebuild the
//! galaxy on finish; wave fields apply while nudging.

use bevy::prelude::*;
use starbulb_common::prelude::*;
use tracing::warn;

use crate::{FrameCommand, SceneSet};

/// Steps per nudge while Shift is held.
pub const COARSE_STEPS: i32 = 10;

const PANEL_WIDTH: f32 = 280.0;
const ROW_FONT_SIZE: f32 = 14.0;
const SELECTED_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);
const ROW_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);

pub struct TuningPanelPlugin;

impl Plugin for TuningPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_panel)
            .add_systems(Update, handle_panel_keys.in_set(SceneSet::Input))
            .add_systems(
                Update,
                (apply_panel_visibility, refresh_panel_rows).in_set(SceneSet::Apply),
            );
    }
}

/// Panel selection and pending edits.
#[derive(Resource, Debug, Clone)]
pub struct PanelState(pub TuningPanel);

/// Root node of the panel.
#[derive(Component)]
pub struct TuningPanelRoot;

/// Text row showing one field.
#[derive(Component, Debug, Clone, Copy)]
pub struct PanelRow(pub ParameterField);

/// A keyboard action on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    Previous,
    Next,
    Nudge(i32),
    Release,
}

/// Feed one key action through the panel into the controller.
///
/// Returns the new galaxy generation when the action rebuilt it.
pub fn apply_panel_key(panel: &mut TuningPanel, controller: &mut SceneController, key: PanelKey) -> Option<u64> {
    match key {
        PanelKey::Previous => panel.select_previous(),
        PanelKey::Next => panel.select_next(),
        PanelKey::Nudge(steps) => {
            if let PanelEdit::Live { wave_speed, wave_height } = panel.nudge(steps) {
                controller.set_wave(wave_speed, wave_height);
            }
        }
        PanelKey::Release => {
            let params = panel.finish()?;
            match controller.regenerate(params) {
                Ok(generation) => return Some(generation),
                Err(e) => {
                    warn!("Rejected galaxy parameters: {}", e);
                    panel.sync(controller.params());
                }
            }
        }
    }
    None
}

/// Row label, `> ` marking the selection.
pub fn row_text(field: ParameterField, params: &GalaxyParameters, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    format!("{} {:<16}{}", marker, field.label(), field.display(params))
}

fn spawn_panel(mut commands: Commands, controller: Res<SceneController>) {
    let panel = TuningPanel::new(controller.params().clone());

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(10.0),
                top: Val::Px(10.0),
                width: Val::Px(PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(8.0)),
                row_gap: Val::Px(2.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            TuningPanelRoot,
            Name::new("TuningPanel"),
        ))
        .with_children(|parent| {
            for field in ParameterField::ALL {
                let selected = field == panel.selected();
                parent.spawn((
                    Text::new(row_text(field, panel.draft(), selected)),
                    TextFont::from_font_size(ROW_FONT_SIZE),
                    TextColor(if selected { SELECTED_COLOR } else { ROW_COLOR }),
                    PanelRow(field),
                ));
            }
        });

    commands.insert_resource(PanelState(panel));
}

/// Key actions for this frame.
///
/// While the panel is hidden only a release gets through, so an edit
/// started before scrolling away still commits.
pub fn panel_actions(keys: &ButtonInput<KeyCode>, visible: bool) -> Vec<PanelKey> {
    let mut actions = Vec::new();
    if visible {
        let steps = if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            COARSE_STEPS
        } else {
            1
        };

        if keys.just_pressed(KeyCode::ArrowUp) {
            actions.push(PanelKey::Previous);
        }
        if keys.just_pressed(KeyCode::ArrowDown) {
            actions.push(PanelKey::Next);
        }
        if keys.just_pressed(KeyCode::ArrowLeft) {
            actions.push(PanelKey::Nudge(-steps));
        }
        if keys.just_pressed(KeyCode::ArrowRight) {
            actions.push(PanelKey::Nudge(steps));
        }
    }
    if keys.any_just_released([KeyCode::ArrowLeft, KeyCode::ArrowRight]) {
        actions.push(PanelKey::Release);
    }
    actions
}

pub fn handle_panel_keys(
    keys: Res<ButtonInput<KeyCode>>,
    frame: Res<FrameCommand>,
    panel: Option<ResMut<PanelState>>,
    mut controller: ResMut<SceneController>,
) {
    let Some(mut panel) = panel else {
        return;
    };
    let visible = frame.0.is_none_or(|command| command.panel_visible);

    for action in panel_actions(&keys, visible) {
        apply_panel_key(&mut panel.0, &mut controller, action);
    }
}

pub fn apply_panel_visibility(frame: Res<FrameCommand>, mut roots: Query<&mut Visibility, With<TuningPanelRoot>>) {
    let Some(command) = frame.0 else {
        return;
    };
    let target = if command.panel_visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in roots.iter_mut() {
        visibility.set_if_neq(target);
    }
}

pub fn refresh_panel_rows(panel: Option<Res<PanelState>>, mut rows: Query<(&PanelRow, &mut Text, &mut TextColor)>) {
    let Some(panel) = panel else {
        return;
    };
    if !panel.is_changed() {
        return;
    }
    let selected_field = panel.0.selected();
    for (row, mut text, mut color) in rows.iter_mut() {
        let selected = row.0 == selected_field;
        text.0 = row_text(row.0, panel.0.draft(), selected);
        color.0 = if selected { SELECTED_COLOR } else { ROW_COLOR };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TuningPanel, SceneController) {
        let params = GalaxyParameters {
            count: 200,
            ..Default::default()
        };
        let controller = SceneController::new(params.clone(), GalaxyOptions::default(), Some(4)).unwrap();
        (TuningPanel::new(params), controller)
    }

    #[test]
    fn test_count_edit_rebuilds_on_release() {
        let (mut panel, mut controller) = setup();
        assert_eq!(panel.selected(), ParameterField::Count);

        assert_eq!(apply_panel_key(&mut panel, &mut controller, PanelKey::Nudge(3)), None);
        assert_eq!(controller.galaxy().buffer.len(), 200);

        let generation = apply_panel_key(&mut panel, &mut controller, PanelKey::Release);
        assert_eq!(generation, Some(2));
        assert_eq!(controller.galaxy().buffer.len(), 500);
        assert_eq!(apply_panel_key(&mut panel, &mut controller, PanelKey::Release), None);
    }

    #[test]
    fn test_wave_edit_is_live() {
        let (mut panel, mut controller) = setup();
        apply_panel_key(&mut panel, &mut controller, PanelKey::Previous);
        assert_eq!(panel.selected(), ParameterField::WaveHeight);

        apply_panel_key(&mut panel, &mut controller, PanelKey::Nudge(COARSE_STEPS));
        assert!((controller.params().wave_height - 1.2).abs() < 1e-5);
        assert_eq!(apply_panel_key(&mut panel, &mut controller, PanelKey::Release), None);
        assert_eq!(controller.galaxy().generation, 1);
    }

    #[test]
    fn test_release_while_hidden_commits() {
        let (mut panel, mut controller) = setup();
        let mut keys = ButtonInput::<KeyCode>::default();

        keys.press(KeyCode::ArrowRight);
        for action in panel_actions(&keys, true) {
            apply_panel_key(&mut panel, &mut controller, action);
        }
        assert_eq!(panel.draft().count, 300);

        keys.clear();
        keys.press(KeyCode::ArrowUp);
        keys.release(KeyCode::ArrowRight);
        let hidden = panel_actions(&keys, false);
        assert_eq!(hidden, vec![PanelKey::Release]);

        for action in hidden {
            apply_panel_key(&mut panel, &mut controller, action);
        }
        assert_eq!(controller.params().count, 300);
        assert_eq!(controller.galaxy().buffer.len(), 300);
    }

    #[test]
    fn test_row_text_marks_selection() {
        let params = GalaxyParameters::default();
        assert_eq!(row_text(ParameterField::Branches, &params, true), "> branches        3");
        assert!(row_text(ParameterField::Spin, &params, false).starts_with("  spin"));
    }
}

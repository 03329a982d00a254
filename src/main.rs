//! Shelfrolls dice viewer.
//!
//! Stands in for the product's dice pane: one die view with keyboard
//! controls. Keys 1-6 switch the die shape, Space rolls (hold to keep
//! spinning), C cycles the body color, L toggles motion lock, F freezes.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use rand::Rng;

use shelfrolls::dice3d::{despawn_die, Die, DicePlugin, DiceType, RollCompleted};

const DIE_COLORS: [&str; 5] = ["#f5f0e6", "#b03a48", "#3a6ea5", "#3f7d4e", "#2b2b2b"];

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Shelfrolls - Dice".to_string(),
                resolution: (720.0, 480.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(DicePlugin)
        .insert_resource(ColorCycle::default())
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_input, show_roll_results))
        .run();
}

#[derive(Resource, Default)]
struct ColorCycle {
    index: usize,
}

#[derive(Component)]
struct ResultsText;

fn setup(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn(Camera2d);

    let container = commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .id();

    let mut die = Die::new(DiceType::D20).in_container(container);
    die.value = 20;
    die.lock_motion = true;
    commands.spawn(die);

    commands.spawn((
        Text::new("Press SPACE to roll\n1-6 pick the die, C color, L lock, F freeze"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ResultsText,
    ));
}

fn handle_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut colors: ResMut<ColorCycle>,
    mut commands: Commands,
    mut dice: Query<(Entity, &mut Die)>,
) {
    let Ok((entity, mut die)) = dice.single_mut() else {
        return;
    };

    for (key, die_type) in [
        (KeyCode::Digit1, DiceType::D4),
        (KeyCode::Digit2, DiceType::D6),
        (KeyCode::Digit3, DiceType::D8),
        (KeyCode::Digit4, DiceType::D10),
        (KeyCode::Digit5, DiceType::D12),
        (KeyCode::Digit6, DiceType::D20),
    ] {
        if keys.just_pressed(key) {
            die.die_type = die_type;
            die.value = die.value.min(die_type.sides()).max(1);
        }
    }

    // Hold Space to spin; the value lands on release, as if the backend
    // answered while the dice were still tumbling.
    if keys.just_pressed(KeyCode::Space) {
        die.is_rolling = true;
    }
    if keys.just_released(KeyCode::Space) {
        die.is_rolling = false;
        die.value = rand::thread_rng().gen_range(1..=die.die_type.sides());
    }

    if keys.just_pressed(KeyCode::KeyC) {
        colors.index = (colors.index + 1) % DIE_COLORS.len();
        die.color = DIE_COLORS[colors.index].to_string();
    }
    if keys.just_pressed(KeyCode::KeyL) {
        die.lock_motion = !die.lock_motion;
    }
    if keys.just_pressed(KeyCode::KeyF) {
        die.freeze = !die.freeze;
    }
    if keys.just_pressed(KeyCode::Escape) {
        despawn_die(&mut commands, entity);
    }
}

fn show_roll_results(
    mut completed: MessageReader<RollCompleted>,
    dice: Query<&Die>,
    mut results: Query<&mut Text, With<ResultsText>>,
) {
    for event in completed.read() {
        let Ok(mut text) = results.single_mut() else {
            continue;
        };
        let name = dice
            .get(event.die)
            .map(|die| die.die_type.name())
            .unwrap_or("die");
        text.0 = format!(
            "{name}: {}\nPress SPACE to roll again\n1-6 pick the die, C color, L lock, F freeze",
            event.value
        );
    }
}

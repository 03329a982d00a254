//! Types and components for the dice view.

use bevy::prelude::*;

use super::config::RenderConfigOverrides;

/// All supported dice shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiceType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DiceType {
    pub fn sides(&self) -> u32 {
        match self {
            DiceType::D4 => 4,
            DiceType::D6 => 6,
            DiceType::D8 => 8,
            DiceType::D10 => 10,
            DiceType::D12 => 12,
            DiceType::D20 => 20,
        }
    }

    /// Map a raw side count onto a die shape. Anything unsupported becomes
    /// the cube; the dice view must never take down the surrounding screen.
    pub fn from_sides(sides: u32) -> DiceType {
        match sides {
            4 => DiceType::D4,
            6 => DiceType::D6,
            8 => DiceType::D8,
            10 => DiceType::D10,
            12 => DiceType::D12,
            20 => DiceType::D20,
            other => {
                warn!("unsupported side count {other}, falling back to d6");
                DiceType::D6
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiceType::D4 => "D4",
            DiceType::D6 => "D6",
            DiceType::D8 => "D8",
            DiceType::D10 => "D10",
            DiceType::D12 => "D12",
            DiceType::D20 => "D20",
        }
    }

    pub fn parse(s: &str) -> Option<DiceType> {
        match s.to_lowercase().as_str() {
            "d4" => Some(DiceType::D4),
            "d6" => Some(DiceType::D6),
            "d8" => Some(DiceType::D8),
            "d10" => Some(DiceType::D10),
            "d12" => Some(DiceType::D12),
            "d20" => Some(DiceType::D20),
            _ => None,
        }
    }
}

/// One die in the view. The fields are the caller-facing props; engine
/// systems react to changes every frame.
#[derive(Component)]
pub struct Die {
    pub die_type: DiceType,
    /// The rolled value to settle on.
    pub value: u32,
    /// While true the die spins continuously instead of settling.
    pub is_rolling: bool,
    /// Suspend all motion, including the idle drift.
    pub freeze: bool,
    /// Pin the rotation to the settled target every frame.
    pub lock_motion: bool,
    /// CSS color for the die body; empty means the configured default.
    pub color: String,
    /// Render-config overrides, resolved fresh on every rebuild.
    pub overrides: Option<RenderConfigOverrides>,
    /// UI node to attach the die's view image under; `None` spawns it as a
    /// root node.
    pub container: Option<Entity>,
}

impl Die {
    pub fn new(die_type: DiceType) -> Self {
        Self {
            die_type,
            value: 1,
            is_rolling: false,
            freeze: false,
            lock_motion: false,
            color: String::new(),
            overrides: None,
            container: None,
        }
    }

    pub fn in_container(mut self, container: Entity) -> Self {
        self.container = Some(container);
        self
    }
}

/// Fired once per settle, when the rotation snaps onto the rolled value.
#[derive(Message, Clone, Copy, Debug)]
pub struct RollCompleted {
    pub die: Entity,
    pub value: u32,
}

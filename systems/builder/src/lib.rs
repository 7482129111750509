#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input-translation system that emits tower placement and upgrade commands.

use path_defence_core::{Command, Event, PlayMode, TowerId, TowerTypeId, UpgradeStat, Vector2};

/// Tower the player is about to build and whether the gold covers it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Tower type armed for placement.
    pub kind: TowerTypeId,
    /// World position under the cursor.
    pub position: Vector2,
    /// Indicates whether the player can afford the tower.
    pub affordable: bool,
}

impl PlacementPreview {
    /// Describes a tower of `kind` hovering at `position`.
    #[must_use]
    pub const fn new(kind: TowerTypeId, position: Vector2, affordable: bool) -> Self {
        Self {
            kind,
            position,
            affordable,
        }
    }
}

/// Pointer and key state for one frame, already mapped to world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Indicates whether the player clicked or confirmed on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player asked to abandon placement on this frame.
    pub cancel_action: bool,
    /// Upgrade requested for the selected tower on this frame.
    pub upgrade: Option<UpgradeStat>,
    /// World position under the cursor.
    pub cursor: Option<Vector2>,
}

impl BuilderInput {
    /// Bundles one frame of input.
    #[must_use]
    pub const fn new(
        confirm_action: bool,
        cancel_action: bool,
        upgrade: Option<UpgradeStat>,
        cursor: Option<Vector2>,
    ) -> Self {
        Self {
            confirm_action,
            cancel_action,
            upgrade,
            cursor,
        }
    }
}

/// Builder system that translates preview + input into placement and upgrade commands.
///
/// In [`PlayMode::Placing`] a confirm places the previewed tower and a cancel
/// disarms it. In [`PlayMode::Selecting`] a confirm selects the tower under
/// the cursor and upgrade requests target the selected tower.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    play_mode: PlayMode,
    selected: Option<TowerId>,
}

impl Builder {
    /// Starts in selecting mode with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Selecting,
            selected: None,
        }
    }

    /// Tower currently selected for upgrades.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerId> {
        self.selected
    }

    /// Tracks the play mode from `events` and turns this frame's input into commands.
    ///
    /// `tower_at` resolves the tower under the cursor, normally by
    /// delegating to `query::tower_at`.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Vector2) -> Option<TowerId>,
    {
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => self.play_mode = *mode,
                Event::RunStarted | Event::RunReset => {
                    self.play_mode = PlayMode::Selecting;
                    self.selected = None;
                }
                _ => {}
            }
        }

        match self.play_mode {
            PlayMode::Placing => {
                if input.cancel_action {
                    out.push(Command::CancelPlacement);
                    return;
                }

                if input.confirm_action {
                    if let Some(preview) = preview {
                        if preview.affordable {
                            out.push(Command::PlaceTower {
                                kind: preview.kind,
                                position: preview.position,
                            });
                        }
                    }
                }
            }
            PlayMode::Selecting => {
                if input.cancel_action {
                    self.selected = None;
                }

                if input.confirm_action {
                    self.selected = input.cursor.and_then(&mut tower_at);
                }

                if let (Some(stat), Some(tower)) = (input.upgrade, self.selected) {
                    out.push(Command::UpgradeTower { tower, stat });
                }
            }
        }
    }
}

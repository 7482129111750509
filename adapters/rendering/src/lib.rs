#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.
//!
//! Draw hooks read snapshot views only. Every primitive goes through the
//! [`Canvas`] trait, so backends decide how (and whether) pixels appear.

mod ascii;

pub use ascii::AsciiCanvas;

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{
    EnemySnapshot, EnemyState, EnemyView, ParticleView, ProjectileKind, ProjectileView, TowerId,
    TowerView, Vector2,
};
use std::{error::Error, fmt};

const HEALTH_BAR_WIDTH: f32 = 24.0;
const HEALTH_BAR_HEIGHT: f32 = 3.0;
const HEALTH_BAR_GAP: f32 = 6.0;
const WAYPOINT_RADIUS: f32 = 5.0;
const PATH_WIDTH: f32 = 2.0;
const LASER_TRAIL_SECONDS: f32 = 0.016;

/// Background cleared before every frame.
pub const BACKGROUND: Color = Color::from_rgb_u8(0x0a, 0x0a, 0x0a);
const DEFAULT_ENEMY_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
const DEFAULT_TOWER_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0x00);
const HEALTH_BAR_BACKGROUND: Color = Color::from_rgb_u8(0x33, 0x33, 0x33);
const WHITE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses a CSS-style `#rgb` or `#rrggbb` color.
    pub fn from_hex(value: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidColor {
            value: value.to_owned(),
        };
        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|digit| digit.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let expand = |index: usize| channel(index..index + 1).map(|nibble| nibble * 17);
                Ok(Self::from_rgb_u8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::from_rgb_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn color_or(value: Option<&str>, fallback: Color) -> Color {
    value
        .and_then(|value| Color::from_hex(value).ok())
        .unwrap_or(fallback)
}

/// Color of an enemy health bar for the given remaining fraction.
#[must_use]
pub fn health_bar_color(fraction: f32) -> Color {
    if fraction > 0.66 {
        Color::from_rgb_u8(0x00, 0xff, 0x00)
    } else if fraction > 0.33 {
        Color::from_rgb_u8(0xff, 0xff, 0x00)
    } else {
        Color::from_rgb_u8(0xff, 0x00, 0x00)
    }
}

/// Color a projectile of the given kind is drawn with.
#[must_use]
pub const fn projectile_color(kind: ProjectileKind) -> Color {
    match kind {
        ProjectileKind::Normal => Color::from_rgb_u8(0xff, 0xff, 0xff),
        ProjectileKind::Fire => Color::from_rgb_u8(0xff, 0x66, 0x00),
        ProjectileKind::Ice => Color::from_rgb_u8(0x00, 0xcc, 0xff),
        ProjectileKind::Lightning => Color::from_rgb_u8(0xff, 0xff, 0x00),
        ProjectileKind::Poison => Color::from_rgb_u8(0x00, 0xff, 0x00),
        ProjectileKind::Laser => Color::from_rgb_u8(0xff, 0x00, 0x00),
    }
}

/// Maps world coordinates onto the canvas for a camera origin and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    origin: Vec2,
    zoom: f32,
}

impl ScreenTransform {
    /// Transform that leaves world coordinates untouched.
    pub const IDENTITY: Self = Self {
        origin: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Creates a transform for a camera whose upper-left corner sits at `origin`.
    #[must_use]
    pub fn new(origin: Vector2, zoom: f32) -> Self {
        Self {
            origin: to_vec2(origin),
            zoom,
        }
    }

    /// Screen position of a world position.
    #[must_use]
    pub fn point(&self, world: Vector2) -> Vec2 {
        (to_vec2(world) - self.origin) * self.zoom
    }

    /// Screen length of a world length.
    #[must_use]
    pub fn length(&self, world: f32) -> f32 {
        world * self.zoom
    }
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn to_vec2(value: Vector2) -> Vec2 {
    Vec2::new(value.x, value.y)
}

/// Drawing surface implemented by rendering backends.
///
/// All coordinates are screen coordinates.
pub trait Canvas {
    /// Fills the whole surface.
    fn clear(&mut self, color: Color) -> AnyResult<()>;

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> AnyResult<()>;

    /// Outlines a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color)
        -> AnyResult<()>;

    /// Fills an axis-aligned rectangle anchored at its upper-left corner.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) -> AnyResult<()>;

    /// Draws a straight segment.
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) -> AnyResult<()>;
}

/// Borrowed snapshots making up one frame.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Waypoints enemies follow.
    pub path: &'a [Vector2],
    /// Enemies in spawn order.
    pub enemies: &'a EnemyView,
    /// Towers in placement order.
    pub towers: &'a TowerView,
    /// Projectiles in flight.
    pub projectiles: &'a ProjectileView,
    /// Live particles.
    pub particles: &'a ParticleView,
    /// Tower whose range is highlighted.
    pub selected_tower: Option<TowerId>,
}

/// Draws a complete frame: background, path, projectiles, towers, enemies, particles.
pub fn draw_scene(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    scene: &Scene<'_>,
) -> AnyResult<()> {
    canvas.clear(BACKGROUND)?;
    draw_path(canvas, transform, scene.path)?;
    draw_projectiles(canvas, transform, scene.projectiles)?;
    draw_towers(canvas, transform, scene.towers, scene.selected_tower)?;
    draw_enemies(canvas, transform, scene.enemies)?;
    draw_particles(canvas, transform, scene.particles)
}

/// Draws the path as a faint polyline with a dot on every waypoint.
pub fn draw_path(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    path: &[Vector2],
) -> AnyResult<()> {
    let line = Color::new(0.0, 1.0, 0.0, 0.2);
    let dot = Color::new(0.0, 1.0, 0.0, 0.3);

    for pair in path.windows(2) {
        canvas.line(
            transform.point(pair[0]),
            transform.point(pair[1]),
            transform.length(PATH_WIDTH),
            line,
        )?;
    }
    for waypoint in path {
        canvas.fill_circle(
            transform.point(*waypoint),
            transform.length(WAYPOINT_RADIUS),
            dot,
        )?;
    }
    Ok(())
}

/// Draws every alive enemy with its health bar.
pub fn draw_enemies(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    enemies: &EnemyView,
) -> AnyResult<()> {
    for enemy in enemies.iter().filter(|enemy| enemy.state == EnemyState::Alive) {
        draw_enemy(canvas, transform, enemy)?;
    }
    Ok(())
}

fn draw_enemy(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    enemy: &EnemySnapshot,
) -> AnyResult<()> {
    let center = transform.point(enemy.position);
    let radius = transform.length(enemy.radius);
    let body = color_or(enemy.color.as_deref(), DEFAULT_ENEMY_COLOR);
    canvas.fill_circle(center, radius, body)?;
    canvas.fill_circle(center, radius * 0.5, WHITE.with_alpha(0.5))?;

    let fraction = if enemy.max_health > 0.0 {
        (enemy.health / enemy.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let width = transform.length(HEALTH_BAR_WIDTH);
    let height = transform.length(HEALTH_BAR_HEIGHT);
    let origin = center - Vec2::new(width / 2.0, radius + transform.length(HEALTH_BAR_GAP));
    canvas.fill_rect(origin, Vec2::new(width, height), HEALTH_BAR_BACKGROUND)?;
    canvas.fill_rect(
        origin,
        Vec2::new(width * fraction, height),
        health_bar_color(fraction),
    )
}

/// Draws every tower, outlining the range of the selected one.
pub fn draw_towers(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    towers: &TowerView,
    selected: Option<TowerId>,
) -> AnyResult<()> {
    for tower in towers.iter() {
        let center = transform.point(tower.position);
        let body = color_or(tower.color.as_deref(), DEFAULT_TOWER_COLOR);
        canvas.fill_circle(center, transform.length(tower.radius), body)?;
        if selected == Some(tower.id) {
            canvas.stroke_circle(
                center,
                transform.length(tower.range),
                1.0,
                Color::new(0.0, 1.0, 0.0, 0.3),
            )?;
        }
    }
    Ok(())
}

/// Draws a translucent tower at `position`, tinted by affordability.
pub fn draw_tower_preview(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    position: Vector2,
    radius: f32,
    range: f32,
    affordable: bool,
) -> AnyResult<()> {
    let tint = if affordable {
        Color::new(0.0, 1.0, 0.0, 0.5)
    } else {
        Color::new(1.0, 0.0, 0.0, 0.5)
    };
    let center = transform.point(position);
    canvas.fill_circle(center, transform.length(radius), tint)?;
    canvas.stroke_circle(center, transform.length(range), 1.0, tint.with_alpha(0.3))
}

/// Draws every projectile in flight.
///
/// Lasers appear as short beams trailing behind the head; lightning bolts
/// carry a faint halo.
pub fn draw_projectiles(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    projectiles: &ProjectileView,
) -> AnyResult<()> {
    for projectile in projectiles.iter() {
        let color = projectile_color(projectile.kind);
        let head = transform.point(projectile.position);
        let radius = transform.length(projectile.radius);
        match projectile.kind {
            ProjectileKind::Laser => {
                let tail = transform
                    .point(projectile.position - projectile.velocity * LASER_TRAIL_SECONDS);
                canvas.line(tail, head, transform.length(2.0), color)?;
            }
            ProjectileKind::Lightning => {
                canvas.fill_circle(head, radius, color)?;
                canvas.stroke_circle(head, radius * 2.0, 1.0, color.with_alpha(0.5))?;
            }
            _ => canvas.fill_circle(head, radius, color)?,
        }
    }
    Ok(())
}

/// Draws every particle as a square fading with its remaining life.
pub fn draw_particles(
    canvas: &mut impl Canvas,
    transform: &ScreenTransform,
    particles: &ParticleView,
) -> AnyResult<()> {
    for particle in particles.iter() {
        let size = transform.length(particle.size);
        let color = color_or(Some(&particle.color), WHITE).with_alpha(particle.alpha);
        let origin = transform.point(particle.position) - Vec2::splat(size / 2.0);
        canvas.fill_rect(origin, Vec2::splat(size), color)?;
    }
    Ok(())
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A color string is not in `#rgb` or `#rrggbb` form.
    InvalidColor {
        /// Text that failed to parse.
        value: String,
    },
    /// A canvas must have at least one cell along each axis.
    InvalidCanvasSize {
        /// Requested columns.
        columns: usize,
        /// Requested rows.
        rows: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { value } => write!(f, "invalid color `{value}`"),
            Self::InvalidCanvasSize { columns, rows } => {
                write!(f, "canvas must not be empty (received {columns}x{rows})")
            }
        }
    }
}

impl Error for RenderingError {}

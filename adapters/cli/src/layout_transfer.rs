//! One-line codes for sharing a tower layout between runs.
//!
//! A code reads `path:v1:<width>x<height>:<payload>` where the payload is the
//! unpadded base64 encoding of the towers serialised as JSON.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use path_defence_core::{TowerTypeId, UpgradeLevels, Vector2};
use path_defence_world::{query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DOMAIN: &str = "path";
const VERSION: &str = "v1";
const SEPARATOR: char = ':';

/// Towers standing in a world together with the viewport they were built for.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TowerLayoutSnapshot {
    /// Viewport width in world units.
    pub(crate) width: u32,
    /// Viewport height in world units.
    pub(crate) height: u32,
    /// Towers in placement order.
    pub(crate) towers: Vec<TowerLayoutTower>,
}

/// Single tower of a layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerLayoutTower {
    /// Tower type to build.
    pub(crate) kind: TowerTypeId,
    /// Tower centre.
    pub(crate) position: Vector2,
    /// Levels to buy after placement.
    #[serde(default)]
    pub(crate) upgrades: UpgradeLevels,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    towers: Vec<TowerLayoutTower>,
}

impl TowerLayoutSnapshot {
    /// Captures every tower currently standing in the world.
    pub(crate) fn capture(world: &World) -> Self {
        let (width, height) = query::camera(world).viewport();
        Self {
            width: width.round() as u32,
            height: height.round() as u32,
            towers: query::tower_view(world)
                .iter()
                .map(|tower| TowerLayoutTower {
                    kind: tower.kind.clone(),
                    position: tower.position,
                    upgrades: tower.upgrades,
                })
                .collect(),
        }
    }

    /// Renders the layout as a shareable code.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            towers: self.towers.clone(),
        })
        .map_err(LayoutTransferError::InvalidPayload)?;
        Ok(format!(
            "{DOMAIN}{SEPARATOR}{VERSION}{SEPARATOR}{}x{}{SEPARATOR}{}",
            self.width,
            self.height,
            STANDARD_NO_PAD.encode(json)
        ))
    }

    /// Parses a code produced by [`TowerLayoutSnapshot::encode`].
    pub(crate) fn decode(code: &str) -> Result<Self, LayoutTransferError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let (domain, rest) = code
            .split_once(SEPARATOR)
            .ok_or(LayoutTransferError::MissingVersion)?;
        if domain != DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        let (version, rest) = rest
            .split_once(SEPARATOR)
            .ok_or(LayoutTransferError::MissingDimensions)?;
        if version != VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }
        let (dimensions, payload) = rest
            .split_once(SEPARATOR)
            .ok_or(LayoutTransferError::MissingPayload)?;

        let (width, height) = parse_viewport(dimensions)?;
        let json = STANDARD_NO_PAD
            .decode(payload)
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let Payload { towers } =
            serde_json::from_slice(&json).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            width,
            height,
            towers,
        })
    }
}

/// Reasons a layout code cannot be produced or read.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// Nothing but whitespace was supplied.
    #[error("layout code is empty")]
    EmptyPayload,
    /// The code stops after the domain.
    #[error("layout code has no version")]
    MissingVersion,
    /// The code stops after the version.
    #[error("layout code has no viewport size")]
    MissingDimensions,
    /// The code stops after the viewport size.
    #[error("layout code has no tower payload")]
    MissingPayload,
    /// The code belongs to another domain.
    #[error("`{0}` is not a path layout code")]
    InvalidPrefix(String),
    /// The code uses a format version this build cannot read.
    #[error("layout format `{0}` is not supported")]
    UnsupportedVersion(String),
    /// The viewport size is not `<width>x<height>` with both sides positive.
    #[error("viewport size `{0}` is invalid")]
    InvalidDimensions(String),
    /// The payload is not unpadded base64.
    #[error("tower payload is not valid base64")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload JSON could not be written or read.
    #[error("tower payload is not valid JSON")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_viewport(size: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(size.to_owned());
    let (width, height) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
    match (width.trim().parse::<u32>(), height.trim().parse::<u32>()) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(invalid()),
    }
}

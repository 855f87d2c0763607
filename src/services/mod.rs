//! Services module - the package's business logic.
//!
//! Everything here talks to the outside world only through the
//! [`FileStore`](crate::storage::FileStore) and
//! [`RegistryStore`](crate::registry::RegistryStore) seams.
//!
//! # Components
//!
//! - [`evidence`]: pattern extraction from free-form text
//! - [`path_validation`]: candidate normalization and ancestor walk to an
//!   installation root
//! - [`discovery`]: ordered, deduplicated multi-source game folder discovery
//! - [`version`]: version marker parsing from the tool's config file
//! - [`overlay`]: feature toggles resolved and merged into the tool's INI file
//! - [`fps_unlock`]: read-modify-write of the game's binary settings record

pub mod discovery;
pub mod evidence;
pub mod fps_unlock;
pub mod overlay;
pub mod path_validation;
pub mod version;

pub use discovery::{EvidenceSource, PathCandidate, PathDiscovery, SourceKind};
pub use evidence::extract;
pub use fps_unlock::{PatchOutcome, patch_fps_value, patch_settings_blob, unlock_fps};
pub use overlay::{LaunchOverlay, OverlayOutcome};
pub use path_validation::{MAX_ANCESTOR_DEPTH, normalize_candidate, validate};
pub use version::{ToolVersion, parse_version, read_version};

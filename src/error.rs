use crate::registry::RegValueKind;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias for package operations.
pub type Result<T> = std::result::Result<T, PackageError>;

/// Errors raised by the HWMI package.
///
/// Evidence and validation failures are only ever seen inside discovery, which
/// logs and drops them. Everything else maps to a user-visible failure of the
/// calling host operation and carries the text shown to the user.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Evidence source {path} is unavailable: {source}")]
    EvidenceUnavailable {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Candidate path {candidate} does not look like a game folder")]
    PathNotValidated { candidate: String },

    #[error("Failed to locate {path}!")]
    ConfigFileMissing { path: Utf8PathBuf },

    #[error("{path} is not valid UTF-8 (line {line}), refusing to rewrite it!")]
    ConfigFileNotUtf8 { path: Utf8PathBuf, line: usize },

    #[error("Unknown Graphics Settings format: {message}")]
    ConfigMalformed { message: String },

    #[error("Failed to locate HWMI version in {path}!")]
    VersionMarkerNotFound { path: Utf8PathBuf },

    #[error("Malformed HWMI version: {line}")]
    MalformedVersion { line: String },

    #[error("Game executable {name} not found!")]
    GameExecutableMissing { name: String, path: Utf8PathBuf },

    #[error("No write access to {path}: {source}")]
    FileAccessDenied {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Horizon Walker registry key is not found!\n\n\
        Please start the game without 120 FPS tweak, change FPS to any value to create the record and try again.\n\n\
        Note: Tweak is supported only for the Global HW client and will not work for CN.")]
    RegistryKeyMissing { key: String },

    #[error("Graphics Settings record is not found in HW registry!\n\n\
        Please start the game without 120 FPS tweak, change FPS to any value to create the record and try again.")]
    RegistryValueMissing { key: String, value: String },

    #[error("Unknown Graphics Settings format: Data type {found} is not REG_BINARY!")]
    RegistryTypeMismatch { found: RegValueKind },

    #[error("Registry access failed: {0}")]
    Registry(#[source] std::io::Error),

    #[error("Failed to force 120 FPS: {0}")]
    FpsUnlock(#[source] Box<PackageError>),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackageError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

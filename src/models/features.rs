use std::fmt;

/// Literal value written to the tool's config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IniValue {
    Int(i64),
    Text(&'static str),
}

impl fmt::Display for IniValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IniValue::Int(v) => write!(f, "{v}"),
            IniValue::Text(v) => f.write_str(v),
        }
    }
}

/// One `[section] key = value` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IniWrite {
    pub section: &'static str,
    pub key: &'static str,
    pub value: IniValue,
}

const fn int(section: &'static str, key: &'static str, value: i64) -> IniWrite {
    IniWrite {
        section,
        key,
        value: IniValue::Int(value),
    }
}

const fn text(section: &'static str, key: &'static str, value: &'static str) -> IniWrite {
    IniWrite {
        section,
        key,
        value: IniValue::Text(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStates {
    /// Always applied.
    Constant(&'static [IniWrite]),
    /// Selected by a named boolean toggle.
    Toggle {
        on: &'static [IniWrite],
        off: &'static [IniWrite],
    },
}

/// A named group of config writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigFeature {
    pub name: &'static str,
    pub states: FeatureStates,
}

impl ConfigFeature {
    /// Writes for the given toggle state. A missing toggle selects `off`.
    pub fn writes(&self, enabled: Option<bool>) -> &'static [IniWrite] {
        match self.states {
            FeatureStates::Constant(writes) => writes,
            FeatureStates::Toggle { on, off } => {
                if enabled.unwrap_or(false) {
                    on
                } else {
                    off
                }
            }
        }
    }

    /// Every write this feature can ever produce.
    pub fn all_writes(&self) -> impl Iterator<Item = &'static IniWrite> {
        let (a, b): (&'static [IniWrite], &'static [IniWrite]) = match self.states {
            FeatureStates::Constant(writes) => (writes, &[]),
            FeatureStates::Toggle { on, off } => (on, off),
        };
        a.iter().chain(b.iter())
    }
}

const LOADER: &[IniWrite] = &[text("Loader", "loader", "XXMI Launcher.exe")];
const RENDERING: &[IniWrite] = &[
    int("Rendering", "texture_hash", 0),
    int("Rendering", "track_texture_updates", 0),
];
const CALLS_ON: &[IniWrite] = &[int("Logging", "calls", 1)];
const CALLS_OFF: &[IniWrite] = &[int("Logging", "calls", 0)];
const DEBUG_ON: &[IniWrite] = &[int("Logging", "debug", 1)];
const DEBUG_OFF: &[IniWrite] = &[int("Logging", "debug", 0)];
const MUTE_ON: &[IniWrite] = &[int("Logging", "show_warnings", 0)];
const MUTE_OFF: &[IniWrite] = &[int("Logging", "show_warnings", 1)];
const HUNTING_ON: &[IniWrite] = &[int("Hunting", "hunting", 2)];
const HUNTING_OFF: &[IniWrite] = &[int("Hunting", "hunting", 0)];
const DUMP_ON: &[IniWrite] = &[text("Hunting", "marking_actions", "clipboard hlsl asm regex")];
const DUMP_OFF: &[IniWrite] = &[text("Hunting", "marking_actions", "clipboard")];

/// Launch overlay applied to `Core/HWMI/main.ini`.
///
/// No two features may target the same `(section, key)`.
pub const HWMI_FEATURES: &[ConfigFeature] = &[
    ConfigFeature {
        name: "core",
        states: FeatureStates::Constant(LOADER),
    },
    ConfigFeature {
        name: "enforce_rendering",
        states: FeatureStates::Constant(RENDERING),
    },
    ConfigFeature {
        name: "calls_logging",
        states: FeatureStates::Toggle {
            on: CALLS_ON,
            off: CALLS_OFF,
        },
    },
    ConfigFeature {
        name: "debug_logging",
        states: FeatureStates::Toggle {
            on: DEBUG_ON,
            off: DEBUG_OFF,
        },
    },
    ConfigFeature {
        name: "mute_warnings",
        states: FeatureStates::Toggle {
            on: MUTE_ON,
            off: MUTE_OFF,
        },
    },
    ConfigFeature {
        name: "enable_hunting",
        states: FeatureStates::Toggle {
            on: HUNTING_ON,
            off: HUNTING_OFF,
        },
    },
    ConfigFeature {
        name: "dump_shaders",
        states: FeatureStates::Toggle {
            on: DUMP_ON,
            off: DUMP_OFF,
        },
    },
];

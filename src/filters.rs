// Copyright (C) 2026 SpruceOS Team
// Licensed under GPL-3.0-or-later

//! Search filter vocabularies and the parameters a search is built from.
//!
//! Every member's wire string is its declared name, unless the member is
//! listed in its enum's override table (names the server uses that are not
//! valid Rust identifiers, such as `3DModel`).

use std::fmt;
use std::str::FromStr;

/// Error returned when text does not name any member of a filter enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseFilterError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident),+ $(,)?
        }
        overrides { $($over:ident => $wire:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Member name as declared
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            #[allow(unreachable_patterns, clippy::match_single_binding)]
            fn wire_override(self) -> Option<&'static str> {
                match self {
                    $($name::$over => Some($wire),)*
                    _ => None,
                }
            }

            /// String sent to the server for this member
            pub fn wire_str(self) -> &'static str {
                self.wire_override().unwrap_or_else(|| self.name())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.wire_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseFilterError;

            /// Accepts the wire string or the member name, ignoring case
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.wire_str().eq_ignore_ascii_case(s) || m.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseFilterError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum! {
    /// How an asset was created
    Method ("method") {
        PBRApproximated,
        PBRPhotogrammetry,
        PBRProcedural,
        PBRMultiAngle,
        PlainPhoto,
        ThreeDPhotogrammetry,
        HDRIStitched,
        HDRIStitchedEdited,
        UnknownOrOther,
    }
    overrides {
        ThreeDPhotogrammetry => "3DPhotogrammetry",
    }
}

wire_enum! {
    /// Kind of asset
    AssetType ("asset type") {
        ThreeDModel,
        Atlas,
        Brush,
        Decal,
        HDRI,
        Material,
        PlainTexture,
        Substance,
        Terrain,
    }
    overrides {
        ThreeDModel => "3DModel",
    }
}

wire_enum! {
    /// Result ordering
    Sort ("sort order") {
        Latest,
        Popular,
        Alphabet,
        Downloads,
    }
    overrides {}
}

/// Filters for one search. Every field is optional; `None` means no filter of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParameters {
    /// Free-text tags, sent verbatim as `q`
    pub tags: Option<String>,
    pub methods: Option<Vec<Method>>,
    pub types: Option<Vec<AssetType>>,
    pub sort: Option<Sort>,
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = AssetType>) -> Self {
        self.types = Some(types.into_iter().collect());
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

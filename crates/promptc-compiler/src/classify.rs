//! Type classification of declared input types.
//!
//! Registry type names form an open vocabulary: extensions introduce new
//! tags at will. Classification is a closed enumeration plus an explicit
//! fallback, and the fallback leans towards "carries a value":
//!
//! - scalar tags (`INT`, `FLOAT`, `STRING`, `COMBO`, `BOOLEAN`, `FILE`,
//!   `ENUM`) and comma-separated inline enumerations are [`TypeClass::Scalar`];
//! - tags of the fixed link-type set are [`TypeClass::Link`];
//! - anything else is [`TypeClass::Unknown`], which normalizes to `STRING`.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Scalar value types carried by value rather than by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ScalarKind {
    /// Integer number.
    Int,
    /// Floating point number.
    Float,
    /// Free text.
    String,
    /// One of a list of choices.
    Combo,
    /// True or false.
    Boolean,
    /// File name.
    File,
    /// Inline enumeration of literal choices.
    Enum,
}

impl ScalarKind {
    /// Returns the registry tag of this kind.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Returns whether values of this kind are numbers.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns whether values of this kind are carried as text.
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Combo | Self::File | Self::Enum)
    }
}

/// Type tags passed by reference between nodes.
pub const LINK_TYPES: &[&str] = &[
    "MODEL",
    "CLIP",
    "VAE",
    "CONDITIONING",
    "LATENT",
    "IMAGE",
    "MASK",
    "CONTROL_NET",
    "CLIP_VISION",
    "CLIP_VISION_OUTPUT",
    "STYLE_MODEL",
    "GLIGEN",
    "UPSCALE_MODEL",
    "SAMPLER",
    "SIGMAS",
    "NOISE",
    "GUIDER",
    "AUDIO",
    "VIDEO",
    "PHOTOMAKER",
    "INPAINT_PATCH",
];

/// Classification of one declared type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Passed by value.
    Scalar(ScalarKind),
    /// Passed by reference.
    Link,
    /// Not in either set.
    Unknown,
}

impl TypeClass {
    /// Returns whether the name was recognised as scalar.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns whether the name is in the link-type set.
    #[inline]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Link)
    }

    /// Returns the scalar kind after normalization.
    ///
    /// Unknown names carry strings; link types carry no scalar.
    pub const fn normalized(self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(kind),
            Self::Unknown => Some(ScalarKind::String),
            Self::Link => None,
        }
    }
}

/// Classifies a declared type name.
pub fn classify(type_name: &str) -> TypeClass {
    if let Ok(kind) = type_name.parse::<ScalarKind>() {
        TypeClass::Scalar(kind)
    } else if type_name.contains(',') {
        TypeClass::Scalar(ScalarKind::Enum)
    } else if LINK_TYPES.contains(&type_name) {
        TypeClass::Link
    } else {
        TypeClass::Unknown
    }
}

/// Returns whether a declared type name is carried by value.
pub fn is_scalar(type_name: &str) -> bool {
    classify(type_name).is_scalar()
}

/// Normalizes a declared type name.
///
/// Scalar and link tags pass through unchanged, inline enumerations become
/// `ENUM` and every other name becomes `STRING`.
pub fn normalize(type_name: &str) -> &str {
    match classify(type_name) {
        TypeClass::Scalar(ScalarKind::Enum) if type_name.contains(',') => ScalarKind::Enum.tag(),
        TypeClass::Scalar(_) | TypeClass::Link => type_name,
        TypeClass::Unknown => ScalarKind::String.tag(),
    }
}

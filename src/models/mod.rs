//! Data models for the style configuration.
//!
//! The central type is [`StyleConfig`], the canonical formatting record. Two
//! key conventions exist around it: the internal camelCase convention used
//! for the persisted JSON file, and the external PascalCase convention used
//! by clang-format itself. [`RawStyleConfig`] accepts either (or a mix) and
//! normalizes to the canonical form with a fixed per-field precedence.

pub mod style;

pub use style::{
    builtin_presets, preset, BaseStyle, BraceStyle, RawStyleConfig, SpaceBeforeParens, SpacePolicy,
    StyleConfig, TabPolicy,
};

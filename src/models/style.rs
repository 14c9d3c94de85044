use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Base style presets understood by clang-format's `--style=<name>`.
///
/// The variant order matters: the first entry (Google) is the fallback
/// when an unknown preset name is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseStyle {
    Google,
    #[serde(rename = "LLVM")]
    Llvm,
    Mozilla,
    WebKit,
    Stroustrup,
    Allman,
    #[serde(rename = "GNU")]
    Gnu,
}

impl BaseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseStyle::Google => "Google",
            BaseStyle::Llvm => "LLVM",
            BaseStyle::Mozilla => "Mozilla",
            BaseStyle::WebKit => "WebKit",
            BaseStyle::Stroustrup => "Stroustrup",
            BaseStyle::Allman => "Allman",
            BaseStyle::Gnu => "GNU",
        }
    }
}

impl std::fmt::Display for BaseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// clang-format `UseTab` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabPolicy {
    Never,
    ForIndentation,
    ForContinuationAndIndentation,
    AlignWithSpaces,
    Always,
}

/// Two-valued spacing policies (`SpacesInParens`, `SpacesInAngles`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacePolicy {
    Never,
    Always,
}

/// clang-format `SpaceBeforeParens` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceBeforeParens {
    Never,
    ControlStatements,
    NonEmptyParentheses,
    Always,
}

/// clang-format `BreakBeforeBraces` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BraceStyle {
    Attach,
    Linux,
    Mozilla,
    Stroustrup,
    Allman,
    Whitesmiths,
    #[serde(rename = "GNU")]
    Gnu,
    WebKit,
}

/// Canonical style configuration.
///
/// Serializes with the internal (camelCase) key convention, which is the
/// convention used for the persisted config file. Incoming data in either
/// convention is handled by [`RawStyleConfig::normalize`].
///
/// Every field has a defined default (the Google preset), so a partial or
/// absent record can always be completed to a full one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub base_format: BaseStyle,
    pub indent_width: u32,
    pub tab_width: u32,
    pub use_tab: TabPolicy,
    pub spaces_in_parentheses: SpacePolicy,
    pub spaces_in_square_brackets: bool,
    pub spaces_in_angles: SpacePolicy,
    pub space_before_parens: SpaceBeforeParens,
    pub column_limit: u32,
    pub break_before_braces: BraceStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            base_format: BaseStyle::Google,
            indent_width: 2,
            tab_width: 2,
            use_tab: TabPolicy::Never,
            spaces_in_parentheses: SpacePolicy::Never,
            spaces_in_square_brackets: false,
            spaces_in_angles: SpacePolicy::Never,
            space_before_parens: SpaceBeforeParens::ControlStatements,
            column_limit: 80,
            break_before_braces: BraceStyle::Attach,
        }
    }
}

impl StyleConfig {
    /// Serialize to the compact JSON object consumed by clang-format's
    /// `--style=<json>` argument.
    ///
    /// Uses the external (clang-format) key convention and excludes
    /// `baseFormat`, which is not a clang-format option. Key order is the
    /// declared field order, so the output is deterministic.
    pub fn style_override_json(&self) -> String {
        let external = ExternalStyle {
            indent_width: self.indent_width,
            tab_width: self.tab_width,
            use_tab: self.use_tab,
            spaces_in_parens: self.spaces_in_parentheses,
            spaces_in_square_brackets: self.spaces_in_square_brackets,
            spaces_in_angles: self.spaces_in_angles,
            space_before_parens: self.space_before_parens,
            column_limit: self.column_limit,
            break_before_braces: self.break_before_braces,
        };
        serde_json::to_string(&external).expect("style struct always serializes")
    }
}

/// External-convention projection of [`StyleConfig`] for `--style=<json>`.
#[derive(Debug, Serialize)]
struct ExternalStyle {
    #[serde(rename = "IndentWidth")]
    indent_width: u32,
    #[serde(rename = "TabWidth")]
    tab_width: u32,
    #[serde(rename = "UseTab")]
    use_tab: TabPolicy,
    #[serde(rename = "SpacesInParens")]
    spaces_in_parens: SpacePolicy,
    #[serde(rename = "SpacesInSquareBrackets")]
    spaces_in_square_brackets: bool,
    #[serde(rename = "SpacesInAngles")]
    spaces_in_angles: SpacePolicy,
    #[serde(rename = "SpaceBeforeParens")]
    space_before_parens: SpaceBeforeParens,
    #[serde(rename = "ColumnLimit")]
    column_limit: u32,
    #[serde(rename = "BreakBeforeBraces")]
    break_before_braces: BraceStyle,
}

/// A spacing policy that may arrive as a named policy or as a boolean.
///
/// Older persisted configs stored `spacesInParentheses` / `spacesInAngles`
/// as booleans; both shapes normalize losslessly.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    Named(SpacePolicy),
    Flag(bool),
}

impl From<PolicyValue> for SpacePolicy {
    fn from(value: PolicyValue) -> Self {
        match value {
            PolicyValue::Named(policy) => policy,
            PolicyValue::Flag(true) => SpacePolicy::Always,
            PolicyValue::Flag(false) => SpacePolicy::Never,
        }
    }
}

/// Loosely-typed style record accepting both key conventions at once.
///
/// Every canonical field has one slot for the external (clang-format) key
/// and one for the internal (camelCase) key; [`normalize`](Self::normalize)
/// resolves them with a fixed per-field precedence. Unknown keys are
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawStyleConfig {
    #[serde(rename = "baseFormat")]
    base_format: Option<BaseStyle>,

    #[serde(rename = "IndentWidth")]
    indent_width_ext: Option<u32>,
    #[serde(rename = "indentWidth")]
    indent_width: Option<u32>,

    #[serde(rename = "TabWidth")]
    tab_width_ext: Option<u32>,
    #[serde(rename = "tabWidth")]
    tab_width: Option<u32>,

    #[serde(rename = "UseTab")]
    use_tab_ext: Option<TabPolicy>,
    #[serde(rename = "useTab")]
    use_tab: Option<TabPolicy>,

    #[serde(rename = "SpacesInParens", alias = "SpacesInParentheses")]
    spaces_in_parens_ext: Option<PolicyValue>,
    #[serde(rename = "spacesInParentheses", alias = "spacesInParens")]
    spaces_in_parentheses: Option<PolicyValue>,

    #[serde(rename = "SpacesInSquareBrackets")]
    spaces_in_square_brackets_ext: Option<bool>,
    #[serde(rename = "spacesInSquareBrackets")]
    spaces_in_square_brackets: Option<bool>,

    #[serde(rename = "SpacesInAngles")]
    spaces_in_angles_ext: Option<PolicyValue>,
    #[serde(rename = "spacesInAngles")]
    spaces_in_angles: Option<PolicyValue>,

    #[serde(rename = "SpaceBeforeParens")]
    space_before_parens_ext: Option<SpaceBeforeParens>,
    #[serde(rename = "spaceBeforeParens")]
    space_before_parens: Option<SpaceBeforeParens>,

    #[serde(rename = "ColumnLimit")]
    column_limit_ext: Option<u32>,
    #[serde(rename = "columnLimit")]
    column_limit: Option<u32>,

    #[serde(rename = "BreakBeforeBraces")]
    break_before_braces_ext: Option<BraceStyle>,
    #[serde(rename = "breakBeforeBraces")]
    break_before_braces: Option<BraceStyle>,
}

impl RawStyleConfig {
    /// Resolve to a canonical [`StyleConfig`].
    ///
    /// Precedence per field: external key, then internal key, then the
    /// built-in default. Total over its input domain.
    pub fn normalize(self) -> StyleConfig {
        let defaults = StyleConfig::default();
        StyleConfig {
            base_format: self.base_format.unwrap_or(defaults.base_format),
            indent_width: self
                .indent_width_ext
                .or(self.indent_width)
                .unwrap_or(defaults.indent_width),
            tab_width: self
                .tab_width_ext
                .or(self.tab_width)
                .unwrap_or(defaults.tab_width),
            use_tab: self.use_tab_ext.or(self.use_tab).unwrap_or(defaults.use_tab),
            spaces_in_parentheses: self
                .spaces_in_parens_ext
                .or(self.spaces_in_parentheses)
                .map(SpacePolicy::from)
                .unwrap_or(defaults.spaces_in_parentheses),
            spaces_in_square_brackets: self
                .spaces_in_square_brackets_ext
                .or(self.spaces_in_square_brackets)
                .unwrap_or(defaults.spaces_in_square_brackets),
            spaces_in_angles: self
                .spaces_in_angles_ext
                .or(self.spaces_in_angles)
                .map(SpacePolicy::from)
                .unwrap_or(defaults.spaces_in_angles),
            space_before_parens: self
                .space_before_parens_ext
                .or(self.space_before_parens)
                .unwrap_or(defaults.space_before_parens),
            column_limit: self
                .column_limit_ext
                .or(self.column_limit)
                .unwrap_or(defaults.column_limit),
            break_before_braces: self
                .break_before_braces_ext
                .or(self.break_before_braces)
                .unwrap_or(defaults.break_before_braces),
        }
    }
}

/// The built-in preset table, in selection order.
///
/// The first entry (Google) doubles as the fallback for unknown names.
pub fn builtin_presets() -> IndexMap<&'static str, StyleConfig> {
    let mut presets = IndexMap::new();

    presets.insert("Google", StyleConfig::default());

    presets.insert(
        "LLVM",
        StyleConfig {
            base_format: BaseStyle::Llvm,
            ..StyleConfig::default()
        },
    );

    presets.insert(
        "Mozilla",
        StyleConfig {
            base_format: BaseStyle::Mozilla,
            indent_width: 4,
            tab_width: 4,
            break_before_braces: BraceStyle::Allman,
            ..StyleConfig::default()
        },
    );

    presets.insert(
        "WebKit",
        StyleConfig {
            base_format: BaseStyle::WebKit,
            indent_width: 4,
            tab_width: 4,
            column_limit: 100,
            ..StyleConfig::default()
        },
    );

    presets.insert(
        "Stroustrup",
        StyleConfig {
            base_format: BaseStyle::Stroustrup,
            indent_width: 4,
            tab_width: 4,
            column_limit: 79,
            break_before_braces: BraceStyle::Stroustrup,
            ..StyleConfig::default()
        },
    );

    presets.insert(
        "Allman",
        StyleConfig {
            base_format: BaseStyle::Allman,
            indent_width: 4,
            tab_width: 4,
            break_before_braces: BraceStyle::Allman,
            ..StyleConfig::default()
        },
    );

    presets.insert(
        "GNU",
        StyleConfig {
            base_format: BaseStyle::Gnu,
            indent_width: 2,
            tab_width: 8,
            use_tab: TabPolicy::Always,
            space_before_parens: SpaceBeforeParens::Always,
            break_before_braces: BraceStyle::Gnu,
            ..StyleConfig::default()
        },
    );

    presets
}

/// Look up a preset by name, falling back to the first (Google) entry.
pub fn preset(name: &str) -> StyleConfig {
    let presets = builtin_presets();
    presets.get(name).cloned().unwrap_or_else(|| {
        let (_, first) = presets.first().expect("preset table is never empty");
        tracing::warn!(preset = name, "unknown preset name, falling back to {}", first.base_format);
        first.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_google_preset() {
        let config = StyleConfig::default();
        assert_eq!(config.base_format, BaseStyle::Google);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.use_tab, TabPolicy::Never);
        assert_eq!(config.column_limit, 80);
        assert_eq!(config.break_before_braces, BraceStyle::Attach);
    }

    #[test]
    fn test_gnu_preset_table() {
        let config = preset("GNU");
        assert_eq!(config.base_format, BaseStyle::Gnu);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.use_tab, TabPolicy::Always);
        assert_eq!(config.space_before_parens, SpaceBeforeParens::Always);
        assert_eq!(config.break_before_braces, BraceStyle::Gnu);
    }

    #[test]
    fn test_unknown_preset_falls_back_to_google() {
        let config = preset("NotAStyle");
        assert_eq!(config, preset("Google"));
    }

    #[test]
    fn test_normalize_external_keys() {
        let raw: RawStyleConfig = serde_json::from_str(
            r#"{
                "IndentWidth": 4,
                "TabWidth": 4,
                "UseTab": "Always",
                "SpacesInParens": "Always",
                "SpacesInSquareBrackets": true,
                "SpacesInAngles": "Always",
                "SpaceBeforeParens": "Never",
                "ColumnLimit": 120,
                "BreakBeforeBraces": "Allman"
            }"#,
        )
        .unwrap();

        let config = raw.normalize();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.use_tab, TabPolicy::Always);
        assert_eq!(config.spaces_in_parentheses, SpacePolicy::Always);
        assert!(config.spaces_in_square_brackets);
        assert_eq!(config.spaces_in_angles, SpacePolicy::Always);
        assert_eq!(config.space_before_parens, SpaceBeforeParens::Never);
        assert_eq!(config.column_limit, 120);
        assert_eq!(config.break_before_braces, BraceStyle::Allman);
        // Absent baseFormat falls back to the default
        assert_eq!(config.base_format, BaseStyle::Google);
    }

    #[test]
    fn test_normalize_internal_keys() {
        let raw: RawStyleConfig = serde_json::from_str(
            r#"{
                "baseFormat": "WebKit",
                "indentWidth": 4,
                "tabWidth": 4,
                "columnLimit": 100,
                "breakBeforeBraces": "Attach"
            }"#,
        )
        .unwrap();

        let config = raw.normalize();
        assert_eq!(config.base_format, BaseStyle::WebKit);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.column_limit, 100);
        // Unspecified fields get defaults
        assert_eq!(config.use_tab, TabPolicy::Never);
        assert_eq!(config.spaces_in_parentheses, SpacePolicy::Never);
    }

    #[test]
    fn test_normalize_external_wins_over_internal() {
        let raw: RawStyleConfig = serde_json::from_str(
            r#"{"IndentWidth": 8, "indentWidth": 2, "ColumnLimit": 120, "columnLimit": 80}"#,
        )
        .unwrap();

        let config = raw.normalize();
        assert_eq!(config.indent_width, 8);
        assert_eq!(config.column_limit, 120);
    }

    #[test]
    fn test_normalize_boolean_policy_values() {
        let raw: RawStyleConfig = serde_json::from_str(
            r#"{"spacesInParentheses": true, "spacesInAngles": false}"#,
        )
        .unwrap();

        let config = raw.normalize();
        assert_eq!(config.spaces_in_parentheses, SpacePolicy::Always);
        assert_eq!(config.spaces_in_angles, SpacePolicy::Never);
    }

    #[test]
    fn test_normalize_empty_object_is_all_defaults() {
        let raw: RawStyleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.normalize(), StyleConfig::default());
    }

    #[test]
    fn test_style_override_json_uses_external_keys() {
        let config = StyleConfig {
            indent_width: 4,
            ..StyleConfig::default()
        };
        let json = config.style_override_json();

        assert!(json.contains("\"IndentWidth\":4"));
        assert!(json.contains("\"BreakBeforeBraces\":\"Attach\""));
        assert!(json.contains("\"UseTab\":\"Never\""));
        // baseFormat is not a clang-format option
        assert!(!json.contains("baseFormat"));
    }

    #[test]
    fn test_internal_serialization_round_trip() {
        let original = preset("Stroustrup");
        let json = serde_json::to_string_pretty(&original).unwrap();

        let raw: RawStyleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(raw.normalize(), original);
    }

    fn arb_style_config() -> impl Strategy<Value = StyleConfig> {
        (
            prop_oneof![
                Just(BaseStyle::Google),
                Just(BaseStyle::Llvm),
                Just(BaseStyle::Mozilla),
                Just(BaseStyle::WebKit),
                Just(BaseStyle::Stroustrup),
                Just(BaseStyle::Allman),
                Just(BaseStyle::Gnu),
            ],
            1u32..=16,
            1u32..=16,
            prop_oneof![
                Just(TabPolicy::Never),
                Just(TabPolicy::ForIndentation),
                Just(TabPolicy::Always),
            ],
            prop_oneof![Just(SpacePolicy::Never), Just(SpacePolicy::Always)],
            any::<bool>(),
            prop_oneof![Just(SpacePolicy::Never), Just(SpacePolicy::Always)],
            prop_oneof![
                Just(SpaceBeforeParens::Never),
                Just(SpaceBeforeParens::ControlStatements),
                Just(SpaceBeforeParens::Always),
            ],
            40u32..=200,
            prop_oneof![
                Just(BraceStyle::Attach),
                Just(BraceStyle::Allman),
                Just(BraceStyle::Stroustrup),
                Just(BraceStyle::Gnu),
            ],
        )
            .prop_map(
                |(
                    base_format,
                    indent_width,
                    tab_width,
                    use_tab,
                    spaces_in_parentheses,
                    spaces_in_square_brackets,
                    spaces_in_angles,
                    space_before_parens,
                    column_limit,
                    break_before_braces,
                )| StyleConfig {
                    base_format,
                    indent_width,
                    tab_width,
                    use_tab,
                    spaces_in_parentheses,
                    spaces_in_square_brackets,
                    spaces_in_angles,
                    space_before_parens,
                    column_limit,
                    break_before_braces,
                },
            )
    }

    proptest! {
        /// Every field survives the write-then-normalize round trip.
        #[test]
        fn prop_normalization_round_trip(config in arb_style_config()) {
            let json = serde_json::to_string(&config).unwrap();
            let raw: RawStyleConfig = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(raw.normalize(), config);
        }
    }
}

// crates/infra-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: English and Catalan templates for every line the CLI prints.
// Purpose: Keep report labels and errors in one localizable table.
// Dependencies: std::collections, std::sync
// ============================================================================

//! ## Overview
//! The Infra Gate CLI stores user-facing strings in a small translation
//! catalog so reports and errors read the same everywhere. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - Lookup tables are built on first use and never mutated.
//! - A key missing from a locale resolves to English, then to the key text.
//! - Arguments are substituted in the order the caller passed them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output languages.
///
/// [`Locale::En`] is the fallback for unset or missing entries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the two-letter language code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a language tag such as `ca`, `EN` or `ca_ES`; the region is ignored.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let language = value.trim().split(['-', '_']).next()?;
        SUPPORTED_LOCALES
            .iter()
            .copied()
            .find(|locale| language.eq_ignore_ascii_case(locale.as_str()))
    }
}

/// Every locale with a catalog, English first.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// One named value for a `{placeholder}` in a template, as built by [`macro@crate::t`].
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Rendered value.
    pub value: String,
}

impl MessageArg {
    /// Pairs a placeholder name with its value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Active Locale
// ============================================================================

/// Locale chosen at startup.
static ACTIVE_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Fixes the process locale; later calls are ignored.
pub fn set_locale(locale: Locale) {
    let _ = ACTIVE_LOCALE.set(locale);
}

/// Returns the process locale, English until [`set_locale`] runs.
#[must_use]
pub fn current_locale() -> Locale {
    ACTIVE_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English templates.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "infra-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.validate.unknown_suites", "Config names unknown suites: {ids}"),
    ("check.root_missing", "Artifact root {path} is not a directory."),
    ("check.log_open_failed", "Failed to open event log at {path}: {error}"),
    ("check.inventory_failed", "Failed to initialize AWS inventory: {error}"),
    ("check.register_failed", "Failed to register suites: {error}"),
    ("check.run_failed", "Check run refused: {error}"),
    ("check.serialize_failed", "Failed to serialize report: {error}"),
    ("suites.serialize_failed", "Failed to serialize suite catalog: {error}"),
    ("report.status.passed", "PASS"),
    ("report.status.failed", "FAIL"),
    ("report.status.skipped", "SKIP"),
    ("report.text.header", "Infra Gate report for {prefix} in {region}"),
    ("report.text.suite", "{title} [{suite}]"),
    ("report.text.check", "  {status} {check}: {description}"),
    ("report.text.message", "       {message}"),
    (
        "report.text.summary",
        "{passed} passed, {failed} failed, {skipped} skipped ({total} checks)",
    ),
    ("report.md.header", "# Infra Gate Report"),
    ("report.md.fixture", "- Fixture: `{prefix}` in `{region}`"),
    (
        "report.md.summary",
        "- Summary: {passed} passed, {failed} failed, {skipped} skipped ({total} checks)",
    ),
    ("report.md.suite", "## {title} (`{suite}`)"),
    ("report.md.table_header", "| Check | Status | Message |"),
    ("report.md.row", "| `{check}` | {status} | {message} |"),
    ("suites.kind.artifact", "artifact"),
    ("suites.kind.live", "live"),
    ("suites.list.suite", "{suite} ({kind}): {title}"),
    ("suites.list.check", "  {check}: {description}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Catalan templates.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "infra-gate {version}"),
    ("output.stream.stdout", "sortida estàndard"),
    ("output.stream.stderr", "sortida d'error"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("config.validate.unknown_suites", "La configuració anomena suites desconegudes: {ids}"),
    ("check.root_missing", "L'arrel d'artefactes {path} no és un directori."),
    ("check.log_open_failed", "No s'ha pogut obrir el registre d'esdeveniments a {path}: {error}"),
    ("check.inventory_failed", "No s'ha pogut inicialitzar l'inventari d'AWS: {error}"),
    ("check.register_failed", "No s'han pogut registrar les suites: {error}"),
    ("check.run_failed", "Execució de comprovacions rebutjada: {error}"),
    ("check.serialize_failed", "No s'ha pogut serialitzar l'informe: {error}"),
    ("suites.serialize_failed", "No s'ha pogut serialitzar el catàleg de suites: {error}"),
    ("report.status.passed", "OK"),
    ("report.status.failed", "ERROR"),
    ("report.status.skipped", "OMÈS"),
    ("report.text.header", "Informe d'Infra Gate per a {prefix} a {region}"),
    ("report.text.suite", "{title} [{suite}]"),
    ("report.text.check", "  {status} {check}: {description}"),
    ("report.text.message", "       {message}"),
    (
        "report.text.summary",
        "{passed} correctes, {failed} fallides, {skipped} omeses ({total} comprovacions)",
    ),
    ("report.md.header", "# Informe d'Infra Gate"),
    ("report.md.fixture", "- Entorn: `{prefix}` a `{region}`"),
    (
        "report.md.summary",
        "- Resum: {passed} correctes, {failed} fallides, {skipped} omeses ({total} comprovacions)",
    ),
    ("report.md.suite", "## {title} (`{suite}`)"),
    ("report.md.table_header", "| Comprovació | Estat | Missatge |"),
    ("report.md.row", "| `{check}` | {status} | {message} |"),
    ("suites.kind.artifact", "artefacte"),
    ("suites.kind.live", "en viu"),
    ("suites.list.suite", "{suite} ({kind}): {title}"),
    ("suites.list.check", "  {check}: {description}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the template table of `locale` in declaration order.
#[must_use]
pub const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Key lookup table over a template table.
type Catalog = HashMap<&'static str, &'static str>;

/// Returns the keyed templates of `locale`.
pub(crate) fn catalog_for(locale: Locale) -> &'static Catalog {
    static ENGLISH: OnceLock<Catalog> = OnceLock::new();
    static CATALAN: OnceLock<Catalog> = OnceLock::new();
    let cell = match locale {
        Locale::En => &ENGLISH,
        Locale::Ca => &CATALAN,
    };
    cell.get_or_init(|| catalog_entries_for(locale).iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` in the process locale.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Renders `key` in `locale`, replacing each `{name}` with its argument.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = [locale, Locale::En]
        .into_iter()
        .find_map(|candidate| catalog_for(candidate).get(key).copied())
        .unwrap_or(key);
    args.into_iter().fold(template.to_string(), |rendered, arg| {
        rendered.replace(&format!("{{{}}}", arg.key), &arg.value)
    })
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Renders a catalog key in the process locale.
///
/// `t!("check.root_missing", path = root.display())` fills `{path}` with
/// the `Display` form of each named argument.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        $crate::i18n::translate(
            $key,
            ::std::vec![$($crate::i18n::MessageArg::new(stringify!($name), $value.to_string())),*],
        )
    }};
}

// crates/infra-gate-cli/src/lib.rs
// ============================================================================
// Module: Infra Gate CLI Library
// Description: Shared helpers for the Infra Gate command-line interface.
// Purpose: Provide the message catalog and report renderers to the binary.
// Dependencies: infra-gate-core, serde_json
// ============================================================================

//! ## Overview
//! This library houses the localized message catalog and the renderers that
//! turn run reports and the suite catalog into text, Markdown, or JSON. The
//! binary entry point (`src/main.rs`) imports these helpers so every
//! user-facing line goes through the catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Report and catalog renderers.
pub mod render;

#[cfg(test)]
mod tests;

use std::fmt;

/// Ranked model identifiers, most preferred first.
pub const PRIORITY_MODELS: [&str; 8] = [
    "models/gemini-3-pro-preview",
    "models/gemini-2.0-pro-exp",
    "models/gemini-2.5-pro",
    "models/gemini-2.0-flash",
    "models/gemini-1.5-pro-latest",
    "models/gemini-1.5-pro",
    "models/gemini-1.5-flash",
    "models/gemini-pro",
];

/// Used when the catalog is unavailable or contains no preferred model.
/// Its availability is never checked.
pub const FALLBACK_MODEL: &str = "gemini-pro";

/// Where a selected model name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Set explicitly by the operator; discovery was skipped.
    Override,
    /// First priority-list entry present in the catalog.
    Preferred,
    /// Hard-coded fallback.
    Fallback,
}

impl ModelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSource::Override => "override",
            ModelSource::Preferred => "preferred",
            ModelSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub name: String,
    pub source: ModelSource,
}

impl ModelSelection {
    pub fn overridden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ModelSource::Override,
        }
    }

    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_MODEL.to_string(),
            source: ModelSource::Fallback,
        }
    }

    /// Pick the first entry of [`PRIORITY_MODELS`] that appears in `available`.
    /// Falls back to [`FALLBACK_MODEL`] when none do.
    pub fn from_catalog<S: AsRef<str>>(available: &[S]) -> Self {
        PRIORITY_MODELS
            .iter()
            .find(|candidate| available.iter().any(|m| m.as_ref() == **candidate))
            .map(|name| Self {
                name: (*name).to_string(),
                source: ModelSource::Preferred,
            })
            .unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_absent_higher_ranked_entry() {
        let catalog = vec![
            "models/gemini-1.5-flash".to_string(),
            "models/gemini-2.5-pro".to_string(),
        ];
        let selection = ModelSelection::from_catalog(&catalog);
        assert_eq!(selection.name, "models/gemini-2.5-pro");
        assert_eq!(selection.source, ModelSource::Preferred);
    }

    #[test]
    fn priority_order_beats_catalog_order() {
        let catalog = ["models/gemini-pro", "models/gemini-2.0-flash", "models/gemini-3-pro-preview"];
        let selection = ModelSelection::from_catalog(&catalog);
        assert_eq!(selection.name, "models/gemini-3-pro-preview");
    }

    #[test]
    fn empty_catalog_falls_back() {
        let catalog: Vec<String> = vec![];
        let selection = ModelSelection::from_catalog(&catalog);
        assert_eq!(selection.name, FALLBACK_MODEL);
        assert_eq!(selection.source, ModelSource::Fallback);
    }

    #[test]
    fn unknown_models_fall_back() {
        let catalog = ["models/text-bison-001", "models/embedding-001"];
        let selection = ModelSelection::from_catalog(&catalog);
        assert_eq!(selection, ModelSelection::fallback());
    }

    #[test]
    fn bare_names_do_not_match_prefixed_entries() {
        // The catalog reports fully-qualified names; a bare name is not a match.
        let catalog = ["gemini-2.5-pro"];
        let selection = ModelSelection::from_catalog(&catalog);
        assert_eq!(selection.source, ModelSource::Fallback);
    }

    #[test]
    fn override_keeps_name_verbatim() {
        let selection = ModelSelection::overridden("gemini-2.5-flash");
        assert_eq!(selection.name, "gemini-2.5-flash");
        assert_eq!(selection.source, ModelSource::Override);
        assert_eq!(selection.source.to_string(), "override");
    }
}

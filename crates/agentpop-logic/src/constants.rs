//! Shared constants: field names, separators, tolerances.
//!
//! Plain `&str`/numeric constants with no runtime dependency, shared by the
//! generator, the redistributor and the import parser.

/// Separator placed between `"dimension: category"` pairs in archetype labels.
pub const LABEL_SEPARATOR: &str = ", ";

/// Prefix for generator-assigned archetype ids (`arch_0`, `arch_1`, ...).
pub const ARCHETYPE_ID_PREFIX: &str = "arch_";

/// Prefix for trait ids (`trait_1`, `trait_2`, ...).
pub const TRAIT_ID_PREFIX: &str = "trait_";

/// Largest archetype set `generate` will expand; bigger products yield nothing.
pub const MAX_ARCHETYPES: usize = 1_000_000;

/// Tolerance against 1.0 used when reporting whether a distribution is normalized.
pub const NORMALIZATION_TOLERANCE: f64 = 0.01;

/// How many row errors the caller-facing summary shows verbatim.
pub const MAX_DISPLAYED_ERRORS: usize = 5;

/// Row label used for whole-file import failures.
pub const FILE_ERROR_LABEL: &str = "file";

/// Bounds applied to trait configuration on input.
pub mod trait_bounds {
    pub const MEAN_MIN: f64 = 0.0;
    pub const MEAN_MAX: f64 = 100.0;
    pub const STD_MIN: f64 = 0.0;
    pub const STD_MAX: f64 = 50.0;
}

/// Field names recognized on imported rows.
pub mod fields {
    pub const AGENT_NAME: &str = "agent_name";
    pub const AGENT_DESCRIPTION: &str = "agent_description";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const PROFILE: &str = "profile";
    pub const ID: &str = "id";
    pub const ROLE: &str = "role";
    pub const AVATAR_URL: &str = "avatarUrl";
    pub const PROPERTIES: &str = "properties";
    pub const HISTORY: &str = "history";
    pub const MEMORY: &str = "memory";
    pub const KNOWLEDGE_BASE: &str = "knowledgeBase";
    pub const LLM_CONFIG: &str = "llmConfig";
    /// Top-level key holding the agent array in object-shaped JSON files.
    pub const AGENTS: &str = "agents";
    /// Prefix for synthetic keys produced by positional CSV columns 2..n.
    pub const ATTRIBUTE_PREFIX: &str = "attribute";

    /// Keys that map to first-class record fields and are never copied
    /// into `properties`.
    pub const RESERVED: &[&str] = &[
        AGENT_NAME,
        AGENT_DESCRIPTION,
        NAME,
        PROFILE,
        ID,
        ROLE,
        AVATAR_URL,
        PROPERTIES,
        HISTORY,
        MEMORY,
        KNOWLEDGE_BASE,
        LLM_CONFIG,
    ];

    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}

/// Base URL for deterministic placeholder avatars; the name slug is appended.
pub const AVATAR_PLACEHOLDER_BASE: &str = "https://api.dicebear.com/7.x/personas/svg?seed=";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys() {
        assert!(fields::is_reserved("role"));
        assert!(fields::is_reserved("llmConfig"));
        assert!(!fields::is_reserved("extra"));
        // `description` is only a CSV header alias, not a reserved key
        assert!(!fields::is_reserved("description"));
    }

    #[test]
    fn test_reserved_count() {
        assert_eq!(fields::RESERVED.len(), 12);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_PERSONA: &str = "Marketer";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonaProfile {
    pub name: String,
    pub description: String,
    pub tone: String,
    #[serde(default)]
    pub priorities: Vec<String>,
}

/// Static persona table with read-only lookup. Unknown names fall back to
/// the default persona rather than failing.
#[derive(Debug, Clone)]
pub struct PersonaTable {
    personas: HashMap<String, PersonaProfile>,
}

impl Default for PersonaTable {
    fn default() -> Self {
        Self::built_in()
    }
}

impl PersonaTable {
    pub fn built_in() -> Self {
        let mut table = Self {
            personas: HashMap::new(),
        };

        table.register(PersonaProfile {
            name: "Marketer".to_string(),
            description: "Focus on clear value propositions, ROI, and business impact".to_string(),
            tone: "persuasive and benefit-focused".to_string(),
            priorities: vec![
                "clarity".to_string(),
                "business_value".to_string(),
                "actionable_insights".to_string(),
            ],
        });
        table.register(PersonaProfile {
            name: "Developer".to_string(),
            description: "Emphasize technical accuracy, code examples, and implementation details"
                .to_string(),
            tone: "technical and precise".to_string(),
            priorities: vec![
                "accuracy".to_string(),
                "code_examples".to_string(),
                "implementation_steps".to_string(),
            ],
        });
        table.register(PersonaProfile {
            name: "Product Manager".to_string(),
            description: "Balance technical and business aspects, focus on user experience"
                .to_string(),
            tone: "strategic and user-centric".to_string(),
            priorities: vec![
                "user_experience".to_string(),
                "feature_benefits".to_string(),
                "strategic_context".to_string(),
            ],
        });

        table
    }

    pub fn register(&mut self, persona: PersonaProfile) {
        self.personas.insert(persona.name.clone(), persona);
    }

    /// Look up a persona by name, falling back to the default profile.
    pub fn get_or_default(&self, name: &str) -> &PersonaProfile {
        self.personas
            .get(name)
            .or_else(|| self.personas.get(DEFAULT_PERSONA))
            .expect("built-in persona table always contains the default")
    }

    pub fn list(&self) -> Vec<&PersonaProfile> {
        let mut list: Vec<&PersonaProfile> = self.personas.values().collect();
        list.sort_by_key(|p| &p.name);
        list
    }

    /// Overlay YAML persona files from `dir` onto the built-in table.
    /// A file that fails to parse is skipped with a warning.
    pub fn load_overrides(&mut self, dir: &Path) -> anyhow::Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            let ext = path.extension().and_then(|s| s.to_str());
            if ext != Some("yaml") && ext != Some("yml") {
                continue;
            }

            match Self::parse_persona(&path) {
                Ok(persona) => self.register(persona),
                Err(e) => log::warn!("Failed to load persona {}: {e}", path.display()),
            }
        }

        Ok(())
    }

    fn parse_persona(path: &Path) -> anyhow::Result<PersonaProfile> {
        let content = fs::read_to_string(path)?;
        let persona: PersonaProfile = serde_yaml::from_str(&content)?;

        if persona.name.trim().is_empty() {
            anyhow::bail!("Persona name cannot be empty");
        }

        Ok(persona)
    }
}

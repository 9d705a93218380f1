use serde::{Deserialize, Deserializer, Serialize};

use super::lenient::{deserialize_lenient_text, lenient_u32};

const DEFAULT_DIET: &str = "none";
const DEFAULT_CUISINE: &str = "fusion";
const DEFAULT_DIFFICULTY: &str = "medium";
const DEFAULT_SERVINGS: u32 = 4;

fn default_diet() -> String {
    DEFAULT_DIET.to_string()
}

fn default_cuisine() -> String {
    DEFAULT_CUISINE.to_string()
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

/// Any number, or a string with a leading number; everything else,
/// including zero, takes the default.
fn deserialize_servings<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?
        .filter(|servings| *servings > 0)
        .unwrap_or(DEFAULT_SERVINGS))
}

/// Caller preferences for a generated recipe. Unknown keys are ignored and
/// unusable values are left blank for [`PreferenceSet::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet {
    #[serde(
        default = "default_diet",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub diet: String,
    #[serde(
        default = "default_cuisine",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub cuisine: String,
    #[serde(
        default = "default_difficulty",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub difficulty: String,
    #[serde(default = "default_servings", deserialize_with = "deserialize_servings")]
    pub servings: u32,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            diet: default_diet(),
            cuisine: default_cuisine(),
            difficulty: default_difficulty(),
            servings: DEFAULT_SERVINGS,
        }
    }
}

impl PreferenceSet {
    /// Replace blank strings and zero servings with the defaults.
    pub fn normalized(mut self) -> Self {
        fn fill(value: &mut String, default: &str) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                *value = default.to_string();
            } else if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        fill(&mut self.diet, DEFAULT_DIET);
        fill(&mut self.cuisine, DEFAULT_CUISINE);
        fill(&mut self.difficulty, DEFAULT_DIFFICULTY);
        if self.servings == 0 {
            self.servings = DEFAULT_SERVINGS;
        }
        self
    }

    pub fn has_diet_restriction(&self) -> bool {
        !self.diet.trim().is_empty() && !self.diet.eq_ignore_ascii_case(DEFAULT_DIET)
    }
}

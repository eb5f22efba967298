//! Generation types and their system prompts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of snippet the tools page can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Button,
    Image,
    Logo,
    Effect,
}

impl GenerationType {
    pub const ALL: [GenerationType; 4] = [Self::Button, Self::Image, Self::Logo, Self::Effect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Image => "image",
            Self::Logo => "logo",
            Self::Effect => "effect",
        }
    }

    /// System prompt sent ahead of the user's description.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Button => BUTTON_PROMPT,
            Self::Image => IMAGE_PROMPT,
            Self::Logo => LOGO_PROMPT,
            Self::Effect => EFFECT_PROMPT,
        }
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for a generation type the gateway has no prompt for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid generation type: {0}")]
pub struct UnknownGenerationType(pub String);

impl FromStr for GenerationType {
    type Err = UnknownGenerationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownGenerationType(s.to_string()))
    }
}

const BUTTON_PROMPT: &str = "You are an expert UI developer. Generate clean, modern HTML/CSS button code based on the user's description.
Return ONLY valid HTML and CSS code. Include both the HTML markup and CSS styles.
Use modern CSS features and make the button responsive and accessible.
Format: Return a code block with HTML first, then CSS.";

const IMAGE_PROMPT: &str = "You are an expert web developer. Generate HTML/CSS code for image components, galleries, or image effects.
Return ONLY valid HTML and CSS code. Include responsive design and modern techniques.
Format: Return a code block with HTML first, then CSS.";

const LOGO_PROMPT: &str = "You are an expert SVG and logo designer. Generate SVG code for logos based on the user's description.
Return ONLY valid SVG code that can be used directly in HTML.
Make the SVG scalable and include proper viewBox attributes.
Use modern design principles and clean paths.";

const EFFECT_PROMPT: &str = "You are an expert CSS animator. Generate CSS animations, transitions, and visual effects code.
Return ONLY valid CSS code with optional HTML structure if needed.
Include keyframes, transitions, and any JavaScript if required for the effect.
Make effects performant and smooth.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types() {
        assert_eq!("logo".parse::<GenerationType>().unwrap(), GenerationType::Logo);
        assert_eq!(
            "video".parse::<GenerationType>().unwrap_err().to_string(),
            "Invalid generation type: video"
        );
    }

    #[test]
    fn every_type_has_a_prompt() {
        for kind in GenerationType::ALL {
            assert!(kind.system_prompt().starts_with("You are an expert"));
        }
        assert!(GenerationType::Logo.system_prompt().contains("SVG"));
    }
}

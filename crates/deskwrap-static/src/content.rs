//! Copy and option lists rendered into the pages.

use serde::Serialize;

use deskwrap_core::{Framework, TargetOs};
use deskwrap_gateway::GenerationType;

/// A feature tile on the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// One step of the "how it works" strip.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub number: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A selectable form option.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
}

/// A generator card on the tools page.
#[derive(Debug, Clone, Serialize)]
pub struct Generator {
    pub kind: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub examples: [&'static str; 4],
}

pub fn features() -> Vec<Feature> {
    vec![
        Feature {
            icon: "🛡️",
            title: "Zero code changes",
            description: "Your web app is wrapped in a WebView. Not a single line of code is changed, analysed or copied.",
        },
        Feature {
            icon: "</>",
            title: "Full fidelity",
            description: "The desktop app behaves exactly like the web app. Layout, features and behaviour are preserved.",
        },
        Feature {
            icon: "🚀",
            title: "Automated build",
            description: "Enter the URL or GitHub repository and get an installer ready to distribute.",
        },
        Feature {
            icon: "📦",
            title: "Electron or Tauri",
            description: "Choose Electron (most compatible) or Tauri (lightest) as the base of your desktop app.",
        },
        Feature {
            icon: "🔒",
            title: "Isolated environment",
            description: "Every build runs in its own isolated container.",
        },
        Feature {
            icon: "🔄",
            title: "Effortless updates",
            description: "The app loads from its URL, so web updates show up on the desktop automatically.",
        },
    ]
}

pub fn steps() -> Vec<Step> {
    vec![
        Step {
            number: "01",
            icon: "🌐",
            title: "Enter the URL",
            description: "Paste the URL of your web app or a link to its GitHub repository.",
        },
        Step {
            number: "02",
            icon: "⚙️",
            title: "Configure",
            description: "Pick the operating system and framework, and upload an icon.",
        },
        Step {
            number: "03",
            icon: "⬇️",
            title: "Download the installer",
            description: "Get an installer ready to hand out to your users.",
        },
    ]
}

pub fn os_choices() -> Vec<Choice> {
    TargetOs::ALL
        .iter()
        .map(|os| Choice {
            value: os.as_str(),
            label: os.label(),
            hint: match os {
                TargetOs::Windows => ".exe",
                TargetOs::Macos => ".dmg",
                TargetOs::Linux => ".AppImage",
            },
        })
        .collect()
}

pub fn framework_choices() -> Vec<Choice> {
    Framework::ALL
        .iter()
        .map(|fw| Choice {
            value: fw.as_str(),
            label: fw.label(),
            hint: match fw {
                Framework::Electron => "Most compatible",
                Framework::Tauri => "Lightest",
            },
        })
        .collect()
}

pub fn generators() -> Vec<Generator> {
    GenerationType::ALL
        .iter()
        .map(|kind| match kind {
            GenerationType::Button => Generator {
                kind: kind.as_str(),
                icon: "👆",
                title: "Button generator",
                description: "Create custom buttons in HTML/CSS",
                placeholder: "Describe the button you want...\nE.g. a blue gradient button with rounded corners and a hover effect",
                examples: [
                    "Neon button with glow",
                    "Minimal flat button",
                    "3D button with shadow",
                    "Button with animated icon",
                ],
            },
            GenerationType::Image => Generator {
                kind: kind.as_str(),
                icon: "🖼️",
                title: "Image components",
                description: "Generate galleries, cards and image layouts",
                placeholder: "Describe the image component...\nE.g. a three-column gallery with hover zoom",
                examples: [
                    "Responsive masonry gallery",
                    "Product card with image",
                    "Hero section with background image",
                    "Simple image carousel",
                ],
            },
            GenerationType::Logo => Generator {
                kind: kind.as_str(),
                icon: "⬡",
                title: "SVG logo generator",
                description: "Create scalable vector logos",
                placeholder: "Describe the logo you want...\nE.g. a minimal logo for a tech company",
                examples: [
                    "Abstract geometric logo",
                    "Monogram with initials AB",
                    "Modern cloud icon",
                    "Circular logo with text",
                ],
            },
            GenerationType::Effect => Generator {
                kind: kind.as_str(),
                icon: "✨",
                title: "Effects and animations",
                description: "Generate CSS animations and visual effects",
                placeholder: "Describe the effect or animation...\nE.g. a loading animation with three pulsing dots",
                examples: [
                    "Modern loading spinner",
                    "Typewriter effect",
                    "Floating CSS particles",
                    "Fade page transition",
                ],
            },
        })
        .collect()
}

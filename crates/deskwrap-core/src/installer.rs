//! Launcher scripts handed out as the "installer".
//!
//! Each script installs a tiny launcher that opens the web app in a
//! chromeless browser window, falling back to the default browser.

use std::sync::OnceLock;

use minijinja::{context, Environment};

use crate::build::TargetOs;
use crate::pipeline::slugify;

/// A generated installer, ready to be served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerScript {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Errors that can occur when generating an installer.
#[derive(Debug, thiserror::Error)]
pub enum InstallerError {
    #[error("App name is required")]
    MissingName,

    #[error("Invalid app URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to render installer: {0}")]
    Render(String),
}

/// Generate the launcher script for `os`.
pub fn generate_installer(
    app_name: &str,
    app_url: &str,
    os: TargetOs,
) -> Result<InstallerScript, InstallerError> {
    let name = strip_control(app_name.trim());
    if name.is_empty() {
        return Err(InstallerError::MissingName);
    }

    let url = url::Url::parse(app_url.trim())
        .map_err(|_| InstallerError::InvalidUrl(app_url.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(InstallerError::InvalidUrl(app_url.to_string()));
    }

    let slug = file_slug(&name);
    let (name, url) = match os {
        TargetOs::Windows => (batch_escape(&name), batch_escape(url.as_str())),
        TargetOs::Macos | TargetOs::Linux => (shell_quote(&name), shell_quote(url.as_str())),
    };

    let template = templates()
        .get_template(os.as_str())
        .map_err(|e| InstallerError::Render(e.to_string()))?;
    let body = template
        .render(context! { name => name, url => url, slug => &slug })
        .map_err(|e| InstallerError::Render(e.to_string()))?;

    let (body, content_type) = match os {
        TargetOs::Windows => (body.replace('\n', "\r\n") + "\r\n", "application/x-bat"),
        TargetOs::Macos | TargetOs::Linux => (body + "\n", "text/x-shellscript"),
    };

    Ok(InstallerScript {
        file_name: format!("{}-installer.{}", slug, os.script_extension()),
        content_type,
        body,
    })
}

fn templates() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template("windows", WINDOWS_TEMPLATE)
            .expect("Failed to add windows template");
        env.add_template("macos", MACOS_TEMPLATE)
            .expect("Failed to add macos template");
        env.add_template("linux", LINUX_TEMPLATE)
            .expect("Failed to add linux template");
        env
    })
}

fn strip_control(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Slug restricted to characters that are safe in every file system.
fn file_slug(name: &str) -> String {
    let slug: String = slugify(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "app".to_string()
    } else {
        slug
    }
}

/// Single-quote a value for POSIX shells.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Make a value safe inside `set "VAR=..."` with delayed expansion enabled.
fn batch_escape(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '"' && *c != '!')
        .collect::<String>()
        .replace('%', "%%")
}

const WINDOWS_TEMPLATE: &str = r#"@echo off
setlocal EnableDelayedExpansion
set "APP_NAME={{ name }}"
set "APP_URL={{ url }}"
set "TARGET=%USERPROFILE%\Desktop\{{ slug }}.bat"
echo Installing !APP_NAME!...
> "!TARGET!" echo @start "" msedge --app="!APP_URL!"
echo Shortcut created at !TARGET!
start "" msedge --app="!APP_URL!"
endlocal"#;

const MACOS_TEMPLATE: &str = r#"#!/bin/bash
set -euo pipefail
APP_NAME={{ name }}
APP_URL={{ url }}
APP_DIR="$HOME/Applications/{{ slug }}.app"
echo "Installing $APP_NAME..."
mkdir -p "$APP_DIR/Contents/MacOS" "$APP_DIR/Contents/Resources"
printf '%s\n' "$APP_URL" > "$APP_DIR/Contents/Resources/url"
cat > "$APP_DIR/Contents/MacOS/launch" <<'EOF'
#!/bin/bash
URL="$(cat "$(dirname "$0")/../Resources/url")"
if open -Ra "Google Chrome" 2>/dev/null; then
  exec open -na "Google Chrome" --args --app="$URL"
fi
exec open "$URL"
EOF
chmod +x "$APP_DIR/Contents/MacOS/launch"
cat > "$APP_DIR/Contents/Info.plist" <<'EOF'
<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>CFBundleExecutable</key>
  <string>launch</string>
  <key>CFBundlePackageType</key>
  <string>APPL</string>
</dict>
</plist>
EOF
echo "Installed $APP_DIR"
open "$APP_DIR""#;

const LINUX_TEMPLATE: &str = r#"#!/bin/sh
set -eu
APP_NAME={{ name }}
APP_URL={{ url }}
DATA_HOME="${XDG_DATA_HOME:-$HOME/.local/share}"
APP_DIR="$DATA_HOME/deskwrap/{{ slug }}"
DESKTOP_FILE="$DATA_HOME/applications/{{ slug }}.desktop"
echo "Installing $APP_NAME..."
mkdir -p "$APP_DIR" "$DATA_HOME/applications"
printf '%s\n' "$APP_URL" > "$APP_DIR/url"
cat > "$APP_DIR/launch.sh" <<'EOF'
#!/bin/sh
URL="$(cat "$(dirname "$0")/url")"
for browser in chromium chromium-browser google-chrome; do
  if command -v "$browser" >/dev/null 2>&1; then
    exec "$browser" --app="$URL"
  fi
done
exec xdg-open "$URL"
EOF
chmod +x "$APP_DIR/launch.sh"
{
  echo "[Desktop Entry]"
  echo "Type=Application"
  echo "Name=$APP_NAME"
  echo "Exec=\"$APP_DIR/launch.sh\""
  echo "Terminal=false"
  echo "Categories=Network;"
} > "$DESKTOP_FILE"
echo "Installed $DESKTOP_FILE""#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extension_matches_os() {
        for os in TargetOs::ALL {
            let script = generate_installer("My App", "https://myapp.example.com", os).unwrap();
            assert_eq!(
                script.file_name,
                format!("my-app-installer.{}", os.script_extension())
            );
        }

        let names: Vec<String> = TargetOs::ALL
            .iter()
            .map(|os| {
                generate_installer("x", "https://x.dev", *os)
                    .unwrap()
                    .file_name
            })
            .collect();
        assert_eq!(
            names,
            vec!["x-installer.bat", "x-installer.command", "x-installer.sh"]
        );
    }

    #[test]
    fn windows_script_uses_crlf() {
        let script = generate_installer("Notes", "https://notes.dev/?a=1&b=2", TargetOs::Windows)
            .unwrap();

        assert!(script.body.starts_with("@echo off\r\n"));
        assert!(script.body.contains("set \"APP_URL=https://notes.dev/?a=1&b=2\"\r\n"));
        assert!(!script.body.contains("\r\r"));
        assert_eq!(script.content_type, "application/x-bat");
    }

    #[test]
    fn escapes_percent_and_quotes_for_batch() {
        assert_eq!(batch_escape(r#"50% "off"!"#), "50%% off");
    }

    #[test]
    fn quotes_values_for_posix_shells() {
        let script =
            generate_installer("Bob's $(rm -rf) App", "https://bob.dev", TargetOs::Linux).unwrap();

        assert!(script.body.starts_with("#!/bin/sh\n"));
        assert!(script
            .body
            .contains(r#"APP_NAME='Bob'\''s $(rm -rf) App'"#));
        assert!(script.body.contains("APP_URL='https://bob.dev/'"));
        assert!(script.body.contains("applications/bobs-rm-rf-app.desktop"));
    }

    #[test]
    fn macos_script_builds_app_bundle() {
        let script = generate_installer("Mail", "https://mail.dev", TargetOs::Macos).unwrap();

        assert!(script.body.starts_with("#!/bin/bash\n"));
        assert!(script.body.contains("$HOME/Applications/mail.app"));
        assert!(script.body.contains("CFBundleExecutable"));
        assert_eq!(script.content_type, "text/x-shellscript");
    }

    #[test]
    fn strips_newlines_from_names() {
        let script =
            generate_installer("Evil\nrm -rf /", "https://x.dev", TargetOs::Linux).unwrap();
        assert!(script.body.contains("APP_NAME='Evilrm -rf /'"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            generate_installer("  ", "https://x.dev", TargetOs::Linux),
            Err(InstallerError::MissingName)
        ));
        assert!(matches!(
            generate_installer("x", "javascript:alert(1)", TargetOs::Linux),
            Err(InstallerError::InvalidUrl(_))
        ));
        assert!(matches!(
            generate_installer("x", "nope", TargetOs::Windows),
            Err(InstallerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn falls_back_to_generic_slug() {
        let script = generate_installer("???", "https://x.dev", TargetOs::Linux).unwrap();
        assert_eq!(script.file_name, "app-installer.sh");
    }
}

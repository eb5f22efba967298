//! Stylesheet and browser script for the generated site.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the browser script driving the conversion form and the tools page.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* deskwrap theme */

:root {
  --background: hsl(230 25% 7%);
  --foreground: hsl(220 20% 96%);
  --muted: hsl(225 12% 62%);
  --card: hsl(230 22% 11% / 0.7);
  --border: hsl(230 18% 22%);
  --primary: hsl(262 83% 66%);
  --accent: hsl(190 90% 55%);
  --success: hsl(150 70% 45%);
  --danger: hsl(0 80% 60%);
  --radius: 16px;
  --container: 1120px;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

html {
  scroll-behavior: smooth;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: inherit;
  text-decoration: none;
}

.container {
  max-width: var(--container);
  margin: 0 auto;
  padding: 0 1.5rem;
}

.container.narrow {
  max-width: 720px;
}

.muted {
  color: var(--muted);
}

.small {
  font-size: 0.8rem;
}

.accent {
  color: var(--accent);
  font-family: ui-monospace, monospace;
}

.gradient-text {
  background: linear-gradient(135deg, var(--primary), var(--accent));
  -webkit-background-clip: text;
  background-clip: text;
  color: transparent;
}

/* Navigation */

.navbar {
  position: sticky;
  top: 0;
  z-index: 10;
  backdrop-filter: blur(12px);
  background: hsl(230 25% 7% / 0.8);
  border-bottom: 1px solid var(--border);
}

.navbar-inner {
  display: flex;
  align-items: center;
  justify-content: space-between;
  height: 64px;
}

.nav-logo {
  font-weight: 700;
  font-size: 1.1rem;
}

.logo-mark {
  color: var(--primary);
}

.nav-links {
  display: flex;
  gap: 1.5rem;
  list-style: none;
}

.nav-item a {
  color: var(--muted);
}

.nav-item.active a,
.nav-item a:hover {
  color: var(--foreground);
}

/* Buttons */

.btn {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  gap: 0.5rem;
  padding: 0.6rem 1.2rem;
  border: 1px solid transparent;
  border-radius: 999px;
  font: inherit;
  font-weight: 600;
  cursor: pointer;
  transition: transform 0.15s ease, opacity 0.15s ease;
}

.btn:hover {
  transform: translateY(-1px);
}

.btn:disabled {
  opacity: 0.5;
  cursor: not-allowed;
  transform: none;
}

.btn-hero {
  background: linear-gradient(135deg, var(--primary), var(--accent));
  color: white;
}

.btn-glass {
  background: var(--card);
  border-color: var(--border);
  color: var(--foreground);
}

.btn-ghost {
  background: transparent;
  color: var(--muted);
}

.btn-sm { padding: 0.4rem 0.9rem; font-size: 0.85rem; }
.btn-lg { padding: 0.8rem 1.6rem; }
.btn-xl { padding: 1rem 2rem; font-size: 1.1rem; }
.btn-block { width: 100%; margin-top: 1rem; }

/* Hero */

.hero {
  padding: 7rem 0 5rem;
  text-align: center;
}

.hero-gradient {
  background:
    radial-gradient(ellipse at top, hsl(262 83% 66% / 0.25), transparent 60%),
    radial-gradient(ellipse at bottom right, hsl(190 90% 55% / 0.15), transparent 50%);
}

.hero h1 {
  font-size: clamp(2.4rem, 6vw, 4.5rem);
  line-height: 1.1;
  margin: 1.5rem 0;
}

.lead {
  max-width: 640px;
  margin: 0 auto 2rem;
  font-size: 1.15rem;
  color: var(--muted);
}

.hero-actions {
  display: flex;
  flex-wrap: wrap;
  gap: 1rem;
  justify-content: center;
}

.trust {
  display: flex;
  flex-wrap: wrap;
  gap: 2rem;
  justify-content: center;
  margin-top: 3rem;
  list-style: none;
  color: var(--muted);
}

.badge {
  display: inline-flex;
  align-items: center;
  gap: 0.5rem;
  padding: 0.35rem 0.9rem;
  border: 1px solid var(--border);
  border-radius: 999px;
  background: var(--card);
  font-size: 0.85rem;
}

.pulse {
  width: 8px;
  height: 8px;
  border-radius: 50%;
  background: var(--success);
  animation: pulse 2s infinite;
}

@keyframes pulse {
  50% { opacity: 0.3; }
}

/* Sections */

.section {
  padding: 5rem 0;
}

.section-head {
  text-align: center;
  margin-bottom: 3rem;
}

.section-head h1,
.section-head h2 {
  font-size: clamp(1.8rem, 4vw, 2.8rem);
  margin: 1rem 0 0.75rem;
}

.grid {
  display: grid;
  gap: 1.5rem;
}

.grid-2 { grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); }
.grid-3 { grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); }

.glass-card {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1.75rem;
  backdrop-filter: blur(12px);
}

.feature-icon {
  font-size: 1.75rem;
  margin-bottom: 0.75rem;
}

.steps {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
  gap: 2rem;
  list-style: none;
  text-align: center;
}

.step-icon {
  position: relative;
  display: inline-flex;
  align-items: center;
  justify-content: center;
  width: 72px;
  height: 72px;
  margin-bottom: 1rem;
  border-radius: 20px;
  background: var(--card);
  border: 1px solid var(--border);
  font-size: 1.75rem;
}

.step-number {
  position: absolute;
  top: -8px;
  right: -8px;
  padding: 0.1rem 0.4rem;
  border-radius: 999px;
  background: var(--primary);
  font-size: 0.7rem;
  font-weight: 700;
}

/* Form */

.form label,
.form legend {
  display: block;
  margin: 1.25rem 0 0.4rem;
  font-weight: 600;
}

.form input[type="text"],
.form input:not([type]),
.form textarea {
  width: 100%;
}

input,
textarea {
  padding: 0.7rem 0.9rem;
  border: 1px solid var(--border);
  border-radius: 10px;
  background: hsl(230 25% 5%);
  color: var(--foreground);
  font: inherit;
}

input:focus,
textarea:focus {
  outline: 2px solid var(--primary);
  outline-offset: 1px;
}

fieldset {
  border: none;
}

.hint {
  margin-top: 0.35rem;
  font-size: 0.8rem;
  color: var(--muted);
}

.choice {
  display: flex;
  flex-direction: column;
  padding: 0.9rem;
  border: 1px solid var(--border);
  border-radius: 12px;
  cursor: pointer;
}

.choice input:checked + span {
  color: var(--primary);
}

.choice input {
  position: absolute;
  opacity: 0;
}

/* Build status */

.status-card {
  margin-top: 2rem;
  text-align: center;
}

.status-icon {
  font-size: 2.5rem;
}

.status-card[data-status="completed"] .status-icon { color: var(--success); }
.status-card[data-status="failed"] .status-icon { color: var(--danger); }

.progress {
  height: 6px;
  margin-top: 1.25rem;
  border-radius: 999px;
  background: var(--border);
  overflow: hidden;
}

.progress-bar {
  width: 40%;
  height: 100%;
  background: linear-gradient(90deg, var(--primary), var(--accent));
  animation: progress 1.4s ease-in-out infinite;
}

@keyframes progress {
  0% { transform: translateX(-100%); }
  100% { transform: translateX(250%); }
}

/* Tools */

.generator header {
  display: flex;
  gap: 1rem;
  margin-bottom: 1rem;
}

.generator textarea {
  width: 100%;
  resize: vertical;
}

.examples {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  margin: 0.75rem 0;
}

.chip {
  padding: 0.25rem 0.7rem;
  border: 1px solid var(--border);
  border-radius: 999px;
  background: transparent;
  color: var(--muted);
  font-size: 0.8rem;
  cursor: pointer;
}

.chip:hover {
  color: var(--foreground);
  border-color: var(--primary);
}

.generator-actions {
  display: flex;
  gap: 0.5rem;
}

.code-preview {
  position: relative;
  margin-top: 1rem;
}

.code-preview pre {
  max-height: 360px;
  overflow: auto;
  padding: 1rem;
  border-radius: 10px;
  background: hsl(230 25% 4%);
  font-family: ui-monospace, monospace;
  font-size: 0.8rem;
  white-space: pre-wrap;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.6rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--card);
  color: var(--foreground);
  font-size: 0.75rem;
  cursor: pointer;
}

/* Footer */

.footer {
  padding: 3rem 0;
  border-top: 1px solid var(--border);
}

.footer-inner {
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 0.5rem;
  text-align: center;
}

/* Notifications */

.toasts {
  position: fixed;
  right: 1.5rem;
  bottom: 1.5rem;
  display: flex;
  flex-direction: column;
  gap: 0.5rem;
  z-index: 50;
}

.toast {
  max-width: 340px;
  padding: 0.8rem 1rem;
  border: 1px solid var(--border);
  border-left: 4px solid var(--primary);
  border-radius: 10px;
  background: hsl(230 22% 11%);
  box-shadow: 0 10px 30px hsl(0 0% 0% / 0.4);
}

.toast-error { border-left-color: var(--danger); }
.toast-success { border-left-color: var(--success); }

.toast strong {
  display: block;
}

@media (max-width: 640px) {
  .nav-links { display: none; }
  .hero { padding: 4rem 0 3rem; }
}
"#;

const DEFAULT_JS: &str = r##"// deskwrap browser client
(function() {
  'use strict';

  var POLL_INTERVAL_MS = 2000;
  var apiBase = (document.body.dataset.apiBase || '').replace(/\/$/, '');

  var STATUS_COPY = {
    queued: { icon: '⏳', title: 'Queued', description: 'Your build is waiting in the queue...' },
    building: { icon: '⚙️', title: 'Building...', description: 'Packaging your desktop app. This can take a few minutes.' },
    completed: { icon: '✅', title: 'Build complete!', description: 'Your desktop app is ready to download.' },
    failed: { icon: '❌', title: 'Build failed', description: 'Something went wrong during the build.' }
  };

  function api(path) {
    return apiBase + path;
  }

  function toast(title, description, variant) {
    var container = document.querySelector('.toasts');
    if (!container) return;
    var el = document.createElement('div');
    el.className = 'toast' + (variant ? ' toast-' + variant : '');
    var strong = document.createElement('strong');
    strong.textContent = title;
    el.appendChild(strong);
    if (description) {
      var p = document.createElement('span');
      p.textContent = description;
      el.appendChild(p);
    }
    container.appendChild(el);
    setTimeout(function() { el.remove(); }, 5000);
  }

  async function readError(response) {
    try {
      var body = await response.json();
      if (body && body.error) return body.error;
    } catch (e) {}
    return 'Request failed with status ' + response.status;
  }

  // Raw base64 payload of the file, without the data URL prefix
  function readAsBase64(file) {
    return new Promise(function(resolve, reject) {
      var reader = new FileReader();
      reader.onload = function() { resolve(String(reader.result).split(',')[1] || ''); };
      reader.onerror = function() { reject(reader.error); };
      reader.readAsDataURL(file);
    });
  }

  // Conversion form
  var form = document.getElementById('convert-form');
  var card = document.getElementById('build-status');
  var pollTimer = null;
  var currentBuild = null;

  function setStatus(build) {
    var copy = STATUS_COPY[build.status] || STATUS_COPY.queued;
    card.hidden = false;
    card.dataset.status = build.status;
    card.querySelector('[data-role="icon"]').textContent = copy.icon;
    card.querySelector('[data-role="title"]').textContent = copy.title;
    card.querySelector('[data-role="description"]').textContent =
      build.status === 'failed' && build.error_message ? build.error_message : copy.description;

    var terminal = build.status === 'completed' || build.status === 'failed';
    card.querySelector('[data-role="progress"]').hidden = terminal;
    card.querySelector('[data-role="artifact"]').textContent =
      build.status === 'completed' && build.download_url ? build.download_url.split('/').pop() : '';
    card.querySelector('[data-action="download"]').hidden = build.status !== 'completed';
    card.querySelector('[data-action="reset"]').hidden = !terminal;
  }

  function stopPolling() {
    if (pollTimer) {
      clearInterval(pollTimer);
      pollTimer = null;
    }
  }

  function watchBuild(id) {
    stopPolling();
    pollTimer = setInterval(async function() {
      try {
        var response = await fetch(api('/api/builds/' + encodeURIComponent(id)));
        if (!response.ok) return;
        var build = await response.json();
        if (!currentBuild || build.status !== currentBuild.status) {
          currentBuild = build;
          setStatus(build);
          if (build.status === 'completed') {
            toast('Build complete!', 'Your installer is ready to download.', 'success');
          } else if (build.status === 'failed') {
            toast('Build failed', build.error_message || 'Unknown error', 'error');
          }
        }
        if (build.status === 'completed' || build.status === 'failed') {
          stopPolling();
        }
      } catch (e) {
        console.error('Polling failed', e);
      }
    }, POLL_INTERVAL_MS);
  }

  async function downloadInstaller() {
    if (!currentBuild) return;
    try {
      var response = await fetch(api('/functions/v1/generate-installer'), {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          appName: currentBuild.app_name,
          appUrl: currentBuild.app_url,
          targetOs: currentBuild.target_os
        })
      });
      if (!response.ok) throw new Error(await readError(response));

      var disposition = response.headers.get('Content-Disposition') || '';
      var match = /filename="?([^";]+)"?/.exec(disposition);
      var blob = await response.blob();
      var link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = match ? match[1] : 'installer';
      document.body.appendChild(link);
      link.click();
      link.remove();
      URL.revokeObjectURL(link.href);
      toast('Download started', link.download, 'success');
    } catch (e) {
      toast('Download failed', e.message, 'error');
    }
  }

  if (form && card) {
    form.addEventListener('submit', async function(event) {
      event.preventDefault();
      var data = new FormData(form);
      var appName = String(data.get('appName') || '').trim();
      var appUrl = String(data.get('appUrl') || '').trim();

      if (!appName || !appUrl) {
        toast('Missing fields', 'Please fill in the app name and URL.', 'error');
        return;
      }

      var submit = form.querySelector('button[type="submit"]');
      submit.disabled = true;

      try {
        var payload = {
          appName: appName,
          appUrl: appUrl,
          targetOs: data.get('targetOs') || 'windows',
          framework: data.get('framework') || 'electron'
        };
        var icon = form.querySelector('#icon').files[0];
        if (icon) payload.iconBase64 = await readAsBase64(icon);

        var response = await fetch(api('/functions/v1/create-build'), {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(payload)
        });
        if (!response.ok) throw new Error(await readError(response));

        var result = await response.json();
        currentBuild = {
          id: result.buildId,
          status: 'queued',
          app_name: appName,
          app_url: appUrl,
          target_os: payload.targetOs
        };
        form.hidden = true;
        setStatus(currentBuild);
        toast('Build started', 'Your app is being processed. Please wait...');
        watchBuild(result.buildId);
      } catch (e) {
        toast('Could not start the build', e.message, 'error');
      } finally {
        submit.disabled = false;
      }
    });

    card.querySelector('[data-action="download"]').addEventListener('click', downloadInstaller);
    card.querySelector('[data-action="reset"]').addEventListener('click', function() {
      stopPolling();
      currentBuild = null;
      card.hidden = true;
      form.reset();
      form.hidden = false;
    });
  }

  // Tools page: streamed code generation
  function extractDelta(line) {
    if (line.endsWith('\r')) line = line.slice(0, -1);
    if (line === '' || line.charAt(0) === ':') return null;
    if (line.indexOf('data: ') !== 0) return null;
    var json = line.slice(6).trim();
    if (json === '[DONE]') return { done: true };
    try {
      var parsed = JSON.parse(json);
      var content = parsed.choices && parsed.choices[0] && parsed.choices[0].delta
        ? parsed.choices[0].delta.content
        : null;
      return content ? { text: content } : null;
    } catch (e) {
      return null;
    }
  }

  async function streamGeneration(type, prompt, onDelta) {
    var response = await fetch(api('/functions/v1/generate-code'), {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ prompt: prompt, type: type })
    });
    if (!response.ok || !response.body) throw new Error(await readError(response));

    var reader = response.body.getReader();
    var decoder = new TextDecoder();
    var buffer = '';

    while (true) {
      var chunk = await reader.read();
      if (chunk.done) break;
      buffer += decoder.decode(chunk.value, { stream: true });

      var newline;
      while ((newline = buffer.indexOf('\n')) !== -1) {
        var line = buffer.slice(0, newline);
        buffer = buffer.slice(newline + 1);
        var event = extractDelta(line);
        if (!event) continue;
        if (event.done) return;
        onDelta(event.text);
      }
    }

    if (buffer) {
      var last = extractDelta(buffer);
      if (last && last.text) onDelta(last.text);
    }
  }

  document.querySelectorAll('.generator').forEach(function(gen) {
    var textarea = gen.querySelector('textarea');
    var preview = gen.querySelector('.code-preview');
    var code = preview.querySelector('code');
    var generateBtn = gen.querySelector('[data-action="generate"]');

    gen.querySelectorAll('[data-example]').forEach(function(chip) {
      chip.addEventListener('click', function() {
        textarea.value = chip.dataset.example;
      });
    });

    generateBtn.addEventListener('click', async function() {
      var prompt = textarea.value.trim();
      if (!prompt) {
        toast('Empty prompt', 'Describe what you want to generate.', 'error');
        return;
      }

      generateBtn.disabled = true;
      generateBtn.textContent = 'Generating...';
      code.textContent = '';
      preview.hidden = false;

      try {
        await streamGeneration(gen.dataset.type, prompt, function(text) {
          code.textContent += text;
        });
        toast('Code generated!', 'Your code is ready to copy.', 'success');
      } catch (e) {
        toast('Generation failed', e.message, 'error');
      } finally {
        generateBtn.disabled = false;
        generateBtn.textContent = 'Generate';
      }
    });

    gen.querySelector('[data-action="clear"]').addEventListener('click', function() {
      textarea.value = '';
      code.textContent = '';
      preview.hidden = true;
    });

    preview.querySelector('[data-action="copy"]').addEventListener('click', async function() {
      try {
        await navigator.clipboard.writeText(code.textContent);
        toast('Copied!', 'Code copied to the clipboard.', 'success');
      } catch (e) {
        toast('Copy failed', e.message, 'error');
      }
    });
  });
})();
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains("--primary"));
        assert!(css.contains(".status-card"));
    }

    #[test]
    fn script_validates_before_submitting() {
        let js = AssetPipeline::generate_js();

        let check = js.find("if (!appName || !appUrl)").unwrap();
        let request = js.find("api('/functions/v1/create-build')").unwrap();
        assert!(check < request);
    }

    #[test]
    fn script_sends_icon_without_data_url_prefix() {
        let js = AssetPipeline::generate_js();

        assert!(js.contains("String(reader.result).split(',')[1]"));
        assert!(js.contains("payload.iconBase64 = await readAsBase64(icon);"));
    }

    #[test]
    fn script_polls_until_terminal() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("var POLL_INTERVAL_MS = 2000;"));
        assert!(js.contains("api('/api/builds/'"));
        assert!(js.contains("stopPolling();"));
        assert!(js.contains("[DONE]"));
        assert!(js.contains("clipboard"));
    }

    #[test]
    fn minifies_theme() {
        let minified = AssetPipeline::minify_css(&AssetPipeline::generate_css()).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".glass-card"));
    }
}

//! Template engine for rendering site pages.

use minijinja::{context, Environment};

use crate::content::{Choice, Feature, Generator, Step};

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Base URL
    pub base_url: String,
    /// Prefix for API calls made by the browser script
    pub api_base: String,
    /// Navigation key of the current page
    pub active: String,
    /// Copyright year
    pub year: i32,
    pub features: Vec<Feature>,
    pub steps: Vec<Step>,
    pub os_choices: Vec<Choice>,
    pub framework_choices: Vec<Choice>,
    pub generators: Vec<Generator>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("nav.html", NAV_TEMPLATE),
            ("footer.html", FOOTER_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("tools.html", TOOLS_TEMPLATE),
        ] {
            env.add_template(name, source)
                .unwrap_or_else(|e| panic!("Failed to add {} template: {}", name, e));
        }

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            base_url => &context.base_url,
            api_base => &context.api_base,
            active => &context.active,
            year => context.year,
            features => &context.features,
            steps => &context.steps,
            os_choices => &context.os_choices,
            framework_choices => &context.framework_choices,
            generators => &context.generators,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <meta name="description" content="Turn your web app into a desktop app without touching its code.">
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body data-api-base="{{ api_base }}">
  {% include "nav.html" %}
  <main>
    {% block content %}{% endblock %}
  </main>
  {% include "footer.html" %}
  <div class="toasts" aria-live="polite"></div>
  <script src="{{ base_url }}assets/main.js"></script>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<nav class="navbar">
  <div class="container navbar-inner">
    <a href="{{ base_url }}" class="nav-logo"><span class="logo-mark">⬢</span> {{ site_title }}</a>
    <ul class="nav-links">
      <li class="nav-item{% if active == "home" %} active{% endif %}"><a href="{{ base_url }}">Home</a></li>
      <li class="nav-item{% if active == "tools" %} active{% endif %}"><a href="{{ base_url }}tools/">AI Tools</a></li>
    </ul>
    <a href="{{ base_url }}#converter" class="btn btn-hero btn-sm">Get started</a>
  </div>
</nav>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="footer">
  <div class="container footer-inner">
    <a href="{{ base_url }}" class="nav-logo"><span class="logo-mark">⬢</span> {{ site_title }}</a>
    <p class="muted">Web apps wrapped as desktop apps. No code changes.</p>
    <p class="muted small">&copy; {{ year }} {{ site_title }}</p>
  </div>
</footer>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="hero hero-gradient">
  <div class="container hero-inner">
    <span class="badge"><span class="pulse"></span> Without changing a line of code</span>
    <h1>Turn your <span class="gradient-text">web app</span><br>into a <span class="gradient-text">desktop app</span></h1>
    <p class="lead">We wrap your web application in a native desktop container.
      No code analysis, no modifications. Functionality 100% preserved.</p>
    <div class="hero-actions">
      <a href="#converter" class="btn btn-hero btn-xl">Start now →</a>
      <a href="#how-it-works" class="btn btn-glass btn-lg">See how it works</a>
    </div>
    <ul class="trust">
      <li>🖥️ Windows, macOS &amp; Linux</li>
      <li>⚡ Builds in minutes</li>
      <li>🌐 Any web app</li>
    </ul>
  </div>
</section>

<section class="section" id="features">
  <div class="container">
    <div class="section-head">
      <h2>How it <span class="gradient-text">works</span></h2>
      <p class="muted">Pure and simple wrapping. Your web app becomes a desktop app with no obscure magic.</p>
    </div>
    <div class="grid grid-3">
      {% for feature in features %}
      <article class="glass-card feature">
        <div class="feature-icon">{{ feature.icon }}</div>
        <h3>{{ feature.title }}</h3>
        <p class="muted">{{ feature.description }}</p>
      </article>
      {% endfor %}
    </div>
  </div>
</section>

<section class="section" id="how-it-works">
  <div class="container">
    <div class="section-head">
      <h2>As simple as <span class="gradient-text">1, 2, 3</span></h2>
      <p class="muted">In a few minutes your web app becomes a native desktop app.</p>
    </div>
    <ol class="steps">
      {% for step in steps %}
      <li class="step">
        <div class="step-icon">{{ step.icon }}<span class="step-number">{{ step.number }}</span></div>
        <h3>{{ step.title }}</h3>
        <p class="muted">{{ step.description }}</p>
      </li>
      {% endfor %}
    </ol>
  </div>
</section>

<section class="section" id="converter">
  <div class="container narrow">
    <div class="section-head">
      <h2>Create your <span class="gradient-text">desktop app</span></h2>
      <p class="muted">Fill in the details below and get your installer in minutes.</p>
    </div>

    <form id="convert-form" class="glass-card form" novalidate>
      <label for="appName">App name *</label>
      <input id="appName" name="appName" placeholder="My Awesome App" autocomplete="off">

      <label for="appUrl">App URL or GitHub repository *</label>
      <input id="appUrl" name="appUrl" placeholder="https://myapp.com or https://github.com/user/repo" autocomplete="off">
      <p class="hint">The app is loaded in a WebView, without modifying its code.</p>

      <label for="icon">App icon (optional)</label>
      <input id="icon" name="icon" type="file" accept="image/*">

      <fieldset>
        <legend>Operating system *</legend>
        <div class="grid grid-3 choices">
          {% for os in os_choices %}
          <label class="choice">
            <input type="radio" name="targetOs" value="{{ os.value }}"{% if loop.first %} checked{% endif %}>
            <span>{{ os.label }}</span>
            <small class="muted">{{ os.hint }}</small>
          </label>
          {% endfor %}
        </div>
      </fieldset>

      <fieldset>
        <legend>Desktop framework</legend>
        <div class="grid grid-2 choices">
          {% for fw in framework_choices %}
          <label class="choice">
            <input type="radio" name="framework" value="{{ fw.value }}"{% if loop.first %} checked{% endif %}>
            <span>{{ fw.label }}</span>
            <small class="muted">{{ fw.hint }}</small>
          </label>
          {% endfor %}
        </div>
      </fieldset>

      <button type="submit" class="btn btn-hero btn-lg btn-block">Generate installer</button>
    </form>

    <div id="build-status" class="glass-card status-card" hidden>
      <div class="status-icon" data-role="icon"></div>
      <h3 data-role="title"></h3>
      <p class="muted" data-role="description"></p>
      <p class="accent" data-role="artifact"></p>
      <div class="progress" data-role="progress"><div class="progress-bar"></div></div>
      <button type="button" class="btn btn-hero btn-lg btn-block" data-action="download" hidden>Download installer</button>
      <button type="button" class="btn btn-ghost btn-block" data-action="reset" hidden>Create another app</button>
    </div>
  </div>
</section>
{% endblock %}"##;

const TOOLS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="section tools">
  <div class="container">
    <a href="{{ base_url }}" class="btn btn-ghost">← Back</a>
    <div class="section-head">
      <span class="badge">✨ AI tools</span>
      <h1>Generate code with <span class="gradient-text">artificial intelligence</span></h1>
      <p class="muted">Use AI to generate buttons, images, logos and CSS effects.
        Describe what you need and get code ready to use.</p>
    </div>

    <div class="grid grid-2">
      {% for gen in generators %}
      <article class="glass-card generator" data-type="{{ gen.kind }}">
        <header>
          <span class="feature-icon">{{ gen.icon }}</span>
          <div>
            <h3>{{ gen.title }}</h3>
            <p class="muted">{{ gen.description }}</p>
          </div>
        </header>
        <textarea rows="4" placeholder="{{ gen.placeholder }}"></textarea>
        <div class="examples">
          {% for example in gen.examples %}
          <button type="button" class="chip" data-example="{{ example }}">{{ example }}</button>
          {% endfor %}
        </div>
        <div class="generator-actions">
          <button type="button" class="btn btn-hero" data-action="generate">Generate</button>
          <button type="button" class="btn btn-ghost" data-action="clear">Reset</button>
        </div>
        <div class="code-preview" hidden>
          <button type="button" class="copy-btn" data-action="copy">Copy</button>
          <pre><code></code></pre>
        </div>
      </article>
      {% endfor %}
    </div>
  </div>
</section>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;

    fn context(active: &str) -> Context {
        Context {
            title: "Home".to_string(),
            site_title: "deskwrap".to_string(),
            base_url: "/".to_string(),
            api_base: "https://api.example.com".to_string(),
            active: active.to_string(),
            year: 2026,
            features: content::features(),
            steps: content::steps(),
            os_choices: content::os_choices(),
            framework_choices: content::framework_choices(),
            generators: content::generators(),
        }
    }

    /// Label of the nav item marked active.
    fn active_nav(html: &str) -> &str {
        let item = &html[html.find("nav-item active").unwrap()..];
        let item = &item[..item.find("</a>").unwrap()];
        &item[item.rfind('>').unwrap() + 1..]
    }

    #[test]
    fn renders_landing_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("index.html", &context("home")).unwrap();

        assert!(html.contains("<title>Home - deskwrap</title>"));
        assert!(html.contains("data-api-base="));
        assert!(html.contains("api.example.com"));
        assert!(html.contains(r#"id="convert-form""#));
        assert!(html.contains(r#"value="windows" checked"#));
        assert!(html.contains(r#"value="tauri""#));
        assert!(html.contains("Zero code changes"));
        assert!(html.contains("Download the installer"));
        assert_eq!(active_nav(&html), "Home");
    }

    #[test]
    fn renders_tools_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("tools.html", &context("tools")).unwrap();

        for kind in ["button", "image", "logo", "effect"] {
            assert!(html.contains(&format!(r#"data-type="{}""#, kind)));
        }
        assert!(html.contains("Typewriter effect"));
        assert_eq!(active_nav(&html), "AI Tools");
    }

    #[test]
    fn escapes_site_title() {
        let engine = TemplateEngine::new();
        let mut ctx = context("home");
        ctx.site_title = "<b>x</b>".to_string();

        let html = engine.render_page("index.html", &ctx).unwrap();

        assert!(html.contains("&lt;b&gt;x&lt;"));
        assert!(!html.contains("<b>x</b>"));
    }
}

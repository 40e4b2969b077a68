//! Probe documents handed to the CSS tool.
//!
//! For each route two scratch files are generated:
//!
//! - `{route}.html`: a skeleton of every base element plus one element per
//!   route class, so the tool's content scan sees exactly the route's needs
//! - `tailwind.{route}.js`: a tool configuration pointing at that document
//!
//! A v4 CLI ignores configuration modules, so it gets a third file instead:
//! `tailwind-v4-source.{route}.css`, a source stylesheet importing the
//! framework with an explicit base layer.
//!
//! All files are owned by a [`ProbeFiles`] guard and removed when it drops.

use super::library::{PREFLIGHT_BASE, strip_directives};
use crate::config::ProjectConfig;
use crate::debug;
use crate::utils::html::{escape, escape_attr};
use indexmap::IndexSet;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Variant combinations always present in the probe document.
const VARIANT_PROBES: &[&str] = &[
    "hover:bg-gray-100 focus:outline-none active:scale-95",
    "md:text-lg lg:text-xl xl:text-2xl",
    "sm:block md:flex lg:grid xl:hidden",
    "transition duration-300 ease-in-out transform",
];

const SKELETON: &str = r##"  <main>
    <header>
      <nav>
        <a href="#">Link</a>
        <button>Button</button>
      </nav>
      <h1>Heading 1</h1>
      <h2>Heading 2</h2>
      <h3>Heading 3</h3>
      <h4>Heading 4</h4>
      <h5>Heading 5</h5>
      <h6>Heading 6</h6>
    </header>
    <section>
      <article>
        <p>Paragraph text with <strong>bold</strong> and <em>italic</em> text.</p>
        <ul>
          <li>List item 1</li>
          <li>List item 2</li>
        </ul>
        <ol>
          <li>Ordered item 1</li>
          <li>Ordered item 2</li>
        </ol>
        <blockquote>Blockquote text</blockquote>
        <code>Inline code</code>
        <pre>Preformatted text</pre>
      </article>
    </section>
    <footer>
      <form>
        <input type="text" placeholder="Input field">
        <textarea placeholder="Textarea"></textarea>
        <select>
          <option>Option 1</option>
          <option>Option 2</option>
        </select>
        <button type="submit">Submit</button>
      </form>
      <table>
        <thead>
          <tr><th>Header 1</th><th>Header 2</th></tr>
        </thead>
        <tbody>
          <tr><td>Cell 1</td><td>Cell 2</td></tr>
        </tbody>
      </table>
    </footer>
  </main>
"##;

/// Classes kept in every route stylesheet regardless of usage.
#[rustfmt::skip]
pub const COMPREHENSIVE_SAFELIST: &[&str] = &[
    // base elements
    "html", "body", "main", "section", "article", "header", "footer", "nav", "aside",
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "strong", "em", "small",
    "ul", "ol", "li", "dl", "dt", "dd", "blockquote", "pre", "code",
    "table", "thead", "tbody", "tfoot", "tr", "th", "td",
    "form", "input", "textarea", "select", "option", "button", "label",
    "img", "figure", "figcaption", "video", "audio", "canvas", "svg",
    // typography base
    "antialiased", "subpixel-antialiased", "font-sans", "font-serif", "font-mono",
    "prose", "prose-sm", "prose-lg", "prose-xl",
    // layout
    "container", "mx-auto", "px-4", "py-4", "px-8", "py-8", "px-6", "py-6",
    "px-2", "py-2", "px-3", "py-3", "px-12", "py-12", "px-16", "py-16",
    // display and positioning
    "flex", "grid", "block", "inline", "inline-block", "hidden",
    "relative", "absolute", "fixed", "static", "sticky",
    // flexbox and grid
    "flex-col", "flex-row", "items-center", "items-start", "items-end", "items-stretch",
    "justify-center", "justify-start", "justify-end", "justify-between", "justify-around",
    "grid-cols-1", "grid-cols-2", "grid-cols-3", "grid-cols-4", "grid-cols-12",
    "gap-2", "gap-4", "gap-6", "gap-8", "space-x-2", "space-x-4", "space-x-6", "space-x-8",
    "space-y-2", "space-y-4", "space-y-6", "space-y-8",
    // colors
    "bg-white", "bg-black", "bg-gray-100", "bg-gray-200", "bg-gray-300", "bg-gray-400",
    "bg-gray-500", "bg-gray-600", "bg-gray-700", "bg-gray-800", "bg-gray-900",
    "text-white", "text-black", "text-gray-100", "text-gray-200", "text-gray-300",
    "text-gray-400", "text-gray-500", "text-gray-600", "text-gray-700", "text-gray-800", "text-gray-900",
    "bg-dark", "bg-dark-secondary", "bg-gold", "bg-gold-light",
    "text-gold", "text-gold-light",
    // borders
    "border", "border-0", "border-2", "border-4", "border-8",
    "border-t", "border-r", "border-b", "border-l",
    "border-solid", "border-dashed", "border-dotted",
    "border-white", "border-black", "border-gray-100", "border-gray-200", "border-gray-300",
    "border-gray-400", "border-gray-500", "border-gray-600", "border-gray-700", "border-gray-800", "border-gray-900",
    "border-gold", "border-gold-light",
    "rounded", "rounded-sm", "rounded-md", "rounded-lg", "rounded-xl", "rounded-2xl", "rounded-full",
    "rounded-t", "rounded-r", "rounded-b", "rounded-l",
    // typography
    "text-xs", "text-sm", "text-base", "text-lg", "text-xl", "text-2xl", "text-3xl", "text-4xl", "text-5xl", "text-6xl",
    "font-thin", "font-light", "font-normal", "font-medium", "font-semibold", "font-bold", "font-extrabold",
    "text-left", "text-center", "text-right", "text-justify",
    "leading-none", "leading-tight", "leading-snug", "leading-normal", "leading-relaxed", "leading-loose",
    "tracking-tighter", "tracking-tight", "tracking-normal", "tracking-wide", "tracking-wider", "tracking-widest",
    "uppercase", "lowercase", "capitalize", "normal-case",
    "underline", "no-underline", "line-through",
    // sizing
    "w-full", "w-auto", "w-screen", "w-1/2", "w-1/3", "w-2/3", "w-1/4", "w-3/4",
    "w-4", "w-6", "w-8", "w-10", "w-12", "w-16", "w-20", "w-24", "w-32",
    "h-full", "h-auto", "h-screen", "h-1/2", "h-1/3", "h-2/3", "h-1/4", "h-3/4",
    "h-4", "h-6", "h-8", "h-10", "h-12", "h-16", "h-20", "h-24", "h-32",
    "min-h-screen", "max-w-sm", "max-w-md", "max-w-lg", "max-w-xl", "max-w-2xl", "max-w-3xl",
    // effects
    "shadow", "shadow-sm", "shadow-md", "shadow-lg", "shadow-xl", "shadow-2xl",
    "shadow-gold", "shadow-gold-lg",
    "opacity-0", "opacity-25", "opacity-50", "opacity-75", "opacity-100",
    // transitions and transforms
    "transition", "transition-all", "transition-colors", "transition-opacity", "transition-transform",
    "duration-75", "duration-100", "duration-150", "duration-200", "duration-300", "duration-500", "duration-700", "duration-1000",
    "ease-linear", "ease-in", "ease-out", "ease-in-out",
    "transform", "scale-95", "scale-100", "scale-105", "scale-110",
    "translate-x-0", "translate-y-0", "-translate-y-1", "-translate-y-2",
    // interactive states
    "hover:bg-gray-100", "hover:bg-gray-700", "hover:text-white", "hover:text-gold", "hover:text-gold-light",
    "hover:border-gold", "hover:shadow-lg", "hover:scale-105", "hover:-translate-y-1",
    "focus:outline-none", "focus:ring-2", "focus:ring-gold", "focus:ring-opacity-50",
    "active:scale-95", "active:bg-gray-800",
    // breakpoints
    "sm:block", "sm:flex", "sm:grid", "sm:hidden",
    "md:block", "md:flex", "md:grid", "md:hidden", "md:text-lg", "md:text-xl", "md:text-2xl", "md:text-3xl", "md:text-4xl", "md:text-5xl",
    "md:grid-cols-2", "md:grid-cols-3", "md:grid-cols-4", "md:flex-row", "md:flex-col",
    "lg:block", "lg:flex", "lg:grid", "lg:hidden", "lg:text-lg", "lg:text-xl", "lg:text-2xl", "lg:text-3xl", "lg:text-4xl", "lg:text-5xl",
    "lg:grid-cols-2", "lg:grid-cols-3", "lg:grid-cols-4", "lg:col-span-1", "lg:col-span-2",
    "xl:block", "xl:flex", "xl:grid", "xl:hidden",
    // positioning
    "z-0", "z-10", "z-20", "z-30", "z-40", "z-50",
    "top-0", "right-0", "bottom-0", "left-0",
    "inset-0", "inset-x-0", "inset-y-0",
    // forms
    "appearance-none", "focus:ring", "focus:border-blue-500",
    "disabled:opacity-50", "disabled:cursor-not-allowed",
    // lists
    "list-none", "list-disc", "list-decimal",
    // overflow
    "overflow-hidden", "overflow-auto", "overflow-scroll",
    "overflow-x-hidden", "overflow-y-hidden",
    // cursor
    "cursor-pointer", "cursor-not-allowed", "cursor-default",
];

/// Built-in theme used when the project configures none.
pub fn default_theme() -> Value {
    json!({
        "extend": {
            "colors": {
                "dark": "#121212",
                "dark-secondary": "#1e1e1e",
                "gold": "#80570d",
                "gold-light": "#b38728",
            }
        }
    })
}

/// Where a probe configuration takes its theme from.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSource {
    /// The `theme` export of the project's own tool configuration module.
    Module(PathBuf),
    /// A literal theme object.
    Inline(Value),
}

impl ThemeSource {
    /// The project's tool configuration if it exists, else the `[theme]`
    /// table, else [`default_theme`].
    pub fn resolve(config: &ProjectConfig) -> Self {
        let module = &config.paths.tool_config;
        if module.is_file() {
            return Self::Module(module.clone());
        }
        Self::Inline(config.theme.to_json().unwrap_or_else(default_theme))
    }

    /// JavaScript expression evaluating to the theme object.
    fn to_js(&self) -> String {
        match self {
            Self::Module(path) => format!("require({}).theme || {{}}", js_path(path)),
            Self::Inline(theme) => {
                serde_json::to_string_pretty(theme).unwrap_or_else(|_| "{}".into())
            }
        }
    }
}

/// `path` as a JSON string literal with forward slashes, valid on every platform.
fn js_path(path: &Path) -> Value {
    Value::String(path.to_string_lossy().replace('\\', "/"))
}

/// Route classes followed by the comprehensive safelist, deduplicated.
pub fn safelist(classes: &IndexSet<String>) -> IndexSet<String> {
    let mut list = classes.clone();
    list.extend(COMPREHENSIVE_SAFELIST.iter().map(|s| (*s).to_string()));
    list
}

/// Probe HTML document for `route`.
pub fn probe_html(route: &str, classes: &IndexSet<String>) -> String {
    let mut html = String::with_capacity(SKELETON.len() + classes.len() * 32 + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    let _ = writeln!(html, "  <title>Probe for {}</title>", escape(route));
    html.push_str("</head>\n<body>\n");
    html.push_str(SKELETON);

    html.push_str("  <div class=\"detected-classes\">\n");
    for class in classes {
        let _ = writeln!(html, "    <div class=\"{}\"></div>", escape_attr(class));
    }
    html.push_str("  </div>\n");

    html.push_str("  <div class=\"variants\">\n");
    for variants in VARIANT_PROBES {
        let _ = writeln!(html, "    <div class=\"{variants}\"></div>");
    }
    html.push_str("  </div>\n</body>\n</html>\n");
    html
}

/// Tool configuration module scanning `probe` only.
pub fn probe_config(probe: &Path, safelist: &IndexSet<String>, theme: &ThemeSource) -> String {
    let content = js_path(probe);
    let safelist = serde_json::to_string_pretty(safelist).unwrap_or_else(|_| "[]".into());
    let theme = theme.to_js();

    format!(
        "module.exports = {{\n  content: [{content}],\n  safelist: {safelist},\n  theme: {theme},\n  corePlugins: {{\n    preflight: true,\n  }},\n  plugins: []\n}};\n"
    )
}

/// Source stylesheet for a v4 CLI: the framework import, the probe document
/// as content source, the element reset as an explicit base layer, then the
/// project stylesheet without its own directives.
pub fn v4_source(probe: &Path, stylesheet: &str) -> String {
    format!(
        "@import \"tailwindcss\";\n@source {};\n\n@layer base {{\n{}}}\n\n{}",
        js_path(probe),
        PREFLIGHT_BASE,
        strip_directives(stylesheet).trim_start()
    )
}

/// Scratch files of one route; removed on drop.
#[derive(Debug)]
pub struct ProbeFiles {
    pub html: PathBuf,
    pub config: PathBuf,
    /// Generated v4 source stylesheet, once written.
    pub source: Option<PathBuf>,
    /// Route classes plus [`COMPREHENSIVE_SAFELIST`].
    pub safelist: IndexSet<String>,
    route: String,
}

impl ProbeFiles {
    /// Write the probe document and configuration for `route` into `scratch`.
    pub fn write(
        scratch: &Path,
        route: &str,
        classes: &IndexSet<String>,
        theme: &ThemeSource,
    ) -> io::Result<Self> {
        fs::create_dir_all(scratch)?;

        let files = Self {
            html: scratch.join(format!("{route}.html")),
            config: scratch.join(format!("tailwind.{route}.js")),
            source: None,
            safelist: safelist(classes),
            route: route.to_string(),
        };

        fs::write(&files.html, probe_html(route, classes))?;
        fs::write(
            &files.config,
            probe_config(&files.html, &files.safelist, theme),
        )?;
        Ok(files)
    }

    /// Write the v4 source stylesheet next to the probe document.
    pub fn write_v4_source(&mut self, stylesheet: &str) -> io::Result<PathBuf> {
        let path = self.html.with_file_name(format!("tailwind-v4-source.{}.css", self.route));
        // owned before writing: a partial file is removed too
        self.source = Some(path.clone());
        fs::write(&path, v4_source(&self.html, stylesheet))?;
        Ok(path)
    }
}

impl Drop for ProbeFiles {
    fn drop(&mut self) {
        for path in [Some(&self.html), Some(&self.config), self.source.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = fs::remove_file(path)
                && e.kind() != io::ErrorKind::NotFound
            {
                debug!("build"; "cannot remove {}: {}", path.display(), e);
            }
        }
    }
}

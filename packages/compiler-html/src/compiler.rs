use pagesmith_document::{Block, DocumentError, EditorDocument, HeroProps, Section, TextProps};
use serde_json::{Map, Value};
use thiserror::Error;

/// Title used when neither the page nor the site names one
pub const UNTITLED: &str = "Untitled Page";

const EMPTY_PAGE: &str = "<p>Empty page (no blocks yet)</p>";

/// Errors that can occur while rendering stored documents
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unreadable document: {0}")]
    Document(#[from] DocumentError),
}

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a page document as a standalone HTML file.
///
/// `site_settings` is the owning site's settings object; its
/// `defaultTitle` is used when the document has no title. A non-blank
/// top-level `raw_html` is emitted as the body as-is, in place of the
/// blocks.
pub fn render_page_to_html(
    document: &EditorDocument,
    site_settings: &Map<String, Value>,
    options: CompileOptions,
) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(&page_title(document, site_settings), &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();

    let renderable = document
        .sections
        .iter()
        .any(|section| section.blocks.iter().any(|block| !block.is_unknown()));

    if let Some(raw_html) = document.raw_html() {
        for line in raw_html.lines() {
            ctx.add_line(line);
        }
    } else if renderable {
        for section in &document.sections {
            compile_section(section, &mut ctx);
        }
    } else {
        ctx.add_line(EMPTY_PAGE);
    }

    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// Parse a stored document and render it
pub fn render_json(
    source: &str,
    site_settings: &Map<String, Value>,
    options: CompileOptions,
) -> Result<String, RenderError> {
    let document = EditorDocument::from_json(source)?;
    Ok(render_page_to_html(&document, site_settings, options))
}

fn page_title(document: &EditorDocument, site_settings: &Map<String, Value>) -> String {
    if !document.title.trim().is_empty() {
        return document.title.clone();
    }

    match site_settings.get("defaultTitle").and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => UNTITLED.to_string(),
    }
}

fn compile_head(title: &str, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\" />");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_section(section: &Section, ctx: &mut Context) {
    if section.blocks.iter().all(Block::is_unknown) {
        return;
    }

    ctx.add_line(&format!("<section id=\"{}\">", escape_html(&section.id)));
    ctx.indent();

    for block in &section.blocks {
        compile_block(block, ctx);
    }

    ctx.dedent();
    ctx.add_line("</section>");
}

fn compile_block(block: &Block, ctx: &mut Context) {
    match block {
        Block::Hero { props, .. } => compile_hero(props, ctx),
        Block::Text { props, .. } => compile_text(props, ctx),
        Block::Unknown(_) => {}
    }
}

fn compile_hero(props: &HeroProps, ctx: &mut Context) {
    ctx.add_line("<header class=\"hero\">");
    ctx.indent();

    ctx.add_line(&format!("<h1>{}</h1>", escape_html(&props.headline)));
    ctx.add_line(&format!("<p>{}</p>", escape_html(&props.subheadline)));
    if !props.cta_text.is_empty() {
        ctx.add_line(&format!(
            "<a class=\"cta\" href=\"{}\">{}</a>",
            escape_html(&props.cta_href),
            escape_html(&props.cta_text)
        ));
    }

    ctx.dedent();
    ctx.add_line("</header>");
}

fn compile_text(props: &TextProps, ctx: &mut Context) {
    ctx.add_line(&format!("<p>{}</p>", escape_html(&props.text)));
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

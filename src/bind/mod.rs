pub mod markup;
pub mod template;

use crate::content::ContentContext;

/// Literal footer text rewritten into a link to `meta.supervisorsUrl`.
pub const FOOTER_LINK_TEXT: &str = "Napa County Board of Supervisors";

/// Content fields that get special rendering. Everything else is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    HeroTitle,
    Paragraph,
    Closing,
    FooterCredit,
    TemplateText,
    Generic,
}

impl FieldId {
    pub fn from_path(path: &str) -> Self {
        match path {
            "hero.title" => FieldId::HeroTitle,
            "hero.lede" | "about.body" | "threat.body" | "history.body" | "action.body" => {
                FieldId::Paragraph
            }
            "closing.text" => FieldId::Closing,
            "footer.credit" => FieldId::FooterCredit,
            p if p.starts_with("template.") || p.starts_with("email.") => FieldId::TemplateText,
            _ => FieldId::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Image,
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("img") {
            ElementKind::Image
        } else {
            ElementKind::Other
        }
    }
}

/// One marked element: the content path it shows and, for the closing
/// field, the path of its bold secondary fragment.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    pub path: &'a str,
    pub secondary: Option<&'a str>,
    pub element: ElementKind,
}

/// The typed renderer chosen for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    ImageAlt,
    PlainText,
    LineBreaks,
    Bold,
    Emphasized,
    FooterLink,
    Escaped,
}

impl Renderer {
    pub fn select(element: ElementKind, field: FieldId, value: &str, has_secondary: bool) -> Self {
        if element == ElementKind::Image {
            return Renderer::ImageAlt;
        }
        match field {
            FieldId::TemplateText => Renderer::PlainText,
            FieldId::HeroTitle => Renderer::LineBreaks,
            FieldId::Closing if has_secondary => Renderer::Emphasized,
            FieldId::FooterCredit => Renderer::FooterLink,
            FieldId::Paragraph => Renderer::Bold,
            _ if value.contains("**") => Renderer::Bold,
            _ => Renderer::Escaped,
        }
    }
}

/// What a binding does to its element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Raw (unescaped) `alt` attribute value.
    Alt(String),
    /// Replacement inner HTML, already escaped.
    Inner(String),
}

/// Render one binding, or `None` when its value is absent or malformed and
/// the element should keep its default content.
pub fn render_binding(ctx: &ContentContext, binding: &Binding<'_>) -> Option<Rendered> {
    let value = ctx.text(binding.path)?;
    let secondary = binding.secondary.and_then(|p| ctx.text(p));
    let field = FieldId::from_path(binding.path);

    let rendered = match Renderer::select(binding.element, field, &value, secondary.is_some()) {
        Renderer::ImageAlt => Rendered::Alt(value),
        Renderer::PlainText | Renderer::Escaped => Rendered::Inner(markup::escape_html(&value)),
        Renderer::LineBreaks => Rendered::Inner(markup::line_breaks(&value)),
        Renderer::Bold => Rendered::Inner(markup::render_bold(&value)),
        Renderer::Emphasized => {
            let secondary = secondary.unwrap_or_default();
            Rendered::Inner(markup::emphasized(&value, &secondary))
        }
        Renderer::FooterLink => Rendered::Inner(markup::inject_link(
            &value,
            FOOTER_LINK_TEXT,
            ctx.meta().supervisors_url.as_deref(),
        )),
    };
    Some(rendered)
}

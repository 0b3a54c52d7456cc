//! DOM side of the choreography: section elements as [`SectionSurface`]s
//! and the two cursor indicators.

use foundation::math::Vec2;
use scene::choreographer::{SectionSurface, Stage};
use scene::pointer::PointerVisual;
use scene::snapshot::SectionVisual;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, HtmlElement};

pub const CANVAS_ID: &str = "scene-canvas";
pub const CURSOR_DOT_ID: &str = "cursor-dot";
pub const CURSOR_OUTLINE_ID: &str = "cursor-outline";

/// Style properties the choreography writes, in write order.
const DRIVEN: [&str; 4] = ["transform", "opacity", "pointer-events", "z-index"];

/// Style properties the cursor indicators write.
const CURSOR_DRIVEN: [&str; 2] = ["transform", "opacity"];

/// Element ids tried for a section id, first match wins.
pub fn element_ids(section_id: &str) -> [String; 2] {
    [
        format!("{section_id}-section"),
        format!("{section_id}-content"),
    ]
}

/// Inline style values for one section visual, aligned with [`DRIVEN`].
pub fn section_style(visual: &SectionVisual, z_index: i32) -> [String; 4] {
    [
        visual.css_transform(),
        format!("{:.4}", visual.opacity.clamp(0.0, 1.0)),
        if visual.interactive { "auto" } else { "none" }.to_string(),
        z_index.to_string(),
    ]
}

pub fn cursor_transform(at: Vec2) -> String {
    format!(
        "translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%)",
        at.x, at.y
    )
}

/// Writes that put `names` back to `values`. `None` removes the property,
/// since an empty captured value means it was never set inline.
pub fn restore_ops<'a, const N: usize>(
    names: [&'a str; N],
    values: &'a [String; N],
) -> [(&'a str, Option<&'a str>); N] {
    std::array::from_fn(|i| {
        let value = values[i].as_str();
        (names[i], (!value.is_empty()).then_some(value))
    })
}

fn set(style: &CssStyleDeclaration, name: &str, value: &str) {
    if let Err(err) = style.set_property(name, value) {
        tracing::debug!(name, ?err, "style write rejected");
    }
}

fn capture<const N: usize>(el: &HtmlElement, names: [&str; N]) -> InlineStyle<N> {
    let style = el.style();
    InlineStyle {
        values: names.map(|name| style.get_property_value(name).unwrap_or_default()),
    }
}

fn restore<const N: usize>(el: &HtmlElement, names: [&str; N], pristine: &InlineStyle<N>) {
    let style = el.style();
    for (name, value) in restore_ops(names, &pristine.values) {
        match value {
            Some(value) => set(&style, name, value),
            None => {
                let _ = style.remove_property(name);
            }
        }
    }
}

/// Inline values present before the first write. Empty means unset.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineStyle<const N: usize = 4> {
    values: [String; N],
}

pub struct DomSurface {
    el: HtmlElement,
}

impl SectionSurface for DomSurface {
    type Pristine = InlineStyle;

    fn capture(&self) -> InlineStyle {
        capture(&self.el, DRIVEN)
    }

    fn apply(&mut self, visual: &SectionVisual, z_index: i32) {
        let style = self.el.style();
        for (name, value) in DRIVEN.iter().zip(section_style(visual, z_index)) {
            set(&style, name, &value);
        }
    }

    fn restore(&mut self, pristine: InlineStyle) {
        restore(&self.el, DRIVEN, &pristine);
    }
}

pub struct DomStage {
    document: Document,
}

impl DomStage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl Stage for DomStage {
    type Surface = DomSurface;

    fn locate(&mut self, id: &str) -> Option<DomSurface> {
        element_ids(id)
            .iter()
            .find_map(|candidate| self.html_element(candidate))
            .map(|el| DomSurface { el })
    }
}

type Indicator = (HtmlElement, InlineStyle<2>);

/// Cursor dot and outline. Either may be absent; writes to a missing one
/// are dropped. Inline styles are captured on lookup and put back by
/// [`Cursor::restore`].
pub struct Cursor {
    dot: Option<Indicator>,
    outline: Option<Indicator>,
}

impl Cursor {
    pub fn find(document: &Document) -> Self {
        let stage = DomStage::new(document.clone());
        let indicator = |id: &str| {
            stage.html_element(id).map(|el| {
                let pristine = capture(&el, CURSOR_DRIVEN);
                (el, pristine)
            })
        };
        Self {
            dot: indicator(CURSOR_DOT_ID),
            outline: indicator(CURSOR_OUTLINE_ID),
        }
    }

    pub fn apply(&self, visual: &PointerVisual) {
        let opacity = format!("{:.3}", visual.opacity);
        for (indicator, at) in [(&self.dot, visual.dot), (&self.outline, visual.outline)] {
            if let Some((el, _)) = indicator {
                let style = el.style();
                set(&style, "transform", &cursor_transform(at));
                set(&style, "opacity", &opacity);
            }
        }
    }

    pub fn restore(self) {
        for (el, pristine) in [self.dot, self.outline].into_iter().flatten() {
            restore(&el, CURSOR_DRIVEN, &pristine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CURSOR_DRIVEN, DRIVEN, cursor_transform, element_ids, restore_ops, section_style};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use scene::snapshot::SectionVisual;
    use scene::timeline::Phase;

    #[test]
    fn section_ids_follow_page_markup() {
        assert_eq!(element_ids("about"), ["about-section", "about-content"]);
    }

    #[test]
    fn rest_visual_is_plain_and_clickable() {
        assert_eq!(
            section_style(&SectionVisual::REST, 90),
            [
                "translateZ(0.000px) scale(1.00000)".to_string(),
                "1.0000".to_string(),
                "auto".to_string(),
                "90".to_string(),
            ]
        );
    }

    #[test]
    fn hidden_visual_blocks_input() {
        let visual = SectionVisual {
            scale: 0.5,
            opacity: 0.0,
            depth: -500.0,
            interactive: false,
            phase: Phase::Unseen,
        };
        let style = section_style(&visual, 0);
        assert_eq!(style[0], "translateZ(-500.000px) scale(0.50000)");
        assert_eq!(style[2], "none");
    }

    #[test]
    fn cursor_is_centered_on_pointer() {
        assert_eq!(
            cursor_transform(Vec2::new(10.0, 20.5)),
            "translate3d(10.00px, 20.50px, 0) translate(-50%, -50%)"
        );
    }

    #[test]
    fn restore_removes_properties_that_were_never_inline() {
        let captured = [String::new(), "0.5".to_string()];
        assert_eq!(
            restore_ops(CURSOR_DRIVEN, &captured),
            [("transform", None), ("opacity", Some("0.5"))]
        );
    }

    #[test]
    fn restore_covers_every_driven_section_property() {
        let captured = [
            "scale(2)".to_string(),
            String::new(),
            String::new(),
            "3".to_string(),
        ];
        assert_eq!(
            restore_ops(DRIVEN, &captured),
            [
                ("transform", Some("scale(2)")),
                ("opacity", None),
                ("pointer-events", None),
                ("z-index", Some("3")),
            ]
        );
    }
}

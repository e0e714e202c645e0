//! Emitter: CanvasTree → section markup + stylesheet.
//!
//! A pure walk over the tree. The same tree and section name always produce
//! byte-identical output.

use crate::export::{DEFAULT_SECTION_NAME, sanitize_slug};
use crate::id::NodeId;
use crate::model::{CanvasTree, ElementNode, Segment};
use crate::property::PropertyName;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;

/// The two generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    /// Section template: stylesheet include, wrapper, content, schema block.
    pub markup: String,
    /// Scaffold followed by the per-element rules.
    pub stylesheet: String,
}

/// Generate the section for `tree`. A blank name falls back to
/// [`DEFAULT_SECTION_NAME`]; otherwise the name is used as given for the
/// wrapper class and schema metadata.
#[must_use]
pub fn emit_section(tree: &CanvasTree, section_name: &str) -> GeneratedCode {
    let name = if section_name.trim().is_empty() {
        DEFAULT_SECTION_NAME
    } else {
        section_name
    };

    let mut rules = RuleSet::default();
    let mut body = String::with_capacity(1024);
    for child in tree.top_level() {
        emit_node(&mut body, &mut rules, tree, child, 0);
    }

    GeneratedCode {
        markup: emit_markup(name, &body),
        stylesheet: emit_stylesheet(name, &rules),
    }
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// Style blocks in first-seen order, deduplicated by exact text.
#[derive(Debug, Default)]
struct RuleSet {
    blocks: Vec<String>,
    seen: HashSet<String>,
}

impl RuleSet {
    fn add(&mut self, block: String) {
        if self.seen.insert(block.clone()) {
            self.blocks.push(block);
        }
    }
}

fn rule_block(node: &ElementNode, class: &str) -> Option<String> {
    let declarations = node.properties.declarations();
    if declarations.is_empty() {
        return None;
    }
    let selector = match node.properties.get(PropertyName::CustomId) {
        Some(custom_id) => format!("#{custom_id}"),
        None => format!(".{class}"),
    };
    Some(format!(
        "{selector} {{\n  {};\n}}",
        declarations.join(";\n  ")
    ))
}

// ─── Markup ──────────────────────────────────────────────────────────────

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Escape a value for a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

fn emit_node(out: &mut String, rules: &mut RuleSet, tree: &CanvasTree, id: NodeId, depth: usize) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let Some(element) = node.element() else {
        return;
    };
    let template = element.template();
    let props = &node.properties;

    let mut attrs = format!("class=\"{}", template.class);
    if let Some(custom_class) = props.get(PropertyName::CustomClass) {
        let _ = write!(attrs, " {}", escape_attr(custom_class));
    }
    attrs.push('"');
    if let Some(custom_id) = props.get(PropertyName::CustomId) {
        let _ = write!(attrs, " id=\"{}\"", escape_attr(custom_id));
    }
    if let Some(href) = props.get(PropertyName::Href) {
        let _ = write!(attrs, " href=\"{}\"", escape_attr(href));
    }

    // Children go first so their rules precede this node's.
    let mut content = String::new();
    for segment in &node.segments {
        match segment {
            Segment::Text(text) => content.push_str(text),
            Segment::Element(child) => emit_node(&mut content, rules, tree, *child, depth + 1),
        }
    }

    if let Some(block) = rule_block(node, template.class) {
        rules.add(block);
    }

    indent(out, depth);
    let _ = writeln!(out, "<{} {attrs}>", template.tag);
    if element.is_void() {
        return;
    }
    indent(out, depth + 1);
    let _ = writeln!(out, "{}", content.trim());
    indent(out, depth);
    let _ = writeln!(out, "</{}>", template.tag);
}

fn emit_markup(name: &str, body: &str) -> String {
    let slug = sanitize_slug(name);
    let schema_name = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{slug}\""));
    let mut out = String::with_capacity(body.len() + 256);
    let _ = writeln!(out, "{{{{ '{slug}.css' | asset_url | stylesheet_tag }}}}");
    out.push('\n');
    let _ = writeln!(out, "<div class=\"{name}-wrapper\">");
    let _ = writeln!(out, "{body}");
    out.push_str("</div>\n");
    out.push('\n');
    out.push_str("{% schema %}\n");
    out.push_str("{\n");
    let _ = writeln!(out, "  \"name\": {schema_name},");
    out.push_str("  \"settings\": [],\n");
    out.push_str("  \"presets\": [\n");
    out.push_str("    {\n");
    let _ = writeln!(out, "      \"name\": {schema_name}");
    out.push_str("    }\n");
    out.push_str("  ]\n");
    out.push_str("}\n");
    out.push_str("{% endschema %}");
    out
}

// ─── Stylesheet ──────────────────────────────────────────────────────────

fn emit_stylesheet(name: &str, rules: &RuleSet) -> String {
    let wrapper = format!(".{name}-wrapper");
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "/* {name} Styles */");
    let _ = writeln!(out, "{wrapper} {{");
    out.push_str("  width: 100%;\n");
    out.push_str("  overflow-x: hidden;\n");
    out.push_str("  box-sizing: border-box;\n");
    out.push_str("}\n\n");

    out.push_str("/* Base Responsive Grid (Automatically Exported) */\n");
    let _ = writeln!(out, "{wrapper} .el-row {{");
    out.push_str("  display: flex;\n");
    out.push_str("  flex-wrap: wrap;\n");
    out.push_str("  gap: 20px;\n");
    out.push_str("  width: 100%;\n");
    out.push_str("  box-sizing: border-box;\n");
    out.push_str("}\n\n");
    let _ = writeln!(out, "{wrapper} .el-column {{");
    out.push_str("  flex: 1 1 0%;\n");
    out.push_str("  min-width: 0;\n");
    out.push_str("  box-sizing: border-box;\n");
    out.push_str("}\n\n");

    out.push_str("/* Mobile Breakpoint for Live Store */\n");
    out.push_str("@media screen and (max-width: 768px) {\n");
    let _ = writeln!(out, "  {wrapper} .el-row {{");
    out.push_str("    flex-direction: column !important;\n");
    out.push_str("  }\n");
    let _ = writeln!(out, "  {wrapper} .el-column {{");
    out.push_str("    width: 100% !important;\n");
    out.push_str("    flex: none !important;\n");
    out.push_str("  }\n");
    out.push_str("}\n\n");

    for block in &rules.blocks {
        out.push_str(block);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ElementType;
    use pretty_assertions::assert_eq;

    fn body_of(markup: &str) -> &str {
        let start = markup.find("-wrapper\">\n").map(|i| i + "-wrapper\">\n".len());
        let end = markup.find("\n</div>\n\n{% schema %}");
        match (start, end) {
            (Some(s), Some(e)) => &markup[s..e],
            _ => "",
        }
    }

    fn rules_of(stylesheet: &str) -> &str {
        let marker = "    flex: none !important;\n  }\n}\n\n";
        let at = stylesheet.find(marker).unwrap() + marker.len();
        &stylesheet[at..]
    }

    #[test]
    fn empty_tree_is_scaffold_only() {
        let tree = CanvasTree::new();
        let code = emit_section(&tree, "hero");
        assert_eq!(body_of(&code.markup), "");
        assert_eq!(rules_of(&code.stylesheet), "");
        assert!(code.markup.starts_with("{{ 'hero.css' | asset_url | stylesheet_tag }}\n\n<div class=\"hero-wrapper\">\n"));
        assert!(code.markup.ends_with("{% endschema %}"));
        assert!(code.stylesheet.starts_with("/* hero Styles */\n.hero-wrapper {\n"));
    }

    #[test]
    fn nested_markup_is_indented() {
        let mut tree = CanvasTree::new();
        let row = tree.insert(ElementType::Row, None).id;
        let col = tree.insert(ElementType::Column, Some(row)).id;
        tree.insert(ElementType::Heading, Some(col));
        tree.insert(ElementType::Divider, Some(col));

        let code = emit_section(&tree, "s");
        assert_eq!(
            body_of(&code.markup),
            "<div class=\"el-row\">\n  \
             <div class=\"el-column\">\n    \
             <h2 class=\"el-heading\">\n      Heading Text\n    </h2>\n    \
             <hr class=\"el-divider\">\n  \
             </div>\n\
             </div>\n"
        );
    }

    #[test]
    fn attributes_follow_class_id_href_order() {
        let mut tree = CanvasTree::new();
        let btn = tree.insert(ElementType::Button, None).id;
        tree.set_property(btn, PropertyName::Href, "/cart").unwrap();
        tree.set_property(btn, PropertyName::CustomId, "buy").unwrap();
        tree.set_property(btn, PropertyName::CustomClass, "cta big").unwrap();

        let code = emit_section(&tree, "s");
        assert_eq!(
            body_of(&code.markup),
            "<a class=\"el-button cta big\" id=\"buy\" href=\"/cart\">\n  Button\n</a>\n"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut tree = CanvasTree::new();
        let link = tree.insert(ElementType::Link, None).id;
        tree.set_property(link, PropertyName::Href, "/search?q=\"a\"&page=2")
            .unwrap();
        tree.set_property(link, PropertyName::CustomClass, "x<y").unwrap();

        let code = emit_section(&tree, "s");
        assert_eq!(
            body_of(&code.markup),
            "<a class=\"el-link x&lt;y\" href=\"/search?q=&quot;a&quot;&amp;page=2\">\n  Link Text\n</a>\n"
        );
    }

    #[test]
    fn rules_are_post_order() {
        let mut tree = CanvasTree::new();
        let section = tree.insert(ElementType::Section, None).id;
        let text = tree.insert(ElementType::Text, Some(section)).id;
        tree.set_property(section, PropertyName::PaddingTop, "40").unwrap();
        tree.set_property(text, PropertyName::FontWeight, "700").unwrap();

        let code = emit_section(&tree, "s");
        assert_eq!(
            rules_of(&code.stylesheet),
            ".el-text {\n  font-weight: 700;\n}\n\n.el-section {\n  padding-top: 40px;\n}\n\n"
        );
    }

    #[test]
    fn custom_id_selects_by_id() {
        let mut tree = CanvasTree::new();
        let img = tree.insert(ElementType::Image, None).id;
        tree.set_property(img, PropertyName::CustomId, "hero-img").unwrap();
        tree.set_property(img, PropertyName::BorderRadius, "8").unwrap();

        let code = emit_section(&tree, "s");
        assert_eq!(
            rules_of(&code.stylesheet),
            "#hero-img {\n  border-radius: 8px;\n}\n\n"
        );
    }

    #[test]
    fn schema_name_is_escaped() {
        let tree = CanvasTree::new();
        let code = emit_section(&tree, "Say \"hi\"");
        assert!(code.markup.contains("  \"name\": \"Say \\\"hi\\\"\",\n"));
        assert!(code.markup.starts_with("{{ 'say-hi.css'"));
    }

    #[test]
    fn blank_name_uses_default() {
        let tree = CanvasTree::new();
        let code = emit_section(&tree, "   ");
        assert!(code.markup.contains("<div class=\"custom-section-wrapper\">"));
    }
}

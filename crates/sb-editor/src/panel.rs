//! Property panel model.
//!
//! Describes which groups and fields the host shows for the selected node,
//! with their current values. Group visibility follows each property's
//! applicability in the schema. Field ids are the host's input ids; two
//! inputs (a color picker and its free-text twin) may feed one property.

use sb_core::catalog::ElementType;
use sb_core::error::{EditError, EditResult};
use sb_core::id::NodeId;
use sb_core::model::CanvasTree;
use sb_core::property::{FONT_WEIGHTS, PropertyName};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    Text,
    TextArea,
    Number,
    Color,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelField {
    pub field_id: &'static str,
    pub label: &'static str,
    pub property: PropertyName,
    pub input: InputKind,
    pub value: String,
    pub placeholder: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelGroup {
    pub title: &'static str,
    pub fields: Vec<PanelField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPanel {
    pub node: NodeId,
    pub element: ElementType,
    /// Read-only type label shown at the top of the panel.
    pub type_label: &'static str,
    pub groups: Vec<PanelGroup>,
}

impl PropertyPanel {
    pub fn field(&self, field_id: &str) -> Option<&PanelField> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter())
            .find(|f| f.field_id == field_id)
    }

    pub fn group_titles(&self) -> Vec<&'static str> {
        self.groups.iter().map(|g| g.title).collect()
    }
}

/// Map a host input id (`pt`, `bg-color-text`, ...) to its property.
pub fn property_for_field(field_id: &str) -> Option<PropertyName> {
    use PropertyName::*;
    Some(match field_id {
        "id" => CustomId,
        "class" => CustomClass,
        "content" => Content,
        "href" => Href,
        "src" => Src,
        "alt" => Alt,
        "pt" => PaddingTop,
        "pr" => PaddingRight,
        "pb" => PaddingBottom,
        "pl" => PaddingLeft,
        "mt" => MarginTop,
        "mr" => MarginRight,
        "mb" => MarginBottom,
        "ml" => MarginLeft,
        "bg-color" | "bg-color-text" => BackgroundColor,
        "text-color" | "text-color-text" => TextColor,
        "font-size" => FontSize,
        "font-weight" => FontWeight,
        "text-align" => TextAlign,
        "border-radius" => BorderRadius,
        _ => return None,
    })
}

const WEIGHT_LABELS: [&str; 5] = [
    "Light (300)",
    "Normal (400)",
    "Medium (500)",
    "Semi-bold (600)",
    "Bold (700)",
];

fn weight_options() -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: "",
        label: "Default",
    }];
    options.extend(
        FONT_WEIGHTS
            .iter()
            .zip(WEIGHT_LABELS)
            .map(|(&value, label)| SelectOption { value, label }),
    );
    options
}

fn align_options() -> Vec<SelectOption> {
    vec![
        SelectOption {
            value: "",
            label: "Default",
        },
        SelectOption {
            value: "left",
            label: "Left",
        },
        SelectOption {
            value: "center",
            label: "Center",
        },
        SelectOption {
            value: "right",
            label: "Right",
        },
    ]
}

/// Builds the panel for one node.
struct Builder<'a> {
    tree: &'a CanvasTree,
    id: NodeId,
}

impl Builder<'_> {
    fn stored(&self, name: PropertyName) -> String {
        self.tree
            .get(self.id)
            .and_then(|n| n.properties.get(name))
            .unwrap_or_default()
            .to_string()
    }

    fn field(
        &self,
        field_id: &'static str,
        label: &'static str,
        input: InputKind,
        placeholder: &'static str,
    ) -> PanelField {
        let property = property_for_field(field_id).unwrap_or(PropertyName::CustomId);
        PanelField {
            field_id,
            label,
            property,
            input,
            value: self.stored(property),
            placeholder,
            options: Vec::new(),
        }
    }

    /// Like `field`, shown with `fallback` when the property is unset.
    fn field_or(
        &self,
        field_id: &'static str,
        label: &'static str,
        input: InputKind,
        fallback: &'static str,
    ) -> PanelField {
        let mut field = self.field(field_id, label, input, "");
        if field.value.is_empty() {
            field.value = fallback.to_string();
        }
        field
    }
}

/// Panel contents for `id`. `NodeNotFound` for unknown ids and the root.
pub fn build_panel(tree: &CanvasTree, id: NodeId) -> EditResult<PropertyPanel> {
    let node = tree.get(id).ok_or(EditError::NodeNotFound(id))?;
    let element = node.element().ok_or(EditError::NodeNotFound(id))?;
    let b = Builder { tree, id };
    let shown = |name: PropertyName| name.schema().applies_to.includes(element);
    let mut groups = Vec::new();

    groups.push(PanelGroup {
        title: "Element",
        fields: vec![
            b.field("id", "ID", InputKind::Text, "custom-id"),
            b.field("class", "Class", InputKind::Text, "custom-class"),
        ],
    });

    if shown(PropertyName::Content) {
        let mut content = b.field("content", "Text", InputKind::TextArea, "");
        content.value = node.text();
        groups.push(PanelGroup {
            title: "Content",
            fields: vec![content],
        });
    }

    if shown(PropertyName::Href) {
        let mut href = b.field_or("href", "URL", InputKind::Text, "#");
        href.placeholder = "https://...";
        groups.push(PanelGroup {
            title: "Link",
            fields: vec![href],
        });
    }

    if shown(PropertyName::Src) {
        groups.push(PanelGroup {
            title: "Image",
            fields: vec![
                b.field("src", "Source URL", InputKind::Text, "Image URL or {{ image }}"),
                b.field("alt", "Alt Text", InputKind::Text, "Image description"),
            ],
        });
    }

    groups.push(PanelGroup {
        title: "Spacing",
        fields: vec![
            b.field("pt", "Padding Top", InputKind::Number, "Top"),
            b.field("pr", "Padding Right", InputKind::Number, "Right"),
            b.field("pb", "Padding Bottom", InputKind::Number, "Bottom"),
            b.field("pl", "Padding Left", InputKind::Number, "Left"),
            b.field("mt", "Margin Top", InputKind::Number, "Top"),
            b.field("mr", "Margin Right", InputKind::Number, "Right"),
            b.field("mb", "Margin Bottom", InputKind::Number, "Bottom"),
            b.field("ml", "Margin Left", InputKind::Number, "Left"),
        ],
    });

    groups.push(PanelGroup {
        title: "Colors",
        fields: vec![
            b.field_or("bg-color", "Background", InputKind::Color, "#ffffff"),
            b.field("bg-color-text", "Background", InputKind::Text, "transparent"),
            b.field_or("text-color", "Text Color", InputKind::Color, "#333333"),
            b.field("text-color-text", "Text Color", InputKind::Text, "inherit"),
        ],
    });

    if shown(PropertyName::FontSize) {
        let mut weight = b.field("font-weight", "Font Weight", InputKind::Select, "");
        weight.options = weight_options();
        let mut align = b.field("text-align", "Text Align", InputKind::Select, "");
        align.options = align_options();
        groups.push(PanelGroup {
            title: "Typography",
            fields: vec![
                b.field("font-size", "Font Size (px)", InputKind::Number, "16"),
                weight,
                align,
            ],
        });
    }

    groups.push(PanelGroup {
        title: "Border",
        fields: vec![b.field("border-radius", "Border Radius (px)", InputKind::Number, "0")],
    });

    Ok(PropertyPanel {
        node: id,
        element,
        type_label: element.template().label,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_ids_map_to_properties() {
        assert_eq!(property_for_field("pt"), Some(PropertyName::PaddingTop));
        assert_eq!(property_for_field("bg-color"), Some(PropertyName::BackgroundColor));
        assert_eq!(
            property_for_field("bg-color-text"),
            Some(PropertyName::BackgroundColor)
        );
        assert_eq!(property_for_field("id"), Some(PropertyName::CustomId));
        assert_eq!(property_for_field("z-index"), None);
    }

    #[test]
    fn groups_follow_element_type() {
        let mut tree = CanvasTree::new();
        let row = tree.insert(ElementType::Row, None).id;
        let button = tree.insert(ElementType::Button, None).id;
        let image = tree.insert(ElementType::Image, None).id;
        let heading = tree.insert(ElementType::Heading, None).id;

        let titles = |id| build_panel(&tree, id).unwrap().group_titles();
        assert_eq!(titles(row), vec!["Element", "Spacing", "Colors", "Border"]);
        assert_eq!(
            titles(button),
            vec!["Element", "Content", "Link", "Spacing", "Colors", "Border"]
        );
        assert_eq!(titles(image), vec!["Element", "Image", "Spacing", "Colors", "Border"]);
        assert_eq!(
            titles(heading),
            vec!["Element", "Content", "Spacing", "Colors", "Typography", "Border"]
        );
    }

    #[test]
    fn unset_values_show_defaults() {
        let mut tree = CanvasTree::new();
        let link = tree.insert(ElementType::Link, None).id;
        let panel = build_panel(&tree, link).unwrap();
        assert_eq!(panel.type_label, "Link");
        assert_eq!(panel.field("href").unwrap().value, "#");
        assert_eq!(panel.field("bg-color").unwrap().value, "#ffffff");
        assert_eq!(panel.field("bg-color-text").unwrap().value, "");
        assert_eq!(panel.field("text-color").unwrap().value, "#333333");
        assert_eq!(panel.field("content").unwrap().value, "Link Text");
    }

    #[test]
    fn stored_values_win() {
        let mut tree = CanvasTree::new();
        let text = tree.insert(ElementType::Text, None).id;
        tree.set_property(text, PropertyName::BackgroundColor, "#abcdef")
            .unwrap();
        tree.set_property(text, PropertyName::FontWeight, "500").unwrap();
        let panel = build_panel(&tree, text).unwrap();
        assert_eq!(panel.field("bg-color").unwrap().value, "#abcdef");
        assert_eq!(panel.field("bg-color-text").unwrap().value, "#abcdef");
        let weight = panel.field("font-weight").unwrap();
        assert_eq!(weight.value, "500");
        assert_eq!(weight.options.len(), 6);
    }

    #[test]
    fn root_has_no_panel() {
        let tree = CanvasTree::new();
        assert_eq!(
            build_panel(&tree, NodeId::CANVAS),
            Err(EditError::NodeNotFound(NodeId::CANVAS))
        );
    }
}

//! Element catalog: the fixed set of element types a user can place on the
//! canvas, each with its rendering template.

use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering template for an element type. Immutable constant data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTemplate {
    /// Structural tag emitted in markup.
    pub tag: &'static str,
    /// Catalog style class, always the first entry of the class list.
    pub class: &'static str,
    /// Whether the element may hold child elements.
    pub can_contain: bool,
    /// Literal content a freshly created node starts with.
    pub default_content: &'static str,
    /// Display label for the toolbox and property panel.
    pub label: &'static str,
}

/// The element kinds in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Section,
    Container,
    Row,
    Column,
    Heading,
    Text,
    Paragraph,
    Image,
    Button,
    Link,
    Spacer,
    Divider,
    List,
    Video,
    Icon,
    Input,
}

// Indexed by `ElementType as usize`; keep in declaration order.
static CATALOG: [ElementTemplate; 16] = [
    layout("section", "el-section", "Section"),
    layout("div", "el-container", "Container"),
    layout("div", "el-row", "Row"),
    layout("div", "el-column", "Column"),
    leaf("h2", "el-heading", "Heading Text", "Heading"),
    leaf("span", "el-text", "Text content", "Text"),
    leaf(
        "p",
        "el-paragraph",
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore.",
        "Paragraph",
    ),
    leaf("div", "el-image", "🖼 Image Placeholder", "Image"),
    leaf("a", "el-button", "Button", "Button"),
    leaf("a", "el-link", "Link Text", "Link"),
    leaf("div", "el-spacer", "", "Spacer"),
    leaf("hr", "el-divider", "", "Divider"),
    leaf(
        "ul",
        "el-list",
        "<li>List item 1</li><li>List item 2</li><li>List item 3</li>",
        "List",
    ),
    leaf("div", "el-video", "▶ Video Placeholder", "Video"),
    leaf("span", "el-icon", "★", "Icon"),
    leaf("input", "el-input", "", "Input"),
];

const fn layout(tag: &'static str, class: &'static str, label: &'static str) -> ElementTemplate {
    ElementTemplate {
        tag,
        class,
        can_contain: true,
        default_content: "",
        label,
    }
}

const fn leaf(
    tag: &'static str,
    class: &'static str,
    default_content: &'static str,
    label: &'static str,
) -> ElementTemplate {
    ElementTemplate {
        tag,
        class,
        can_contain: false,
        default_content,
        label,
    }
}

impl ElementType {
    /// Every catalog entry in toolbox order.
    pub const ALL: [ElementType; 16] = [
        Self::Section,
        Self::Container,
        Self::Row,
        Self::Column,
        Self::Heading,
        Self::Text,
        Self::Paragraph,
        Self::Image,
        Self::Button,
        Self::Link,
        Self::Spacer,
        Self::Divider,
        Self::List,
        Self::Video,
        Self::Icon,
        Self::Input,
    ];

    pub fn template(self) -> &'static ElementTemplate {
        &CATALOG[self as usize]
    }

    pub fn can_contain(self) -> bool {
        self.template().can_contain
    }

    /// Void types emit only an opening tag: no content, no closing tag.
    pub fn is_void(self) -> bool {
        matches!(self.template().tag, "hr" | "input")
    }

    /// The payload key the host uses for this type (`"heading"`, `"row"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Container => "container",
            Self::Row => "row",
            Self::Column => "column",
            Self::Heading => "heading",
            Self::Text => "text",
            Self::Paragraph => "paragraph",
            Self::Image => "image",
            Self::Button => "button",
            Self::Link => "link",
            Self::Spacer => "spacer",
            Self::Divider => "divider",
            Self::List => "list",
            Self::Video => "video",
            Self::Icon => "icon",
            Self::Input => "input",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.key() == key)
    }

    /// Unknown keys fall back to `Text`, as the toolbox always has.
    pub fn from_key_lenient(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::Text)
    }
}

impl FromStr for ElementType {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| EditError::UnknownElementType(s.to_string()))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

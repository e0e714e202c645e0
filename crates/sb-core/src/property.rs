//! Typed property schema and the per-node property store.
//!
//! Property names form a closed set. Each carries a value domain, an optional
//! CSS declaration it maps to, and the element types the property panel shows
//! it for. Applicability is advisory: writes are accepted on any node, so an
//! `href` set on a container still reaches the generated markup.

use crate::catalog::ElementType;
use crate::error::{EditError, EditResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of property names.
///
/// Declaration order is the order style declarations are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyName {
    CustomId,
    CustomClass,
    Content,
    Href,
    Src,
    Alt,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    BackgroundColor,
    TextColor,
    FontSize,
    FontWeight,
    TextAlign,
    BorderRadius,
}

/// Accepted shape of a property value. The empty string is always accepted
/// and clears the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDomain {
    /// Free text.
    Text,
    /// A link or media source; any string.
    Url,
    /// A finite decimal number, emitted with a `px` suffix.
    Pixels,
    /// Any CSS color expression (`#ff0000`, `transparent`, ...).
    Color,
    /// One of the weights the panel offers.
    FontWeight,
    /// `left`, `center` or `right`.
    TextAlign,
}

/// Element types a property is offered for in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    All,
    Only(&'static [ElementType]),
}

impl Applicability {
    pub fn includes(self, ty: ElementType) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.contains(&ty),
        }
    }
}

/// Schema entry for one property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySchema {
    pub name: PropertyName,
    pub domain: ValueDomain,
    /// CSS property this maps to; `None` for attribute/content properties.
    pub css: Option<&'static str>,
    pub applies_to: Applicability,
}

pub const FONT_WEIGHTS: [&str; 5] = ["300", "400", "500", "600", "700"];
pub const TEXT_ALIGNS: [&str; 3] = ["left", "center", "right"];

const TEXTUAL: &[ElementType] = &[
    ElementType::Heading,
    ElementType::Text,
    ElementType::Paragraph,
    ElementType::Button,
    ElementType::Link,
];
const LINKS: &[ElementType] = &[ElementType::Button, ElementType::Link];
const MEDIA: &[ElementType] = &[ElementType::Image];
const TYPOGRAPHY: &[ElementType] = &[
    ElementType::Heading,
    ElementType::Text,
    ElementType::Paragraph,
];

impl PropertyName {
    pub const ALL: [PropertyName; 20] = [
        Self::CustomId,
        Self::CustomClass,
        Self::Content,
        Self::Href,
        Self::Src,
        Self::Alt,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::BackgroundColor,
        Self::TextColor,
        Self::FontSize,
        Self::FontWeight,
        Self::TextAlign,
        Self::BorderRadius,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::CustomId => "customId",
            Self::CustomClass => "customClass",
            Self::Content => "content",
            Self::Href => "href",
            Self::Src => "src",
            Self::Alt => "alt",
            Self::PaddingTop => "paddingTop",
            Self::PaddingRight => "paddingRight",
            Self::PaddingBottom => "paddingBottom",
            Self::PaddingLeft => "paddingLeft",
            Self::MarginTop => "marginTop",
            Self::MarginRight => "marginRight",
            Self::MarginBottom => "marginBottom",
            Self::MarginLeft => "marginLeft",
            Self::BackgroundColor => "backgroundColor",
            Self::TextColor => "textColor",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::TextAlign => "textAlign",
            Self::BorderRadius => "borderRadius",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }

    /// Like [`from_key`](Self::from_key) but reports unknown names.
    pub fn parse(key: &str) -> EditResult<Self> {
        Self::from_key(key).ok_or_else(|| EditError::UnknownProperty(key.to_string()))
    }

    pub fn schema(self) -> PropertySchema {
        use Applicability::{All, Only};
        use ValueDomain::*;
        let (domain, css, applies_to) = match self {
            Self::CustomId | Self::CustomClass => (Text, None, All),
            Self::Content => (Text, None, Only(TEXTUAL)),
            Self::Href => (Url, None, Only(LINKS)),
            Self::Src => (Url, None, Only(MEDIA)),
            Self::Alt => (Text, None, Only(MEDIA)),
            Self::PaddingTop => (Pixels, Some("padding-top"), All),
            Self::PaddingRight => (Pixels, Some("padding-right"), All),
            Self::PaddingBottom => (Pixels, Some("padding-bottom"), All),
            Self::PaddingLeft => (Pixels, Some("padding-left"), All),
            Self::MarginTop => (Pixels, Some("margin-top"), All),
            Self::MarginRight => (Pixels, Some("margin-right"), All),
            Self::MarginBottom => (Pixels, Some("margin-bottom"), All),
            Self::MarginLeft => (Pixels, Some("margin-left"), All),
            Self::BackgroundColor => (Color, Some("background-color"), All),
            Self::TextColor => (Color, Some("color"), All),
            Self::FontSize => (Pixels, Some("font-size"), Only(TYPOGRAPHY)),
            Self::FontWeight => (FontWeight, Some("font-weight"), Only(TYPOGRAPHY)),
            Self::TextAlign => (TextAlign, Some("text-align"), Only(TYPOGRAPHY)),
            Self::BorderRadius => (Pixels, Some("border-radius"), All),
        };
        PropertySchema {
            name: self,
            domain,
            css,
            applies_to,
        }
    }

    /// Whether this property contributes a stylesheet declaration.
    pub fn is_style(self) -> bool {
        self.schema().css.is_some()
    }

    /// Check `value` against the property's domain. Empty always passes.
    pub fn validate(self, value: &str) -> EditResult<()> {
        if value.is_empty() {
            return Ok(());
        }
        let ok = match self.schema().domain {
            ValueDomain::Text | ValueDomain::Url | ValueDomain::Color => true,
            // Stored verbatim and suffixed with `px`, so no padding allowed.
            ValueDomain::Pixels => {
                value.trim() == value
                    && value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
            }
            ValueDomain::FontWeight => FONT_WEIGHTS.contains(&value),
            ValueDomain::TextAlign => TEXT_ALIGNS.contains(&value),
        };
        if ok {
            Ok(())
        } else {
            Err(EditError::InvalidValue {
                name: self,
                value: value.to_string(),
            })
        }
    }

    /// The CSS declaration (`padding-top: 12px`) for a non-empty style value.
    pub fn declaration(self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let schema = self.schema();
        let css = schema.css?;
        let unit = if schema.domain == ValueDomain::Pixels {
            "px"
        } else {
            ""
        };
        Some(format!("{css}: {value}{unit}"))
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─── Store ───────────────────────────────────────────────────────────────

/// Per-node property overrides. Keys are restricted to [`PropertyName`];
/// values are stored raw. Content lives in the node's segments, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<PropertyName, String>,
}

impl Properties {
    pub fn get(&self, name: PropertyName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    /// Store `value` (or clear when `None`/empty), returning the previous value.
    pub fn put(&mut self, name: PropertyName, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => self.values.insert(name, v),
            _ => self.values.remove(&name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Style declarations in emission order, skipping empty values.
    pub fn declarations(&self) -> Vec<String> {
        self.iter()
            .filter_map(|(name, value)| name.declaration(value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_lookup() {
        for name in PropertyName::ALL {
            assert_eq!(PropertyName::from_key(name.key()), Some(name));
        }
        assert_eq!(
            PropertyName::parse("zIndex"),
            Err(EditError::UnknownProperty("zIndex".into()))
        );
    }

    #[test]
    fn pixel_domain_rejects_words() {
        assert!(PropertyName::PaddingTop.validate("12").is_ok());
        assert!(PropertyName::PaddingTop.validate("12.5").is_ok());
        assert!(PropertyName::PaddingTop.validate("").is_ok());
        assert!(PropertyName::PaddingTop.validate("wide").is_err());
        assert!(PropertyName::FontWeight.validate("450").is_err());
        assert!(PropertyName::TextAlign.validate("justify").is_err());
        assert!(PropertyName::BackgroundColor.validate("transparent").is_ok());
    }

    #[test]
    fn pixel_domain_rejects_padding() {
        assert!(PropertyName::PaddingTop.validate(" 12 ").is_err());
        assert!(PropertyName::MarginLeft.validate("8 ").is_err());
        assert!(PropertyName::FontSize.validate("\t16").is_err());
        assert!(PropertyName::BorderRadius.validate("inf").is_err());
        assert_eq!(
            PropertyName::PaddingTop.declaration("12").as_deref(),
            Some("padding-top: 12px")
        );
    }

    #[test]
    fn declarations_follow_fixed_order() {
        let mut props = Properties::default();
        props.put(PropertyName::BorderRadius, Some("4".into()));
        props.put(PropertyName::BackgroundColor, Some("#fff".into()));
        props.put(PropertyName::PaddingTop, Some("8".into()));
        props.put(PropertyName::CustomId, Some("hero".into()));
        assert_eq!(
            props.declarations(),
            vec![
                "padding-top: 8px".to_string(),
                "background-color: #fff".to_string(),
                "border-radius: 4px".to_string(),
            ]
        );
    }

    #[test]
    fn empty_put_clears() {
        let mut props = Properties::default();
        props.put(PropertyName::Href, Some("/cart".into()));
        let prev = props.put(PropertyName::Href, Some(String::new()));
        assert_eq!(prev.as_deref(), Some("/cart"));
        assert!(props.is_empty());
    }

    #[test]
    fn applicability_is_per_type() {
        let schema = PropertyName::FontSize.schema();
        assert!(schema.applies_to.includes(ElementType::Heading));
        assert!(!schema.applies_to.includes(ElementType::Row));
        assert!(PropertyName::PaddingTop.schema().applies_to.includes(ElementType::Row));
    }
}

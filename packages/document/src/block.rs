//! # Blocks
//!
//! A block is a tagged variant over the known block types plus a catch-all
//! for types this build does not understand.
//!
//! Known blocks serialize as `{ "id", "type", "props" }`. Unknown blocks
//! keep their whole JSON object so nothing is lost when a document written
//! by a newer editor passes through this one. Known blocks keep any keys
//! they don't model too, both beside `props` and inside it.

use crate::{BlockIdGenerator, DocumentError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Block types the palette can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Text,
}

impl BlockKind {
    pub const ALL: [BlockKind; 2] = [BlockKind::Hero, BlockKind::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Text => "text",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(BlockKind::Hero),
            "text" => Ok(BlockKind::Text),
            other => Err(DocumentError::UnknownBlockType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroProps {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
    pub cta_href: String,
    /// Props this build doesn't edit, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeroProps {
    fn default() -> Self {
        Self {
            headline: "Welcome".to_string(),
            subheadline: "Edit this hero block".to_string(),
            cta_text: "Get Started".to_string(),
            cta_href: "#".to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextProps {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: "New text block".to_string(),
            extra: Map::new(),
        }
    }
}

/// A block of a type this build doesn't render
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub id: String,
    pub block_type: String,
    /// The complete original JSON object
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Hero {
        id: String,
        props: HeroProps,
        /// Keys beside `id`, `type` and `props`
        extra: Map<String, Value>,
    },
    Text {
        id: String,
        props: TextProps,
        extra: Map<String, Value>,
    },
    Unknown(UnknownBlock),
}

impl Block {
    /// Create a block with default props and a fresh id
    pub fn new(kind: BlockKind, ids: &mut BlockIdGenerator) -> Self {
        Self::with_id(kind, ids.new_id())
    }

    pub fn with_id(kind: BlockKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            BlockKind::Hero => Block::Hero {
                id,
                props: HeroProps::default(),
                extra: Map::new(),
            },
            BlockKind::Text => Block::Text {
                id,
                props: TextProps::default(),
                extra: Map::new(),
            },
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Block::Hero { id, .. } | Block::Text { id, .. } => id,
            Block::Unknown(unknown) => &unknown.id,
        }
    }

    /// `None` for unknown blocks
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Hero { .. } => Some(BlockKind::Hero),
            Block::Text { .. } => Some(BlockKind::Text),
            Block::Unknown(_) => None,
        }
    }

    /// The wire `type` tag
    pub fn type_name(&self) -> &str {
        match self {
            Block::Hero { .. } => BlockKind::Hero.as_str(),
            Block::Text { .. } => BlockKind::Text.as_str(),
            Block::Unknown(unknown) => &unknown.block_type,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Block::Unknown(_))
    }

    /// Build a block from its JSON object
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let block_type = match value.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(_) => return Err(malformed("block `type` must be a string")),
            None => return Err(malformed("block is missing `type`")),
        };

        match block_type.as_str() {
            "hero" => {
                let typed: TypedBlock<HeroProps> = serde_json::from_value(value)?;
                Ok(Block::Hero {
                    id: typed.id,
                    props: typed.props,
                    extra: typed.extra,
                })
            }
            "text" => {
                let typed: TypedBlock<TextProps> = serde_json::from_value(value)?;
                Ok(Block::Text {
                    id: typed.id,
                    props: typed.props,
                    extra: typed.extra,
                })
            }
            _ => {
                let id = match value.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    _ => return Err(malformed("block is missing a string `id`")),
                };
                Ok(Block::Unknown(UnknownBlock {
                    id,
                    block_type,
                    raw: value,
                }))
            }
        }
    }

    /// Apply an inspector edit, returning the edited block
    pub fn patched(&self, patch: &BlockPatch) -> Result<Block, DocumentError> {
        let mut next = self.clone();
        match (&mut next, patch) {
            (
                Block::Hero { props, .. },
                BlockPatch::Hero {
                    headline,
                    subheadline,
                    cta_text,
                    cta_href,
                },
            ) => {
                overwrite(&mut props.headline, headline);
                overwrite(&mut props.subheadline, subheadline);
                overwrite(&mut props.cta_text, cta_text);
                overwrite(&mut props.cta_href, cta_href);
            }
            (Block::Text { props, .. }, BlockPatch::Text { text }) => {
                overwrite(&mut props.text, text);
            }
            (block, patch) => {
                return Err(DocumentError::KindMismatch {
                    patch: patch.kind().as_str(),
                    block: block.type_name().to_string(),
                });
            }
        }
        Ok(next)
    }
}

fn overwrite(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

fn malformed(msg: &str) -> DocumentError {
    DocumentError::Malformed(serde_json::Error::custom(msg))
}

/// Partial props update from the inspector; `None` leaves a field alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPatch {
    Hero {
        headline: Option<String>,
        subheadline: Option<String>,
        cta_text: Option<String>,
        cta_href: Option<String>,
    },
    Text {
        text: Option<String>,
    },
}

impl BlockPatch {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPatch::Hero { .. } => BlockKind::Hero,
            BlockPatch::Text { .. } => BlockKind::Text,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        BlockPatch::Text {
            text: Some(text.into()),
        }
    }

    pub fn headline(headline: impl Into<String>) -> Self {
        BlockPatch::Hero {
            headline: Some(headline.into()),
            subheadline: None,
            cta_text: None,
            cta_href: None,
        }
    }
}

#[derive(Deserialize)]
struct TypedBlock<P> {
    id: String,
    #[serde(rename = "type")]
    _block_type: String,
    props: P,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct TypedBlockRef<'a, P> {
    id: &'a str,
    #[serde(rename = "type")]
    block_type: &'a str,
    props: &'a P,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Hero { id, props, extra } => TypedBlockRef {
                id,
                block_type: BlockKind::Hero.as_str(),
                props,
                extra,
            }
            .serialize(serializer),
            Block::Text { id, props, extra } => TypedBlockRef {
                id,
                block_type: BlockKind::Text.as_str(),
                props,
                extra,
            }
            .serialize(serializer),
            Block::Unknown(unknown) => unknown.raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Block::from_value(value).map_err(D::Error::custom)
    }
}

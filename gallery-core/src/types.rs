//! Core types for owned assets and their rendered form

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GalleryError;

/// Length in bytes of a decoded ledger address.
pub const ADDRESS_LEN: usize = 32;

/// A validated ledger address whose held items are queried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerIdentity(String);

impl OwnerIdentity {
    /// Parse a base58 address, rejecting anything that does not decode to 32 bytes.
    pub fn parse(input: &str) -> Result<Self, GalleryError> {
        let trimmed = input.trim();
        match bs58::decode(trimmed).into_vec() {
            Ok(bytes) if bytes.len() == ADDRESS_LEN => Ok(Self(trimmed.to_string())),
            _ => Err(GalleryError::InvalidIdentity(input.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerIdentity {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OwnerIdentity> for String {
    fn from(identity: OwnerIdentity) -> Self {
        identity.0
    }
}

/// On-chain summary record for one owned asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Asset address (mint / asset id)
    pub address: String,
    /// On-chain display name
    pub name: String,
    /// On-chain symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Location of the off-chain metadata payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl ItemDescriptor {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            symbol: None,
            uri: None,
        }
    }

    /// Set the metadata URI.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

}

/// A single trait entry in the off-chain metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttribute {
    #[serde(default)]
    pub trait_type: Option<String>,
    pub value: serde_json::Value,
}

/// Off-chain metadata payload for an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub animation_url: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub attributes: Vec<ItemAttribute>,
    /// Fields outside the conventional shape
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ItemMetadata {
    /// Metadata carrying only an image location.
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Default::default()
        }
    }

    /// The image URL, if present and non-empty.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Resolution progress as shown to the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Loading,
    Ready,
    Failed,
}

/// Render-ready projection of one visible item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub address: String,
    pub name: String,
    pub image_url_or_fallback: String,
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "Geh5Ss5knQGym81toYGXDbH3MFU2JCMK7E4QyeBHor1b";

    #[test]
    fn test_parse_valid_identity() {
        let identity = OwnerIdentity::parse(OWNER).unwrap();
        assert_eq!(identity.as_str(), OWNER);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let identity = OwnerIdentity::parse(&format!("  {}\n", OWNER)).unwrap();
        assert_eq!(identity.to_string(), OWNER);
    }

    #[test]
    fn test_parse_rejects_bad_alphabet_and_length() {
        // '0' and 'O' are not in the base58 alphabet
        assert!(OwnerIdentity::parse("0OIl").is_err());
        assert!(OwnerIdentity::parse("").is_err());
        assert!(OwnerIdentity::parse("3mJr7AoUXx2Wqd").is_err());
        match OwnerIdentity::parse("not an address") {
            Err(GalleryError::InvalidIdentity(input)) => assert_eq!(input, "not an address"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_metadata_keeps_unknown_fields() {
        let json = serde_json::json!({
            "name": "Degen #1",
            "image": "https://example.com/1.png",
            "attributes": [{"trait_type": "Hat", "value": "Cap"}],
            "seller_fee_basis_points": 500
        });
        let metadata: ItemMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(metadata.image_url(), Some("https://example.com/1.png"));
        assert_eq!(metadata.attributes.len(), 1);
        assert_eq!(metadata.extra["seller_fee_basis_points"], 500);
    }

    #[test]
    fn test_blank_image_is_absent() {
        assert_eq!(ItemMetadata::with_image("  ").image_url(), None);
    }
}

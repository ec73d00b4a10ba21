//! Social platform links shown on the home page and in the footer.
//!
//! The configuration maps a platform key to a profile URL. Entries with an empty
//! value are hidden. Only some platforms have an icon; the rest render as a plain
//! text link until an icon is added to [`Icon`].

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// Platforms recognized in `home.socials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Email,
    Github,
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
    Youtube,
}

impl SocialPlatform {
    /// Every recognized platform, in display order.
    pub const ALL: [SocialPlatform; 7] = [
        Self::Email,
        Self::Github,
        Self::Linkedin,
        Self::Twitter,
        Self::Facebook,
        Self::Instagram,
        Self::Youtube,
    ];

    /// Parse a configuration key. Keys are matched case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "email" => Some(Self::Email),
            "github" => Some(Self::Github),
            "linkedin" => Some(Self::Linkedin),
            "twitter" => Some(Self::Twitter),
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "youtube" => Some(Self::Youtube),
            _ => None,
        }
    }

    /// The configuration key for this platform.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Github => "github",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
        }
    }

    /// Human readable name, used as link label and `aria-label`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Github => "GitHub",
            Self::Linkedin => "LinkedIn",
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Youtube => "YouTube",
        }
    }

    /// Icon used for this platform.
    ///
    /// Returns `None` for platforms that have no icon yet.
    pub fn icon(&self) -> Option<Icon> {
        match self {
            Self::Email => Some(Icon::Mail),
            Self::Github => Some(Icon::Github),
            Self::Linkedin => Some(Icon::Linkedin),
            Self::Twitter | Self::Facebook | Self::Instagram | Self::Youtube => None,
        }
    }

    /// Build the link target for a profile value.
    pub fn href(&self, value: &str) -> String {
        match self {
            Self::Email if !value.starts_with("mailto:") => format!("mailto:{value}"),
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Icons available to the social-icon renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Mail,
    Github,
    Linkedin,
}

/// A key from `home.socials`, either a recognized platform or an arbitrary string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SocialKey {
    Known(SocialPlatform),
    Unknown(String),
}

impl SocialKey {
    /// Parse a raw configuration key.
    pub fn parse(key: &str) -> Self {
        match SocialPlatform::from_key(key) {
            Some(platform) => Self::Known(platform),
            None => Self::Unknown(key.to_string()),
        }
    }

    /// The key as written in configuration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(platform) => platform.key(),
            Self::Unknown(key) => key,
        }
    }

    /// The recognized platform, if any.
    pub fn platform(&self) -> Option<SocialPlatform> {
        match self {
            Self::Known(platform) => Some(*platform),
            Self::Unknown(_) => None,
        }
    }
}

/// A rendered social link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    /// Source key.
    pub key: SocialKey,

    /// Link target (`mailto:` for email).
    pub href: String,

    /// Icon to draw, `None` when the platform has no icon.
    pub icon: Option<Icon>,

    /// Accessible label.
    pub label: String,
}

impl SocialLink {
    /// Whether following this link opens a mail client rather than a page.
    pub fn is_mailto(&self) -> bool {
        self.href.starts_with("mailto:")
    }
}

/// Ordered mapping from platform key to profile URL.
///
/// Order follows the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Socials {
    entries: Vec<(SocialKey, String)>,
}

impl Socials {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A repeated key replaces the earlier value in place
    /// and the replaced value is returned.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let parsed = SocialKey::parse(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == parsed) {
            Some(entry) => {
                tracing::warn!(
                    key = %key,
                    platform = %parsed.as_str(),
                    "duplicate social platform key, later value wins"
                );
                Some(std::mem::replace(&mut entry.1, value))
            }
            None => {
                self.entries.push((parsed, value));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = SocialKey::parse(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over all entries, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (&SocialKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Links to render: one per entry with a non-empty value, in order.
    pub fn links(&self) -> Vec<SocialLink> {
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                let value = value.trim();
                if value.is_empty() {
                    return None;
                }

                let link = match key {
                    SocialKey::Known(platform) => SocialLink {
                        key: key.clone(),
                        href: platform.href(value),
                        icon: platform.icon(),
                        label: platform.label().to_string(),
                    },
                    SocialKey::Unknown(raw) => SocialLink {
                        key: key.clone(),
                        href: value.to_string(),
                        icon: None,
                        label: raw.clone(),
                    },
                };
                Some(link)
            })
            .collect()
    }

    /// Populated keys that will render without an icon.
    pub fn without_icon(&self) -> Vec<&SocialKey> {
        self.entries
            .iter()
            .filter(|(key, value)| {
                !value.trim().is_empty() && key.platform().and_then(|p| p.icon()).is_none()
            })
            .map(|(key, _)| key)
            .collect()
    }
}

impl Serialize for Socials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Socials {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SocialsVisitor;

        impl<'de> Visitor<'de> for SocialsVisitor {
            type Value = Socials;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of platform keys to profile URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Socials, A::Error> {
                let mut socials = Socials::new();
                while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
                    if SocialPlatform::from_key(&key).is_none() {
                        tracing::warn!(key = %key, "unrecognized social platform key");
                    }
                    socials.insert(&key, value.unwrap_or_default());
                }
                Ok(socials)
            }
        }

        deserializer.deserialize_map(SocialsVisitor)
    }
}

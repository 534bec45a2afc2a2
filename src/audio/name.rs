//! 音效标识符
//!
//! 音效名不区分大小写，构造时统一转换为小写。

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 规范化（小写）后的音效名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SoundName(String);

impl SoundName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SoundName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SoundName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&String> for SoundName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&SoundName> for SoundName {
    fn from(name: &SoundName) -> Self {
        name.clone()
    }
}

impl From<SoundName> for String {
    fn from(name: SoundName) -> Self {
        name.0
    }
}

impl AsRef<str> for SoundName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SoundName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercased() {
        assert_eq!(SoundName::new("Explosion").as_str(), "explosion");
        assert_eq!(SoundName::from("EXPLOSION"), SoundName::from("explosion"));
    }

    #[test]
    fn test_serde_normalizes_on_deserialize() {
        let name: SoundName = serde_json::from_str("\"Laser_Shot\"").unwrap();
        assert_eq!(name.as_str(), "laser_shot");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"laser_shot\"");
    }
}

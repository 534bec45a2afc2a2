/// 音效池配置

use super::{ConfigError, ConfigResult};
use crate::audio::SoundName;
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 资源路径模板中的音效名占位符
pub const NAME_PLACEHOLDER: &str = "{name}";

/// 每个音效默认最多同时存在的实例数
pub const DEFAULT_MAX_INSTANCES: usize = 16;

/// 默认资源路径模板
pub const DEFAULT_ASSET_PATH_TEMPLATE: &str = "Assets/Sounds/{name}.wav";

/// 音效池配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPoolConfig {
    /// 每个音效最多可同时播放的实例数
    pub max_instances: usize,

    /// 资源路径模板，`{name}` 会被替换为规范化后的音效名
    pub asset_path_template: String,
}

impl_default!(SoundPoolConfig {
    max_instances: DEFAULT_MAX_INSTANCES,
    asset_path_template: DEFAULT_ASSET_PATH_TEMPLATE.to_string(),
});

impl SoundPoolConfig {
    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }

    pub fn with_asset_path_template(mut self, template: impl Into<String>) -> Self {
        self.asset_path_template = template.into();
        self
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_instances == 0 {
            return Err(ConfigError::ValidationError(
                "max_instances must be at least 1".to_string(),
            ));
        }
        let placeholders = self.asset_path_template.matches(NAME_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ConfigError::ValidationError(format!(
                "asset_path_template must contain exactly one {} placeholder, found {} in {:?}",
                NAME_PLACEHOLDER, placeholders, self.asset_path_template
            )));
        }
        Ok(())
    }

    /// 将音效名代入模板，得到资源路径
    pub fn asset_path(&self, name: &SoundName) -> String {
        self.asset_path_template
            .replacen(NAME_PLACEHOLDER, name.as_str(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SoundPoolConfig::default();
        assert_eq!(config.max_instances, 16);
        assert_eq!(config.asset_path_template, "Assets/Sounds/{name}.wav");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_asset_path_uses_normalized_name() {
        let config = SoundPoolConfig::default();
        assert_eq!(
            config.asset_path(&SoundName::new("Explosion")),
            "Assets/Sounds/explosion.wav"
        );
    }

    #[test]
    fn test_zero_instances_rejected() {
        let config = SoundPoolConfig::default().with_max_instances(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_template_placeholder_count() {
        let missing = SoundPoolConfig::default().with_asset_path_template("Assets/Sounds/boom.wav");
        assert!(missing.validate().is_err());

        let doubled =
            SoundPoolConfig::default().with_asset_path_template("{name}/{name}.ogg");
        assert!(doubled.validate().is_err());

        let custom = SoundPoolConfig::default().with_asset_path_template("sfx/{name}.ogg");
        assert!(custom.validate().is_ok());
        assert_eq!(custom.asset_path(&SoundName::new("Coin")), "sfx/coin.ogg");
    }
}

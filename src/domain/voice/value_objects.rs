//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 克隆音色名称
///
/// 不变量:
/// - 仅允许字母/数字/下划线 (`^[A-Za-z0-9_]+$`)
/// - 不允许连字符 `-`，它在版本选择语法 (`name-3`) 中作为分隔符保留
/// - 接受后统一转为小写（请求侧规范化；注册表列举保留目录名原样）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    /// 纯校验谓词：是否仅由字母/数字/下划线构成，不做任何改写
    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }

    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let raw = name.into();
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("音色名称不能为空");
        }
        if raw.contains('-') {
            return Err("音色名称不能包含 '-'，连字符保留给版本选择语法 (如 goofy-2)");
        }
        if !Self::is_valid(raw) {
            return Err("音色名称只能包含字母、数字和下划线");
        }
        Ok(Self(raw.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色版本号
///
/// 不变量: 正整数，≥1，无前导零
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoiceVersion(u32);

impl VoiceVersion {
    pub fn new(version: u32) -> Result<Self, &'static str> {
        if version == 0 {
            return Err("版本号必须 ≥ 1");
        }
        Ok(Self(version))
    }

    /// 解析目录名形式的版本号，要求 `^[1-9][0-9]*$`
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if s.starts_with('0') {
            return None;
        }
        s.parse::<u32>().ok().map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for VoiceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_name_accepts_valid() {
        let name = VoiceName::new("Goofy_Voice2").unwrap();
        assert_eq!(name.as_str(), "goofy_voice2");
    }

    #[test]
    fn test_name_predicate_filters_without_rewriting() {
        assert!(VoiceName::is_valid("Stefan_2"));
        assert!(!VoiceName::is_valid(""));
        assert!(!VoiceName::is_valid("bad-name"));
        assert!(!VoiceName::is_valid("voice name"));
        assert!(!VoiceName::is_valid("音色"));
    }

    #[test]
    fn test_voice_name_rejects_hyphen() {
        assert!(VoiceName::new("bad-name").is_err());
    }

    #[test]
    fn test_voice_name_rejects_invalid_chars() {
        assert!(VoiceName::new("").is_err());
        assert!(VoiceName::new("   ").is_err());
        assert!(VoiceName::new("voice name").is_err());
        assert!(VoiceName::new("voice/1").is_err());
        assert!(VoiceName::new("音色").is_err());
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(VoiceVersion::parse("1").map(|v| v.get()), Some(1));
        assert_eq!(VoiceVersion::parse("42").map(|v| v.get()), Some(42));
        assert_eq!(VoiceVersion::parse("0"), None);
        assert_eq!(VoiceVersion::parse("01"), None);
        assert_eq!(VoiceVersion::parse(""), None);
        assert_eq!(VoiceVersion::parse("1a"), None);
        assert_eq!(VoiceVersion::parse("-1"), None);
    }

    #[test]
    fn test_version_new_rejects_zero() {
        assert!(VoiceVersion::new(0).is_err());
        assert!(VoiceVersion::new(1).is_ok());
    }
}

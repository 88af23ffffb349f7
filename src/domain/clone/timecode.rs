//! Clone Context - 时间码解析
//!
//! 接受纯秒数 (`12`, `12.5`) 或 `MM:SS` / `HH:MM:SS` 形式。
//! 校验在进程启动前完成，合法的原始字符串会原样透传给外部管线。

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimecodeError {
    #[error("无效的时间值 {value:?}: {reason}")]
    Invalid { value: String, reason: &'static str },

    #[error("无效的剪辑窗口: --end ({end}) 必须大于 --start ({start})")]
    EmptyWindow { start: String, end: String },
}

impl TimecodeError {
    fn invalid(value: &str, reason: &'static str) -> Self {
        Self::Invalid {
            value: value.to_string(),
            reason,
        }
    }
}

/// 解析时间码为秒数
///
/// 规则:
/// - 纯数值按秒解释，必须非负且有限
/// - 冒号形式只接受 2 段 (`MM:SS`) 或 3 段 (`HH:MM:SS`)
/// - 秒字段恒小于 60；`HH:MM:SS` 中分钟字段也必须小于 60
///   （`MM:SS` 的分钟可以超过 59，如 `90:00`）
pub fn parse_timecode(value: &str) -> Result<f64, TimecodeError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err(TimecodeError::invalid(value, "不能为空"));
    }

    if !raw.contains(':') {
        let seconds: f64 = raw
            .parse()
            .map_err(|_| TimecodeError::invalid(value, "不是数字"))?;
        if !seconds.is_finite() {
            return Err(TimecodeError::invalid(value, "不是有限数值"));
        }
        if seconds < 0.0 {
            return Err(TimecodeError::invalid(value, "时间不能为负"));
        }
        return Ok(seconds);
    }

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(TimecodeError::invalid(value, "只接受 MM:SS 或 HH:MM:SS"));
    }

    let numeric = TimecodeError::invalid(value, "字段必须是数字");
    let (hours, minutes, seconds) = if parts.len() == 2 {
        let minutes: i64 = parts[0].parse().map_err(|_| numeric.clone())?;
        let seconds: f64 = parts[1].parse().map_err(|_| numeric.clone())?;
        (0i64, minutes, seconds)
    } else {
        let hours: i64 = parts[0].parse().map_err(|_| numeric.clone())?;
        let minutes: i64 = parts[1].parse().map_err(|_| numeric.clone())?;
        let seconds: f64 = parts[2].parse().map_err(|_| numeric.clone())?;
        (hours, minutes, seconds)
    };

    if hours < 0 || minutes < 0 || seconds < 0.0 {
        return Err(TimecodeError::invalid(value, "时间不能为负"));
    }
    if parts.len() == 3 && minutes >= 60 {
        return Err(TimecodeError::invalid(value, "HH:MM:SS 中分钟必须小于 60"));
    }
    if !seconds.is_finite() || seconds >= 60.0 {
        return Err(TimecodeError::invalid(value, "秒必须小于 60"));
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// 校验可选的剪辑窗口
///
/// 未给出 start 时按 0 计；同时给出 start/end 时要求 end 严格大于 start。
/// 只给 start 的默认窗口长度由外部管线决定，此处不重复实现。
pub fn validate_window(start: Option<&str>, end: Option<&str>) -> Result<(), TimecodeError> {
    let start_seconds = match start {
        Some(s) => parse_timecode(s)?,
        None => 0.0,
    };
    if let Some(e) = end {
        let end_seconds = parse_timecode(e)?;
        if end_seconds <= start_seconds {
            return Err(TimecodeError::EmptyWindow {
                start: start.unwrap_or("0").to_string(),
                end: e.to_string(),
            });
        }
    }
    Ok(())
}

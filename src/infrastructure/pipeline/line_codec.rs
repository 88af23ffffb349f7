//! 行切分编解码器
//!
//! 外部管线的输出按任意大小的块到达，行终止符有 `\n`、`\r\n`
//! 和裸 `\r` 三种（进度条刷新常用裸 `\r`）。切分结果必须与分块
//! 方式无关：跨块的行要拼回，流结束时残留的片段作为最后一行冲出。

use std::io;

use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

/// 将字节流切分为逻辑行的 `Decoder`
///
/// 不变量: 缓冲区以 `\r` 结尾时不立即产出，下一块可能以 `\n`
/// 开头构成 `\r\n`，要拿到后续字节或确认 EOF 才能定界。
#[derive(Debug, Default)]
pub struct LineCodec;

impl LineCodec {
    pub fn new() -> Self {
        Self
    }

    /// 返回 (行结束位置, 终止符字节数)
    fn find_terminator(src: &[u8], eof: bool) -> Option<(usize, usize)> {
        for (i, byte) in src.iter().enumerate() {
            match byte {
                b'\n' => return Some((i, 1)),
                b'\r' => {
                    if i + 1 < src.len() {
                        let skip = if src[i + 1] == b'\n' { 2 } else { 1 };
                        return Some((i, skip));
                    }
                    if eof {
                        return Some((i, 1));
                    }
                    return None;
                }
                _ => {}
            }
        }
        None
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        match Self::find_terminator(src, false) {
            Some((end, skip)) => {
                let line = src.split_to(end + skip);
                Ok(Some(String::from_utf8_lossy(&line[..end]).into_owned()))
            }
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        match Self::find_terminator(src, true) {
            Some((end, skip)) => {
                let line = src.split_to(end + skip);
                Ok(Some(String::from_utf8_lossy(&line[..end]).into_owned()))
            }
            None => {
                // 没有终止符的最终片段也算一行
                let rest = src.split_to(src.len());
                Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
            }
        }
    }
}

//! 入力処理モジュール
//!
//! アドレス解析、コマンド解析、テキスト入力モードの読み込みを提供

pub mod address;
pub mod command;

// 公開API
pub use address::{parse_address, Address};
pub use command::Command;

use crate::error::{EdError, Result};
use std::io::{self, BufRead};

/// テキスト入力モードの終端行
pub const TEXT_TERMINATOR: &str = ".\n";

/// 1行ずつ入力を供給するソース
///
/// 任意の `BufRead` がそのまま利用できる
pub trait LineSource {
    /// 改行を含む1行を読み込む。入力終端では `None`
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead + ?Sized> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// 終端行 `.` まで入力された行を読み込む
///
/// 終端行の前に入力が尽きた場合は `EdError::Unknown`
pub fn read_text_entry(source: &mut dyn LineSource) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    loop {
        match source.next_line()? {
            None => return Err(EdError::unexpected_eof()),
            Some(line) if line == TEXT_TERMINATOR => return Ok(lines),
            Some(line) => lines.push(line),
        }
    }
}

/// コマンド行末尾の改行を取り除く
pub fn strip_line_ending(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

//! ファイルI/O操作
//!
//! UTF-8テキストファイルを行単位で読み込み・保存する

use crate::buffer::LineStore;
use crate::error::{file::Result, FileError};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// ファイル操作のトレイト
pub trait FileOperations {
    /// ファイル全体を改行付きの行として読み込み
    fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>>;

    /// 全行をそのまま書き込み、書き込んだバイト数を返す
    fn write_lines<P: AsRef<Path>>(path: P, lines: &LineStore) -> Result<usize>;
}

/// ファイル操作の実装
pub struct DefaultFileOperations;

impl FileOperations for DefaultFileOperations {
    fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();

        // ディレクトリではないことを確認
        if path.is_dir() {
            return Err(FileError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| FileError::from_io(path, e))?;
        let lines = split_lines(&content);
        log::info!("read {} lines from {}", lines.len(), path.display());
        Ok(lines)
    }

    fn write_lines<P: AsRef<Path>>(path: P, lines: &LineStore) -> Result<usize> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|e| FileError::from_io(path, e))?;
        let mut writer = BufWriter::new(file);
        let written = lines
            .write_to(&mut writer)
            .map_err(|e| FileError::from_io(path, e))?;

        log::info!("wrote {} bytes to {}", written, path.display());
        Ok(written)
    }
}

/// ファイル読み込みの便利関数
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    DefaultFileOperations::read_lines(path)
}

/// ファイル書き込みの便利関数
pub fn write_lines<P: AsRef<Path>>(path: P, lines: &LineStore) -> Result<usize> {
    DefaultFileOperations::write_lines(path, lines)
}

/// テキストを改行付きの行に分割する
///
/// 末尾に改行のない最終行には改行を補う
pub fn split_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            log::warn!("Missing newline at end of file, will be appended");
            last.push('\n');
        }
    }

    lines
}

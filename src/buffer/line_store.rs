//! 行ストア実装
//!
//! 改行文字を含む行を所有する順序付きコンテナ
//! インデックスは全て0始まり。1始まりの行番号への変換はコマンド層が行う

use std::io::{self, Write};

/// 行ストア構造体
///
/// 各行は末尾の `\n` を含んだ独立した `String` として保持する。
/// 範囲外アクセスはプログラミングエラーとして `assert!` で検出する
/// （呼び出し側がアドレスを事前に検証する前提）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    /// 空の行ストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の行から作成（所有権を引き取る）
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// インデックスが有効な行を指しているか
    pub fn contains(&self, index: usize) -> bool {
        index < self.lines.len()
    }

    /// 指定行を取得
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// 全行への参照
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// `at` の直前に `source` を順に挿入する
    pub fn insert(&mut self, source: Vec<String>, at: usize) {
        assert!(
            at <= self.lines.len(),
            "insert position {} out of bounds (len {})",
            at,
            self.lines.len()
        );
        self.lines.splice(at..at, source);
    }

    /// 閉区間 `[start, end]` を `source` で置き換え、置き換えられた行を返す
    pub fn overwrite(&mut self, source: Vec<String>, start: usize, end: usize) -> Vec<String> {
        self.check_range(start, end);
        self.lines.splice(start..=end, source).collect()
    }

    /// 閉区間 `[start, end]` を取り除いて返す
    pub fn pop(&mut self, start: usize, end: usize) -> Vec<String> {
        self.check_range(start, end);
        self.lines.drain(start..=end).collect()
    }

    /// 閉区間 `[start, end]` の複製を返す（ストアとは共有しない）
    pub fn copy_range(&self, start: usize, end: usize) -> Vec<String> {
        self.check_range(start, end);
        self.lines[start..=end].to_vec()
    }

    /// 閉区間 `[start, end]` を `start` の1行に連結する
    ///
    /// 最終行以外の末尾改行は取り除かれる
    pub fn join_range(&mut self, start: usize, end: usize) {
        self.check_range(start, end);
        if start == end {
            return;
        }

        let tail: Vec<String> = self.lines.drain(start + 1..=end).collect();
        let head = &mut self.lines[start];
        for line in tail {
            if head.ends_with('\n') {
                head.pop();
            }
            head.push_str(&line);
        }
    }

    /// 別のストアと内容を交換
    pub fn swap(&mut self, other: &mut LineStore) {
        std::mem::swap(&mut self.lines, &mut other.lines);
    }

    /// 全行をそのまま書き出し、書き込んだバイト数を返す
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        let mut written = 0;
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            written += line.len();
        }
        writer.flush()?;
        Ok(written)
    }

    fn check_range(&self, start: usize, end: usize) {
        assert!(
            start <= end && end < self.lines.len(),
            "range [{}, {}] out of bounds (len {})",
            start,
            end,
            self.lines.len()
        );
    }
}

//! ファイル操作モジュール
//!
//! `e` / `w` コマンドから使われるファイル入出力:
//! - ファイル全体を改行付きの行として読み込む
//! - バッファ内容はそのまま書き出す（改行コードの変換なし）
//! - ファイル名の `~` と環境変数を展開する

pub mod io;
pub mod path;

// 公開API
pub use io::{read_lines, split_lines, write_lines, DefaultFileOperations, FileOperations};
pub use path::expand_path;

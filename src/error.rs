//! エラーハンドリングシステム
//!
//! エディタ全体で使用される統一されたエラー型とユーティリティを定義
//! コマンドの失敗は全てセッション内で回復され、最後のエラーとして記録される

use std::io;
use std::path::Path;
use thiserror::Error;

/// コマンド実行エラー
///
/// 表示メッセージは `h` コマンドと詳細エラーモードで利用される
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdError {
    /// 解釈できないコマンド、またはファイル名が解決できない
    #[error("Invalid command.")]
    InvalidCommand,

    /// バッファ範囲外、もしくは解析できないアドレス
    #[error("Invalid address.")]
    InvalidAddress,

    /// ファイルを開けない
    #[error("Could not open file.")]
    InvalidFile { path: String, reason: String },

    /// 取り消せる変更がない
    #[error("Nothing to undo.")]
    NoUndoAvailable,

    /// 未保存の変更がある状態での終了
    #[error("Warning: buffer modified.")]
    UnsavedChanges,

    /// テキスト入力中の入出力エラーなど
    #[error("Unknown error.")]
    Unknown { reason: String },
}

impl EdError {
    /// ログ出力向けの詳細メッセージ
    pub fn detail(&self) -> String {
        match self {
            EdError::InvalidFile { path, reason } => {
                format!("{} ({}: {})", self, path, reason)
            }
            EdError::Unknown { reason } => format!("{} ({})", self, reason),
            _ => self.to_string(),
        }
    }

    /// 入力終端によるテキスト入力の中断
    pub fn unexpected_eof() -> Self {
        EdError::Unknown {
            reason: "unexpected end of input".to_string(),
        }
    }
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error: {path}")]
    Encoding { path: String },

    #[error("IO error: {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// `std::io::Error` をパス情報付きで分類
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FileError::Encoding { path },
            _ => FileError::Io {
                path,
                message: error.to_string(),
            },
        }
    }

    /// 対象パス
    pub fn path(&self) -> &str {
        match self {
            FileError::NotFound { path }
            | FileError::PermissionDenied { path }
            | FileError::InvalidPath { path }
            | FileError::Encoding { path }
            | FileError::Io { path, .. } => path,
        }
    }
}

impl From<FileError> for EdError {
    fn from(error: FileError) -> Self {
        EdError::InvalidFile {
            path: error.path().to_string(),
            reason: error.to_string(),
        }
    }
}

// 出力先・入力元の I/O エラーは Unknown として扱う
impl From<io::Error> for EdError {
    fn from(error: io::Error) -> Self {
        EdError::Unknown {
            reason: error.to_string(),
        }
    }
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .unwrap_or_else(|| std::panic::Location::caller());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        eprintln!("PANIC at {}:{}: {}", location.file(), location.line(), message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EdError>;

/// 各モジュール固有のResult型
pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

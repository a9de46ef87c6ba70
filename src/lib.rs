//! altre-ed - ed 風の行指向テキストエディタ
//!
//! アドレス付きの短いコマンドでメモリ上の行バッファを操作する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;
pub mod app;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod input;

// 公開API
pub use app::App;
pub use buffer::LineStore;
pub use config::EditorOptions;
pub use editor::{Flow, Session};
pub use error::{EdError, Result};
pub use input::{Address, Command, LineSource};

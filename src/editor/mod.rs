//! エディタモジュール
//!
//! コマンド解釈とバッファ変更を担う編集セッション

mod commands;
pub mod session;
pub mod undo;
pub mod yank_register;

// 公開API
pub use session::{Flow, Session};
pub use undo::UndoSnapshot;
pub use yank_register::YankRegister;

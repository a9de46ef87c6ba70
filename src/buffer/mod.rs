//! バッファ管理モジュール
//!
//! 行単位のテキストデータ保持を提供

pub mod line_store;

// 公開API
pub use line_store::LineStore;

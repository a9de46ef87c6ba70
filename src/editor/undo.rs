//! 単一段階の取り消し
//!
//! 変更コマンドの直前にバッファ全体を複製し、取り消し時に現在のバッファと交換する

use crate::buffer::LineStore;
use crate::error::{EdError, Result};

/// 取り消し用スナップショット
///
/// `revision` はスナップショット取得時（または直前の交換時）のセッション改訂番号。
/// セッションの改訂番号と一致している間は取り消せる変更が存在しない
#[derive(Debug, Clone, Default)]
pub struct UndoSnapshot {
    lines: LineStore,
    cursor: usize,
    revision: u64,
}

impl UndoSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 変更前のバッファとカーソルを記録
    pub fn capture(&mut self, buffer: &LineStore, cursor: usize, revision: u64) {
        self.lines = buffer.clone();
        self.cursor = cursor;
        self.revision = revision;
    }

    /// 取り消し可能か
    pub fn can_undo(&self, revision: u64) -> bool {
        self.revision != revision
    }

    /// バッファとカーソルを交換して取り消す
    ///
    /// 交換自体も1回の変更として `revision` を進める。
    /// 交換後は新しい変更が行われるまで再度の取り消しはできない
    pub fn restore(
        &mut self,
        buffer: &mut LineStore,
        cursor: &mut usize,
        revision: &mut u64,
    ) -> Result<()> {
        if !self.can_undo(*revision) {
            return Err(EdError::NoUndoAvailable);
        }

        buffer.swap(&mut self.lines);
        std::mem::swap(cursor, &mut self.cursor);
        *revision += 1;
        self.revision = *revision;
        Ok(())
    }

    /// バッファの差し替え（`e` コマンド）後に履歴を破棄
    pub fn reset(&mut self, revision: u64) {
        self.lines = LineStore::new();
        self.cursor = 0;
        self.revision = revision;
    }
}

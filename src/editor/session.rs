//! 編集セッション
//!
//! 行ストア、カーソル、ヤンクレジスタ、取り消しスナップショットと
//! セッション設定をまとめて所有するコンテキスト

use crate::buffer::LineStore;
use crate::config::EditorOptions;
use crate::editor::{UndoSnapshot, YankRegister};
use crate::error::{EdError, Result};
use crate::input::{strip_line_ending, LineSource};
use std::io::{self, Write};

/// コマンド実行後の制御フロー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// 次のコマンドを読み続ける
    Continue,
    /// セッションを終了する
    Quit,
}

/// 編集セッションの状態
///
/// 呼び出し側が作成し、コマンドごとに `handle_command` へ入力元と出力先を渡す
#[derive(Debug)]
pub struct Session {
    /// 編集中のバッファ
    pub(crate) buffer: LineStore,
    /// 現在行（1始まり、空バッファでは0）
    pub(crate) cursor: usize,
    /// 最後に編集・保存したファイル名
    pub(crate) filename: Option<String>,
    pub(crate) yank: YankRegister,
    pub(crate) undo: UndoSnapshot,
    /// 変更のたびに増える改訂番号（取り消し判定用）
    pub(crate) revision: u64,
    /// 最後の保存以降の変更回数
    pub(crate) modified: usize,
    prompt: String,
    prompt_enabled: bool,
    verbose_errors: bool,
    last_error: Option<EdError>,
}

impl Session {
    /// 既定設定で空のセッションを作成
    pub fn new() -> Self {
        Self::with_options(&EditorOptions::default())
    }

    /// 設定を反映してセッションを作成
    pub fn with_options(options: &EditorOptions) -> Self {
        Self {
            buffer: LineStore::new(),
            cursor: 0,
            filename: None,
            yank: YankRegister::new(),
            undo: UndoSnapshot::new(),
            revision: 0,
            modified: 0,
            prompt: options.prompt.clone(),
            prompt_enabled: options.prompt_enabled,
            verbose_errors: options.verbose_errors,
            last_error: None,
        }
    }

    /// 1行分のコマンドを実行する
    ///
    /// テキスト入力モードの行は `input` から、表示内容は `output` へ。
    /// 失敗した場合はエラーを最後のエラーとして記録してから返す
    pub fn handle_command(
        &mut self,
        raw_line: &str,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
    ) -> Result<Flow> {
        let line = strip_line_ending(raw_line);
        let result = self.dispatch(line, input, output);
        if let Err(error) = &result {
            log::debug!("command {:?} failed: {}", line, error.detail());
            self.last_error = Some(error.clone());
        }
        result
    }

    /// 詳細エラーモード（`H`）が有効か
    pub fn should_report_verbose_errors(&self) -> bool {
        self.verbose_errors
    }

    /// 最後のエラーのメッセージを書き出す
    pub fn report_last_error(&self, sink: &mut dyn Write) -> io::Result<()> {
        match &self.last_error {
            Some(error) => writeln!(sink, "{}", error),
            None => writeln!(sink, "No error."),
        }
    }

    /// プロンプト表示が有効ならプロンプト文字列
    pub fn prompt(&self) -> Option<&str> {
        self.prompt_enabled.then_some(self.prompt.as_str())
    }

    pub fn buffer(&self) -> &LineStore {
        &self.buffer
    }

    /// 現在行
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn yank_register(&self) -> &YankRegister {
        &self.yank
    }

    pub fn last_error(&self) -> Option<&EdError> {
        self.last_error.as_ref()
    }

    /// 未保存の変更があるか
    pub fn has_unsaved_changes(&self) -> bool {
        self.modified > 0
    }

    /// 最後の保存以降の変更回数
    pub fn modification_count(&self) -> usize {
        self.modified
    }

    pub(crate) fn toggle_prompt(&mut self) {
        self.prompt_enabled = !self.prompt_enabled;
    }

    pub(crate) fn toggle_verbose_errors(&mut self) {
        self.verbose_errors = !self.verbose_errors;
    }

    /// セッションを終了し、保持している全ての行を解放する
    pub fn shutdown(self) {
        log::debug!(
            "session shutdown ({} lines, {} unsaved changes)",
            self.buffer.len(),
            self.modified
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

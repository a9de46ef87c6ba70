//! メインアプリケーション構造体
//!
//! 入力を1行ずつ読み、編集セッションへ渡すメインループを実装

use crate::config::EditorOptions;
use crate::editor::{Flow, Session};
use crate::error::Result;
use crate::input::LineSource;
use std::io::Write;

/// メインアプリケーション構造体
///
/// 編集セッションを所有し、プロンプト表示とエラー報告を担当する
pub struct App {
    session: Session,
    /// 起動時に読み込むファイル（未処理の間のみ保持）
    initial_file: Option<String>,
    /// アプリケーション実行状態
    running: bool,
}

impl App {
    /// 新しいアプリケーションインスタンスを作成
    pub fn new(options: &EditorOptions) -> Self {
        Self {
            session: Session::with_options(options),
            initial_file: options.initial_file.clone(),
            running: true,
        }
    }

    /// メインループを実行
    ///
    /// 入力の終端か終了コマンドで戻る。コマンドの失敗では終了しない
    pub fn run(
        &mut self,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        errors: &mut dyn Write,
    ) -> Result<()> {
        if let Some(name) = self.initial_file.take() {
            let command = format!("e {}", name);
            if self.execute(&command, input, output, errors)? == Flow::Quit {
                self.running = false;
            }
        }

        while self.running {
            if let Some(prompt) = self.session.prompt() {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }

            let Some(line) = input.next_line()? else {
                break;
            };

            if self.execute(&line, input, output, errors)? == Flow::Quit {
                self.running = false;
            }
            output.flush()?;
        }

        Ok(())
    }

    /// 1コマンドを実行し、失敗時は `?` と（詳細モードなら）メッセージを出力
    fn execute(
        &mut self,
        line: &str,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
        errors: &mut dyn Write,
    ) -> Result<Flow> {
        match self.session.handle_command(line, input, output) {
            Ok(flow) => Ok(flow),
            Err(_) => {
                output.flush()?;
                writeln!(errors, "?")?;
                if self.session.should_report_verbose_errors() {
                    self.session.report_last_error(errors)?;
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// 編集セッションへの参照
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// アプリケーションが実行中かどうかを確認
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// アプリケーションを終了し、セッションを解放する
    pub fn shutdown(self) {
        self.session.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(options: &EditorOptions, script: &str) -> (App, String, String) {
        let mut app = App::new(options);
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        let mut errors = Vec::new();
        app.run(&mut input, &mut output, &mut errors).unwrap();
        (
            app,
            String::from_utf8(output).unwrap(),
            String::from_utf8(errors).unwrap(),
        )
    }

    #[test]
    fn test_stops_on_quit() {
        let (app, output, errors) =
            run_script(&EditorOptions::default(), "a\nhello\n.\n1p\nQ\n1p\n");
        assert!(!app.is_running());
        assert_eq!(output, "hello\n");
        assert_eq!(errors, "");
    }

    #[test]
    fn test_stops_at_end_of_input() {
        let (app, output, _) = run_script(&EditorOptions::default(), "a\nx\n.\n");
        assert!(app.is_running());
        assert_eq!(output, "");
        assert_eq!(app.session().buffer().len(), 1);
    }

    #[test]
    fn test_errors_are_reported() {
        let (_, _, errors) = run_script(&EditorOptions::default(), "1p\nH\n1p\n");
        assert_eq!(errors, "?\n?\nInvalid address.\n");
    }

    #[test]
    fn test_prompt_is_printed_before_each_command() {
        let options = EditorOptions {
            prompt_enabled: true,
            ..EditorOptions::default()
        };
        let (_, output, _) = run_script(&options, "P\nq\n");
        assert_eq!(output, "*");
    }
}

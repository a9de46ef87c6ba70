//! コマンドディスパッチ
//!
//! アドレスを検証してから各コマンドのハンドラを実行する。
//! 変更系コマンドは変更前に取り消しスナップショットを取り、変更後に変更回数を進める

use super::session::{Flow, Session};
use crate::buffer::LineStore;
use crate::error::{EdError, Result};
use crate::file;
use crate::input::{parse_address, read_text_entry, Address, Command, LineSource};
use std::io::Write;

impl Session {
    pub(super) fn dispatch(
        &mut self,
        line: &str,
        input: &mut dyn LineSource,
        output: &mut dyn Write,
    ) -> Result<Flow> {
        let (address, rest) = parse_address(line, self.cursor, self.buffer.len());
        let command = Command::parse(rest);
        log::debug!("dispatch {} at {:?}", command.name(), address);

        if address.is_invalid() {
            return Err(EdError::InvalidAddress);
        }

        let mutating = command.is_mutating();
        match command {
            Command::Append => self.append(address, input)?,
            Command::Insert => self.insert(address, input)?,
            Command::Change => self.change(address, input)?,
            Command::Delete => self.delete(address)?,
            Command::Put => self.put(address)?,
            Command::Join => self.join(address)?,
            Command::Move(destination) => self.move_lines(address, &destination)?,
            Command::Undo => self.undo()?,
            Command::Edit(name) => self.edit(&name)?,
            Command::Write(name) => self.write(&name)?,
            Command::Print => self.print(address, output)?,
            Command::PrintNumbered => self.print_numbered(address, output)?,
            Command::LineNumber => self.line_numbers(address, output)?,
            Command::Quit => return self.quit(),
            Command::ForceQuit => return Ok(Flow::Quit),
            Command::TogglePrompt => self.toggle_prompt(),
            Command::ToggleErrors => self.toggle_verbose_errors(),
            Command::LastError => self.report_last_error(output)?,
            Command::Invalid => self.goto(address, rest)?,
        }

        if mutating {
            log::trace!("{} lines, {} unsaved changes", self.buffer.len(), self.modified);
        }
        Ok(Flow::Continue)
    }

    // アドレス検証

    fn in_buffer(&self, line: usize) -> bool {
        line.checked_sub(1)
            .map_or(false, |index| self.buffer.contains(index))
    }

    /// バッファ内の行・範囲を `(start, end)` として取り出す
    fn buffer_range(&self, address: Address) -> Result<(usize, usize)> {
        let (start, end) = address.bounds().ok_or(EdError::InvalidAddress)?;
        if self.in_buffer(start) && self.in_buffer(end) {
            Ok((start, end))
        } else {
            Err(EdError::InvalidAddress)
        }
    }

    /// 挿入位置として使える単一行（`0..=count`）
    fn insertion_line(&self, address: Address) -> Result<usize> {
        match address {
            Address::Line(line) if line <= self.buffer.len() => Ok(line),
            _ => Err(EdError::InvalidAddress),
        }
    }

    // 変更の記録

    fn begin_change(&mut self) {
        self.undo.capture(&self.buffer, self.cursor, self.revision);
    }

    fn finish_change(&mut self) {
        self.revision += 1;
        self.modified += 1;
    }

    /// 0始まりの位置 `at` に行を挿入し、最後の挿入行を現在行にする
    fn insert_lines(&mut self, lines: Vec<String>, at: usize) {
        let count = lines.len();
        self.begin_change();
        self.buffer.insert(lines, at);
        self.cursor = at + count;
        self.finish_change();
    }

    /// 削除後の現在行: 削除範囲の次の行、無ければ最終行
    fn cursor_after_removal(&self, start: usize) -> usize {
        start.min(self.buffer.len())
    }

    // テキスト入力

    fn append(&mut self, address: Address, input: &mut dyn LineSource) -> Result<()> {
        let line = self.insertion_line(address)?;
        let lines = read_text_entry(input)?;
        if lines.is_empty() {
            self.cursor = line;
            return Ok(());
        }
        self.insert_lines(lines, line);
        Ok(())
    }

    /// 行 `n` の前に挿入。`0` と `1` はどちらも先頭
    fn insert(&mut self, address: Address, input: &mut dyn LineSource) -> Result<()> {
        let line = match address {
            Address::Line(line) if line <= self.buffer.len().max(1) => line,
            _ => return Err(EdError::InvalidAddress),
        };
        let lines = read_text_entry(input)?;
        if lines.is_empty() {
            self.cursor = line.min(self.buffer.len());
            return Ok(());
        }
        self.insert_lines(lines, line.saturating_sub(1));
        Ok(())
    }

    fn change(&mut self, address: Address, input: &mut dyn LineSource) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;
        let lines = read_text_entry(input)?;
        let inserted = lines.len();

        self.begin_change();
        let replaced = self.buffer.overwrite(lines, start - 1, end - 1);
        self.yank.replace(replaced);
        self.cursor = if inserted > 0 {
            start - 1 + inserted
        } else {
            self.cursor_after_removal(start)
        };
        self.finish_change();
        Ok(())
    }

    // 編集操作

    fn delete(&mut self, address: Address) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;

        self.begin_change();
        let removed = self.buffer.pop(start - 1, end - 1);
        self.yank.replace(removed);
        self.cursor = self.cursor_after_removal(start);
        self.finish_change();
        Ok(())
    }

    /// ヤンクレジスタの複製を指定行の後に挿入
    fn put(&mut self, address: Address) -> Result<()> {
        let after = match address {
            Address::Range { .. } => self.buffer_range(address)?.1,
            _ => self.insertion_line(address)?,
        };

        if self.yank.is_empty() {
            return Ok(());
        }
        self.insert_lines(self.yank.yank(), after);
        Ok(())
    }

    fn join(&mut self, address: Address) -> Result<()> {
        let (start, end) = match address {
            Address::Line(line) => (line, line.checked_add(1).ok_or(EdError::InvalidAddress)?),
            _ => self.buffer_range(address)?,
        };
        if !(self.in_buffer(start) && self.in_buffer(end)) {
            return Err(EdError::InvalidAddress);
        }

        self.begin_change();
        self.buffer.join_range(start - 1, end - 1);
        self.cursor = start;
        self.finish_change();
        Ok(())
    }

    /// 行・範囲を移動先の行の後へ移す
    ///
    /// 移動元と移動先を両方検証してから変更する
    fn move_lines(&mut self, address: Address, destination: &str) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;
        let count = self.buffer.len();

        let (target, rest) = parse_address(destination, self.cursor, count);
        if !rest.is_empty() {
            return Err(EdError::InvalidCommand);
        }
        let target = match target {
            Address::Line(line) => line,
            Address::Range { end, .. } => end,
            Address::Invalid => return Err(EdError::InvalidAddress),
        };
        if target > count || (target >= start && target < end) {
            return Err(EdError::InvalidAddress);
        }

        self.begin_change();
        let moved = self.buffer.pop(start - 1, end - 1);
        let len = moved.len();
        let at = if target < start { target } else { target - len };
        self.buffer.insert(moved, at);
        self.cursor = at + len;
        self.finish_change();
        Ok(())
    }

    fn undo(&mut self) -> Result<()> {
        self.undo
            .restore(&mut self.buffer, &mut self.cursor, &mut self.revision)?;
        self.cursor = self.cursor.min(self.buffer.len());
        self.modified += 1;
        Ok(())
    }

    // ファイル操作

    /// 引数のファイル名を記憶し、使用するファイル名を返す
    ///
    /// 引数が空なら記憶済みのファイル名を使う
    fn resolve_filename(&mut self, name: &str) -> Result<String> {
        if !name.is_empty() {
            self.filename = Some(name.to_string());
        }
        self.filename
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(EdError::InvalidCommand)
    }

    /// ファイルを読み込んでバッファを置き換える
    ///
    /// 読み込みに失敗した場合、バッファはそのまま残る
    fn edit(&mut self, name: &str) -> Result<()> {
        let name = self.resolve_filename(name)?;
        let lines = file::read_lines(file::expand_path(&name))?;

        self.buffer = LineStore::from_lines(lines);
        self.cursor = self.buffer.len();
        self.revision += 1;
        self.undo.reset(self.revision);
        self.modified = 0;
        Ok(())
    }

    fn write(&mut self, name: &str) -> Result<()> {
        let name = self.resolve_filename(name)?;
        file::write_lines(file::expand_path(&name), &self.buffer)?;
        self.modified = 0;
        Ok(())
    }

    // 表示

    fn print(&mut self, address: Address, output: &mut dyn Write) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;
        for line in &self.buffer.lines()[start - 1..end] {
            output.write_all(line.as_bytes())?;
        }
        self.cursor = end;
        Ok(())
    }

    fn print_numbered(&mut self, address: Address, output: &mut dyn Write) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;
        for (number, line) in (start..=end).zip(&self.buffer.lines()[start - 1..end]) {
            write!(output, "{}\t{}", number, line)?;
        }
        self.cursor = end;
        Ok(())
    }

    fn line_numbers(&mut self, address: Address, output: &mut dyn Write) -> Result<()> {
        let (start, end) = self.buffer_range(address)?;
        for number in start..=end {
            writeln!(output, "{}", number)?;
        }
        self.cursor = end;
        Ok(())
    }

    // セッション操作

    /// 未保存の変更があれば一度だけ警告し、変更回数をリセットする
    fn quit(&mut self) -> Result<Flow> {
        if self.modified > 0 {
            self.modified = 0;
            return Err(EdError::UnsavedChanges);
        }
        Ok(Flow::Quit)
    }

    /// アドレスのみの入力は指定行への移動
    fn goto(&mut self, address: Address, rest: &str) -> Result<()> {
        if !rest.is_empty() {
            return Err(EdError::InvalidCommand);
        }
        match address {
            Address::Line(line) if self.in_buffer(line) => {
                self.cursor = line;
                Ok(())
            }
            Address::Line(_) => Err(EdError::InvalidAddress),
            _ => Err(EdError::InvalidCommand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(lines: &[&str]) -> Session {
        let mut session = Session::new();
        session.buffer = LineStore::from_lines(lines.iter().map(|l| l.to_string()).collect());
        session.cursor = session.buffer.len();
        session
    }

    fn run(session: &mut Session, command: &str, text: &str) -> (Result<Flow>, String) {
        let mut input = text.as_bytes();
        let mut output = Vec::new();
        let result = session.handle_command(command, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    fn contents(session: &Session) -> Vec<&str> {
        session.buffer().iter().collect()
    }

    #[test]
    fn test_append_after_line_moves_cursor() {
        let mut session = session_with(&["a\n", "d\n"]);
        let (result, _) = run(&mut session, "1a", "b\nc\n.\n");
        assert_eq!(result, Ok(Flow::Continue));
        assert_eq!(contents(&session), vec!["a\n", "b\n", "c\n", "d\n"]);
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.modification_count(), 1);
    }

    #[test]
    fn test_append_at_zero_and_out_of_range() {
        let mut session = session_with(&["b\n"]);
        run(&mut session, "0a", "a\n.\n").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "b\n"]);
        assert_eq!(session.cursor(), 1);

        let (result, _) = run(&mut session, "5a", "x\n.\n");
        assert_eq!(result, Err(EdError::InvalidAddress));
        assert_eq!(session.buffer().len(), 2);

        let (result, _) = run(&mut session, "1,2a", "x\n.\n");
        assert_eq!(result, Err(EdError::InvalidAddress));
    }

    #[test]
    fn test_insert_before_line() {
        let mut session = session_with(&["a\n", "c\n"]);
        run(&mut session, "2i", "b\n.\n").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "b\n", "c\n"]);
        assert_eq!(session.cursor(), 2);

        run(&mut session, "0i", "start\n.\n").0.unwrap();
        assert_eq!(session.buffer().get(0), Some("start\n"));
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_text_entry_eof_leaves_buffer_untouched() {
        let mut session = session_with(&["a\n"]);
        let (result, _) = run(&mut session, "a", "partial\n");
        assert!(matches!(result, Err(EdError::Unknown { .. })));
        assert_eq!(contents(&session), vec!["a\n"]);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_change_fills_yank_register() {
        let mut session = session_with(&["a\n", "b\n", "c\n", "d\n"]);
        run(&mut session, "2,3c", "x\n.\n").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "x\n", "d\n"]);
        assert_eq!(session.yank_register().lines(), &["b\n", "c\n"]);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_change_with_no_text_deletes() {
        let mut session = session_with(&["a\n", "b\n"]);
        run(&mut session, "2c", ".\n").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n"]);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_delete_sets_cursor_to_following_line() {
        let mut session = session_with(&["a\n", "b\n", "c\n", "d\n"]);
        run(&mut session, "2,3d", "").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "d\n"]);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.yank_register().lines(), &["b\n", "c\n"]);

        run(&mut session, "$d", "").0.unwrap();
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.yank_register().lines(), &["d\n"]);

        run(&mut session, "d", "").0.unwrap();
        assert!(session.buffer().is_empty());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_delete_rejects_invalid_addresses() {
        let mut session = session_with(&["a\n", "b\n"]);
        assert_eq!(run(&mut session, "0d", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "3d", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "2,1d", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "1,3d", "").0, Err(EdError::InvalidAddress));
        assert_eq!(session.buffer().len(), 2);
    }

    #[test]
    fn test_put_is_repeatable() {
        let mut session = session_with(&["a\n", "b\n"]);
        run(&mut session, "1d", "").0.unwrap();
        run(&mut session, "1x", "").0.unwrap();
        run(&mut session, "0x", "").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "b\n", "a\n"]);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.yank_register().lines(), &["a\n"]);
    }

    #[test]
    fn test_put_with_empty_register_is_noop() {
        let mut session = session_with(&["a\n"]);
        run(&mut session, "x", "").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n"]);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_join_single_address_uses_next_line() {
        let mut session = session_with(&["a\n", "b\n", "c\n"]);
        run(&mut session, "1j", "").0.unwrap();
        assert_eq!(contents(&session), vec!["ab\n", "c\n"]);
        assert_eq!(session.cursor(), 1);

        assert_eq!(run(&mut session, "2j", "").0, Err(EdError::InvalidAddress));
    }

    #[test]
    fn test_whole_buffer_join_on_single_line_fails() {
        let mut session = session_with(&["only\n"]);
        assert_eq!(run(&mut session, ",j", "").0, Err(EdError::InvalidAddress));
        assert_eq!(contents(&session), vec!["only\n"]);
        assert!(!session.has_unsaved_changes());
        assert_eq!(run(&mut session, "u", "").0, Err(EdError::NoUndoAvailable));

        session.cursor = 0;
        run(&mut session, ",", "").0.unwrap();
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_join_range() {
        let mut session = session_with(&["a\n", "b\n", "c\n", "d\n"]);
        run(&mut session, "2,4j", "").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "bcd\n"]);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_move_forward_and_backward() {
        let mut session = session_with(&["1\n", "2\n", "3\n", "4\n", "5\n"]);
        run(&mut session, "1,2m4", "").0.unwrap();
        assert_eq!(contents(&session), vec!["3\n", "4\n", "1\n", "2\n", "5\n"]);
        assert_eq!(session.cursor(), 4);

        run(&mut session, "5m0", "").0.unwrap();
        assert_eq!(contents(&session), vec!["5\n", "3\n", "4\n", "1\n", "2\n"]);
        assert_eq!(session.cursor(), 1);

        run(&mut session, "2m$", "").0.unwrap();
        assert_eq!(contents(&session), vec!["5\n", "4\n", "1\n", "2\n", "3\n"]);
        assert_eq!(session.cursor(), 5);
    }

    #[test]
    fn test_move_validates_before_mutation() {
        let mut session = session_with(&["1\n", "2\n", "3\n", "4\n"]);
        assert_eq!(run(&mut session, "1,3m2", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "1m9", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "1m3,1", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "1m2zz", "").0, Err(EdError::InvalidCommand));
        assert_eq!(contents(&session), vec!["1\n", "2\n", "3\n", "4\n"]);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_undo_once_then_fails() {
        let mut session = session_with(&["a\n", "b\n"]);
        assert_eq!(run(&mut session, "u", "").0, Err(EdError::NoUndoAvailable));

        run(&mut session, "1d", "").0.unwrap();
        run(&mut session, "u", "").0.unwrap();
        assert_eq!(contents(&session), vec!["a\n", "b\n"]);
        assert_eq!(session.cursor(), 2);

        assert_eq!(run(&mut session, "u", "").0, Err(EdError::NoUndoAvailable));
        assert_eq!(contents(&session), vec!["a\n", "b\n"]);
    }

    #[test]
    fn test_print_variants() {
        let mut session = session_with(&["one\n", "two\n", "three\n"]);
        let (_, out) = run(&mut session, "1,2p", "");
        assert_eq!(out, "one\ntwo\n");
        assert_eq!(session.cursor(), 2);

        let (_, out) = run(&mut session, ",pn", "");
        assert_eq!(out, "1\tone\n2\ttwo\n3\tthree\n");

        let (_, out) = run(&mut session, "2,3n", "");
        assert_eq!(out, "2\n3\n");

        let (_, out) = run(&mut session, "p", "");
        assert_eq!(out, "three\n");
    }

    #[test]
    fn test_print_on_empty_buffer_fails() {
        let mut session = Session::new();
        assert_eq!(run(&mut session, "p", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, ",p", "").0, Err(EdError::InvalidAddress));
    }

    #[test]
    fn test_quit_warns_once() {
        let mut session = session_with(&["a\n"]);
        run(&mut session, "1d", "").0.unwrap();
        assert_eq!(run(&mut session, "q", "").0, Err(EdError::UnsavedChanges));
        assert_eq!(run(&mut session, "q", "").0, Ok(Flow::Quit));
    }

    #[test]
    fn test_force_quit_always_succeeds() {
        let mut session = session_with(&["a\n"]);
        run(&mut session, "1d", "").0.unwrap();
        assert_eq!(run(&mut session, "Q", "").0, Ok(Flow::Quit));
    }

    #[test]
    fn test_goto_and_invalid_commands() {
        let mut session = session_with(&["a\n", "b\n", "c\n"]);
        run(&mut session, "2", "").0.unwrap();
        assert_eq!(session.cursor(), 2);

        assert_eq!(run(&mut session, "7", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "0", "").0, Err(EdError::InvalidAddress));
        assert_eq!(run(&mut session, "1,2", "").0, Err(EdError::InvalidCommand));
        assert_eq!(run(&mut session, "z", "").0, Err(EdError::InvalidCommand));
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_toggles_and_last_error() {
        let mut session = session_with(&["a\n"]);
        run(&mut session, "P", "").0.unwrap();
        assert_eq!(session.prompt(), Some("*"));
        run(&mut session, "H", "").0.unwrap();
        assert!(session.should_report_verbose_errors());

        let _ = run(&mut session, "9p", "");
        let (result, out) = run(&mut session, "h", "");
        assert_eq!(result, Ok(Flow::Continue));
        assert_eq!(out, "Invalid address.\n");
    }

    #[test]
    fn test_write_without_filename_is_invalid_command() {
        let mut session = session_with(&["a\n"]);
        assert_eq!(run(&mut session, "w", "").0, Err(EdError::InvalidCommand));
        assert_eq!(run(&mut session, "e", "").0, Err(EdError::InvalidCommand));
    }
}

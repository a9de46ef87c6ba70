//! コマンド解析
//!
//! アドレス部を除いた残り文字列の先頭文字からコマンド種別を判定する

/// コマンドの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // テキスト入力
    Append,
    Insert,
    Change,

    // 編集操作
    Delete,
    Put,
    Join,
    /// 移動先アドレスの文字列を保持
    Move(String),
    Undo,

    // ファイル操作（空文字列は記憶済みファイル名を使う）
    Edit(String),
    Write(String),

    // 表示
    Print,
    PrintNumbered,
    LineNumber,

    // セッション操作
    Quit,
    ForceQuit,
    TogglePrompt,
    ToggleErrors,
    LastError,

    Invalid,
}

impl Command {
    /// 残り文字列からコマンドを判定
    pub fn parse(rest: &str) -> Self {
        let mut chars = rest.chars();
        let Some(letter) = chars.next() else {
            return Command::Invalid;
        };
        let tail = chars.as_str();

        match letter {
            'a' => Command::Append,
            'c' => Command::Change,
            'd' => Command::Delete,
            'e' => Command::Edit(tail.trim().to_string()),
            'h' => Command::LastError,
            'H' => Command::ToggleErrors,
            'i' => Command::Insert,
            'j' => Command::Join,
            'm' => Command::Move(tail.trim().to_string()),
            'n' => Command::LineNumber,
            'p' if tail.starts_with('n') => Command::PrintNumbered,
            'p' => Command::Print,
            'P' => Command::TogglePrompt,
            'q' => Command::Quit,
            'Q' => Command::ForceQuit,
            'u' => Command::Undo,
            'w' => Command::Write(tail.trim().to_string()),
            'x' => Command::Put,
            _ => Command::Invalid,
        }
    }

    /// バッファを変更し、取り消しスナップショットが必要か
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Append
                | Command::Insert
                | Command::Change
                | Command::Delete
                | Command::Put
                | Command::Join
                | Command::Move(_)
        )
    }

    /// ログ表示用のコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Command::Append => "append",
            Command::Insert => "insert",
            Command::Change => "change",
            Command::Delete => "delete",
            Command::Put => "put",
            Command::Join => "join",
            Command::Move(_) => "move",
            Command::Undo => "undo",
            Command::Edit(_) => "edit",
            Command::Write(_) => "write",
            Command::Print => "print",
            Command::PrintNumbered => "print-numbered",
            Command::LineNumber => "line-number",
            Command::Quit => "quit",
            Command::ForceQuit => "force-quit",
            Command::TogglePrompt => "toggle-prompt",
            Command::ToggleErrors => "toggle-errors",
            Command::LastError => "last-error",
            Command::Invalid => "invalid",
        }
    }
}
